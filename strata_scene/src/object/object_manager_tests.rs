/// Tests for ObjectManager
///
/// Factory registration, object lifetime routed through factories,
/// queries and archive persistence.

use super::*;
use crate::error::Error;
use crate::object::mock_object::{as_mock, MockFactory};

struct NamedQuery(&'static str);

impl Query for NamedQuery {
    fn query_type(&self) -> &str {
        self.0
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn manager_with_mock() -> (ObjectManager, std::rc::Rc<std::cell::Cell<usize>>) {
    let mut om = ObjectManager::new();
    let factory = MockFactory::new("Mock");
    let destroyed = factory.destroyed.clone();
    om.register_factory(Box::new(factory)).unwrap();
    (om, destroyed)
}

// ============================================================================
// Tests: Factories
// ============================================================================

#[test]
fn test_register_factory() {
    let (om, _) = manager_with_mock();
    assert!(om.has_factory("Mock"));
    assert_eq!(om.factory("Mock").unwrap().type_name(), "Mock");
}

#[test]
fn test_register_duplicate_factory() {
    let (mut om, _) = manager_with_mock();
    let result = om.register_factory(Box::new(MockFactory::new("Mock")));
    assert!(matches!(result, Err(Error::DuplicateItem(_))));
    assert_eq!(om.factory_types(), vec!["Mock"]);
}

#[test]
fn test_unknown_factory_not_found() {
    let om = ObjectManager::new();
    assert!(matches!(om.factory("Sphere"), Err(Error::ItemNotFound(_))));
}

#[test]
fn test_factory_types_sorted() {
    let mut om = ObjectManager::new();
    om.register_factory(Box::new(MockFactory::new("Sphere"))).unwrap();
    om.register_factory(Box::new(MockFactory::new("Box"))).unwrap();
    assert_eq!(om.factory_types(), vec!["Box", "Sphere"]);
}

#[test]
fn test_unregister_factory() {
    let (mut om, _) = manager_with_mock();
    let factory = om.unregister_factory("Mock");
    assert_eq!(factory.unwrap().type_name(), "Mock");
    assert!(!om.has_factory("Mock"));
    assert!(om.unregister_factory("Mock").is_none());
}

// ============================================================================
// Tests: Objects
// ============================================================================

#[test]
fn test_create_object() {
    let (mut om, _) = manager_with_mock();
    let params = PropertyCollection::new().with("tag", "red");
    let key = om.create_object("Mock", "crate", &params).unwrap();

    assert_eq!(om.object_count(), 1);
    assert_eq!(om.object(key).unwrap().name(), "crate");
    assert_eq!(om.object(key).unwrap().object_type(), "Mock");
    assert_eq!(as_mock(om.object(key).unwrap()).tag, "red");
    assert_eq!(om.object_by_name("crate").unwrap(), key);
    assert_eq!(om.managed(key).unwrap().factory_type(), "Mock");
    assert_eq!(om.attached_node(key).unwrap(), None);
}

#[test]
fn test_create_object_unknown_type() {
    let mut om = ObjectManager::new();
    let result = om.create_object("Mock", "crate", &PropertyCollection::new());
    assert!(matches!(result, Err(Error::ItemNotFound(_))));
    assert_eq!(om.object_count(), 0);
}

#[test]
fn test_create_object_duplicate_name() {
    let (mut om, _) = manager_with_mock();
    om.create_object("Mock", "crate", &PropertyCollection::new()).unwrap();
    let result = om.create_object("Mock", "crate", &PropertyCollection::new());
    assert!(matches!(result, Err(Error::DuplicateItem(_))));
    assert_eq!(om.object_count(), 1);
}

#[test]
fn test_create_object_factory_failure() {
    let (mut om, _) = manager_with_mock();
    let params = PropertyCollection::new().with("fail", "1");
    let result = om.create_object("Mock", "crate", &params);
    assert!(matches!(result, Err(Error::InvalidParams(_))));
    assert!(om.object_by_name("crate").is_err());
}

#[test]
fn test_destroy_object_routes_through_factory() {
    let (mut om, destroyed) = manager_with_mock();
    let key = om.create_object("Mock", "crate", &PropertyCollection::new()).unwrap();

    om.destroy_object(key).unwrap();
    assert_eq!(destroyed.get(), 1);
    assert_eq!(om.object_count(), 0);
    assert!(om.object(key).is_err());
    assert!(om.object_by_name("crate").is_err());
}

#[test]
fn test_destroy_attached_object_rejected() {
    let (mut om, destroyed) = manager_with_mock();
    let mut graph = SceneGraph::new("root");
    let key = om.create_object("Mock", "crate", &PropertyCollection::new()).unwrap();
    graph.attach_object(graph.root(), &mut om, key).unwrap();

    assert!(matches!(om.destroy_object(key), Err(Error::InvalidParams(_))));
    assert_eq!(destroyed.get(), 0);
}

#[test]
fn test_destroy_all() {
    let (mut om, destroyed) = manager_with_mock();
    om.create_object("Mock", "a", &PropertyCollection::new()).unwrap();
    om.create_object("Mock", "b", &PropertyCollection::new()).unwrap();

    om.destroy_all();
    assert_eq!(destroyed.get(), 2);
    assert_eq!(om.object_count(), 0);
    // Names are free again
    assert!(om.create_object("Mock", "a", &PropertyCollection::new()).is_ok());
}

#[test]
fn test_destroy_without_factory_drops() {
    let (mut om, destroyed) = manager_with_mock();
    let key = om.create_object("Mock", "crate", &PropertyCollection::new()).unwrap();
    let factory = om.unregister_factory("Mock");

    om.destroy_object(key).unwrap();
    assert_eq!(destroyed.get(), 0);
    assert_eq!(om.object_count(), 0);
    drop(factory);
}

#[test]
fn test_object_mut() {
    let (mut om, _) = manager_with_mock();
    let key = om.create_object("Mock", "crate", &PropertyCollection::new()).unwrap();
    om.object_mut(key).unwrap().notify_moved(&Pose::IDENTITY);
    assert_eq!(as_mock(om.object(key).unwrap()).moves.len(), 1);
}

#[test]
fn test_objects_iterator() {
    let (mut om, _) = manager_with_mock();
    om.create_object("Mock", "a", &PropertyCollection::new()).unwrap();
    om.create_object("Mock", "b", &PropertyCollection::new()).unwrap();

    let mut names: Vec<&str> = om.objects().map(|(_, o)| o.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b"]);
}

// ============================================================================
// Tests: Queries
// ============================================================================

#[test]
fn test_queries_in_registration_order() {
    let mut om = ObjectManager::new();
    om.add_query(Box::new(NamedQuery("ray")));
    om.add_query(Box::new(NamedQuery("sphere")));

    let types: Vec<&str> = om.queries().iter().map(|q| q.query_type()).collect();
    assert_eq!(types, vec!["ray", "sphere"]);

    om.truncate_queries(1);
    assert_eq!(om.queries().len(), 1);
}

// ============================================================================
// Tests: Persistence
// ============================================================================

#[test]
fn test_save_records() {
    let (mut om, _) = manager_with_mock();
    let mut graph = SceneGraph::new("root");
    let node = graph.create_child(graph.root(), "arm").unwrap();

    om.create_object("Mock", "b", &PropertyCollection::new().with("tag", "loose")).unwrap();
    let a = om.create_object("Mock", "a", &PropertyCollection::new().with("tag", "held")).unwrap();
    graph.attach_object(node, &mut om, a).unwrap();

    let mut archive = Archive::new();
    om.save(&mut archive, "Objects", &graph).unwrap();

    let records = &archive.collection("Objects").unwrap().records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value("name").unwrap(), "a");
    assert_eq!(records[0].value("class").unwrap(), "Mock");
    assert_eq!(records[0].value("node").unwrap(), "arm");
    assert_eq!(records[0].value("node_index").unwrap(), "1");
    assert_eq!(records[0].value("tag").unwrap(), "held");
    assert_eq!(records[1].value("name").unwrap(), "b");
    assert!(!records[1].has_property("node"));
}

#[test]
fn test_load_records() {
    let (mut om, _) = manager_with_mock();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![
            PropertyCollection::new()
                .with("class", "Mock")
                .with("name", "a")
                .with("node", "arm")
                .with("tag", "held"),
            PropertyCollection::new().with("class", "Mock").with("name", "b"),
        ],
    };

    let loaded = om.load(&collection).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].1, Some(NodeReference { name: "arm".to_string(), index: None }));
    assert_eq!(loaded[1].1, None);
    assert_eq!(as_mock(om.object(loaded[0].0).unwrap()).tag, "held");
}

#[test]
fn test_load_unknown_class() {
    let mut om = ObjectManager::new();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![PropertyCollection::new().with("class", "Sphere").with("name", "a")],
    };
    assert!(matches!(om.load(&collection), Err(Error::ItemNotFound(_))));
}

#[test]
fn test_load_missing_name() {
    let (mut om, _) = manager_with_mock();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![PropertyCollection::new().with("class", "Mock")],
    };
    assert!(matches!(om.load(&collection), Err(Error::ItemNotFound(_))));
}

#[test]
fn test_save_skips_nodes_outside_saved_tree() {
    let (mut om, _) = manager_with_mock();
    let mut graph = SceneGraph::new("root");
    let island = graph.create_node("island");
    let a = om.create_object("Mock", "a", &PropertyCollection::new()).unwrap();
    graph.attach_object(island, &mut om, a).unwrap();

    let mut archive = Archive::new();
    om.save(&mut archive, "Objects", &graph).unwrap();
    let record = &archive.collection("Objects").unwrap().records[0];
    assert!(!record.has_property("node"));
    assert!(!record.has_property("node_index"));
}

#[test]
fn test_load_is_all_or_nothing() {
    let (mut om, destroyed) = manager_with_mock();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![
            PropertyCollection::new().with("class", "Mock").with("name", "a"),
            PropertyCollection::new().with("class", "Mock").with("name", "b").with("fail", "1"),
        ],
    };
    assert!(matches!(om.load(&collection), Err(Error::InvalidParams(_))));
    assert_eq!(om.object_count(), 0);
    assert_eq!(destroyed.get(), 1);
}

#[test]
fn test_stage_rejects_repeated_names() {
    let (om, destroyed) = manager_with_mock();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![
            PropertyCollection::new().with("class", "Mock").with("name", "a"),
            PropertyCollection::new().with("class", "Mock").with("name", "a"),
        ],
    };
    assert!(matches!(om.stage(&collection), Err(Error::DuplicateItem(_))));
    assert_eq!(destroyed.get(), 1);
}

#[test]
fn test_commit_rejects_taken_names() {
    let (mut om, destroyed) = manager_with_mock();
    om.create_object("Mock", "a", &PropertyCollection::new()).unwrap();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![
            PropertyCollection::new().with("class", "Mock").with("name", "b").with("node", "arm").with("node_index", "4"),
            PropertyCollection::new().with("class", "Mock").with("name", "a"),
        ],
    };

    let staged = om.stage(&collection).unwrap();
    assert_eq!(staged.len(), 2);
    let references: Vec<Option<NodeReference>> = staged.node_references().map(|r| r.cloned()).collect();
    assert_eq!(references[0], Some(NodeReference { name: "arm".to_string(), index: Some(4) }));
    assert_eq!(om.object_count(), 1);

    assert!(matches!(om.commit(staged), Err(Error::DuplicateItem(_))));
    assert_eq!(om.object_count(), 1);
    assert_eq!(destroyed.get(), 2);
}

#[test]
fn test_stage_rejects_bad_node_index() {
    let (om, _) = manager_with_mock();
    let collection = Collection {
        name: "Objects".to_string(),
        records: vec![PropertyCollection::new()
            .with("class", "Mock")
            .with("name", "a")
            .with("node", "arm")
            .with("node_index", "first")],
    };
    assert!(matches!(om.stage(&collection), Err(Error::Parse(_))));
}
