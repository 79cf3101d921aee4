//! Object manager: factory registry and owner of every scene object.
//!
//! Objects are stored in a SlotMap arena and addressed by [`ObjectKey`].
//! Each entry remembers the factory type that built it (destruction is routed
//! back through that factory) and the node it is attached to, if any.
//! Attachment itself is driven by the [`SceneGraph`].

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::archive::{Archive, Collection};
use crate::error::Result;
use crate::property::PropertyCollection;
use crate::query::Query;
use crate::scene::{Pose, SceneGraph, SceneNodeKey};
use crate::{kernel_bail, kernel_err, strata_debug, strata_warn};
use super::{ObjectFactory, ObjectKey, SceneObject};

const SOURCE: &str = "strata::ObjectManager";

/// An object together with its bookkeeping
pub struct ManagedObject {
    object: Box<dyn SceneObject>,
    factory_type: String,
    attached_to: Option<SceneNodeKey>,
}

impl ManagedObject {
    pub fn object(&self) -> &dyn SceneObject {
        self.object.as_ref()
    }

    /// Type of the factory that built the object
    pub fn factory_type(&self) -> &str {
        &self.factory_type
    }

    pub fn attached_to(&self) -> Option<SceneNodeKey> {
        self.attached_to
    }
}

/// Owns object factories, scene objects and object queries.
pub struct ObjectManager {
    factories: FxHashMap<String, Box<dyn ObjectFactory>>,
    objects: SlotMap<ObjectKey, ManagedObject>,
    names: FxHashMap<String, ObjectKey>,
    queries: Vec<Box<dyn Query>>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
            objects: SlotMap::with_key(),
            names: FxHashMap::default(),
            queries: Vec::new(),
        }
    }

    // ===== FACTORIES =====

    /// Register a factory under its type name
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if a factory with the same type exists.
    pub fn register_factory(&mut self, factory: Box<dyn ObjectFactory>) -> Result<()> {
        let type_name = factory.type_name().to_string();
        if self.factories.contains_key(&type_name) {
            kernel_bail!(SOURCE, DuplicateItem,
                "Object factory for type '{}' already registered", type_name);
        }
        strata_debug!(SOURCE, "Object factory '{}' registered", type_name);
        self.factories.insert(type_name, factory);
        Ok(())
    }

    /// Look up a factory by type name
    pub fn factory(&self, type_name: &str) -> Result<&dyn ObjectFactory> {
        self.factories
            .get(type_name)
            .map(|f| f.as_ref())
            .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound,
                "No object factory registered for type '{}'", type_name))
    }

    pub fn has_factory(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered factory types, sorted
    pub fn factory_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Remove a factory and hand it back.
    ///
    /// Objects already built by it are left alone; destroying them later
    /// falls back to dropping them.
    pub fn unregister_factory(&mut self, type_name: &str) -> Option<Box<dyn ObjectFactory>> {
        self.factories.remove(type_name)
    }

    pub(crate) fn clear_factories(&mut self) {
        self.factories.clear();
    }

    // ===== OBJECTS =====

    /// Build an object through the factory registered for `type_name`
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if no factory handles `type_name`
    /// - `DuplicateItem` if an object named `name` already exists
    /// - whatever the factory returns
    pub fn create_object(
        &mut self,
        type_name: &str,
        name: &str,
        params: &PropertyCollection,
    ) -> Result<ObjectKey> {
        if self.names.contains_key(name) {
            kernel_bail!(SOURCE, DuplicateItem, "Object '{}' already exists", name);
        }
        let object = self.factory(type_name)?.create_instance(name, params)?;

        let key = self.objects.insert(ManagedObject {
            object,
            factory_type: type_name.to_string(),
            attached_to: None,
        });
        self.names.insert(name.to_string(), key);
        Ok(key)
    }

    /// Destroy an object through the factory that built it
    ///
    /// # Errors
    ///
    /// - `InvalidParams` for an unknown key, or if the object is still
    ///   attached to a node (detach it through the graph first)
    pub fn destroy_object(&mut self, key: ObjectKey) -> Result<()> {
        let entry = self.entry(key)?;
        if entry.attached_to.is_some() {
            kernel_bail!(SOURCE, InvalidParams,
                "Object '{}' is still attached to a node", entry.object.name());
        }
        if let Some(entry) = self.objects.remove(key) {
            self.names.remove(entry.object.name());
            self.release(entry);
        }
        Ok(())
    }

    /// Destroy every object regardless of attachment.
    ///
    /// Nodes may still list the destroyed keys; the caller resets or
    /// discards the graph afterwards.
    pub fn destroy_all(&mut self) {
        let entries: Vec<ManagedObject> = self.objects.drain().map(|(_, entry)| entry).collect();
        self.names.clear();
        for entry in entries {
            self.release(entry);
        }
    }

    fn release(&self, entry: ManagedObject) {
        match self.factories.get(&entry.factory_type) {
            Some(factory) => factory.destroy_instance(entry.object),
            None => {
                strata_warn!(SOURCE, "Factory '{}' gone; dropping object '{}' directly",
                    entry.factory_type, entry.object.name());
            }
        }
    }

    fn entry(&self, key: ObjectKey) -> Result<&ManagedObject> {
        self.objects
            .get(key)
            .ok_or_else(|| kernel_err!(SOURCE, InvalidParams, "Unknown object key {:?}", key))
    }

    pub fn managed(&self, key: ObjectKey) -> Result<&ManagedObject> {
        self.entry(key)
    }

    pub fn object(&self, key: ObjectKey) -> Result<&dyn SceneObject> {
        Ok(self.entry(key)?.object.as_ref())
    }

    pub fn object_mut(&mut self, key: ObjectKey) -> Result<&mut dyn SceneObject> {
        match self.objects.get_mut(key) {
            Some(entry) => {
                let object: &mut dyn SceneObject = entry.object.as_mut();
                Ok(object)
            }
            None => Err(kernel_err!(SOURCE, InvalidParams, "Unknown object key {:?}", key)),
        }
    }

    /// Find an object key by name
    pub fn object_by_name(&self, name: &str) -> Result<ObjectKey> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound, "Object '{}' does not exist", name))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate over all objects
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &dyn SceneObject)> {
        self.objects.iter().map(|(key, entry)| (key, entry.object.as_ref()))
    }

    /// Node the object is attached to
    pub fn attached_node(&self, key: ObjectKey) -> Result<Option<SceneNodeKey>> {
        Ok(self.entry(key)?.attached_to)
    }

    /// Record the attachment and notify the object. Unknown keys are ignored.
    pub(crate) fn set_attached(&mut self, key: ObjectKey, node: Option<SceneNodeKey>) {
        if let Some(entry) = self.objects.get_mut(key) {
            entry.attached_to = node;
            entry.object.notify_attached(node);
        }
    }

    pub(crate) fn notify_moved(&mut self, key: ObjectKey, pose: &Pose) {
        if let Some(entry) = self.objects.get_mut(key) {
            entry.object.notify_moved(pose);
        }
    }

    // ===== QUERIES =====

    pub fn add_query(&mut self, query: Box<dyn Query>) {
        strata_debug!(SOURCE, "Object query '{}' registered", query.query_type());
        self.queries.push(query);
    }

    pub fn queries(&self) -> &[Box<dyn Query>] {
        &self.queries
    }

    pub(crate) fn truncate_queries(&mut self, len: usize) {
        self.queries.truncate(len);
    }

    pub(crate) fn clear_queries(&mut self) {
        self.queries.clear();
    }

    // ===== PERSISTENCE =====

    /// Write every object as a record of `collection`.
    ///
    /// Records carry `class` (factory type), `name` and the object's own
    /// properties. Attached objects also carry `node` and `node_index`, the
    /// position of that node in the graph collection written by
    /// [`SceneGraph::save`]. Objects attached outside the saved tree are
    /// written unattached. Order follows object names.
    pub fn save(&self, archive: &mut Archive, collection: &str, graph: &SceneGraph) -> Result<()> {
        let saved_order: FxHashMap<SceneNodeKey, usize> = graph
            .subtree(graph.root())
            .into_iter()
            .enumerate()
            .map(|(index, key)| (key, index))
            .collect();

        let mut entries: Vec<&ManagedObject> = self.objects.values().collect();
        entries.sort_by(|a, b| a.object.name().cmp(b.object.name()));

        archive.create_collection(collection, entries.len())?;
        for entry in entries {
            let mut pc = PropertyCollection::new();
            pc.add_pair("class", entry.factory_type.as_str());
            pc.add_pair("name", entry.object.name());
            if let Some(node) = entry.attached_to {
                match saved_order.get(&node) {
                    Some(index) => {
                        pc.add_pair("node", graph.node(node)?.name());
                        pc.add_pair("node_index", index.to_string());
                    }
                    None => strata_warn!(SOURCE,
                        "Object '{}' is attached outside the saved tree; saved unattached",
                        entry.object.name()),
                }
            }
            entry.object.save(&mut pc);
            archive.add_record(collection, pc)?;
        }
        Ok(())
    }

    /// Build objects from `collection` without taking ownership of them.
    ///
    /// Nothing in the manager changes. If any record fails, the objects
    /// built so far are destroyed through their factories and the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` for a missing `class` or `name`, or an unknown class
    /// - `DuplicateItem` if two records share a name
    /// - `Parse` for a malformed `node_index`
    /// - whatever the factory returns
    pub fn stage(&self, collection: &Collection) -> Result<StagedObjects> {
        let mut staged = StagedObjects { entries: Vec::with_capacity(collection.len()) };
        for record in &collection.records {
            match self.stage_record(record, &staged) {
                Ok(entry) => staged.entries.push(entry),
                Err(e) => {
                    self.discard(staged);
                    return Err(e);
                }
            }
        }
        Ok(staged)
    }

    fn stage_record(
        &self,
        record: &PropertyCollection,
        staged: &StagedObjects,
    ) -> Result<(ManagedObject, Option<NodeReference>)> {
        let class = record.value("class")?;
        let name = record.value("name")?;
        if staged.entries.iter().any(|(entry, _)| entry.object.name() == name) {
            kernel_bail!(SOURCE, DuplicateItem, "Object '{}' appears twice", name);
        }
        let node = match record.get("node") {
            Some(node_name) => {
                let index = record
                    .get("node_index")
                    .map(|i| i.trim().parse::<usize>().map_err(|_| {
                        kernel_err!(SOURCE, Parse,
                            "Invalid node_index '{}' for object '{}'", i, name)
                    }))
                    .transpose()?;
                Some(NodeReference { name: node_name.to_string(), index })
            }
            None => None,
        };
        let object = self.factory(class)?.create_instance(name, record)?;
        Ok((
            ManagedObject {
                object,
                factory_type: class.to_string(),
                attached_to: None,
            },
            node,
        ))
    }

    /// Destroy staged objects through their factories
    pub fn discard(&self, staged: StagedObjects) {
        for (entry, _) in staged.entries {
            self.release(entry);
        }
    }

    /// Take ownership of staged objects.
    ///
    /// Returns each new key with the node it asks to be attached to, in
    /// record order. Objects are not attached here; the caller owns the graph.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if a staged name is already taken; the staged
    /// objects are then destroyed and the manager is unchanged.
    pub fn commit(&mut self, staged: StagedObjects) -> Result<Vec<(ObjectKey, Option<NodeReference>)>> {
        let taken = staged
            .entries
            .iter()
            .map(|(entry, _)| entry.object.name())
            .find(|name| self.names.contains_key(*name))
            .map(str::to_string);
        if let Some(name) = taken {
            self.discard(staged);
            kernel_bail!(SOURCE, DuplicateItem, "Object '{}' already exists", name);
        }

        let mut committed = Vec::with_capacity(staged.entries.len());
        for (entry, node) in staged.entries {
            let name = entry.object.name().to_string();
            let key = self.objects.insert(entry);
            self.names.insert(name, key);
            committed.push((key, node));
        }
        Ok(committed)
    }

    /// Rebuild objects from `collection` and add them to the manager.
    ///
    /// All or nothing: on error no object from `collection` remains.
    pub fn load(&mut self, collection: &Collection) -> Result<Vec<(ObjectKey, Option<NodeReference>)>> {
        let staged = self.stage(collection)?;
        let loaded = self.commit(staged)?;
        strata_debug!(SOURCE, "Loaded {} objects from '{}'", loaded.len(), collection.name);
        Ok(loaded)
    }
}

/// Node an object record asks to be attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReference {
    pub name: String,
    /// Record position of the node in its graph collection, when saved
    pub index: Option<usize>,
}

/// Objects built from records but not yet owned by a manager.
///
/// Hand them to [`ObjectManager::commit`] or [`ObjectManager::discard`];
/// dropping them skips their factories.
pub struct StagedObjects {
    entries: Vec<(ManagedObject, Option<NodeReference>)>,
}

impl StagedObjects {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requested attachment of each staged object, in record order
    pub fn node_references(&self) -> impl Iterator<Item = Option<&NodeReference>> {
        self.entries.iter().map(|(_, node)| node.as_ref())
    }
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "object_manager_tests.rs"]
mod tests;
