/// SceneGraph: the hierarchical spatial structure of a scene.
///
/// Nodes live in a SlotMap arena. Each node owns its children (destroying a
/// node destroys its subtree); the parent link is a non-owning key. Detached
/// subtrees stay in the arena as unparented trees until the caller destroys
/// them or re-attaches them with `add_child`.
///
/// Pose mutations only set dirty flags. The expensive recomposition happens
/// in `update()` (derived poses, top-down) and `full_transform()` (matrices).

use glam::{Mat3, Quat, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::archive::{Archive, Collection};
use crate::error::Result;
use crate::expression::{format_quat, format_vec3, parse_quat, parse_vec3};
use crate::object::{ObjectKey, ObjectManager};
use crate::property::PropertyCollection;
use crate::query::Query;
use crate::{kernel_bail, kernel_err, strata_debug, strata_warn};
use super::pose::{Pose, TransformSpace};
use super::scene_node::{NodeChanges, SceneNode, SceneNodeKey};

const SOURCE: &str = "strata::SceneGraph";

/// Value of the `class` key in node records
pub const SCENE_NODE_CLASS: &str = "SceneNode";

/// A tree of SceneNodes rooted at a single root node.
pub struct SceneGraph {
    nodes: SlotMap<SceneNodeKey, SceneNode>,
    root: SceneNodeKey,
    queries: Vec<Box<dyn Query>>,
}

impl SceneGraph {
    /// Create a graph containing only a root node
    pub fn new(root_name: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(root_name));
        Self {
            nodes,
            root,
            queries: Vec::new(),
        }
    }

    /// Drop every node and start over with a fresh root. Queries are kept.
    ///
    /// Objects attached to the old nodes are detached in `objects`.
    pub fn reset(&mut self, root_name: &str, objects: &mut ObjectManager) {
        self.detach_everything(objects);
        self.nodes.clear();
        self.root = self.nodes.insert(SceneNode::new(root_name));
    }

    fn detach_everything(&self, objects: &mut ObjectManager) {
        for node in self.nodes.values() {
            for (_, object_key) in &node.objects {
                objects.set_attached(*object_key, None);
            }
        }
    }

    // ===== LOOKUP =====

    pub fn root(&self) -> SceneNodeKey {
        self.root
    }

    /// Get a node by key
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` if the key does not refer to a live node.
    pub fn node(&self, key: SceneNodeKey) -> Result<&SceneNode> {
        self.nodes
            .get(key)
            .ok_or_else(|| kernel_err!(SOURCE, InvalidParams, "Unknown node key {:?}", key))
    }

    /// Get a node mutably (pose setters)
    pub fn node_mut(&mut self, key: SceneNodeKey) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(key)
            .ok_or_else(|| kernel_err!(SOURCE, InvalidParams, "Unknown node key {:?}", key))
    }

    /// Find a node by name anywhere in the arena
    pub fn node_by_name(&self, name: &str) -> Result<SceneNodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(key, _)| key)
            .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound, "Node '{}' does not exist", name))
    }

    pub fn contains(&self, key: SceneNodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ===== NODE CREATION / DESTRUCTION =====

    /// Create a new unparented node
    pub fn create_node(&mut self, name: &str) -> SceneNodeKey {
        self.nodes.insert(SceneNode::new(name))
    }

    /// Create a node and attach it under `parent`
    pub fn create_child(&mut self, parent: SceneNodeKey, name: &str) -> Result<SceneNodeKey> {
        self.node(parent)?;
        let child = self.create_node(name);
        if let Err(e) = self.add_child(parent, child) {
            self.nodes.remove(child);
            return Err(e);
        }
        Ok(child)
    }

    /// Create a node from construction parameters.
    ///
    /// Recognized keys: `name` (required), `parent` (name of an existing
    /// node), `position`, `orientation` (`w x y z`) and `scale`.
    pub fn create_node_from_properties(&mut self, params: &PropertyCollection) -> Result<SceneNodeKey> {
        let name = params.value("name")?;
        let parent = match params.get("parent") {
            Some(parent_name) => Some(self.node_by_name(parent_name)?),
            None => None,
        };
        let pose = pose_from_properties(params)?;

        let key = match parent {
            Some(parent) => self.create_child(parent, name)?,
            None => self.create_node(name),
        };
        self.nodes[key].set_local_pose(pose);
        Ok(key)
    }

    /// Destroy a node and its whole subtree.
    ///
    /// The node is removed from its parent and every object attached inside
    /// the subtree is detached.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for the root or an unknown key.
    pub fn destroy_node(&mut self, key: SceneNodeKey, objects: &mut ObjectManager) -> Result<()> {
        if key == self.root {
            kernel_bail!(SOURCE, InvalidParams, "The root node cannot be destroyed");
        }
        if let Some(parent) = self.node(key)?.parent {
            self.unlink(parent, key);
        }

        for doomed in self.subtree(key) {
            if let Some(node) = self.nodes.remove(doomed) {
                for (_, object_key) in node.objects {
                    objects.set_attached(object_key, None);
                }
            }
        }
        Ok(())
    }

    /// Keys of `key` and all its descendants, parents before children
    pub fn subtree(&self, key: SceneNodeKey) -> Vec<SceneNodeKey> {
        let mut order = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                order.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    // ===== CHILDREN =====

    /// Add a (precreated) node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - `InvalidParams` if the child already has a parent, is the root, or
    ///   is `parent` itself or one of its ancestors
    /// - `DuplicateItem` if `parent` already has a child with the same name
    pub fn add_child(&mut self, parent: SceneNodeKey, child: SceneNodeKey) -> Result<()> {
        let child_node = self.node(child)?;
        let parent_node = self.node(parent)?;

        if let Some(current) = child_node.parent {
            kernel_bail!(SOURCE, InvalidParams,
                "Node '{}' already was a child of '{}'",
                child_node.name(), self.nodes[current].name());
        }
        if child == self.root {
            kernel_bail!(SOURCE, InvalidParams, "The root node cannot become a child");
        }
        if self.is_ancestor_or_self(child, parent) {
            kernel_bail!(SOURCE, InvalidParams,
                "Adding '{}' under '{}' would create a cycle",
                child_node.name(), parent_node.name());
        }
        let duplicate = parent_node
            .children
            .iter()
            .any(|c| self.nodes[*c].name() == child_node.name());
        if duplicate {
            kernel_bail!(SOURCE, DuplicateItem,
                "Node '{}' already has a child named '{}'",
                parent_node.name(), child_node.name());
        }

        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.notify_update(NodeChanges::PARENT);
        Ok(())
    }

    /// Whether `ancestor` is `key` or lies on the path from `key` to its root
    pub fn is_ancestor_or_self(&self, ancestor: SceneNodeKey, key: SceneNodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.nodes.get(k).and_then(|n| n.parent);
        }
        false
    }

    /// Get the child at `index` (insertion order)
    pub fn child_at(&self, parent: SceneNodeKey, index: usize) -> Result<SceneNodeKey> {
        let node = self.node(parent)?;
        node.children.get(index).copied().ok_or_else(|| {
            kernel_err!(SOURCE, ItemNotFound,
                "Child index {} out of bounds for '{}' ({} children)",
                index, node.name(), node.children.len())
        })
    }

    /// Get the child with a given name
    pub fn child_by_name(&self, parent: SceneNodeKey, name: &str) -> Result<SceneNodeKey> {
        let node = self.node(parent)?;
        node.children
            .iter()
            .copied()
            .find(|c| self.nodes[*c].name() == name)
            .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound,
                "Child node named '{}' does not exist under '{}'", name, node.name()))
    }

    /// Detach the child at `index`, returning its key to the caller
    pub fn remove_child_at(&mut self, parent: SceneNodeKey, index: usize) -> Result<SceneNodeKey> {
        let child = self.child_at(parent, index)?;
        self.unlink(parent, child);
        Ok(child)
    }

    /// Detach the child with a given name, returning its key to the caller
    pub fn remove_child_by_name(&mut self, parent: SceneNodeKey, name: &str) -> Result<SceneNodeKey> {
        let child = self.child_by_name(parent, name)?;
        self.unlink(parent, child);
        Ok(child)
    }

    /// Detach a specific child node
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: SceneNodeKey, child: SceneNodeKey) -> Result<SceneNodeKey> {
        let node = self.node(parent)?;
        if !node.children.contains(&child) {
            kernel_bail!(SOURCE, ItemNotFound,
                "Node {:?} is not a child of '{}'", child, node.name());
        }
        self.unlink(parent, child);
        Ok(child)
    }

    /// Detach every child of `parent`, returning their keys in order.
    ///
    /// The detached subtrees remain alive; ownership passes to the caller.
    pub fn remove_all_children(&mut self, parent: SceneNodeKey) -> Result<Vec<SceneNodeKey>> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in &children {
            let node = &mut self.nodes[*child];
            node.parent = None;
            node.notify_update(NodeChanges::PARENT);
        }
        Ok(children)
    }

    fn unlink(&mut self, parent: SceneNodeKey, child: SceneNodeKey) {
        self.nodes[parent].children.retain(|c| *c != child);
        let node = &mut self.nodes[child];
        node.parent = None;
        node.notify_update(NodeChanges::PARENT);
    }

    // ===== ATTACHED OBJECTS =====

    /// Attach a managed object to a node.
    ///
    /// # Errors
    ///
    /// - `InvalidParams` if the object is already attached to any node
    /// - `DuplicateItem` if an object with the same name is attached here
    pub fn attach_object(
        &mut self,
        key: SceneNodeKey,
        objects: &mut ObjectManager,
        object: ObjectKey,
    ) -> Result<()> {
        let name = objects.object(object)?.name().to_string();
        if let Some(current) = objects.attached_node(object)? {
            let owner = self.nodes.get(current).map(|n| n.name()).unwrap_or("<destroyed>");
            kernel_bail!(SOURCE, InvalidParams,
                "Object '{}' already attached to node '{}'", name, owner);
        }

        let node = self.node_mut(key)?;
        if node.objects.iter().any(|(n, _)| *n == name) {
            kernel_bail!(SOURCE, DuplicateItem,
                "Object with name '{}' already attached to node '{}'", name, node.name());
        }
        node.objects.push((name, object));
        node.notify_update(NodeChanges::BOUNDS);
        objects.set_attached(object, Some(key));
        Ok(())
    }

    /// Get the key of an attached object by name
    pub fn attached_object(&self, key: SceneNodeKey, name: &str) -> Result<ObjectKey> {
        let node = self.node(key)?;
        node.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
            .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound,
                "Attached object '{}' not found on '{}'", name, node.name()))
    }

    /// Get the key of an attached object by attachment index
    pub fn attached_object_at(&self, key: SceneNodeKey, index: usize) -> Result<ObjectKey> {
        let node = self.node(key)?;
        node.objects.get(index).map(|(_, k)| *k).ok_or_else(|| {
            kernel_err!(SOURCE, ItemNotFound,
                "Object index {} out of bounds for '{}'", index, node.name())
        })
    }

    /// Detach an attached object by name
    pub fn detach_object_by_name(
        &mut self,
        key: SceneNodeKey,
        objects: &mut ObjectManager,
        name: &str,
    ) -> Result<ObjectKey> {
        let object = self.attached_object(key, name)?;
        self.detach_object(key, objects, object)
    }

    /// Detach an attached object by attachment index
    pub fn detach_object_at(
        &mut self,
        key: SceneNodeKey,
        objects: &mut ObjectManager,
        index: usize,
    ) -> Result<ObjectKey> {
        let object = self.attached_object_at(key, index)?;
        self.detach_object(key, objects, object)
    }

    /// Detach a specific object
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the object is not attached to this node.
    pub fn detach_object(
        &mut self,
        key: SceneNodeKey,
        objects: &mut ObjectManager,
        object: ObjectKey,
    ) -> Result<ObjectKey> {
        let node = self.node_mut(key)?;
        let Some(index) = node.objects.iter().position(|(_, k)| *k == object) else {
            kernel_bail!(SOURCE, ItemNotFound,
                "Object {:?} is not attached to node '{}'", object, node.name());
        };
        node.objects.remove(index);
        node.notify_update(NodeChanges::BOUNDS);
        objects.set_attached(object, None);
        Ok(object)
    }

    /// Detach every object from a node, returning their keys
    pub fn detach_all_objects(
        &mut self,
        key: SceneNodeKey,
        objects: &mut ObjectManager,
    ) -> Result<Vec<ObjectKey>> {
        let node = self.node_mut(key)?;
        let detached: Vec<ObjectKey> = node.objects.drain(..).map(|(_, k)| k).collect();
        node.notify_update(NodeChanges::BOUNDS);
        for object in &detached {
            objects.set_attached(*object, None);
        }
        Ok(detached)
    }

    // ===== POSE OPERATIONS =====

    pub fn set_position(&mut self, key: SceneNodeKey, position: Vec3) -> Result<()> {
        self.node_mut(key)?.set_position(position);
        Ok(())
    }

    pub fn set_orientation(&mut self, key: SceneNodeKey, orientation: Quat) -> Result<()> {
        self.node_mut(key)?.set_orientation(orientation);
        Ok(())
    }

    pub fn set_scale(&mut self, key: SceneNodeKey, scale: Vec3) -> Result<()> {
        self.node_mut(key)?.set_scale(scale);
        Ok(())
    }

    /// Derived orientation of the node's parent (identity for a parentless node)
    fn parent_orientation(&self, key: SceneNodeKey) -> Result<Quat> {
        Ok(match self.node(key)?.parent {
            Some(parent) => self.nodes[parent].derived_orientation(),
            None => Quat::IDENTITY,
        })
    }

    /// Move a node along cartesian axes of the given space.
    ///
    /// WORLD uses the parent's derived orientation as of the last update;
    /// without a parent it behaves like PARENT.
    pub fn translate(&mut self, key: SceneNodeKey, delta: Vec3, space: TransformSpace) -> Result<()> {
        let offset = match space {
            TransformSpace::Local => self.node(key)?.orientation() * delta,
            TransformSpace::Parent => delta,
            TransformSpace::World => self.parent_orientation(key)?.inverse() * delta,
        };
        self.node_mut(key)?.offset_position(offset);
        Ok(())
    }

    /// Move a node along arbitrary axes (`axes * delta`)
    pub fn translate_along_axes(
        &mut self,
        key: SceneNodeKey,
        axes: Mat3,
        delta: Vec3,
        space: TransformSpace,
    ) -> Result<()> {
        self.translate(key, axes * delta, space)
    }

    /// Rotate a node by a quaternion in the given space.
    ///
    /// WORLD rotates about a world-fixed axis; the position is unchanged.
    /// Without a parent it behaves like PARENT.
    pub fn rotate(&mut self, key: SceneNodeKey, rotation: Quat, space: TransformSpace) -> Result<()> {
        let current = self.node(key)?.orientation();
        let orientation = match space {
            TransformSpace::Local => current * rotation,
            TransformSpace::Parent => rotation * current,
            TransformSpace::World => {
                let parent = self.parent_orientation(key)?;
                parent.inverse() * rotation * parent * current
            }
        };
        self.node_mut(key)?.set_orientation(orientation.normalize());
        Ok(())
    }

    /// Rotate a node around an axis by `angle` radians
    pub fn rotate_axis_angle(
        &mut self,
        key: SceneNodeKey,
        axis: Vec3,
        angle: f32,
        space: TransformSpace,
    ) -> Result<()> {
        self.rotate(key, Quat::from_axis_angle(axis.normalize(), angle), space)
    }

    /// World matrix of a node, rebuilt lazily from its derived pose
    pub fn full_transform(&self, key: SceneNodeKey) -> Result<glam::Mat4> {
        Ok(self.node(key)?.full_transform())
    }

    // ===== UPDATE PASS =====

    /// Update derived poses of the whole tree from the root
    pub fn update(&mut self, objects: &mut ObjectManager) {
        let root = self.root;
        self.update_inner(root, false, objects);
    }

    /// Top-down update starting at `key`.
    ///
    /// A node recomputes its derived pose if it is stale or `parent_changed`
    /// is set; its children are then visited with the hint set whenever this
    /// node recomputed. Objects attached to recomputed nodes are notified.
    pub fn update_node(
        &mut self,
        key: SceneNodeKey,
        parent_changed: bool,
        objects: &mut ObjectManager,
    ) -> Result<()> {
        self.node(key)?;
        self.update_inner(key, parent_changed, objects);
        Ok(())
    }

    fn update_inner(&mut self, start: SceneNodeKey, parent_changed: bool, objects: &mut ObjectManager) {
        let mut stack = vec![(start, parent_changed)];

        while let Some((key, hint)) = stack.pop() {
            let node = &self.nodes[key];
            let recompute = hint || node.is_transform_stale();

            if recompute {
                let parent = node
                    .parent
                    .map(|p| (*self.nodes[p].derived_pose(), self.nodes[p].level()));
                let node = &mut self.nodes[key];
                node.update_from_parent(parent.as_ref().map(|(pose, level)| (pose, *level)));

                let node = &self.nodes[key];
                for (_, object_key) in &node.objects {
                    objects.notify_moved(*object_key, node.derived_pose());
                }
            }

            let node = &self.nodes[key];
            stack.extend(node.children.iter().rev().map(|c| (*c, recompute)));
        }
    }

    // ===== QUERIES =====

    /// Register a query against the scene graph
    pub fn add_query(&mut self, query: Box<dyn Query>) {
        strata_debug!(SOURCE, "Scene query '{}' registered", query.query_type());
        self.queries.push(query);
    }

    /// Registered scene queries, in registration order
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

    /// Record describing one node
    pub fn node_record(&self, key: SceneNodeKey) -> Result<PropertyCollection> {
        let node = self.node(key)?;
        let mut pc = PropertyCollection::new();
        pc.add_pair("class", SCENE_NODE_CLASS);
        pc.add_pair("name", node.name());
        if let Some(parent) = node.parent {
            pc.add_pair("parent", self.nodes[parent].name());
        }
        pc.add_pair("position", format_vec3(node.position()));
        pc.add_pair("orientation", format_quat(node.orientation()));
        pc.add_pair("scale", format_vec3(node.scale()));
        Ok(pc)
    }

    /// Write the tree under the root as a collection, parents before children.
    ///
    /// Child records carry `parent_index`, the record position of their
    /// parent, so names repeated in different branches load back in place.
    pub fn save(&self, archive: &mut Archive, collection: &str) -> Result<()> {
        let keys = self.subtree(self.root);
        let positions: FxHashMap<SceneNodeKey, usize> =
            keys.iter().enumerate().map(|(index, key)| (*key, index)).collect();

        archive.create_collection(collection, keys.len())?;
        for key in &keys {
            let mut record = self.node_record(*key)?;
            if let Some(index) = self.nodes[*key].parent.and_then(|p| positions.get(&p)) {
                record.add_pair("parent_index", index.to_string());
            }
            archive.add_record(collection, record)?;
        }
        Ok(())
    }

    /// Build a new graph from the nodes described by `collection`.
    ///
    /// The first parentless record becomes the root (`default_root` names it
    /// when no record qualifies); later parentless records become detached
    /// nodes. Records must list parents before their children. A parent is
    /// found through `parent_index` when it points at an earlier record with
    /// the right name; otherwise the nearest ancestor of the previous record
    /// with that name is used, then any loaded node with that name.
    ///
    /// Returns the graph and the key built for each record, in record order.
    pub fn from_collection(
        collection: &Collection,
        default_root: &str,
    ) -> Result<(SceneGraph, Vec<SceneNodeKey>)> {
        let root_name = collection
            .records
            .iter()
            .find(|r| !r.has_property("parent"))
            .map(|r| r.value("name"))
            .transpose()?
            .unwrap_or(default_root);
        let mut graph = SceneGraph::new(root_name);

        let mut keys: Vec<SceneNodeKey> = Vec::with_capacity(collection.len());
        let mut by_name: FxHashMap<&str, SceneNodeKey> = FxHashMap::default();
        // Path from a tree root to the last loaded node
        let mut chain: Vec<SceneNodeKey> = Vec::new();
        let mut root_seen = false;

        for record in &collection.records {
            if let Some(class) = record.get("class") {
                if class != SCENE_NODE_CLASS {
                    kernel_bail!(SOURCE, Archive,
                        "Unexpected class '{}' in graph collection '{}'", class, collection.name);
                }
            }
            let name = record.value("name")?;
            let pose = pose_from_properties(record)?;

            let key = match record.get("parent") {
                Some(parent_name) => {
                    let parent = graph.resolve_parent(record, parent_name, &keys, &chain, &by_name)
                        .ok_or_else(|| kernel_err!(SOURCE, ItemNotFound,
                            "Parent '{}' of node '{}' not loaded yet", parent_name, name))?;
                    chain = graph.path_from_root(parent);
                    graph.create_child(parent, name)?
                }
                None if !root_seen => {
                    root_seen = true;
                    chain.clear();
                    graph.root
                }
                None => {
                    strata_warn!(SOURCE, "Node '{}' has no parent; loaded as a detached tree", name);
                    chain.clear();
                    graph.create_node(name)
                }
            };

            graph.nodes[key].set_local_pose(pose);
            chain.push(key);
            keys.push(key);
            by_name.entry(name).or_insert(key);
        }

        strata_debug!(SOURCE, "Loaded {} nodes from '{}'", graph.nodes.len(), collection.name);
        Ok((graph, keys))
    }

    fn resolve_parent(
        &self,
        record: &PropertyCollection,
        parent_name: &str,
        keys: &[SceneNodeKey],
        chain: &[SceneNodeKey],
        by_name: &FxHashMap<&str, SceneNodeKey>,
    ) -> Option<SceneNodeKey> {
        let indexed = record
            .get("parent_index")
            .and_then(|i| i.trim().parse::<usize>().ok())
            .and_then(|i| keys.get(i).copied())
            .filter(|k| self.nodes[*k].name() == parent_name);
        indexed
            .or_else(|| chain.iter().rev().copied().find(|k| self.nodes[*k].name() == parent_name))
            .or_else(|| by_name.get(parent_name).copied())
    }

    /// Keys from the top of `key`'s tree down to `key`
    fn path_from_root(&self, key: SceneNodeKey) -> Vec<SceneNodeKey> {
        let mut path = Vec::new();
        let mut current = Some(key);
        while let Some(k) = current {
            path.push(k);
            current = self.nodes.get(k).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    /// Take over the nodes of `other`, keeping this graph's queries.
    ///
    /// Objects attached to the old nodes are detached in `objects`.
    pub fn replace(&mut self, other: SceneGraph, objects: &mut ObjectManager) {
        self.detach_everything(objects);
        self.nodes = other.nodes;
        self.root = other.root;
    }

    /// Replace the tree with the nodes described by `collection`.
    ///
    /// See [`from_collection`](Self::from_collection). On error this graph is
    /// unchanged. Returns the key built for each record.
    pub fn load(
        &mut self,
        collection: &Collection,
        objects: &mut ObjectManager,
    ) -> Result<Vec<SceneNodeKey>> {
        let root_name = self.nodes[self.root].name().to_string();
        let (graph, keys) = Self::from_collection(collection, &root_name)?;
        self.replace(graph, objects);
        Ok(keys)
    }
}

/// Local pose from `position` / `orientation` / `scale` keys, defaulting
/// missing keys to the identity pose.
pub fn pose_from_properties(params: &PropertyCollection) -> Result<Pose> {
    let mut pose = Pose::IDENTITY;
    if let Some(position) = params.get("position") {
        pose.position = parse_vec3(position)?;
    }
    if let Some(orientation) = params.get("orientation") {
        pose.orientation = parse_quat(orientation)?;
    }
    if let Some(scale) = params.get("scale") {
        pose.scale = parse_vec3(scale)?;
    }
    Ok(pose)
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
