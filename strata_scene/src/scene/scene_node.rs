/// SceneNode: a single node of the scene graph.
///
/// A node stores its local pose, the derived (world) pose computed by the last
/// update pass, and a lazily built world matrix. Structural links (parent,
/// children, attached objects) are arena keys owned by the SceneGraph; only
/// the graph can change them.

use std::cell::{Cell, OnceCell};
use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};
use slotmap::new_key_type;
use crate::object::ObjectKey;
use super::pose::Pose;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a SceneNode within a SceneGraph.
    ///
    /// Keys remain valid until the node (or an ancestor) is destroyed.
    pub struct SceneNodeKey;
}

// ===== CHANGE HINTS =====

bitflags! {
    /// Reasons a node was invalidated since its last update pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeChanges: u8 {
        /// Position or orientation changed
        const POSE   = 1 << 0;
        /// Scale changed
        const SCALE  = 1 << 1;
        /// Attached object set changed
        const BOUNDS = 1 << 2;
        /// Parent link changed
        const PARENT = 1 << 3;
    }
}

// ===== SCENE NODE =====

/// A named node with a local pose, a derived pose and a cached world matrix.
#[derive(Debug)]
pub struct SceneNode {
    name: String,
    pub(super) parent: Option<SceneNodeKey>,
    /// Children in insertion order
    pub(super) children: Vec<SceneNodeKey>,
    /// Attached objects (name, key) in attachment order
    pub(super) objects: Vec<(String, ObjectKey)>,
    pub(super) level: u16,
    local: Pose,
    derived: Pose,
    /// Set by any pose/parent change, cleared by the update pass
    transform_stale: bool,
    pending: NodeChanges,
    /// World matrix built from `derived`; empty when stale
    cached_transform: OnceCell<Mat4>,
    matrix_rebuilds: Cell<u32>,
}

impl SceneNode {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            objects: Vec::new(),
            level: 0,
            local: Pose::IDENTITY,
            derived: Pose::IDENTITY,
            transform_stale: true,
            pending: NodeChanges::empty(),
            cached_transform: OnceCell::new(),
            matrix_rebuilds: Cell::new(0),
        }
    }

    // ===== IDENTITY / STRUCTURE =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<SceneNodeKey> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Child keys in insertion order
    pub fn children(&self) -> &[SceneNodeKey] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Depth in the tree as of the last update pass (root = 0)
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Attached object keys in attachment order
    pub fn attached_objects(&self) -> impl Iterator<Item = (&str, ObjectKey)> {
        self.objects.iter().map(|(name, key)| (name.as_str(), *key))
    }

    pub fn num_attached_objects(&self) -> usize {
        self.objects.len()
    }

    // ===== LOCAL POSE =====

    pub fn position(&self) -> Vec3 {
        self.local.position
    }

    pub fn orientation(&self) -> Quat {
        self.local.orientation
    }

    pub fn scale(&self) -> Vec3 {
        self.local.scale
    }

    pub fn local_pose(&self) -> &Pose {
        &self.local
    }

    pub fn set_position(&mut self, position: Vec3) {
        crate::strata_trace!("strata::SceneNode", "'{}' set_position {}", self.name, position);
        self.local.position = position;
        self.notify_update(NodeChanges::POSE);
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        crate::strata_trace!("strata::SceneNode", "'{}' set_orientation {}", self.name, orientation);
        self.local.orientation = orientation;
        self.notify_update(NodeChanges::POSE);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
        self.notify_update(NodeChanges::SCALE);
    }

    /// Replace the whole local pose at once
    pub fn set_local_pose(&mut self, pose: Pose) {
        self.local = pose;
        self.notify_update(NodeChanges::POSE | NodeChanges::SCALE);
    }

    // ===== DERIVED POSE =====
    //
    // Valid only after an update pass reached this node since its last
    // invalidating change.

    pub fn derived_position(&self) -> Vec3 {
        self.derived.position
    }

    pub fn derived_orientation(&self) -> Quat {
        self.derived.orientation
    }

    pub fn derived_scale(&self) -> Vec3 {
        self.derived.scale
    }

    pub fn derived_pose(&self) -> &Pose {
        &self.derived
    }

    // ===== DIRTY STATE =====

    /// Whether the derived pose must be recomputed from the parent
    pub fn is_transform_stale(&self) -> bool {
        self.transform_stale
    }

    /// Whether the cached world matrix must be rebuilt
    pub fn is_matrix_stale(&self) -> bool {
        self.cached_transform.get().is_none()
    }

    /// Changes recorded since the last update pass
    pub fn pending_changes(&self) -> NodeChanges {
        self.pending
    }

    /// Number of times the world matrix was rebuilt
    pub fn matrix_rebuild_count(&self) -> u32 {
        self.matrix_rebuilds.get()
    }

    /// World matrix of the derived pose, rebuilt only when stale.
    ///
    /// The matrix reflects the derived pose as of the last update pass.
    pub fn full_transform(&self) -> Mat4 {
        *self.cached_transform.get_or_init(|| {
            self.matrix_rebuilds.set(self.matrix_rebuilds.get() + 1);
            self.derived.to_matrix()
        })
    }

    pub(super) fn notify_update(&mut self, hint: NodeChanges) {
        self.pending |= hint;
        self.transform_stale = true;
        self.cached_transform = OnceCell::new();
    }

    /// Recompute the derived pose from the parent's derived pose (or the
    /// local pose for a parentless node).
    pub(super) fn update_from_parent(&mut self, parent: Option<(&Pose, u16)>) {
        match parent {
            Some((parent_pose, parent_level)) => {
                self.derived = parent_pose.compose(&self.local);
                self.level = parent_level + 1;
            }
            None => {
                self.derived = self.local;
                self.level = 0;
            }
        }
        self.transform_stale = false;
        self.pending = NodeChanges::empty();
        self.cached_transform = OnceCell::new();
    }

    /// Add a translation directly to the local position
    pub(super) fn offset_position(&mut self, delta: Vec3) {
        self.local.position += delta;
        self.notify_update(NodeChanges::POSE);
    }
}
