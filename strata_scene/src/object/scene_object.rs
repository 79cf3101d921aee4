/// Scene object trait: anything that can be attached to a scene node.

use std::any::Any;
use slotmap::new_key_type;
use crate::property::PropertyCollection;
use crate::scene::{Pose, SceneNodeKey};

new_key_type! {
    /// Stable key for an object owned by the ObjectManager
    pub struct ObjectKey;
}

/// An object living in the scene, built by an [`ObjectFactory`](super::ObjectFactory).
///
/// Objects are notified when they are attached to or detached from a node,
/// and whenever the update pass recomputes that node's derived pose.
pub trait SceneObject: Any {
    /// Unique object name
    fn name(&self) -> &str;

    /// Type name of the factory that builds this kind of object
    fn object_type(&self) -> &str;

    /// Called after the owning node's derived pose was recomputed
    fn notify_moved(&mut self, _pose: &Pose) {}

    /// Called on attach (`Some`) and detach (`None`)
    fn notify_attached(&mut self, _node: Option<SceneNodeKey>) {}

    /// Write type-specific properties into an archive record.
    ///
    /// `class`, `name` and `node` are written by the object manager.
    fn save(&self, _pc: &mut PropertyCollection) {}

    /// Downcasting support for callers that know the concrete type
    fn as_any(&self) -> &dyn Any;
}
