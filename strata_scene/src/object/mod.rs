//! Scene objects and the object manager.
//!
//! Concrete object types (geometry, bodies, ...) are provided by plugins
//! through [`ObjectFactory`] implementations selected by type name.

mod scene_object;
mod object_factory;
mod object_manager;
#[cfg(test)]
pub(crate) mod mock_object;

pub use scene_object::{ObjectKey, SceneObject};
pub use object_factory::ObjectFactory;
pub use object_manager::{ManagedObject, NodeReference, ObjectManager, StagedObjects};
