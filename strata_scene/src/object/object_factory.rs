/// Object factory trait.

use crate::error::Result;
use crate::property::PropertyCollection;
use super::SceneObject;

/// Builds and destroys scene objects of one type.
pub trait ObjectFactory {
    /// Type name used for registration and lookup
    fn type_name(&self) -> &str;

    /// Build a new object from construction parameters
    fn create_instance(&self, name: &str, params: &PropertyCollection) -> Result<Box<dyn SceneObject>>;

    /// Destroy an object previously built by this factory
    fn destroy_instance(&self, object: Box<dyn SceneObject>) {
        drop(object);
    }
}
