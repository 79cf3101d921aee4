/// Mock scene objects for unit tests

#[cfg(test)]
use std::any::Any;
#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::kernel_bail;
#[cfg(test)]
use crate::property::PropertyCollection;
#[cfg(test)]
use crate::scene::{Pose, SceneNodeKey};
#[cfg(test)]
use super::{ObjectFactory, SceneObject};

// ============================================================================
// Mock Object
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockObject {
    pub name: String,
    pub type_name: String,
    pub tag: String,
    pub moves: Vec<Pose>,
    pub attached: Option<SceneNodeKey>,
}

#[cfg(test)]
impl SceneObject for MockObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> &str {
        &self.type_name
    }

    fn notify_moved(&mut self, pose: &Pose) {
        self.moves.push(*pose);
    }

    fn notify_attached(&mut self, node: Option<SceneNodeKey>) {
        self.attached = node;
    }

    fn save(&self, pc: &mut PropertyCollection) {
        pc.add_pair("tag", self.tag.as_str());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Factory
// ============================================================================

#[cfg(test)]
pub struct MockFactory {
    pub type_name: String,
    pub destroyed: Rc<Cell<usize>>,
}

#[cfg(test)]
impl MockFactory {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            destroyed: Rc::new(Cell::new(0)),
        }
    }
}

#[cfg(test)]
impl ObjectFactory for MockFactory {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn create_instance(&self, name: &str, params: &PropertyCollection) -> Result<Box<dyn SceneObject>> {
        if params.has_property("fail") {
            kernel_bail!("strata::MockFactory", InvalidParams, "Refusing to build '{}'", name);
        }
        Ok(Box::new(MockObject {
            name: name.to_string(),
            type_name: self.type_name.clone(),
            tag: params.value_or("tag", "").to_string(),
            moves: Vec::new(),
            attached: None,
        }))
    }

    fn destroy_instance(&self, object: Box<dyn SceneObject>) {
        self.destroyed.set(self.destroyed.get() + 1);
        drop(object);
    }
}

/// Downcast helper
#[cfg(test)]
pub fn as_mock(object: &dyn SceneObject) -> &MockObject {
    object.as_any().downcast_ref::<MockObject>().expect("not a MockObject")
}
