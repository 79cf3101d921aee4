/// Box primitive

use std::any::Any;
use strata_scene::glam::Vec3;
use strata_scene::kernel_bail;
use strata_scene::strata::scene::{Pose, SceneNodeKey};
use strata_scene::strata::{
    format_vec3, parse_vec3, ObjectFactory, PropertyCollection, Result, SceneObject,
};
use crate::bounds::Aabb;

pub const BOX_TYPE: &str = "Box";

/// Axis-aligned box of full extents `size`, centered on its node.
#[derive(Debug)]
pub struct BoxGeometry {
    name: String,
    size: Vec3,
    node: Option<SceneNodeKey>,
    world: Option<Pose>,
}

impl BoxGeometry {
    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn node(&self) -> Option<SceneNodeKey> {
        self.node
    }

    /// Derived pose of the owning node as of the last update pass
    pub fn world_pose(&self) -> Option<Pose> {
        self.world
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        self.world
            .map(|pose| Aabb::transformed(self.size * 0.5, &pose.to_matrix()))
    }
}

impl SceneObject for BoxGeometry {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> &str {
        BOX_TYPE
    }

    fn notify_moved(&mut self, pose: &Pose) {
        self.world = Some(*pose);
    }

    fn notify_attached(&mut self, node: Option<SceneNodeKey>) {
        self.node = node;
        if node.is_none() {
            self.world = None;
        }
    }

    fn save(&self, pc: &mut PropertyCollection) {
        pc.add_pair("size", format_vec3(self.size));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct BoxGeometryFactory;

impl ObjectFactory for BoxGeometryFactory {
    fn type_name(&self) -> &str {
        BOX_TYPE
    }

    /// Reads `size` (default `1 1 1`).
    fn create_instance(&self, name: &str, params: &PropertyCollection) -> Result<Box<dyn SceneObject>> {
        let size = parse_vec3(params.value_or("size", "1 1 1"))?;
        if size.cmplt(Vec3::ZERO).any() {
            kernel_bail!("strata::BoxGeometry", InvalidParams,
                "Box '{}' has negative size {}", name, format_vec3(size));
        }
        Ok(Box::new(BoxGeometry {
            name: name.to_string(),
            size,
            node: None,
            world: None,
        }))
    }
}
