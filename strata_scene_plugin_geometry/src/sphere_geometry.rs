/// Sphere primitive

use std::any::Any;
use strata_scene::glam::Vec3;
use strata_scene::kernel_bail;
use strata_scene::strata::scene::{Pose, SceneNodeKey};
use strata_scene::strata::{parse_sequence, ObjectFactory, PropertyCollection, Result, SceneObject};
use crate::bounds::Aabb;

pub const SPHERE_TYPE: &str = "Sphere";

#[derive(Debug)]
pub struct SphereGeometry {
    name: String,
    radius: f32,
    node: Option<SceneNodeKey>,
    world: Option<Pose>,
}

impl SphereGeometry {
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn node(&self) -> Option<SceneNodeKey> {
        self.node
    }

    pub fn world_pose(&self) -> Option<Pose> {
        self.world
    }

    /// Non-uniform scale stretches the bounds along the largest axis.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.world.map(|pose| {
            let radius = self.radius * pose.scale.abs().max_element();
            Aabb::from_center_half_extents(pose.position, Vec3::splat(radius))
        })
    }
}

impl SceneObject for SphereGeometry {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> &str {
        SPHERE_TYPE
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
        pc.add_pair("radius", self.radius.to_string());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct SphereGeometryFactory;

impl ObjectFactory for SphereGeometryFactory {
    fn type_name(&self) -> &str {
        SPHERE_TYPE
    }

    fn create_instance(&self, name: &str, params: &PropertyCollection) -> Result<Box<dyn SceneObject>> {
        let [radius] = parse_sequence::<1>(params.value_or("radius", "1"))?;
        if radius < 0.0 {
            kernel_bail!("strata::SphereGeometry", InvalidParams,
                "Sphere '{}' has negative radius {}", name, radius);
        }
        Ok(Box::new(SphereGeometry {
            name: name.to_string(),
            radius,
            node: None,
            world: None,
        }))
    }
}
