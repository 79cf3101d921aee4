/// World-space bounding boxes and the "bounds" object query

use std::any::Any;
use strata_scene::glam::{Mat4, Vec3};
use strata_scene::strata::{Query, SceneObject};
use crate::box_geometry::BoxGeometry;
use crate::sphere_geometry::SphereGeometry;

pub const BOUNDS_QUERY: &str = "bounds";

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self { min: center - half, max: center + half }
    }

    /// Bounds of a local box of half extents `half` after `transform`
    pub fn transformed(half: Vec3, transform: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            let p = transform.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Answers world bounds for objects created by this plugin.
///
/// Objects of other plugins, and objects that were never placed by an update
/// pass, have no bounds.
pub struct BoundsQuery;

impl BoundsQuery {
    pub fn bounds(&self, object: &dyn SceneObject) -> Option<Aabb> {
        let any = object.as_any();
        if let Some(shape) = any.downcast_ref::<BoxGeometry>() {
            return shape.world_bounds();
        }
        any.downcast_ref::<SphereGeometry>().and_then(SphereGeometry::world_bounds)
    }
}

impl Query for BoundsQuery {
    fn query_type(&self) -> &str {
        BOUNDS_QUERY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
