/*!
# Strata Scene - Geometry Plugin

Primitive geometry objects for the Strata scene kernel.

This crate is built as a native extension library. The kernel finds it in
its plugin directory, resolves the `createPluginFactory` entry point and
registers the "Box" and "Sphere" object factories plus a "bounds" object
query.

It can also be linked directly and registered by hand:

```no_run
use strata_scene::strata::{Kernel, KernelConfig, PluginFactory};
use strata_scene_plugin_geometry::strata::GeometryPluginFactory;

let mut kernel = Kernel::new(KernelConfig::default());
kernel.register_plugin(GeometryPluginFactory.create_plugin()).unwrap();
```
*/

mod box_geometry;
mod bounds;
mod geometry_plugin;
mod sphere_geometry;

pub mod strata {
    pub use crate::bounds::{Aabb, BoundsQuery, BOUNDS_QUERY};
    pub use crate::box_geometry::{BoxGeometry, BoxGeometryFactory, BOX_TYPE};
    pub use crate::geometry_plugin::{GeometryPlugin, GeometryPluginFactory, GEOMETRY_PLUGIN};
    pub use crate::sphere_geometry::{SphereGeometry, SphereGeometryFactory, SPHERE_TYPE};
}

strata_scene::declare_plugin!(geometry_plugin::GeometryPluginFactory);
