/// Plugin entry types

use strata_scene::strata::{Kernel, Plugin, PluginFactory, Result};
use strata_scene::{strata_debug, strata_info};
use crate::bounds::BoundsQuery;
use crate::box_geometry::BoxGeometryFactory;
use crate::sphere_geometry::SphereGeometryFactory;

pub const GEOMETRY_PLUGIN: &str = "geometry";

const SOURCE: &str = "strata::GeometryPlugin";

pub struct GeometryPlugin;

impl Plugin for GeometryPlugin {
    fn plugin_type(&self) -> &str {
        GEOMETRY_PLUGIN
    }

    fn register_factories(&mut self, kernel: &mut Kernel) -> Result<()> {
        kernel.add_object_factory(Box::new(BoxGeometryFactory))?;
        kernel.add_object_factory(Box::new(SphereGeometryFactory))?;
        strata_debug!(SOURCE, "Registered Box and Sphere factories");
        Ok(())
    }

    fn register_queries(&mut self, kernel: &mut Kernel) -> Result<()> {
        kernel.add_object_query(Box::new(BoundsQuery));
        Ok(())
    }

    fn unload(&mut self) {
        strata_info!(SOURCE, "Geometry plugin unloading");
    }
}

/// Exported through `createPluginFactory`
pub struct GeometryPluginFactory;

impl PluginFactory for GeometryPluginFactory {
    fn create_plugin(&self) -> Box<dyn Plugin> {
        Box::new(GeometryPlugin)
    }
}
