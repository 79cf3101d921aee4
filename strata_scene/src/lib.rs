/*!
# Strata Scene

Core kernel and scene graph for the Strata scene-description engine.

This crate provides a hierarchical scene graph with lazy, dirty-flag driven
world-transform propagation, and a plugin kernel that loads native
extension libraries at runtime. Plugins contribute object factories and
queries; scenes are persisted as an ordered archive of a node graph, a
plugin manifest and an object table.

## Architecture

- **Kernel**: explicit context owning the graph, objects, plugins and libraries
- **SceneGraph**: arena of SceneNodes with parent keys and ordered children
- **ObjectManager**: factory registry and owner of scene objects
- **Plugin / PluginFactory**: library-provided extensions
- **ExtensionLoader**: abstraction over native module loading
- **Archive**: ordered named collections of property records
*/

// Internal modules
mod error;
mod expression;
pub mod archive;
pub mod config;
pub mod extension;
pub mod kernel;
pub mod log;
pub mod object;
pub mod plugin;
pub mod property;
pub mod query;
pub mod scene;

// Main strata namespace module
pub mod strata {
    // Error types
    pub use crate::error::{Error, Result};

    // Kernel context and configuration
    pub use crate::kernel::Kernel;
    pub use crate::config::KernelConfig;

    // Plugin ABI
    pub use crate::plugin::{CreatePluginFactoryFn, Plugin, PluginFactory, PluginState};
    pub use crate::extension::{ExtensionHandle, ExtensionLoader, NativeLoader};

    // Objects and queries
    pub use crate::object::{ObjectFactory, ObjectKey, ObjectManager, SceneObject};
    pub use crate::query::Query;

    // Properties and persistence
    pub use crate::property::{Property, PropertyCollection};
    pub use crate::archive::{Archive, ArchiveReader, ArchiveWriter, Collection, RonSceneFile, Serializable};
    pub use crate::expression::{format_quat, format_vec3, parse_quat, parse_sequence, parse_vec3};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
