//! Plugin traits and the library entry point.
//!
//! A plugin library exports a single `createPluginFactory` function (see
//! [`declare_plugin!`]) returning a [`PluginFactory`], which builds one
//! [`Plugin`]. The kernel then drives the plugin through its lifecycle:
//!
//! ```text
//! Unloaded -> Loaded -> Registered -> Unloading -> gone
//! ```

use crate::error::Result;
use crate::kernel::Kernel;

/// Lifecycle state of a plugin held by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Built but not yet registered
    Unloaded,
    /// `initialize` succeeded
    Loaded,
    /// Factories and queries installed
    Registered,
    /// `unload` in progress during teardown
    Unloading,
}

/// A typed extension contributing object factories and queries.
pub trait Plugin {
    /// Unique plugin type name
    fn plugin_type(&self) -> &str;

    /// Prepare internal state before registration
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Install object factories with `kernel.add_object_factory`
    fn register_factories(&mut self, kernel: &mut Kernel) -> Result<()>;

    /// Install scene/object queries with `kernel.add_scene_query` / `add_object_query`
    fn register_queries(&mut self, _kernel: &mut Kernel) -> Result<()> {
        Ok(())
    }

    /// Release plugin resources. Called once during kernel teardown.
    fn unload(&mut self) {}
}

/// Builds the plugin instance of a library
pub trait PluginFactory {
    fn create_plugin(&self) -> Box<dyn Plugin>;
}

/// Signature of the library entry point.
///
/// Uses the Rust ABI: plugins must be built with the same toolchain and
/// `strata_scene` version as the host.
pub type CreatePluginFactoryFn = unsafe fn() -> *mut dyn PluginFactory;

/// Export the `createPluginFactory` entry point for a plugin library.
///
/// The argument is an expression building the factory.
///
/// # Example
///
/// ```ignore
/// strata_scene::declare_plugin!(GeometryPluginFactory);
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($factory:expr) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub fn createPluginFactory() -> *mut dyn $crate::strata::PluginFactory {
            let factory: ::std::boxed::Box<dyn $crate::strata::PluginFactory> =
                ::std::boxed::Box::new($factory);
            ::std::boxed::Box::into_raw(factory)
        }
    };
}
