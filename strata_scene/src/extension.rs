//! Extension loading.
//!
//! The kernel never touches native modules directly: it asks an
//! [`ExtensionLoader`] for an [`ExtensionHandle`] and resolves the plugin
//! factory through it. [`NativeLoader`] implements this with `libloading`;
//! tests substitute their own loader.

use std::fs;
use std::path::{Path, PathBuf};
use libloading::{Library, Symbol};
use crate::error::{Error, Result};
use crate::plugin::{CreatePluginFactoryFn, PluginFactory};
use crate::{kernel_err, strata_debug};

/// A loaded module exposing a plugin factory entry point.
///
/// Dropping the handle unloads the module; every object created from its
/// code must be gone by then.
pub trait ExtensionHandle {
    /// Name the library was requested with
    fn name(&self) -> &str;

    /// Call `entry_point` and take ownership of the returned factory
    fn plugin_factory(&self, entry_point: &str) -> Result<Box<dyn PluginFactory>>;
}

/// Opens extension modules by name.
///
/// Loaders return errors without logging them; the kernel reports load
/// failures once, at the `load_plugin` boundary.
pub trait ExtensionLoader {
    fn load(&self, library_name: &str) -> Result<Box<dyn ExtensionHandle>>;
}

// ===== NATIVE LOADER =====

/// Loads plugin libraries from disk.
///
/// Names are tried as given, then relative to each search path in order.
#[derive(Debug, Clone, Default)]
pub struct NativeLoader {
    search_paths: Vec<PathBuf>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory consulted for relative library names
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn resolve(&self, library_name: &str) -> PathBuf {
        let direct = PathBuf::from(library_name);
        if direct.is_file() {
            return direct;
        }
        self.search_paths
            .iter()
            .map(|dir| dir.join(library_name))
            .find(|candidate| candidate.is_file())
            .unwrap_or(direct)
    }
}

impl ExtensionLoader for NativeLoader {
    fn load(&self, library_name: &str) -> Result<Box<dyn ExtensionHandle>> {
        let path = self.resolve(library_name);
        // Loading a module runs its initializers; plugins are trusted code.
        let library = unsafe { Library::new(&path) }.map_err(|e| {
            Error::LoadFailed(format!("Failed to load library '{}': {}", path.display(), e))
        })?;
        strata_debug!("strata::NativeLoader", "Loaded library '{}'", path.display());

        Ok(Box::new(NativeLibrary {
            library,
            name: library_name.to_string(),
        }))
    }
}

/// A module opened by [`NativeLoader`]
pub struct NativeLibrary {
    library: Library,
    name: String,
}

impl ExtensionHandle for NativeLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn plugin_factory(&self, entry_point: &str) -> Result<Box<dyn PluginFactory>> {
        let create: Symbol<CreatePluginFactoryFn> = unsafe {
            self.library.get(entry_point.as_bytes()).map_err(|e| {
                Error::LoadFailed(format!(
                    "Entry point '{}' not found in '{}': {}", entry_point, self.name, e))
            })?
        };
        let raw = unsafe { create() };
        if raw.is_null() {
            return Err(Error::LoadFailed(format!(
                "Entry point '{}' of '{}' returned no factory", entry_point, self.name)));
        }
        // The pointer comes from Box::into_raw in declare_plugin!.
        Ok(unsafe { Box::from_raw(raw) })
    }
}

// ===== DISCOVERY =====

/// List files in `dir` with the given extension, sorted by path.
///
/// # Errors
///
/// Returns `LoadFailed` if the directory cannot be read.
pub fn discover_libraries(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        kernel_err!("strata::NativeLoader", LoadFailed,
            "Cannot read plugin directory '{}': {}", dir.display(), e)
    })?;

    let mut libraries: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    libraries.sort();
    Ok(libraries)
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
