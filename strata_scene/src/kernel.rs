//! Kernel: the explicit context object of a Strata scene.
//!
//! Owns the scene graph, the object manager, the registered plugins and the
//! extension libraries their code lives in. Plugins receive `&mut Kernel`
//! during registration to install factories and queries.
//!
//! Teardown order matters: objects, factories and plugins all run code from
//! the libraries, so libraries are dropped last (see `Drop`).

use std::path::Path;
use crate::archive::{Archive, ArchiveReader, ArchiveWriter, RonSceneFile, Serializable};
use crate::config::KernelConfig;
use crate::error::{Error, Result};
use crate::extension::{discover_libraries, ExtensionHandle, ExtensionLoader, NativeLoader};
use crate::object::{NodeReference, ObjectFactory, ObjectKey, ObjectManager};
use crate::plugin::{Plugin, PluginState};
use crate::property::PropertyCollection;
use crate::query::Query;
use crate::scene::{SceneGraph, SceneNodeKey};
use crate::{kernel_bail, strata_debug, strata_error, strata_info, strata_warn};

const SOURCE: &str = "strata::Kernel";

struct PluginEntry {
    plugin: Box<dyn Plugin>,
    state: PluginState,
}

/// Manifest record naming a loaded library
struct LibraryRecord<'a>(&'a str);

impl Serializable for LibraryRecord<'_> {
    fn save(&self, pc: &mut PropertyCollection) {
        pc.add_pair("name", self.0);
    }
}

pub struct Kernel {
    config: KernelConfig,
    loader: Box<dyn ExtensionLoader>,
    reader: Box<dyn ArchiveReader>,
    writer: Box<dyn ArchiveWriter>,
    graph: SceneGraph,
    objects: ObjectManager,
    plugins: Vec<PluginEntry>,
    libraries: Vec<Box<dyn ExtensionHandle>>,
}

impl Kernel {
    /// Create a kernel loading native plugin libraries
    pub fn new(config: KernelConfig) -> Self {
        Self::with_loader(config, Box::new(NativeLoader::new()))
    }

    /// Create a kernel with a custom extension loader
    pub fn with_loader(config: KernelConfig, loader: Box<dyn ExtensionLoader>) -> Self {
        let graph = SceneGraph::new(&config.root_name);
        Self {
            config,
            loader,
            reader: Box::new(RonSceneFile),
            writer: Box::new(RonSceneFile),
            graph,
            objects: ObjectManager::new(),
            plugins: Vec::new(),
            libraries: Vec::new(),
        }
    }

    /// Replace the scene file format (RON by default)
    pub fn with_archive_format(
        mut self,
        reader: Box<dyn ArchiveReader>,
        writer: Box<dyn ArchiveWriter>,
    ) -> Self {
        self.reader = reader;
        self.writer = writer;
        self
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    /// Borrow graph and object manager together (attach/detach, update)
    pub fn scene_mut(&mut self) -> (&mut SceneGraph, &mut ObjectManager) {
        (&mut self.graph, &mut self.objects)
    }

    // ===== PLUGIN LOADING =====

    /// Load every plugin library found in `plugin_directory`.
    ///
    /// Candidates are files with the configured library extension, loaded in
    /// sorted order. Returns the number of plugins loaded; an unreadable
    /// directory is logged and counts as zero.
    pub fn initialize(&mut self, plugin_directory: impl AsRef<Path>) -> usize {
        let dir = plugin_directory.as_ref();
        let candidates = match discover_libraries(dir, &self.config.library_extension) {
            Ok(candidates) => candidates,
            Err(_) => return 0,
        };

        let mut loaded = 0;
        for path in candidates {
            if self.load_plugin(&path.to_string_lossy()) {
                loaded += 1;
            }
        }
        strata_info!(SOURCE, "Loaded {} plugins from '{}'", loaded, dir.display());
        loaded
    }

    /// Load a library, build its plugin and register it.
    ///
    /// Failures never propagate: the partial handle is released, the
    /// problem is logged once at ERROR and `false` is returned.
    pub fn load_plugin(&mut self, library_name: &str) -> bool {
        let handle = match self.loader.load(library_name) {
            Ok(handle) => handle,
            Err(e) => {
                strata_error!(SOURCE, "Plugin \"{}\" load failed: {}", library_name, e);
                return false;
            }
        };

        let plugin = match handle.plugin_factory(&self.config.entry_point) {
            Ok(factory) => factory.create_plugin(),
            Err(e) => {
                strata_error!(SOURCE, "Plugin \"{}\" load failed: {}", library_name, e);
                return false;
            }
        };

        match self.try_register(plugin) {
            Ok(()) => {
                self.libraries.push(handle);
                true
            }
            Err(e @ Error::DuplicateItem(_)) => {
                strata_error!(SOURCE, "Plugin \"{}\" already loaded: {}", library_name, e);
                false
            }
            Err(e) => {
                strata_error!(SOURCE, "Plugin \"{}\" load failed: {}", library_name, e);
                false
            }
        }
    }

    /// Register a plugin: `initialize`, `register_factories`, `register_queries`.
    ///
    /// # Errors
    ///
    /// - `DuplicateItem` if a plugin of the same type is registered; the
    ///   existing plugin is untouched
    /// - `LoadFailed` if a hook fails; factories and queries installed by the
    ///   plugin so far are removed again
    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        self.try_register(plugin).inspect_err(|e| strata_error!(SOURCE, "{}", e))
    }

    /// `register_plugin` without logging; `load_plugin` reports failures itself
    fn try_register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        let plugin_type = plugin.plugin_type().to_string();
        if self.plugin_state(&plugin_type).is_some() {
            return Err(Error::DuplicateItem(format!(
                "Plugin type '{}' already registered", plugin_type)));
        }

        let factories_before: Vec<String> =
            self.objects.factory_types().into_iter().map(str::to_string).collect();
        let scene_queries_before = self.graph.queries().len();
        let object_queries_before = self.objects.queries().len();

        let mut entry = PluginEntry {
            plugin,
            state: PluginState::Unloaded,
        };
        if let Err(e) = self.install_plugin(&mut entry) {
            let added: Vec<String> = self
                .objects
                .factory_types()
                .into_iter()
                .filter(|t| !factories_before.iter().any(|b| b.as_str() == *t))
                .map(str::to_string)
                .collect();
            for type_name in added {
                self.objects.unregister_factory(&type_name);
            }
            self.graph.truncate_queries(scene_queries_before);
            self.objects.truncate_queries(object_queries_before);
            return Err(Error::LoadFailed(format!(
                "Plugin '{}' failed to register: {}", plugin_type, e)));
        }

        entry.state = PluginState::Registered;
        self.plugins.push(entry);
        strata_info!(SOURCE, "Plugin '{}' registered", plugin_type);
        Ok(())
    }

    fn install_plugin(&mut self, entry: &mut PluginEntry) -> Result<()> {
        entry.plugin.initialize()?;
        entry.state = PluginState::Loaded;
        entry.plugin.register_factories(self)?;
        entry.plugin.register_queries(self)?;
        Ok(())
    }

    /// State of the plugin registered under `plugin_type`
    pub fn plugin_state(&self, plugin_type: &str) -> Option<PluginState> {
        self.plugins
            .iter()
            .find(|e| e.plugin.plugin_type() == plugin_type)
            .map(|e| e.state)
    }

    /// Registered plugin types in registration order
    pub fn plugin_types(&self) -> Vec<&str> {
        self.plugins.iter().map(|e| e.plugin.plugin_type()).collect()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Names of the libraries currently held, in load order
    pub fn library_names(&self) -> Vec<&str> {
        self.libraries.iter().map(|l| l.name()).collect()
    }

    // ===== FACTORIES / QUERIES =====

    pub fn add_object_factory(&mut self, factory: Box<dyn ObjectFactory>) -> Result<()> {
        self.objects.register_factory(factory)
    }

    pub fn object_factory(&self, type_name: &str) -> Result<&dyn ObjectFactory> {
        self.objects.factory(type_name)
    }

    pub fn add_scene_query(&mut self, query: Box<dyn Query>) {
        self.graph.add_query(query);
    }

    pub fn add_object_query(&mut self, query: Box<dyn Query>) {
        self.objects.add_query(query);
    }

    pub fn scene_queries(&self) -> &[Box<dyn Query>] {
        self.graph.queries()
    }

    pub fn object_queries(&self) -> &[Box<dyn Query>] {
        self.objects.queries()
    }

    // ===== OBJECTS =====

    /// Build an object through its factory, optionally attaching it
    pub fn create_object(
        &mut self,
        type_name: &str,
        name: &str,
        params: &PropertyCollection,
        node: Option<SceneNodeKey>,
    ) -> Result<ObjectKey> {
        let key = self.objects.create_object(type_name, name, params)?;
        if let Some(node) = node {
            if let Err(e) = self.graph.attach_object(node, &mut self.objects, key) {
                self.objects.destroy_object(key)?;
                return Err(e);
            }
        }
        Ok(key)
    }

    /// Detach an object from its node (if any) and destroy it
    pub fn destroy_object(&mut self, key: ObjectKey) -> Result<()> {
        if let Some(node) = self.objects.attached_node(key)? {
            self.graph.detach_object(node, &mut self.objects, key)?;
        }
        self.objects.destroy_object(key)
    }

    /// Propagate pending pose changes through the graph
    pub fn update_scene(&mut self) {
        self.graph.update(&mut self.objects);
    }

    // ===== SCENE PERSISTENCE =====

    /// Replace the current scene with the one stored at `path`.
    ///
    /// The archive layout is checked and the new node tree and objects are
    /// built before anything is replaced, so a failed load leaves the
    /// current scene in place. Plugins named in the manifest are loaded
    /// along the way (already loaded ones are skipped, failures are logged)
    /// and stay loaded even if the load fails later.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut archive = self.reader.read(path)?;

        for name in [
            &self.config.graph_collection,
            &self.config.plugins_collection,
            &self.config.objects_collection,
        ] {
            archive.expect_collection(name)?;
        }
        let (Some(graph_records), Some(manifest), Some(object_records)) = (
            archive.collection(&self.config.graph_collection),
            archive.collection(&self.config.plugins_collection),
            archive.collection(&self.config.objects_collection),
        ) else {
            kernel_bail!(SOURCE, Archive, "Scene '{}' is missing a collection", path.display());
        };

        let required: Vec<String> = manifest
            .records
            .iter()
            .map(|r| r.value("name").map(str::to_string))
            .collect::<Result<_>>()?;
        let (graph, record_keys) = SceneGraph::from_collection(graph_records, &self.config.root_name)?;

        for library in &required {
            if self.libraries.iter().any(|l| l.name() == library.as_str()) {
                continue;
            }
            if !self.load_plugin(library) {
                strata_warn!(SOURCE, "Scene '{}' requires plugin \"{}\"", path.display(), library);
            }
        }

        let staged = self.objects.stage(object_records)?;
        let placements: Result<Vec<Option<SceneNodeKey>>> = staged
            .node_references()
            .map(|node| node.map(|r| resolve_node(&graph, r, &record_keys)).transpose())
            .collect();
        let placements = match placements {
            Ok(placements) => placements,
            Err(e) => {
                self.objects.discard(staged);
                return Err(e);
            }
        };

        self.graph.replace(graph, &mut self.objects);
        self.objects.destroy_all();
        let loaded = self.objects.commit(staged)?;
        for ((key, _), node) in loaded.into_iter().zip(placements) {
            if let Some(node) = node {
                self.graph.attach_object(node, &mut self.objects, key)?;
            }
        }

        strata_info!(SOURCE, "Scene '{}' loaded: {} nodes, {} objects",
            path.display(), self.graph.node_count(), self.objects.object_count());
        Ok(())
    }

    /// Write the current scene: graph, plugin manifest, objects
    pub fn save_scene(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut archive = Archive::new();

        self.graph.save(&mut archive, &self.config.graph_collection)?;

        let manifest = &self.config.plugins_collection;
        archive.create_collection(manifest, self.libraries.len())?;
        for library in &self.libraries {
            archive.serialize_object(manifest, &LibraryRecord(library.name()))?;
        }

        self.objects.save(&mut archive, &self.config.objects_collection, &self.graph)?;

        self.writer.write(path, &archive)?;
        strata_info!(SOURCE, "Scene saved to '{}'", path.display());
        Ok(())
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        strata_debug!(SOURCE, "Shutting down: {} objects, {} plugins, {} libraries",
            self.objects.object_count(), self.plugins.len(), self.libraries.len());

        self.graph.reset(&self.config.root_name, &mut self.objects);
        self.objects.destroy_all();
        self.objects.clear_factories();
        self.objects.clear_queries();
        self.graph.clear_queries();

        for mut entry in self.plugins.drain(..) {
            entry.state = PluginState::Unloading;
            entry.plugin.unload();
            strata_debug!(SOURCE, "Plugin '{}' unloaded", entry.plugin.plugin_type());
            drop(entry);
        }

        for library in self.libraries.drain(..) {
            strata_debug!(SOURCE, "Releasing library '{}'", library.name());
            drop(library);
        }
    }
}

/// Node of `graph` an object record refers to.
///
/// The saved record position wins when it still names the right node;
/// hand-written scenes without it fall back to a name lookup.
fn resolve_node(
    graph: &SceneGraph,
    reference: &NodeReference,
    record_keys: &[SceneNodeKey],
) -> Result<SceneNodeKey> {
    let indexed = reference
        .index
        .and_then(|index| record_keys.get(index).copied())
        .filter(|key| graph.node(*key).is_ok_and(|node| node.name() == reference.name));
    match indexed {
        Some(key) => Ok(key),
        None => graph.node_by_name(&reference.name),
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
