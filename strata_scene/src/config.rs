/// Kernel configuration.

/// Names and conventions used by the kernel when loading plugins and scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Symbol every plugin library exports
    pub entry_point: String,
    /// File extension of plugin libraries scanned by `initialize`
    pub library_extension: String,
    /// Name of the node collection in scene archives
    pub graph_collection: String,
    /// Name of the plugin manifest collection
    pub plugins_collection: String,
    /// Name of the object table collection
    pub objects_collection: String,
    /// Name given to the root node of a fresh graph
    pub root_name: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            entry_point: "createPluginFactory".to_string(),
            library_extension: std::env::consts::DLL_EXTENSION.to_string(),
            graph_collection: "Graph".to_string(),
            plugins_collection: "Plugins".to_string(),
            objects_collection: "Objects".to_string(),
            root_name: "root".to_string(),
        }
    }
}
