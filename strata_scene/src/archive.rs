//! Scene archives.
//!
//! An archive is an ordered sequence of named collections, each an ordered
//! list of property records. The kernel expects three collections in order:
//! the graph, the plugin manifest and the object table.
//!
//! Encoding is delegated to [`ArchiveReader`] / [`ArchiveWriter`]
//! implementations; [`RonSceneFile`] stores archives as RON text.

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::kernel_err;
use crate::property::PropertyCollection;

/// A named, ordered list of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub records: Vec<PropertyCollection>,
}

impl Collection {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Objects that can write themselves as a single archive record
pub trait Serializable {
    fn save(&self, pc: &mut PropertyCollection);
}

/// In-memory archive: ordered named collections plus a read cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archive {
    collections: Vec<Collection>,
    #[serde(skip)]
    cursor: usize,
}

impl PartialEq for Archive {
    fn eq(&self, other: &Self) -> bool {
        self.collections == other.collections
    }
}

impl Archive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty collection, reserving room for `capacity` records.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if a collection with this name exists.
    pub fn create_collection(&mut self, name: &str, capacity: usize) -> Result<&mut Collection> {
        if self.collections.iter().any(|c| c.name == name) {
            return Err(kernel_err!("strata::Archive", DuplicateItem,
                "Collection '{}' already exists", name));
        }
        self.collections.push(Collection {
            name: name.to_string(),
            records: Vec::with_capacity(capacity),
        });
        let last = self.collections.len() - 1;
        Ok(&mut self.collections[last])
    }

    /// Append a record to a named collection
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the collection does not exist.
    pub fn add_record(&mut self, collection: &str, record: PropertyCollection) -> Result<()> {
        let target = self.collection_mut(collection)?;
        target.records.push(record);
        Ok(())
    }

    /// Serialize an object as a new record of a named collection
    pub fn serialize_object(&mut self, collection: &str, object: &dyn Serializable) -> Result<()> {
        let mut pc = PropertyCollection::new();
        object.save(&mut pc);
        self.add_record(collection, pc)
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| kernel_err!("strata::Archive", ItemNotFound,
                "Collection '{}' not found", name))
    }

    /// Return the collection under the cursor and advance the cursor.
    pub fn next_collection(&mut self) -> Option<&Collection> {
        let collection = self.collections.get(self.cursor)?;
        self.cursor += 1;
        Some(collection)
    }

    /// Consume the next collection, checking that it carries the expected name.
    ///
    /// # Errors
    ///
    /// Returns `Archive` if the archive is exhausted or the next collection
    /// has a different name.
    pub fn expect_collection(&mut self, name: &str) -> Result<&Collection> {
        let index = self.cursor;
        match self.collections.get(index) {
            Some(c) if c.name == name => {
                self.cursor += 1;
                Ok(&self.collections[index])
            }
            Some(c) => Err(kernel_err!("strata::Archive", Archive,
                "Expected collection '{}' but found '{}'", name, c.name)),
            None => Err(kernel_err!("strata::Archive", Archive,
                "Expected collection '{}' but archive is exhausted", name)),
        }
    }

    /// Rewind the read cursor to the first collection
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Iterate over collections in order
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    /// Number of collections
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }
}

// ===== READER / WRITER =====

/// Reads an archive from storage
pub trait ArchiveReader {
    fn read(&self, path: &Path) -> Result<Archive>;
}

/// Writes an archive to storage
pub trait ArchiveWriter {
    fn write(&self, path: &Path, archive: &Archive) -> Result<()>;
}

/// RON-encoded scene file
#[derive(Debug, Clone, Copy, Default)]
pub struct RonSceneFile;

impl ArchiveReader for RonSceneFile {
    fn read(&self, path: &Path) -> Result<Archive> {
        let text = fs::read_to_string(path).map_err(|e| {
            kernel_err!("strata::RonSceneFile", Archive,
                "Failed to read '{}': {}", path.display(), e)
        })?;
        ron::from_str(&text).map_err(|e| {
            kernel_err!("strata::RonSceneFile", Archive,
                "Failed to decode '{}': {}", path.display(), e)
        })
    }
}

impl ArchiveWriter for RonSceneFile {
    fn write(&self, path: &Path, archive: &Archive) -> Result<()> {
        let text = ron::ser::to_string_pretty(archive, ron::ser::PrettyConfig::default())
            .map_err(|e| kernel_err!("strata::RonSceneFile", Archive,
                "Failed to encode archive: {}", e))?;
        fs::write(path, text).map_err(|e| {
            kernel_err!("strata::RonSceneFile", Archive,
                "Failed to write '{}': {}", path.display(), e)
        })
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
