/// Property collections: ordered, named key/value bags.
///
/// Used both as construction parameters for nodes and objects and as the
/// record type stored in scene archives. Values are kept as strings; numeric
/// values are decoded on demand by the expression parser.

use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::kernel_err;

/// A single named value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// An insertion-ordered collection of properties with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyCollection {
    properties: Vec<Property>,
}

impl PropertyCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { properties: Vec::new() }
    }

    /// Add a name/value pair.
    ///
    /// If the name already exists its value is replaced in place, keeping the
    /// original insertion position.
    pub fn add_pair(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(Property { name, value }),
        }
    }

    /// Builder-style variant of [`add_pair`](Self::add_pair)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_pair(name, value);
        self
    }

    /// Whether a property with this name exists
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    /// Get a property value by name
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no property has this name.
    pub fn value(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| {
            kernel_err!("strata::PropertyCollection", ItemNotFound,
                "Property '{}' not found", name)
        })
    }

    /// Get a property value by name, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Get a property value, or `default` if missing
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Remove a property, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index).value)
    }

    /// Iterate over properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;
