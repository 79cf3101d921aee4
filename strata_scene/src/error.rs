//! Error types for the Strata scene kernel
//!
//! This module defines the error taxonomy used throughout the kernel:
//! structural violations, lookups that find nothing, plugin load failures
//! and archive/parse problems at the I/O boundary.

use std::fmt;

/// Result type for Strata kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Strata kernel errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An item with the same identity already exists (sibling name,
    /// attached object name, plugin type, factory type)
    DuplicateItem(String),

    /// The request violates a structural rule (node already has a parent,
    /// object already attached, cycle in the tree, stale key)
    InvalidParams(String),

    /// The requested item does not exist (child, attached object, factory,
    /// property)
    ItemNotFound(String),

    /// A plugin library could not be opened, or its entry point is missing
    LoadFailed(String),

    /// The scene archive could not be read, written or decoded
    Archive(String),

    /// A numeric sequence could not be parsed
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateItem(msg) => write!(f, "Duplicate item: {}", msg),
            Error::InvalidParams(msg) => write!(f, "Invalid parameters: {}", msg),
            Error::ItemNotFound(msg) => write!(f, "Item not found: {}", msg),
            Error::LoadFailed(msg) => write!(f, "Load failed: {}", msg),
            Error::Archive(msg) => write!(f, "Archive error: {}", msg),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] variant and log it at ERROR severity (with file:line).
///
/// # Example
///
/// ```ignore
/// let err = kernel_err!("strata::SceneGraph", ItemNotFound, "Child '{}' does not exist", name);
/// ```
#[macro_export]
macro_rules! kernel_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::strata_error!($source, "{}", message);
        $crate::strata::Error::$variant(message)
    }};
}

/// Log and return an [`Error`] variant from the enclosing function.
///
/// # Example
///
/// ```ignore
/// kernel_bail!("strata::Kernel", DuplicateItem, "Plugin type '{}' already registered", ty);
/// ```
#[macro_export]
macro_rules! kernel_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::kernel_err!($source, $variant, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
