//! Opaque query objects registered by plugins.
//!
//! The kernel stores queries without interpreting them; consumers look them
//! up by type and downcast as needed.

use std::any::Any;

/// A query capability contributed by a plugin (ray casts, overlap tests, ...)
pub trait Query: Any {
    /// Type name of the query
    fn query_type(&self) -> &str;

    /// Downcasting support
    fn as_any(&self) -> &dyn Any;
}
