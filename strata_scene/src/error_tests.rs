//! Unit tests for error.rs
//!
//! Tests Error variants, Display output and the logging error macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_duplicate_item_display() {
    let err = Error::DuplicateItem("Plugin type 'ode' already registered".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Duplicate item"));
    assert!(display.contains("ode"));
}

#[test]
fn test_invalid_params_display() {
    let err = Error::InvalidParams("Node 'a' already has a parent".to_string());
    assert_eq!(format!("{}", err), "Invalid parameters: Node 'a' already has a parent");
}

#[test]
fn test_item_not_found_display() {
    let err = Error::ItemNotFound("Child index 4 out of bounds".to_string());
    assert!(format!("{}", err).contains("Child index 4"));
}

#[test]
fn test_load_failed_display() {
    let err = Error::LoadFailed("libmissing.so".to_string());
    assert_eq!(format!("{}", err), "Load failed: libmissing.so");
}

#[test]
fn test_archive_and_parse_display() {
    assert!(format!("{}", Error::Archive("eof".to_string())).starts_with("Archive error"));
    assert!(format!("{}", Error::Parse("'x'".to_string())).starts_with("Parse error"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::ItemNotFound("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::DuplicateItem("a".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::InvalidParams("a".to_string()));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_not_found(name: &str) -> Result<()> {
    crate::kernel_bail!("strata::test", ItemNotFound, "Child '{}' does not exist", name);
}

#[test]
fn test_kernel_err_builds_variant() {
    let err = crate::kernel_err!("strata::test", DuplicateItem, "Node '{}' exists", "arm");
    assert_eq!(err, Error::DuplicateItem("Node 'arm' exists".to_string()));
}

#[test]
fn test_kernel_bail_returns_early() {
    let result = bail_not_found("leg");
    assert_eq!(result, Err(Error::ItemNotFound("Child 'leg' does not exist".to_string())));
}
