//! Integration tests for kernel logging
//!
//! These tests verify what the kernel and scene graph report through the
//! process-wide logger.
//!
//! Run with: cargo test --test logging_integration_tests


use plugin_test_utils::{events, kernel_with, standard_loader};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use strata_scene::glam::Quat;
use strata_scene::log;
use strata_scene::strata::log::{LogEntry, LogSeverity, Logger};
use strata_scene::strata::scene::SceneGraph;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn install() -> Arc<Mutex<Vec<LogEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        log::set_logger(TestLogger { entries: entries.clone() });
        entries
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn messages(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str, severity: LogSeverity) -> Vec<String> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == source && e.severity == severity)
        .map(|e| e.message.clone())
        .collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_duplicate_and_failed_loads_are_reported_once_as_errors() {
    let entries = TestLogger::install();
    let log_events = events();
    {
        let mut kernel = kernel_with(standard_loader(&log_events));
        kernel.load_plugin("shapes.lib");
        kernel.load_plugin("shapes_v2.lib");
        kernel.load_plugin("missing.lib");
    }

    let errors = messages(&entries, "strata::Kernel", LogSeverity::Error);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("Plugin \"shapes_v2.lib\" already loaded: "));
    assert!(errors[0].contains("'shapes'"));
    assert!(errors[1].starts_with("Plugin \"missing.lib\" load failed: "));

    // Reported once, at the kernel boundary
    let all_errors = entries.lock().unwrap().iter().filter(|e| e.severity == LogSeverity::Error).count();
    assert_eq!(all_errors, 2);
    assert!(messages(&entries, "strata::Kernel", LogSeverity::Warn).is_empty());

    let infos = messages(&entries, "strata::Kernel", LogSeverity::Info);
    assert_eq!(infos, vec!["Plugin 'shapes' registered"]);

    log::reset_logger();
}

#[test]
#[serial]
fn test_structural_errors_carry_location() {
    let entries = TestLogger::install();

    let graph = SceneGraph::new("root");
    assert!(graph.child_at(graph.root(), 3).is_err());

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|e| e.source == "strata::SceneGraph")
            .expect("no scene graph error logged");
        assert_eq!(error.severity, LogSeverity::Error);
        assert!(error.message.contains("out of bounds"));
        assert!(error.file.unwrap().ends_with("scene_graph.rs"));
        assert!(error.line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_pose_setters_trace() {
    let entries = TestLogger::install();

    let mut graph = SceneGraph::new("root");
    let root = graph.root();
    graph.set_orientation(root, Quat::IDENTITY).unwrap();

    let traces = messages(&entries, "strata::SceneNode", LogSeverity::Trace);
    assert_eq!(traces.len(), 1);
    assert!(traces[0].starts_with("'root' set_orientation"));

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = TestLogger::install();
    log::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    log::reset_logger();

    // Goes to the default logger
    log::log(LogSeverity::Info, "test", "Message 2".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);
}
