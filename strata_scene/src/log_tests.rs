//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, DefaultLogger and the global
//! logger API. Tests touching the global logger are #[serial].

use crate::log::{self, DefaultLogger, LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures entries from the "strata::test" source.
///
/// Other tests run in parallel and log through the same global logger.
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "strata::test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "strata::test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_threshold() {
    assert_eq!(DefaultLogger::new().min_severity(), LogSeverity::Info);
    assert_eq!(
        DefaultLogger::with_min_severity(LogSeverity::Trace).min_severity(),
        LogSeverity::Trace
    );
}

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Trace);
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Just verify neither branch panics
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("scene_graph.rs"), Some(42)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_global_logger_captures_macros() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    crate::strata_info!("strata::test", "registered {}", "ode");
    crate::strata_warn!("strata::test", "slow");
    crate::strata_error!("strata::test", "broken {}", 7);

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].message, "registered ode");
        assert!(captured[0].file.is_none());
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert_eq!(captured[2].message, "broken 7");
        assert!(captured[2].file.unwrap().ends_with("log_tests.rs"));
        assert!(captured[2].line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);
    log::reset_logger();

    crate::strata_info!("strata::test", "not captured");
    assert!(entries.lock().unwrap().is_empty());
}

#[test]
#[serial]
fn test_kernel_err_logs_error() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let _ = crate::kernel_err!("strata::test", LoadFailed, "missing '{}'", "libx.so");

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].source, "strata::test");
        assert_eq!(captured[0].message, "missing 'libx.so'");
    }

    log::reset_logger();
}
