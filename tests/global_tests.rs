//! Tests for the process-wide logger
//!
//! The global logger is shared by every test in this binary, so each test
//! holds `SERIAL` for its whole run.

use parking_lot::{const_mutex, Mutex};
use request_logger::config::{
    set_app_mode, set_app_name, set_child_path, set_log_path, set_log_type, set_no_buffer_write,
};
use request_logger::global;
use request_logger::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;

static SERIAL: Mutex<()> = const_mutex(());

fn init_file(dir: &Path, app: &str) {
    global::init(vec![
        set_app_name(app),
        set_log_type("file"),
        set_log_path(dir.to_string_lossy()),
        set_child_path("global.log"),
        set_no_buffer_write(),
    ]);
}

fn read_records(dir: &Path, app: &str) -> Vec<Value> {
    let mut records = Vec::new();
    for entry in fs::read_dir(dir.join(app)).expect("Failed to read log directory") {
        let content = fs::read_to_string(entry.unwrap().path()).expect("Failed to read log file");
        records.extend(content.lines().map(|line| serde_json::from_str::<Value>(line).unwrap()));
    }
    records
}

#[test]
fn test_uninitialized_falls_back_to_stdout() {
    let _guard = SERIAL.lock();
    global::shutdown().expect("Failed to shut down");

    assert!(!global::is_initialized());
    assert!(global::logger().is_none());

    // bare messages go to stdout; none of these may panic
    global::info("before init %d", &[Arg::from(1)]);
    global::warn_f(CallContext::Absent, "t", "before init", &[]);
    global::error("before init", &[Arg::from(Field::new("k", "v"))]);
    global::flush().expect("flush without a logger is a no-op");

    let tracer = global::query_tracer(QueryLogLevel::Info);
    tracer.trace(&CallContext::Absent, Instant::now(), &|| ("SELECT 1".to_string(), 1), None);
}

#[test]
fn test_global_file_sink() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "global-svc");

    let request = http::Request::builder()
        .uri("/v1/pay")
        .header("x-b3-traceid", "9f")
        .body(())
        .unwrap();
    global::info("boot %s", &[Arg::from("ok")]);
    global::error_f(&request, "payment", "declined %d", &[Arg::from(402)]);
    global::flush().expect("Failed to flush");

    let records = read_records(temp_dir.path(), "global-svc");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["msg"], "boot ok");
    assert_eq!(records[0]["title"], "info");
    assert!(records[0]["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/global_tests.rs:"));
    assert_eq!(records[1]["level"], "error");
    assert_eq!(records[1]["path"], "/v1/pay");
    assert_eq!(records[1]["x-b3-traceid"], "9f");
    assert_eq!(records[1]["title"], "payment");

    global::shutdown().expect("Failed to shut down");
}

#[test]
fn test_init_accumulates_options() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "accumulate");

    global::init(vec![set_app_mode("prod")]);

    let config = global::config();
    assert_eq!(config.app_name(), "accumulate");
    assert_eq!(config.app_mode(), "prod");
    assert_eq!(config.log_type(), "file");

    global::info("after second init", &[]);
    global::flush().expect("Failed to flush");

    let records = read_records(temp_dir.path(), "accumulate");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["app_mode"], "prod");

    global::shutdown().expect("Failed to shut down");
    assert_eq!(global::config().app_mode(), "prod");
}

#[test]
fn test_reinit_resets_level_to_info() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "levels");

    global::set_level(LogLevel::Error);
    global::info("suppressed", &[]);
    global::warn("suppressed", &[]);
    global::error("kept", &[]);

    global::init(vec![set_app_mode("staging")]);
    assert_eq!(global::level(), LogLevel::Info);
    global::info("visible again", &[]);
    global::flush().expect("Failed to flush");

    let mut messages: Vec<String> = read_records(temp_dir.path(), "levels")
        .iter()
        .map(|record| record["msg"].as_str().unwrap().to_string())
        .collect();
    messages.sort();
    assert_eq!(messages, ["kept", "visible again"]);

    global::shutdown().expect("Failed to shut down");
}

#[test]
fn test_failed_init_keeps_level() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "sticky");
    global::set_level(LogLevel::Warn);

    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"file, not directory").unwrap();
    assert!(global::try_init(vec![set_log_path(blocker.to_string_lossy())]).is_err());
    assert_eq!(global::level(), LogLevel::Warn);

    global::set_level(LogLevel::Info);
    global::shutdown().expect("Failed to shut down");
}

#[test]
fn test_global_metrics() {
    let _guard = SERIAL.lock();
    global::shutdown().expect("Failed to shut down");
    assert!(global::metrics().is_none());

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "counted");
    global::set_level(LogLevel::Error);
    global::info("below threshold", &[]);
    global::warn_f(CallContext::Absent, "t", "below threshold", &[]);
    global::error("written", &[]);

    let metrics = global::metrics().expect("logger is initialized");
    assert_eq!(metrics.filtered, 2);
    assert_eq!(metrics.logged, 1);

    global::set_level(LogLevel::Info);
    global::shutdown().expect("Failed to shut down");
}

#[test]
fn test_failed_init_keeps_previous_logger() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "survivor");

    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"file, not directory").unwrap();
    let result = global::try_init(vec![set_log_path(blocker.to_string_lossy())]);
    assert!(result.is_err());

    assert_eq!(
        global::config().log_path(),
        temp_dir.path().to_string_lossy()
    );

    global::warn("still here", &[]);
    global::flush().expect("Failed to flush");
    let records = read_records(temp_dir.path(), "survivor");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "still here");

    global::shutdown().expect("Failed to shut down");
}

#[test]
fn test_global_query_tracer_uses_global_sink() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    init_file(temp_dir.path(), "gorm");

    let tracer = global::query_tracer(QueryLogLevel::Warn);
    tracer.error(&CallContext::Absent, "lost connection to %s", &[Arg::from("db-1")]);
    tracer.trace(&CallContext::Absent, Instant::now(), &|| ("SELECT 1".to_string(), 1), None);
    global::flush().expect("Failed to flush");

    let records = read_records(temp_dir.path(), "gorm");
    assert_eq!(records.len(), 1, "fast queries are not logged at warn");
    assert_eq!(records[0]["level"], "error");
    assert_eq!(records[0]["title"], "sql_logger");
    assert!(records[0]["msg"]
        .as_str()
        .unwrap()
        .contains("lost connection to [db-1]"));

    global::shutdown().expect("Failed to shut down");
}
