//! Basic logger usage example
//!
//! Demonstrates the process-wide logger with request context and structured
//! fields on the console sink.
//!
//! Run with: cargo run --example basic_usage

use request_logger::config::{set_app_mode, set_app_name, set_log_type};
use request_logger::prelude::*;
use request_logger::{global, info_f, warn_f};

fn main() -> Result<()> {
    println!("=== Request Logger - Basic Usage Example ===\n");

    global::try_init(vec![
        set_app_name("checkout"),
        set_app_mode("dev"),
        set_log_type("console"),
    ])?;

    println!("1. Free functions, titled by severity:");
    global::info("service started on port %d", &[Arg::from(8080)]);
    global::warn("cache is cold", &[Arg::from(Field::new("entries", 0))]);

    println!("\n2. Request context through the macros:");
    let request = http::Request::builder()
        .uri("/v1/orders?id=17")
        .header("x-b3-traceid", "463ac35c9f6413ad")
        .header("app-name", "storefront")
        .body(())
        .map_err(|e| LoggerError::appender(e.to_string()))?;

    if let Some(logger) = global::logger() {
        info_f!(logger, &request, "orders", "order %s accepted", "A-17", Field::new("items", 3));
        warn_f!(logger, &request, "orders", "payment took %dms", 950);
    }

    println!("\n3. Raising the threshold:");
    global::set_level(LogLevel::Error);
    global::info("hidden", &[]);
    global::error_f(&request, "orders", "payment declined", &[]);

    if let Some(metrics) = global::metrics() {
        println!("\nlogged={} filtered={}", metrics.logged, metrics.filtered);
    }

    // the global logger is never dropped; flush buffered records before exit
    global::shutdown()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
