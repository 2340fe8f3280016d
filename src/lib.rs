//! # Request Logger
//!
//! A structured logging facade that enriches records with request context.
//!
//! ## Features
//!
//! - **Context enrichment**: web requests contribute path, trace id and
//!   origin application; other contexts are logged by display string
//! - **Mixed arguments**: printf-style values and structured fields in one
//!   argument list
//! - **Two sinks**: colored console output or JSON lines in rotating files
//! - **Runtime threshold**: one atomic severity cell, adjustable at any time
//! - **Query tracing**: a database logger adapter with slow-query detection
//!
//! ```no_run
//! use request_logger::{config, global, Arg, Field};
//!
//! global::init(vec![
//!     config::set_app_name("orders"),
//!     config::set_log_path("/var/log/app"),
//! ]);
//!
//! global::info("order %s created", &[Arg::from("A-17"), Arg::from(Field::new("items", 3))]);
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod factory;
pub mod global;
pub mod logger;
pub mod macros;
pub mod query;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, JsonAppender, RotatingFileWriter, RotationOptions};
    pub use crate::config::{LogConfig, LogOption, SinkType};
    pub use crate::core::{
        Appender, Arg, AtomicLevel, CallContext, Event, Field, FieldValue, LogEntry, LogLevel,
        LoggerError, MetricsSnapshot, OutputFormat, RequestContext, Result, Sink, SinkBuilder,
        SinkMetrics, StructuredSink, TimestampFormat,
    };
    pub use crate::logger::Logger;
    pub use crate::query::{QueryLogLevel, QueryLogger, QueryTracer};
}

pub use appenders::{ConsoleAppender, JsonAppender, RotatingFileWriter, RotationOptions};
pub use config::{LogConfig, LogOption, SinkType};
pub use core::{
    enrich, split_args, Appender, Arg, AtomicLevel, CallContext, Event, Field, FieldValue,
    LogEntry, LogLevel, LoggerError, MetricsSnapshot, OutputFormat, RequestContext, Result, Sink,
    SinkBuilder, SinkMetrics, StructuredSink, TimestampFormat,
};
pub use logger::Logger;
pub use query::{QueryLogLevel, QueryLogger, QueryTracer};
