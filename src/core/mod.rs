//! Core logger types and traits

pub mod appender;
pub mod classifier;
pub mod context;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod metrics;
pub mod output_format;
pub mod router;
pub mod sink;
pub mod template;
pub mod timestamp;

pub use appender::Appender;
pub use classifier::{split_args, Arg};
pub use context::{enrich, CallContext, RequestContext};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::LogEntry;
pub use log_level::{AtomicLevel, LogLevel};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use output_format::OutputFormat;
pub use sink::{Event, Sink, SinkBuilder, StructuredSink};
pub use timestamp::TimestampFormat;
