//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A physical destination for encoded records.
///
/// The sink holds its appenders behind one lock, so `append` is never called
/// concurrently on the same appender.
pub trait Appender: Send {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
