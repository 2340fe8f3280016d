//! JSON appender for structured logging

use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use std::io::Write;

/// JSON-lines appender over any writer
///
/// Writes each log entry as a single-line JSON object with the timestamp as
/// `YYYY-MM-DD HH:MM:SS`. The file sink pairs it with a
/// [`RotatingFileWriter`](super::RotatingFileWriter); every record reaches the
/// writer in one `write_all` call.
pub struct JsonAppender {
    writer: Box<dyn Write + Send>,
    timestamp_format: TimestampFormat,
}

impl JsonAppender {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            timestamp_format: TimestampFormat::DateTime,
        }
    }

    /// Fails when a custom pattern is not valid strftime
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Result<Self> {
        format.validate()?;
        self.timestamp_format = format;
        Ok(self)
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = OutputFormat::Json.format(entry, &self.timestamp_format);
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
