//! Console appender implementation

use crate::core::output_format::format_console;
use crate::core::{Appender, LogEntry, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Human-readable records on stdout.
///
/// The sink's appender lock guarantees one writer touches the stream at a
/// time; each record is written with a single call.
pub struct ConsoleAppender {
    writer: Box<dyn Write + Send>,
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            writer: Box::new(io::stdout()),
            use_colors,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Redirect output, e.g. into a buffer in tests
    ///
    /// # Example
    ///
    /// ```
    /// use request_logger::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_colors(false).with_writer(Vec::new());
    /// ```
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Fails when a custom pattern is not valid strftime
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Result<Self> {
        format.validate()?;
        self.timestamp_format = format;
        Ok(self)
    }

    fn level_label(&self, entry: &LogEntry) -> String {
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                return entry
                    .level
                    .to_upper_str()
                    .color(entry.level.color_code())
                    .to_string();
            }
        }
        entry.level.to_upper_str().to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = format_console(entry, &self.timestamp_format, &self.level_label(entry));
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
