//! Log record structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::panic::Location;

/// One record handed to the appenders.
///
/// Built per call and dropped once every appender has seen it. `fields`
/// keeps append order and may repeat keys.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub caller: Option<&'static Location<'static>>,
    pub fields: Vec<Field>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one record always stays on one line.
    fn sanitize_message(message: &str) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message.to_string();
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Local::now(),
            caller: None,
            fields: Vec::new(),
        }
    }

    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// `file:line` of the call site, shortened to the last two path segments
    pub fn caller_string(&self) -> Option<String> {
        self.caller.map(short_caller)
    }
}

/// Trim a location to `dir/file.rs:line`, the way compact caller encoders do.
pub fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let short = match file.rfind(['/', '\\']) {
        Some(last) => match file[..last].rfind(['/', '\\']) {
            Some(prev) => &file[prev + 1..],
            None => file,
        },
        None => file,
    };
    format!("{}:{}", short, location.line())
}
