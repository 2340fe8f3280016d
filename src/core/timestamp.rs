//! Timestamp layouts used by the encoders
//!
//! All layouts render local time; the file layout carries no sub-second part
//! and no offset.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use request_logger::TimestampFormat;
/// use chrono::{Local, TimeZone};
///
/// let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(TimestampFormat::DateTime.format(&at), "2024-03-09 07:05:01");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+0900`
    ///
    /// Used by the console layout.
    #[default]
    Iso8601,

    /// `2025-01-08 10:30:45`, used by the JSON file layout
    DateTime,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    pub fn pattern(&self) -> &str {
        match self {
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3f%z",
            TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::Custom(format_str) => format_str,
        }
    }

    /// Reject custom patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(self.pattern()).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "timestamp_format",
                format!("invalid strftime pattern '{}'", self.pattern()),
            ));
        }
        Ok(())
    }

    /// Render `datetime`; an unrenderable custom pattern falls back to ISO 8601.
    #[must_use]
    pub fn format<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut out = String::with_capacity(32);
        if write!(out, "{}", datetime.format(self.pattern())).is_err() {
            out.clear();
            let _ = write!(out, "{}", datetime.format(TimestampFormat::Iso8601.pattern()));
        }
        out
    }
}
