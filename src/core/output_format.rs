//! Record encoders
//!
//! - Console: tab separated, human readable, fields as a trailing JSON object
//! - Json: one JSON object per line
//!
//! Both encoders stream the field list in order instead of building a map, so
//! repeated keys appear as many times as they were added.

use super::field::Field;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde_json::Value;

pub const KEY_LEVEL: &str = "level";
pub const KEY_TIME: &str = "ts";
pub const KEY_CALLER: &str = "caller";
pub const KEY_MESSAGE: &str = "msg";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `2025-01-08T10:30:45.123+0000	INFO	api/handler.rs:42	done	{"k":"v"}`
    #[default]
    Console,

    /// `{"level":"info","ts":"2025-01-08 10:30:45","caller":"api/handler.rs:42","msg":"done","k":"v"}`
    Json,
}

impl OutputFormat {
    /// Encode `entry` without a trailing newline
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Console => {
                format_console(entry, timestamp_format, entry.level.to_upper_str())
            }
            OutputFormat::Json => format_json(entry, timestamp_format),
        }
    }
}

/// Console layout with a caller-supplied level label (plain or colored)
pub fn format_console(entry: &LogEntry, timestamp_format: &TimestampFormat, level: &str) -> String {
    let mut line = String::with_capacity(64 + entry.message.len());
    line.push_str(&timestamp_format.format(&entry.timestamp));
    line.push('\t');
    line.push_str(level);
    if let Some(caller) = entry.caller_string() {
        line.push('\t');
        line.push_str(&caller);
    }
    line.push('\t');
    line.push_str(&entry.message);

    if !entry.fields.is_empty() {
        line.push('\t');
        line.push('{');
        push_fields(&mut line, &entry.fields, false);
        line.push('}');
    }

    line
}

fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut line = String::with_capacity(96 + entry.message.len());
    line.push('{');
    push_pair(&mut line, KEY_LEVEL, &Value::from(entry.level.as_str()), false);
    push_pair(
        &mut line,
        KEY_TIME,
        &Value::from(timestamp_format.format(&entry.timestamp)),
        true,
    );
    if let Some(caller) = entry.caller_string() {
        push_pair(&mut line, KEY_CALLER, &Value::from(caller), true);
    }
    push_pair(&mut line, KEY_MESSAGE, &Value::from(entry.message.as_str()), true);
    push_fields(&mut line, &entry.fields, true);
    line.push('}');
    line
}

fn push_fields(out: &mut String, fields: &[Field], mut leading_comma: bool) {
    for field in fields {
        push_pair(out, &field.key, &field.value.to_json_value(), leading_comma);
        leading_comma = true;
    }
}

fn push_pair(out: &mut String, key: &str, value: &Value, leading_comma: bool) {
    if leading_comma {
        out.push(',');
    }
    out.push_str(&Value::from(key).to_string());
    out.push(':');
    out.push_str(&value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn entry() -> LogEntry {
        let mut entry = LogEntry::new(LogLevel::Warn, "disk \"almost\" full")
            .with_fields([Field::new("app_name", "svc"), Field::new("free_mb", 12)]);
        entry.timestamp = Local.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        entry
    }

    #[test]
    fn test_json_format() {
        let line = OutputFormat::Json.format(&entry(), &TimestampFormat::DateTime);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["ts"], "2025-01-08 10:30:45");
        assert_eq!(parsed["msg"], "disk \"almost\" full");
        assert_eq!(parsed["app_name"], "svc");
        assert_eq!(parsed["free_mb"], 12);
        assert!(line.starts_with("{\"level\":\"warn\",\"ts\":"));
    }

    #[test]
    fn test_json_keeps_duplicate_keys() {
        let entry = LogEntry::new(LogLevel::Info, "m")
            .with_fields([Field::new("title", "a"), Field::new("title", "b")]);
        let line = OutputFormat::Json.format(&entry, &TimestampFormat::DateTime);
        assert!(line.ends_with(",\"title\":\"a\",\"title\":\"b\"}"), "{}", line);
    }

    #[test]
    fn test_json_includes_caller() {
        let entry = LogEntry::new(LogLevel::Info, "m").with_caller(std::panic::Location::caller());
        let line = OutputFormat::Json.format(&entry, &TimestampFormat::DateTime);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(parsed["caller"].as_str().unwrap().contains("output_format.rs:"));
    }

    #[test]
    fn test_console_format() {
        let line = OutputFormat::Console.format(&entry(), &TimestampFormat::DateTime);
        let columns: Vec<_> = line.split('\t').collect();
        assert_eq!(columns[0], "2025-01-08 10:30:45");
        assert_eq!(columns[1], "WARN");
        assert_eq!(columns[2], "disk \"almost\" full");
        assert_eq!(columns[3], "{\"app_name\":\"svc\",\"free_mb\":12}");
    }

    #[test]
    fn test_console_without_fields() {
        let entry = LogEntry::new(LogLevel::Error, "boom");
        let line = OutputFormat::Console.format(&entry, &TimestampFormat::Iso8601);
        assert!(line.ends_with("\tERROR\tboom"));
    }
}
