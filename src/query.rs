//! Database query tracing
//!
//! [`QueryTracer`] implements the four-method logger contract a database
//! access layer calls into: `log_mode`, `info`/`warn`/`error` and `trace`.
//! Records go through the same enrichment and routing as the facade and are
//! always titled `sql_logger`.

use crate::core::template::sprintf;
use crate::core::{Arg, CallContext, FieldValue, LogLevel, Sink};
use crate::logger::emit;
use std::panic::Location;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const SQL_LOGGER_TITLE: &str = "sql_logger";
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(200);

const INFO_TEMPLATE: &str = r#"{"line": "%s", "level": "[info]", "msg": "%s"}"#;
const WARN_TEMPLATE: &str = r#"{"line": "%s", "level": "[warn]", "msg": "%s"}"#;
const ERROR_TEMPLATE: &str = r#"{"line": "%s", "level": "[error]", "msg": "%s"}"#;
const TRACE_TEMPLATE: &str = r#"{"line": "%s", "elapsed": "%.3fms", "rows": "%v", "sql": "%s"}"#;
const TRACE_ERROR_TEMPLATE: &str =
    r#"{"line": "%s", "error": "%s", "elapsed": "%.3fms", "rows": "%v", "sql": "%s"}"#;
const TRACE_SLOW_TEMPLATE: &str =
    r#"{"line": "%s", "slow": "%s", "elapsed": "%.3fms", "rows": "%v", "sql": "%s"}"#;

/// Verbosity of a query logger; `Silent` emits nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryLogLevel {
    Silent = 1,
    Error = 2,
    Warn = 3,
    Info = 4,
}

/// Logger contract expected by a database access layer.
pub trait QueryLogger: Send + Sync {
    /// A copy of this logger at `level`; the receiver is unchanged
    fn log_mode(&self, level: QueryLogLevel) -> Box<dyn QueryLogger>;

    fn info(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]);
    fn warn(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]);
    fn error(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]);

    /// Called once per finished statement. `fc` yields the SQL text and the
    /// affected row count, `-1` when unknown.
    fn trace(
        &self,
        ctx: &CallContext<'_>,
        begin: Instant,
        fc: &dyn Fn() -> (String, i64),
        err: Option<&dyn std::error::Error>,
    );
}

/// Query logger writing through a [`Sink`].
///
/// # Example
///
/// ```
/// use request_logger::query::{QueryLogLevel, QueryTracer};
/// use std::time::Duration;
///
/// let tracer = QueryTracer::without_sink(QueryLogLevel::Warn)
///     .with_slow_threshold(Duration::from_millis(500));
/// let verbose = tracer.with_level(QueryLogLevel::Info);
///
/// assert_eq!(tracer.level(), QueryLogLevel::Warn);
/// assert_eq!(verbose.level(), QueryLogLevel::Info);
/// ```
#[derive(Clone)]
pub struct QueryTracer {
    sink: Option<Arc<dyn Sink>>,
    level: QueryLogLevel,
    slow_threshold: Duration,
}

impl QueryTracer {
    pub fn new(sink: Arc<dyn Sink>, level: QueryLogLevel) -> Self {
        Self {
            sink: Some(sink),
            level,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// A tracer that prints bare messages to stdout
    pub fn without_sink(level: QueryLogLevel) -> Self {
        Self {
            sink: None,
            level,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// Zero disables slow-query reporting
    #[must_use = "builder methods return a new value"]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_level(&self, level: QueryLogLevel) -> Self {
        let mut copy = self.clone();
        copy.level = level;
        copy
    }

    pub fn level(&self) -> QueryLogLevel {
        self.level
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    fn message(
        &self,
        level: LogLevel,
        template: &str,
        ctx: &CallContext<'_>,
        msg: &str,
        data: &[Arg],
        caller: &'static Location<'static>,
    ) {
        // the whole argument list is one positional value: "[a b c]"
        let rendered = sprintf(msg, &[FieldValue::String(bracketed(data))]);
        let line = sprintf(
            template,
            &[FieldValue::String(location_string(caller)), FieldValue::String(rendered)],
        );
        self.emit(level, ctx, line, caller);
    }

    /// Classify one finished statement whose duration is already known.
    pub(crate) fn trace_elapsed(
        &self,
        ctx: &CallContext<'_>,
        elapsed: Duration,
        fc: &dyn Fn() -> (String, i64),
        err: Option<&dyn std::error::Error>,
        caller: &'static Location<'static>,
    ) {
        if self.level <= QueryLogLevel::Silent {
            return;
        }

        let elapsed_ms = FieldValue::Float(elapsed.as_nanos() as f64 / 1e6);
        let line = FieldValue::String(location_string(caller));

        match err {
            Some(err) if self.level >= QueryLogLevel::Error => {
                let (sql, rows) = fc();
                let message = sprintf(
                    TRACE_ERROR_TEMPLATE,
                    &[line, FieldValue::String(err.to_string()), elapsed_ms, rows_value(rows), sql.into()],
                );
                self.emit(LogLevel::Error, ctx, message, caller);
            }
            _ if !self.slow_threshold.is_zero()
                && elapsed > self.slow_threshold
                && self.level >= QueryLogLevel::Warn =>
            {
                let (sql, rows) = fc();
                let slow = format!("SLOW SQL >= {}", go_duration(self.slow_threshold));
                let message = sprintf(
                    TRACE_SLOW_TEMPLATE,
                    &[line, slow.into(), elapsed_ms, rows_value(rows), sql.into()],
                );
                self.emit(LogLevel::Warn, ctx, message, caller);
            }
            _ if self.level >= QueryLogLevel::Info => {
                let (sql, rows) = fc();
                let message = sprintf(TRACE_TEMPLATE, &[line, elapsed_ms, rows_value(rows), sql.into()]);
                self.emit(LogLevel::Info, ctx, message, caller);
            }
            _ => {}
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        ctx: &CallContext<'_>,
        message: String,
        caller: &'static Location<'static>,
    ) {
        emit(
            self.sink.as_deref(),
            level,
            ctx,
            SQL_LOGGER_TITLE,
            message,
            Vec::new(),
            caller,
        );
    }
}

impl QueryLogger for QueryTracer {
    fn log_mode(&self, level: QueryLogLevel) -> Box<dyn QueryLogger> {
        Box::new(self.with_level(level))
    }

    #[track_caller]
    fn info(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]) {
        if self.level >= QueryLogLevel::Info {
            self.message(LogLevel::Info, INFO_TEMPLATE, ctx, msg, data, Location::caller());
        }
    }

    #[track_caller]
    fn warn(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]) {
        if self.level >= QueryLogLevel::Warn {
            self.message(LogLevel::Warn, WARN_TEMPLATE, ctx, msg, data, Location::caller());
        }
    }

    #[track_caller]
    fn error(&self, ctx: &CallContext<'_>, msg: &str, data: &[Arg]) {
        if self.level >= QueryLogLevel::Error {
            self.message(LogLevel::Error, ERROR_TEMPLATE, ctx, msg, data, Location::caller());
        }
    }

    #[track_caller]
    fn trace(
        &self,
        ctx: &CallContext<'_>,
        begin: Instant,
        fc: &dyn Fn() -> (String, i64),
        err: Option<&dyn std::error::Error>,
    ) {
        let elapsed = begin.elapsed();
        self.trace_elapsed(ctx, elapsed, fc, err, Location::caller());
    }
}

impl std::fmt::Debug for QueryTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryTracer")
            .field("has_sink", &self.sink.is_some())
            .field("level", &self.level)
            .field("slow_threshold", &self.slow_threshold)
            .finish()
    }
}

fn rows_value(rows: i64) -> FieldValue {
    if rows == -1 {
        FieldValue::String("-".to_string())
    } else {
        FieldValue::Int(rows)
    }
}

fn location_string(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

fn bracketed(data: &[Arg]) -> String {
    let items: Vec<String> = data
        .iter()
        .map(|arg| match arg {
            Arg::Value(value) => value.to_string(),
            Arg::Field(field) => field.to_string(),
        })
        .collect();
    format!("[{}]", items.join(" "))
}

/// Duration text in the `200ms` / `1.5s` / `750µs` style
fn go_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{}µs", nanos as f64 / 1e3)
    } else if nanos < 1_000_000_000 {
        format!("{}ms", nanos as f64 / 1e6)
    } else {
        format!("{}s", nanos as f64 / 1e9)
    }
}
