//! Structured sink: threshold check, fixed fields, appender fan-out

use super::{
    appender::Appender,
    error::Result,
    field::{Field, FieldValue},
    log_entry::LogEntry,
    log_level::{AtomicLevel, LogLevel},
    metrics::SinkMetrics,
};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Arc;

/// What the facade hands to a sink: a finished message plus its fields.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub message: String,
    pub fields: Vec<Field>,
    pub caller: Option<&'static Location<'static>>,
}

impl Event {
    pub fn new(message: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            message: message.into(),
            fields,
            caller: None,
        }
    }

    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// Per-severity emission capability consumed by the router.
///
/// Implementations must be safe to call from many threads at once.
pub trait Sink: Send + Sync {
    fn info(&self, event: Event);
    fn warn(&self, event: Event);
    fn error(&self, event: Event);

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// The sink built by the factory.
///
/// Records below the shared threshold are counted and discarded before any
/// encoding. Every record gets the fixed fields first, then the event fields.
pub struct StructuredSink {
    level: Arc<AtomicLevel>,
    fixed_fields: Vec<Field>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    metrics: Arc<SinkMetrics>,
}

impl StructuredSink {
    pub fn builder() -> SinkBuilder {
        SinkBuilder::new()
    }

    pub fn level(&self) -> &Arc<AtomicLevel> {
        &self.level
    }

    pub fn fixed_fields(&self) -> &[Field] {
        &self.fixed_fields
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|appender| appender.name().to_string())
            .collect()
    }

    pub fn log(&self, level: LogLevel, event: Event) {
        if !self.level.enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let mut fields = Vec::with_capacity(self.fixed_fields.len() + event.fields.len());
        fields.extend(self.fixed_fields.iter().cloned());
        fields.extend(event.fields);

        let mut entry = LogEntry::new(level, event.message).with_fields(fields);
        entry.caller = event.caller;

        let mut appenders = self.appenders.lock();
        Self::process_sync(&mut appenders, &entry, &self.metrics);
    }

    /// Write `entry` to every appender, isolating failures and panics
    ///
    /// Returns true when at least one appender failed.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        metrics: &SinkMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = panic::catch_unwind(AssertUnwindSafe(|| appender.append(entry)));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }

        has_error
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Sink for StructuredSink {
    fn info(&self, event: Event) {
        self.log(LogLevel::Info, event);
    }

    fn warn(&self, event: Event) {
        self.log(LogLevel::Warn, event);
    }

    fn error(&self, event: Event) {
        self.log(LogLevel::Error, event);
    }

    fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

impl Drop for StructuredSink {
    fn drop(&mut self) {
        for (idx, appender) in self.appenders.get_mut().iter_mut().enumerate() {
            if let Err(e) = appender.flush() {
                eprintln!("[LOGGER ERROR] Appender #{} flush failed on drop: {}", idx, e);
            }
        }

        let totals = self.metrics.snapshot();
        if totals.dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Sink shutting down with {} dropped logs (drop rate: {:.2}%)",
                totals.dropped,
                totals.drop_rate()
            );
        }
    }
}

/// Builder for [`StructuredSink`]
///
/// # Example
/// ```
/// use request_logger::prelude::*;
/// use std::sync::Arc;
///
/// let level = Arc::new(AtomicLevel::new(LogLevel::Warn));
/// let sink = StructuredSink::builder()
///     .level(Arc::clone(&level))
///     .fixed_field("app_name", "svc")
///     .appender(ConsoleAppender::new())
///     .build();
///
/// assert_eq!(sink.fixed_fields().len(), 1);
/// ```
pub struct SinkBuilder {
    level: Option<Arc<AtomicLevel>>,
    fixed_fields: Vec<Field>,
    appenders: Vec<Box<dyn Appender>>,
}

impl SinkBuilder {
    pub fn new() -> Self {
        Self {
            level: None,
            fixed_fields: Vec::new(),
            appenders: Vec::new(),
        }
    }

    /// Share an existing threshold cell; a fresh `info` cell is used otherwise
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Arc<AtomicLevel>) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fixed_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fixed_fields.push(Field::new(key, value));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    pub fn build(self) -> StructuredSink {
        StructuredSink {
            level: self.level.unwrap_or_default(),
            fixed_fields: self.fixed_fields,
            appenders: Mutex::new(self.appenders),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }
}

impl Default for SinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
