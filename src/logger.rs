//! Logger instances
//!
//! A [`Logger`] pairs one sink with the configuration it was built from.
//! Any number of instances can live side by side; they share nothing with
//! the process-wide logger in [`crate::global`].

use crate::config::{LogConfig, LogOption};
use crate::core::{
    enrich, router, split_args, Arg, AtomicLevel, CallContext, Event, Field, LogLevel,
    MetricsSnapshot, Result, Sink, StructuredSink,
};
use crate::factory;
use crate::query::{QueryLogLevel, QueryTracer};
use std::panic::Location;
use std::sync::Arc;

/// An explicitly owned logger.
///
/// # Example
///
/// ```no_run
/// use request_logger::{config, Arg, Logger};
///
/// let logger = Logger::new(vec![
///     config::set_app_name("billing"),
///     config::set_log_type("console"),
/// ]);
/// logger.info("invoice %s paid", &[Arg::from("INV-7")]);
/// ```
pub struct Logger {
    sink: Arc<StructuredSink>,
    config: LogConfig,
    level: Arc<AtomicLevel>,
}

impl Logger {
    /// Build from defaults plus `options`, with a fresh `info` threshold.
    pub fn try_new(options: impl IntoIterator<Item = LogOption>) -> Result<Self> {
        Self::from_config(LogConfig::with_options(options), Arc::default())
    }

    /// Like [`Logger::try_new`].
    ///
    /// # Panics
    ///
    /// Panics when the sink cannot be built; a process without a working
    /// log destination does not continue.
    pub fn new(options: impl IntoIterator<Item = LogOption>) -> Self {
        match Self::try_new(options) {
            Ok(logger) => logger,
            Err(e) => panic!("failed to build log sink: {}", e),
        }
    }

    pub(crate) fn from_config(config: LogConfig, level: Arc<AtomicLevel>) -> Result<Self> {
        let sink = factory::build_sink(&config, level)?;
        Ok(Self::from_sink(config, sink))
    }

    /// Wrap an already built sink; the logger adopts its threshold cell.
    pub fn from_sink(config: LogConfig, sink: StructuredSink) -> Self {
        let level = Arc::clone(sink.level());
        Self {
            sink: Arc::new(sink),
            config,
            level,
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<StructuredSink> {
        &self.sink
    }

    /// Counters of the underlying sink, including calls below the threshold
    pub fn metrics(&self) -> MetricsSnapshot {
        self.sink.metrics().snapshot()
    }

    pub fn level(&self) -> LogLevel {
        self.level.get()
    }

    /// Takes effect for every later call, no rebuild needed
    pub fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    /// Adapter for a database layer, writing through this logger's sink
    pub fn query_tracer(&self, level: QueryLogLevel) -> QueryTracer {
        QueryTracer::new(Arc::clone(&self.sink) as Arc<dyn Sink>, level)
    }

    #[track_caller]
    pub fn info(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Info, CallContext::Absent, LogLevel::Info.as_str(), template, args);
    }

    #[track_caller]
    pub fn warn(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Warn, CallContext::Absent, LogLevel::Warn.as_str(), template, args);
    }

    #[track_caller]
    pub fn error(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Error, CallContext::Absent, LogLevel::Error.as_str(), template, args);
    }

    #[track_caller]
    pub fn info_f<'c>(
        &self,
        ctx: impl Into<CallContext<'c>>,
        title: &str,
        template: &str,
        args: &[Arg],
    ) {
        self.log(LogLevel::Info, ctx.into(), title, template, args);
    }

    #[track_caller]
    pub fn warn_f<'c>(
        &self,
        ctx: impl Into<CallContext<'c>>,
        title: &str,
        template: &str,
        args: &[Arg],
    ) {
        self.log(LogLevel::Warn, ctx.into(), title, template, args);
    }

    #[track_caller]
    pub fn error_f<'c>(
        &self,
        ctx: impl Into<CallContext<'c>>,
        title: &str,
        template: &str,
        args: &[Arg],
    ) {
        self.log(LogLevel::Error, ctx.into(), title, template, args);
    }

    /// Classify `args`, enrich from `ctx` and dispatch one record.
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        ctx: CallContext<'_>,
        title: &str,
        template: &str,
        args: &[Arg],
    ) {
        if !self.level.enabled(level) {
            self.sink.metrics().record_filtered();
            return;
        }

        let (message, fields) = split_args(template, args);
        emit(
            Some(self.sink.as_ref() as &dyn Sink),
            level,
            &ctx,
            title,
            message,
            fields,
            Location::caller(),
        );
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("level", &self.level.get())
            .finish_non_exhaustive()
    }
}

/// Append the context fields after the caller fields and route the record.
///
/// Without a sink only the bare message is printed.
pub(crate) fn emit(
    sink: Option<&dyn Sink>,
    level: LogLevel,
    ctx: &CallContext<'_>,
    title: &str,
    message: String,
    mut fields: Vec<Field>,
    caller: &'static Location<'static>,
) {
    if sink.is_none() {
        router::dispatch(None, level, Event::new(message, Vec::new()));
        return;
    }

    fields.extend(enrich(ctx, title));
    router::dispatch(sink, level, Event::new(message, fields).with_caller(caller));
}
