//! Process-wide logger
//!
//! [`init`] builds a [`Logger`] and publishes it with one atomic pointer
//! swap. Calls already holding the previous logger finish against the
//! previous sink; replacement does not wait for them. Options accumulate
//! across `init` calls. The severity threshold lives in one cell that every
//! generation of the global logger shares, and each `init` puts it back to
//! `info`.
//!
//! Before the first `init`, the free functions print the bare message to
//! stdout.

use crate::config::{LogConfig, LogOption};
use crate::core::{
    router, split_args, Arg, AtomicLevel, CallContext, Event, LogLevel, MetricsSnapshot, Result,
};
use crate::logger::Logger;
use crate::query::{QueryLogLevel, QueryTracer};
use arc_swap::ArcSwapOption;
use parking_lot::{const_mutex, Mutex};
use std::sync::{Arc, OnceLock};

static GLOBAL: ArcSwapOption<Logger> = ArcSwapOption::const_empty();
static GLOBAL_CONFIG: Mutex<Option<LogConfig>> = const_mutex(None);
static GLOBAL_LEVEL: OnceLock<Arc<AtomicLevel>> = OnceLock::new();

fn global_level() -> &'static Arc<AtomicLevel> {
    GLOBAL_LEVEL.get_or_init(Arc::default)
}

/// Apply `options` to the process configuration and replace the global
/// logger with one built from it.
///
/// A successful call resets the threshold to `info`. On error the previous
/// logger, configuration and threshold stay in place.
pub fn try_init(options: impl IntoIterator<Item = LogOption>) -> Result<()> {
    let mut current = GLOBAL_CONFIG.lock();

    let mut config = current.clone().unwrap_or_default();
    config.apply(options);

    let logger = Logger::from_config(config.clone(), Arc::clone(global_level()))?;
    global_level().set(LogLevel::Info);
    GLOBAL.store(Some(Arc::new(logger)));
    *current = Some(config);

    Ok(())
}

/// Like [`try_init`].
///
/// The file sink buffers writes unless `set_no_buffer_write` is given, and
/// the global logger lives in a static that is never dropped. Call
/// [`shutdown`] or [`flush`] before the process exits, or the last buffered
/// records are lost.
///
/// # Panics
///
/// Panics when the sink cannot be built.
pub fn init(options: impl IntoIterator<Item = LogOption>) {
    if let Err(e) = try_init(options) {
        panic!("failed to initialize global logger: {}", e);
    }
}

/// The current global logger, if initialized
pub fn logger() -> Option<Arc<Logger>> {
    GLOBAL.load_full()
}

pub fn is_initialized() -> bool {
    GLOBAL.load().is_some()
}

/// Configuration the global logger was last built from
pub fn config() -> LogConfig {
    GLOBAL_CONFIG.lock().clone().unwrap_or_default()
}

pub fn level() -> LogLevel {
    global_level().get()
}

pub fn set_level(level: LogLevel) {
    global_level().set(level);
}

/// Counters of the current global sink, `None` before `init`
///
/// Each `init` builds a fresh sink, so the counters restart with it.
pub fn metrics() -> Option<MetricsSnapshot> {
    GLOBAL.load().as_ref().map(|logger| logger.metrics())
}

pub fn flush() -> Result<()> {
    match GLOBAL.load_full() {
        Some(logger) => logger.flush(),
        None => Ok(()),
    }
}

/// Unpublish the global logger and flush it.
///
/// The configuration is kept, so a later [`init`] still builds on it.
pub fn shutdown() -> Result<()> {
    match GLOBAL.swap(None) {
        Some(logger) => logger.flush(),
        None => Ok(()),
    }
}

/// Query adapter over the current global sink, or stdout before `init`
pub fn query_tracer(level: QueryLogLevel) -> QueryTracer {
    match GLOBAL.load_full() {
        Some(logger) => logger.query_tracer(level),
        None => QueryTracer::without_sink(level),
    }
}

#[track_caller]
pub fn info(template: &str, args: &[Arg]) {
    log(LogLevel::Info, CallContext::Absent, LogLevel::Info.as_str(), template, args);
}

#[track_caller]
pub fn warn(template: &str, args: &[Arg]) {
    log(LogLevel::Warn, CallContext::Absent, LogLevel::Warn.as_str(), template, args);
}

#[track_caller]
pub fn error(template: &str, args: &[Arg]) {
    log(LogLevel::Error, CallContext::Absent, LogLevel::Error.as_str(), template, args);
}

#[track_caller]
pub fn info_f<'c>(ctx: impl Into<CallContext<'c>>, title: &str, template: &str, args: &[Arg]) {
    log(LogLevel::Info, ctx.into(), title, template, args);
}

#[track_caller]
pub fn warn_f<'c>(ctx: impl Into<CallContext<'c>>, title: &str, template: &str, args: &[Arg]) {
    log(LogLevel::Warn, ctx.into(), title, template, args);
}

#[track_caller]
pub fn error_f<'c>(ctx: impl Into<CallContext<'c>>, title: &str, template: &str, args: &[Arg]) {
    log(LogLevel::Error, ctx.into(), title, template, args);
}

#[track_caller]
fn log(level: LogLevel, ctx: CallContext<'_>, title: &str, template: &str, args: &[Arg]) {
    let current = GLOBAL.load();
    match &*current {
        Some(logger) => logger.log(level, ctx, title, template, args),
        None => {
            let (message, _) = split_args(template, args);
            router::dispatch(None, level, Event::new(message, Vec::new()));
        }
    }
}
