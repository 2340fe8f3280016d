//! Severity routing

use super::log_level::LogLevel;
use super::sink::{Event, Sink};
use std::io::Write;

/// Invoke the emission method of `sink` that matches `level`.
///
/// With no sink installed the bare message goes to stdout so it is not lost.
pub fn dispatch(sink: Option<&dyn Sink>, level: LogLevel, event: Event) {
    match sink {
        Some(sink) => match level {
            LogLevel::Info => sink.info(event),
            LogLevel::Warn => sink.warn(event),
            LogLevel::Error => sink.error(event),
        },
        None => fallback(&event.message),
    }
}

/// Like [`dispatch`] for a severity given by name; unknown names are ignored.
pub fn dispatch_named(sink: Option<&dyn Sink>, severity: &str, event: Event) {
    if let Ok(level) = severity.parse::<LogLevel>() {
        dispatch(sink, level, event);
    }
}

fn fallback(message: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", message);
}
