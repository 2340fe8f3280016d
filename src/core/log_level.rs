//! Severity definitions and the shared threshold cell

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
}

impl LogLevel {
    /// Lowercase name, also used as the default record title
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Uppercase name used by the console layout
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Info,
            1 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Info => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Minimum severity shared between a sink and whoever adjusts it at runtime.
///
/// Every emission reads the cell once; a `set` is visible to all calls that
/// start after it without rebuilding the sink.
///
/// # Example
///
/// ```
/// use request_logger::{AtomicLevel, LogLevel};
///
/// let level = AtomicLevel::new(LogLevel::Info);
/// assert!(level.enabled(LogLevel::Info));
///
/// level.set(LogLevel::Error);
/// assert!(!level.enabled(LogLevel::Warn));
/// ```
#[derive(Debug)]
pub struct AtomicLevel {
    value: AtomicU8,
}

impl AtomicLevel {
    pub const fn new(level: LogLevel) -> Self {
        Self {
            value: AtomicU8::new(level as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.value.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, level: LogLevel) {
        self.value.store(level as u8, Ordering::Release);
    }

    /// True when `level` is at least as severe as the current threshold
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.get()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Warn > LogLevel::Info);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("Error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("debug".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_upper_str(), "ERROR");
    }

    #[test]
    fn test_atomic_level_threshold() {
        let level = AtomicLevel::default();
        assert_eq!(level.get(), LogLevel::Info);
        assert!(level.enabled(LogLevel::Info));

        level.set(LogLevel::Warn);
        assert!(!level.enabled(LogLevel::Info));
        assert!(level.enabled(LogLevel::Warn));
        assert!(level.enabled(LogLevel::Error));
    }

    #[test]
    fn test_atomic_level_shared_across_threads() {
        let level = Arc::new(AtomicLevel::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let level = Arc::clone(&level);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        level.set(if i % 2 == 0 { LogLevel::Warn } else { LogLevel::Error });
                        let seen = level.get();
                        assert!(seen == LogLevel::Warn || seen == LogLevel::Error);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
