//! Per-sink counters
//!
//! A sink records the outcome of every record it sees: written by all
//! appenders, dropped because at least one appender failed, or filtered out
//! by the severity threshold.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated without locking.
///
/// # Example
///
/// ```
/// use request_logger::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
/// metrics.record_logged();
/// metrics.record_filtered();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.logged, 1);
/// assert_eq!(snapshot.filtered, 1);
/// ```
#[derive(Debug, Default)]
pub struct SinkMetrics {
    logged: AtomicU64,
    dropped: AtomicU64,
    filtered: AtomicU64,
}

/// Counter values at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub logged: u64,
    pub dropped: u64,
    pub filtered: u64,
}

impl MetricsSnapshot {
    /// Share of delivered-or-dropped records that were dropped, in percent.
    /// Filtered records do not count.
    pub fn drop_rate(&self) -> f64 {
        let attempted = self.logged + self.dropped;
        if attempted == 0 {
            return 0.0;
        }
        self.dropped as f64 * 100.0 / attempted as f64
    }
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            logged: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_logged(&self) {
        self.logged.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.logged(),
            dropped: self.dropped(),
            filtered: self.filtered(),
        }
    }

    /// Zero every counter, returning what they held
    pub fn take(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.logged.swap(0, Ordering::Relaxed),
            dropped: self.dropped.swap(0, Ordering::Relaxed),
            filtered: self.filtered.swap(0, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_drop_rate() {
        let metrics = SinkMetrics::new();
        assert_eq!(metrics.snapshot().drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_logged();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }
        assert_eq!(metrics.snapshot().drop_rate(), 10.0);
    }

    #[test]
    fn test_filtered_not_in_drop_rate() {
        let metrics = SinkMetrics::new();
        metrics.record_logged();
        metrics.record_filtered();
        metrics.record_filtered();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.filtered, 2);
        assert_eq!(snapshot.drop_rate(), 0.0);
    }

    #[test]
    fn test_take_resets() {
        let metrics = SinkMetrics::new();
        metrics.record_dropped();
        metrics.record_logged();

        let taken = metrics.take();
        assert_eq!(taken, MetricsSnapshot { logged: 1, dropped: 1, filtered: 0 });
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = Arc::new(SinkMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_logged();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.logged(), 4000);
    }
}
