//! Logger metrics for observability
//!
//! Counters for what happened to each record handed to a logger.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use logpipe::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records accepted by the filter and queued (or passed straight through)
    enqueued: AtomicU64,

    /// Deliveries whose sink returned without error
    delivered: AtomicU64,

    /// Records rejected by the filter
    filtered: AtomicU64,

    /// Deliveries that errored or panicked; the record is lost
    failed: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage of dispatched records that failed (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = failed + self.delivered() as f64;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}
