//! Lateness tracking for fired callbacks.
//!
//! A deferred callback is never run before its due time, but it can run
//! arbitrarily later if the thread was busy. Lateness is that gap.

/// Lateness statistics for callbacks fired by an event loop.
///
/// All values are in milliseconds of the loop's clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatenessMetrics {
    /// Number of callbacks recorded
    pub total: u64,

    /// Callbacks that ran strictly after their due time
    pub late: u64,

    /// Largest observed lateness
    pub max_lateness_ms: u64,

    /// Lateness of the most recent callback
    pub last_lateness_ms: u64,

    /// Sum of all lateness samples, for the mean
    sum_lateness_ms: u64,
}

impl LatenessMetrics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a callback that was due at `due_ms` and started at `fired_ms`.
    ///
    /// A clock that went backwards yields zero lateness rather than a
    /// negative value.
    pub fn record(&mut self, due_ms: u64, fired_ms: u64) {
        let lateness = fired_ms.saturating_sub(due_ms);

        self.total = self.total.saturating_add(1);
        if lateness > 0 {
            self.late = self.late.saturating_add(1);
        }
        self.max_lateness_ms = self.max_lateness_ms.max(lateness);
        self.last_lateness_ms = lateness;
        self.sum_lateness_ms = self.sum_lateness_ms.saturating_add(lateness);
    }

    /// Mean lateness, or 0 if nothing was recorded.
    pub fn mean_lateness_ms(&self) -> u64 {
        self.sum_lateness_ms.checked_div(self.total).unwrap_or(0)
    }

    /// Fraction of callbacks that ran late (0.0 to 1.0).
    pub fn late_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.late as f64 / self.total as f64
        }
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another collector's samples into this one.
    pub fn merge(&mut self, other: &LatenessMetrics) {
        self.total = self.total.saturating_add(other.total);
        self.late = self.late.saturating_add(other.late);
        self.max_lateness_ms = self.max_lateness_ms.max(other.max_lateness_ms);
        if other.total > 0 {
            self.last_lateness_ms = other.last_lateness_ms;
        }
        self.sum_lateness_ms = self.sum_lateness_ms.saturating_add(other.sum_lateness_ms);
    }
}
