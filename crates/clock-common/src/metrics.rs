//! Tick lateness tracking.
//!
//! Refresh callbacks advance their sub-second estimate by the nominal
//! interval, so any dispatch lateness becomes drift on the face. These
//! metrics make that drift observable.

use std::time::Duration;

/// Dispatch lateness statistics with a ring buffer of recent samples.
#[derive(Debug)]
pub struct TickMetrics {
    /// Ring buffer of lateness values in nanoseconds.
    samples: Box<[u64]>,
    /// Current write position in the ring buffer.
    write_pos: usize,
    /// Number of samples collected (saturates at buffer size).
    sample_count: usize,
    /// Total ticks dispatched.
    total_ticks: u64,
    /// Maximum observed lateness in nanoseconds.
    max_ns: u64,
    /// Sum of all lateness values for mean calculation.
    sum_ns: u64,
    /// Ticks dispatched later than the tolerance.
    late_count: u64,
    /// Lateness tolerated before a tick counts as late.
    tolerance_ns: u64,
}

impl TickMetrics {
    /// Create a collector keeping `history_size` recent samples.
    #[must_use]
    pub fn new(history_size: usize, tolerance: Duration) -> Self {
        let size = history_size.max(1);
        Self {
            samples: vec![0u64; size].into_boxed_slice(),
            write_pos: 0,
            sample_count: 0,
            total_ticks: 0,
            max_ns: 0,
            sum_ns: 0,
            late_count: 0,
            tolerance_ns: saturating_nanos(tolerance),
        }
    }

    /// Record a dispatch that was due at `due` and ran at `dispatched`.
    ///
    /// Early dispatches count as zero lateness.
    pub fn record(&mut self, due: Duration, dispatched: Duration) {
        let ns = saturating_nanos(dispatched.saturating_sub(due));

        self.samples[self.write_pos] = ns;
        self.write_pos = (self.write_pos + 1) % self.samples.len();
        self.sample_count = self.sample_count.saturating_add(1).min(self.samples.len());

        self.total_ticks += 1;
        self.max_ns = self.max_ns.max(ns);
        self.sum_ns = self.sum_ns.saturating_add(ns);

        if ns > self.tolerance_ns {
            self.late_count += 1;
        }
    }

    /// Total ticks recorded.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Ticks that exceeded the tolerance.
    #[must_use]
    pub fn late_count(&self) -> u64 {
        self.late_count
    }

    /// Worst observed lateness.
    #[must_use]
    pub fn max(&self) -> Option<Duration> {
        (self.total_ticks > 0).then(|| Duration::from_nanos(self.max_ns))
    }

    /// Mean lateness across all ticks.
    #[must_use]
    pub fn mean(&self) -> Option<Duration> {
        (self.total_ticks > 0).then(|| Duration::from_nanos(self.sum_ns / self.total_ticks))
    }

    /// Lateness percentile (0.0 to 100.0) over the retained samples.
    #[must_use]
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.sample_count == 0 || !(0.0..=100.0).contains(&percentile) {
            return None;
        }

        let mut sorted: Vec<u64> = self.samples[..self.sample_count].to_vec();
        sorted.sort_unstable();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let idx = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        Some(Duration::from_nanos(sorted[idx.min(sorted.len() - 1)]))
    }

    /// Get a snapshot of current metrics.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_ticks: self.total_ticks,
            max_ns: (self.total_ticks > 0).then_some(self.max_ns),
            mean_ns: (self.total_ticks > 0).then(|| self.sum_ns / self.total_ticks),
            late_count: self.late_count,
            sample_count: self.sample_count,
        }
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Immutable snapshot of metrics for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Total ticks dispatched.
    pub total_ticks: u64,
    /// Maximum lateness in nanoseconds.
    pub max_ns: Option<u64>,
    /// Mean lateness in nanoseconds.
    pub mean_ns: Option<u64>,
    /// Ticks later than the tolerance.
    pub late_count: u64,
    /// Number of samples in the ring buffer.
    pub sample_count: usize,
}
