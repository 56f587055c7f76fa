//! Wall-clock sampling.
//!
//! Components never read the system clock directly; they ask a
//! [`TimeSource`] so tests can pin or advance time explicitly.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use std::cell::Cell;
use std::time::Duration;

/// Time of day as seen by one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSample {
    /// Hour, 0..=23.
    pub hour: u32,
    /// Minute, 0..=59.
    pub minute: u32,
    /// Second, 0..=59.
    pub second: u32,
    /// Sub-second milliseconds, 0..=999.
    pub millis: u32,
}

impl TimeSample {
    /// Create a sample, clamping each field into its range.
    #[must_use]
    pub fn new(hour: u32, minute: u32, second: u32, millis: u32) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            second: second.min(59),
            millis: millis.min(999),
        }
    }

    /// Sample the time-of-day part of a timestamp.
    ///
    /// Leap seconds (chrono reports them as nanos >= 1e9) fold into 999 ms.
    #[must_use]
    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self::new(
            at.hour(),
            at.minute(),
            at.second(),
            at.nanosecond() / 1_000_000,
        )
    }

    /// Replace the sub-second part.
    #[must_use]
    pub fn with_millis(self, millis: u32) -> Self {
        Self {
            millis: millis.min(999),
            ..self
        }
    }

    /// Whole seconds since midnight.
    #[must_use]
    pub fn seconds_of_day(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }
}

/// Source of local wall-clock time.
pub trait TimeSource {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current time of day.
    fn sample(&self) -> TimeSample {
        TimeSample::from_datetime(&self.now())
    }
}

/// System local time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeSource;

impl TimeSource for LocalTimeSource {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Hand-driven time source for tests and simulations.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    now: Cell<NaiveDateTime>,
}

impl ManualTimeSource {
    /// Start at the given timestamp.
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, at: NaiveDateTime) {
        self.now.set(at);
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let delta = ChronoDuration::from_std(by).unwrap_or(ChronoDuration::zero());
        self.now.set(self.now.get() + delta);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_sample_from_datetime() {
        let sample = TimeSample::from_datetime(&at(14, 5, 59, 250));
        assert_eq!(sample, TimeSample::new(14, 5, 59, 250));
        assert_eq!(sample.seconds_of_day(), 14 * 3600 + 5 * 60 + 59);
    }

    #[test]
    fn test_new_clamps_fields() {
        let sample = TimeSample::new(30, 75, 61, 4000);
        assert_eq!(sample, TimeSample::new(23, 59, 59, 999));
    }

    #[test]
    fn test_manual_source_advances() {
        let source = ManualTimeSource::new(at(9, 0, 0, 0));
        source.advance(Duration::from_millis(1500));
        assert_eq!(source.sample(), TimeSample::new(9, 0, 1, 500));

        source.set(at(23, 59, 59, 999));
        assert_eq!(source.sample().millis, 999);
    }

    #[test]
    fn test_with_millis() {
        let sample = TimeSample::new(1, 2, 3, 0).with_millis(1200);
        assert_eq!(sample.millis, 999);
    }
}
