//! Refresh cadence and the sub-second counter.

use crate::options::ClockConfiguration;
use clock_common::time::TimeSample;
use std::time::Duration;

/// Where the second hand's sub-second part comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubSecond {
    /// Count nominal tick intervals since the wall-clock second changed.
    /// Drifts when ticks run late, but never jumps backwards within a second.
    #[default]
    Accumulated,
    /// Use the milliseconds reported by the time source.
    Measured,
}

/// Interval until the next refresh: `1000 / update_rate` ms when smooth,
/// otherwise one second. Never shorter than 1 ms.
#[must_use]
pub fn refresh_interval(config: &ClockConfiguration) -> Duration {
    if !config.smooth {
        return Duration::from_secs(1);
    }
    let ms = (1000.0 / config.update_rate).floor();
    // update_rate > 0 is enforced by the configuration, so ms is finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ms = ms.clamp(1.0, f64::from(u32::MAX)) as u64;
    Duration::from_millis(ms)
}

/// Tracks the sub-second part across refresh ticks.
#[derive(Debug, Clone, Default)]
pub struct SubSecondCounter {
    mode: SubSecond,
    last_second: Option<u32>,
    millis: u32,
}

impl SubSecondCounter {
    /// Counter in `mode`.
    #[must_use]
    pub fn new(mode: SubSecond) -> Self {
        Self {
            mode,
            last_second: None,
            millis: 0,
        }
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> SubSecond {
        self.mode
    }

    /// Fold one sample into the counter and return the sample with its
    /// millisecond field replaced by the counter's estimate.
    ///
    /// In accumulated mode the counter resets to 0 whenever the sample's
    /// second differs from the previous one, and otherwise grows by
    /// `nominal` (clamped to 999).
    pub fn observe(&mut self, sample: TimeSample, nominal: Duration) -> TimeSample {
        let millis = match self.mode {
            SubSecond::Measured => sample.millis,
            SubSecond::Accumulated => {
                if self.last_second == Some(sample.second) {
                    let step = u32::try_from(nominal.as_millis()).unwrap_or(u32::MAX);
                    self.millis.saturating_add(step).min(999)
                } else {
                    0
                }
            }
        };

        self.last_second = Some(sample.second);
        self.millis = millis;
        sample.with_millis(millis)
    }
}
