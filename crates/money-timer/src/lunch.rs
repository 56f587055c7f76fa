//! Automatic lunch break timing.

use crate::entry::ClockTime;
use clock_common::time::TimeSample;
use std::time::Duration;

/// Delays from now until the lunch break edges. An edge already passed
/// today has no delay and is not scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LunchDelays {
    /// Until the break starts.
    pub pause: Option<Duration>,
    /// Until the break ends.
    pub resume: Option<Duration>,
}

/// Compute lunch break delays relative to `now`.
#[must_use]
pub fn lunch_delays(start: ClockTime, stop: ClockTime, now: TimeSample) -> LunchDelays {
    let now = u64::from(now.seconds_of_day());
    let ahead = |at: ClockTime| {
        at.seconds_of_day()
            .checked_sub(now)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    };

    LunchDelays {
        pause: ahead(start),
        resume: ahead(stop),
    }
}
