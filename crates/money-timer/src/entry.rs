//! Parsing of times and numbers typed by the user.
//!
//! Times are `hh:mm` or `h:mm`. The start-time prompt accepts hours up to
//! 24; lunch break times accept any two-digit hour.

use crate::error::{EntryError, FormErrors};
use crate::settings::DAY_NAMES;
use clock_common::time::TimeSample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latest hour accepted for a session start.
pub const MAX_START_HOUR: u32 = 24;

/// An hour and minute of the day, stored as `[h, m]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct ClockTime {
    /// Hour.
    pub hour: u32,
    /// Minute.
    pub minute: u32,
}

impl ClockTime {
    /// Create a time.
    #[must_use]
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Seconds since midnight.
    #[must_use]
    pub fn seconds_of_day(&self) -> u64 {
        u64::from(self.hour) * 3600 + u64::from(self.minute) * 60
    }

    /// Whether this is a time a user could have typed: hour at most
    /// [`MAX_START_HOUR`], minute at most 59.
    #[must_use]
    pub fn is_time_of_day(&self) -> bool {
        self.hour <= MAX_START_HOUR && self.minute <= 59
    }
}

impl From<(u32, u32)> for ClockTime {
    fn from((hour, minute): (u32, u32)) -> Self {
        Self { hour, minute }
    }
}

impl From<ClockTime> for (u32, u32) {
    fn from(t: ClockTime) -> Self {
        (t.hour, t.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// Parse `hh:mm` or `h:mm`.
///
/// `max_hour` bounds the hour when given; minutes are always 0..=59.
///
/// # Errors
///
/// [`EntryError::Format`] for anything else, [`EntryError::Hour`] or
/// [`EntryError::Minute`] when a field is out of range.
pub fn parse_clock_time(text: &str, max_hour: Option<u32>) -> Result<ClockTime, EntryError> {
    let format_err = || EntryError::Format(text.to_string());

    let (hour, minute) = text.split_once(':').ok_or_else(format_err)?;
    if !matches!(hour.len(), 1 | 2) || minute.len() != 2 {
        return Err(format_err());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(format_err());
    }

    let hour: u32 = hour.parse().map_err(|_| format_err())?;
    let minute: u32 = minute.parse().map_err(|_| format_err())?;

    if max_hour.is_some_and(|max| hour > max) {
        return Err(EntryError::Hour(hour));
    }
    if minute > 59 {
        return Err(EntryError::Minute(minute));
    }
    Ok(ClockTime::new(hour, minute))
}

/// Seconds already worked, given the start time typed at setup.
///
/// Blank text means "starting now". The current second counts toward the
/// result.
///
/// # Errors
///
/// Parse errors, or [`EntryError::StartInFuture`] when the start lies
/// after `now`.
pub fn start_offset(text: &str, now: TimeSample) -> Result<f64, EntryError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let start = parse_clock_time(text, Some(MAX_START_HOUR))?;
    let elapsed = (i64::from(now.hour) - i64::from(start.hour)) * 3600
        + (i64::from(now.minute) - i64::from(start.minute)) * 60
        + i64::from(now.second);

    if elapsed < 0 {
        return Err(EntryError::StartInFuture(start));
    }
    #[allow(clippy::cast_precision_loss)]
    Ok(elapsed as f64)
}

/// Parse a decimal entry. Blank text is zero.
///
/// # Errors
///
/// [`EntryError::Number`] when the text is not a finite number.
pub fn parse_amount(text: &str) -> Result<f64, EntryError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(EntryError::Number {
            value: text.to_string(),
        }),
    }
}

/// Validated settings form contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUpdate {
    /// Automatic lunch break on or off.
    pub auto_lunch_enabled: bool,
    /// Lunch start and stop, present only when enabled.
    pub lunch: Option<(ClockTime, ClockTime)>,
    /// Hourly rate.
    pub hourly_rate: f64,
    /// Daily goal hours, Monday first.
    pub daily_goals: [f64; 7],
}

/// Raw text of the settings form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    /// Automatic lunch break checkbox.
    pub auto_lunch_enabled: bool,
    /// Lunch start text.
    pub lunch_start: String,
    /// Lunch stop text.
    pub lunch_stop: String,
    /// Hourly rate text.
    pub hourly_rate: String,
    /// Daily goal texts, Monday first.
    pub daily_goals: [String; 7],
}

impl SettingsForm {
    /// Validate every field.
    ///
    /// Lunch times are only checked when the break is enabled.
    ///
    /// # Errors
    ///
    /// All field errors found, in form order.
    pub fn validate(&self) -> Result<SettingsUpdate, FormErrors> {
        let mut errors = Vec::new();

        let lunch = if self.auto_lunch_enabled {
            let start = parse_clock_time(self.lunch_start.trim(), None)
                .map_err(|e| errors.push(e.in_field("autoLunchStartTime")))
                .ok();
            let stop = parse_clock_time(self.lunch_stop.trim(), None)
                .map_err(|e| errors.push(e.in_field("autoLunchStopTime")))
                .ok();

            match (start, stop) {
                (Some(start), Some(stop)) if stop <= start => {
                    errors.push(EntryError::LunchOrder { start, stop }.in_field("autoLunchStopTime"));
                    None
                }
                (Some(start), Some(stop)) => Some((start, stop)),
                _ => None,
            }
        } else {
            None
        };

        let hourly_rate = parse_amount(&self.hourly_rate)
            .map_err(|e| errors.push(e.in_field("hourlyRate")))
            .unwrap_or_default();

        let mut daily_goals = [0.0; 7];
        for ((goal, text), day) in daily_goals.iter_mut().zip(&self.daily_goals).zip(DAY_NAMES) {
            *goal = parse_amount(text)
                .map_err(|e| errors.push(e.in_field(day)))
                .unwrap_or_default();
        }

        if errors.is_empty() {
            Ok(SettingsUpdate {
                auto_lunch_enabled: self.auto_lunch_enabled,
                lunch,
                hourly_rate,
                daily_goals,
            })
        } else {
            Err(FormErrors(errors))
        }
    }
}
