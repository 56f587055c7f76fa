//! Persistent user settings.
//!
//! The settings file is a flat JSON object. Loading never fails: missing
//! keys and keys of the wrong kind take their defaults, and an unreadable
//! file yields the full defaults. Keys this program does not know about
//! are carried through to the next save.
//!
//! Numeric keys accept any JSON number, integer or float.

use crate::entry::{ClockTime, SettingsUpdate};
use crate::error::PersistError;
use chrono::Weekday;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Day names as stored in settings and history, Monday first.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tues", "Wed", "Thurs", "Fri", "Sat", "Sun"];

const AUTO_LUNCH_ENABLED: &str = "autoLunchEnabled";
const AUTO_LUNCH_START: &str = "autoLunchStartTime";
const AUTO_LUNCH_STOP: &str = "autoLunchStopTime";
const HOURLY_RATE: &str = "hourlyRate";

/// Storage name of a weekday.
#[must_use]
pub fn day_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_monday() as usize]
}

/// User settings for the work timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Pause automatically over lunch.
    pub auto_lunch_enabled: bool,
    /// Lunch break start.
    pub auto_lunch_start: ClockTime,
    /// Lunch break end.
    pub auto_lunch_stop: ClockTime,
    /// Gross hourly rate.
    pub hourly_rate: f64,
    /// Goal hours per weekday, Monday first.
    pub daily_goals: [f64; 7],
    extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_lunch_enabled: false,
            auto_lunch_start: ClockTime::new(12, 0),
            auto_lunch_stop: ClockTime::new(13, 0),
            hourly_rate: 21.5,
            daily_goals: [8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0],
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "Loading settings");
                Self::from_json(&content)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Settings unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a settings document, filling gaps from defaults.
    #[must_use]
    pub fn from_json(content: &str) -> Self {
        let mut doc = match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Settings document is not an object, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(error = %e, "Settings document is not valid JSON, using defaults");
                return Self::default();
            }
        };

        let defaults = Self::default();
        let mut daily_goals = defaults.daily_goals;
        for (goal, day) in daily_goals.iter_mut().zip(DAY_NAMES) {
            *goal = take(&mut doc, day, *goal);
        }

        Self {
            auto_lunch_enabled: take(&mut doc, AUTO_LUNCH_ENABLED, defaults.auto_lunch_enabled),
            auto_lunch_start: take_time(&mut doc, AUTO_LUNCH_START, defaults.auto_lunch_start),
            auto_lunch_stop: take_time(&mut doc, AUTO_LUNCH_STOP, defaults.auto_lunch_stop),
            hourly_rate: take(&mut doc, HOURLY_RATE, defaults.hourly_rate),
            daily_goals,
            extra: doc,
        }
    }

    /// Encode as a JSON object, unknown keys included.
    ///
    /// # Errors
    ///
    /// JSON encoding errors.
    pub fn to_json(&self) -> Result<String, PersistError> {
        let mut doc = self.extra.clone();
        doc.insert(AUTO_LUNCH_ENABLED.into(), self.auto_lunch_enabled.into());
        doc.insert(AUTO_LUNCH_START.into(), serde_json::to_value(self.auto_lunch_start)?);
        doc.insert(AUTO_LUNCH_STOP.into(), serde_json::to_value(self.auto_lunch_stop)?);
        doc.insert(HOURLY_RATE.into(), serde_json::to_value(self.hourly_rate)?);
        for (goal, day) in self.daily_goals.iter().zip(DAY_NAMES) {
            doc.insert(day.into(), serde_json::to_value(goal)?);
        }
        Ok(serde_json::to_string(&doc)?)
    }

    /// Write settings to `path`.
    ///
    /// # Errors
    ///
    /// Encoding or I/O errors.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Goal hours for `day`.
    #[must_use]
    pub fn goal_for(&self, day: Weekday) -> f64 {
        self.daily_goals[day.num_days_from_monday() as usize]
    }

    /// Merge a validated settings form. Lunch times are only replaced when
    /// the form carried them.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        self.auto_lunch_enabled = update.auto_lunch_enabled;
        if let Some((start, stop)) = update.lunch {
            self.auto_lunch_start = start;
            self.auto_lunch_stop = stop;
        }
        self.hourly_rate = update.hourly_rate;
        self.daily_goals = update.daily_goals;
    }

    /// Keys preserved from the loaded document that this program does not use.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn take<T: DeserializeOwned>(doc: &mut Map<String, Value>, key: &str, default: T) -> T {
    match doc.remove(key) {
        None => default,
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(key, error = %e, "Setting has the wrong type, using default");
            default
        }),
    }
}

fn take_time(doc: &mut Map<String, Value>, key: &str, default: ClockTime) -> ClockTime {
    let time = take(doc, key, default);
    if time.is_time_of_day() {
        time
    } else {
        warn!(key, %time, "Setting is not a time of day, using default");
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.auto_lunch_enabled);
        assert_eq!(settings.hourly_rate, 21.5);
        assert_eq!(settings.goal_for(Weekday::Fri), 8.0);
        assert_eq!(settings.goal_for(Weekday::Sun), 0.0);
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(Weekday::Mon), "Mon");
        assert_eq!(day_name(Weekday::Tue), "Tues");
        assert_eq!(day_name(Weekday::Thu), "Thurs");
        assert_eq!(day_name(Weekday::Sun), "Sun");
    }

    #[test]
    fn test_missing_keys_filled() {
        let settings = Settings::from_json(r#"{"hourlyRate": 40, "Sat": 2.5}"#);
        assert_eq!(settings.hourly_rate, 40.0);
        assert_eq!(settings.goal_for(Weekday::Sat), 2.5);
        assert_eq!(settings.goal_for(Weekday::Mon), 8.0);
        assert_eq!(settings.auto_lunch_start, ClockTime::new(12, 0));
    }

    #[test]
    fn test_wrong_types_reset() {
        let settings = Settings::from_json(
            r#"{"autoLunchEnabled": 1, "autoLunchStartTime": [11], "autoLunchStopTime": [14, 30],
                "hourlyRate": "lots", "Mon": true}"#,
        );
        assert!(!settings.auto_lunch_enabled);
        assert_eq!(settings.auto_lunch_start, ClockTime::new(12, 0));
        assert_eq!(settings.auto_lunch_stop, ClockTime::new(14, 30));
        assert_eq!(settings.hourly_rate, 21.5);
        assert_eq!(settings.goal_for(Weekday::Mon), 8.0);
    }

    #[test]
    fn test_out_of_range_lunch_times_reset() {
        let settings = Settings::from_json(
            r#"{"autoLunchEnabled": true, "autoLunchStartTime": [2000000, 0],
                "autoLunchStopTime": [13, 75]}"#,
        );
        assert!(settings.auto_lunch_enabled);
        assert_eq!(settings.auto_lunch_start, ClockTime::new(12, 0));
        assert_eq!(settings.auto_lunch_stop, ClockTime::new(13, 0));

        let edge = Settings::from_json(r#"{"autoLunchStopTime": [24, 59]}"#);
        assert_eq!(edge.auto_lunch_stop, ClockTime::new(24, 59));
    }

    #[test]
    fn test_non_object_or_garbage_is_default() {
        assert_eq!(Settings::from_json("[1, 2]"), Settings::default());
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let settings = Settings::from_json(r#"{"theme": "dark", "hourlyRate": 25.0}"#);
        assert_eq!(settings.extra().get("theme"), Some(&Value::from("dark")));

        let saved: Value = serde_json::from_str(&settings.to_json().unwrap()).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["hourlyRate"], 25.0);
        assert_eq!(saved["autoLunchStartTime"], serde_json::json!([12, 0]));
        assert_eq!(saved["Thurs"], 8.0);
    }

    #[test]
    fn test_apply_update() {
        let mut settings = Settings::default();
        settings.apply(&SettingsUpdate {
            auto_lunch_enabled: true,
            lunch: Some((ClockTime::new(11, 30), ClockTime::new(12, 15))),
            hourly_rate: 50.0,
            daily_goals: [4.0; 7],
        });
        assert!(settings.auto_lunch_enabled);
        assert_eq!(settings.auto_lunch_stop, ClockTime::new(12, 15));
        assert_eq!(settings.goal_for(Weekday::Sun), 4.0);

        // Disabling keeps the stored lunch times.
        settings.apply(&SettingsUpdate {
            auto_lunch_enabled: false,
            lunch: None,
            hourly_rate: 50.0,
            daily_goals: [4.0; 7],
        });
        assert_eq!(settings.auto_lunch_start, ClockTime::new(11, 30));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.hourly_rate = 33.25;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            Settings::load(&dir.path().join("absent.json")),
            Settings::default()
        );
    }
}
