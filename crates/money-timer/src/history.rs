//! Daily history of worked time and earnings.
//!
//! The history file is a JSON array, newest day first. Today's record is
//! dropped on load because it is rewritten from the running session on
//! exit. A record with a missing field or wrong type makes the whole file
//! untrustworthy, so it is discarded. Integers are accepted where a
//! float is stored.

use crate::error::PersistError;
use crate::session::format_elapsed;
use crate::settings::day_name;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Text shown when there is nothing to list.
pub const EMPTY_HISTORY: &str = "No history recorded.";

/// One day of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Year.
    pub year: i32,
    /// Month, 1..=12.
    pub mon: u32,
    /// Day of month.
    pub day: u32,
    /// Weekday name.
    pub wday: String,
    /// Seconds worked.
    #[serde(rename = "secSoFar")]
    pub sec_so_far: f64,
    /// Earnings, truncated to cents.
    pub earnings: f64,
    /// Goal percentage, truncated to two decimals.
    pub percent: f64,
}

impl HistoryRecord {
    /// Record for `date` from the session totals.
    #[must_use]
    pub fn for_day(date: NaiveDate, sec_so_far: f64, earnings: f64, goal_fraction: f64) -> Self {
        Self {
            year: date.year(),
            mon: date.month(),
            day: date.day(),
            wday: day_name(date.weekday()).to_string(),
            sec_so_far,
            earnings: (earnings * 100.0).floor() / 100.0,
            percent: (goal_fraction * 10_000.0).floor() / 100.0,
        }
    }

    /// Whether this record belongs to `date`.
    #[must_use]
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.year == date.year() && self.mon == date.month() && self.day == date.day()
    }

    /// One display line: date, weekday, time, earnings, percent.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{}-{:02}-{:02} {:<5}\t{}\t${:<7}\t{:.1}%",
            self.year,
            self.mon,
            self.day,
            self.wday,
            format_elapsed(self.sec_so_far),
            format!("{:.2}", self.earnings),
            self.percent
        )
    }
}

/// Loaded history, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    /// Read history from `path`, dropping `today`. Any problem yields an
    /// empty history.
    #[must_use]
    pub fn load(path: &Path, today: NaiveDate) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content, today),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No history loaded");
                Self::default()
            }
        }
    }

    /// Parse a history document, dropping `today`.
    #[must_use]
    pub fn from_json(content: &str, today: NaiveDate) -> Self {
        let entries = match serde_json::from_str::<Vec<Value>>(content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "History document is not an array, discarding");
                return Self::default();
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            if is_dated(&entry, today) {
                continue;
            }
            match serde_json::from_value::<HistoryRecord>(entry) {
                Ok(mut record) => {
                    record.percent = (record.percent * 100.0).floor() / 100.0;
                    records.push(record);
                }
                Err(e) => {
                    warn!(error = %e, "Malformed history record, discarding history");
                    return Self::default();
                }
            }
        }

        debug!(records = records.len(), "History loaded");
        Self { records }
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display lines, one per record.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(HistoryRecord::line).collect()
    }

    /// Full listing, or [`EMPTY_HISTORY`].
    #[must_use]
    pub fn render(&self) -> String {
        if self.records.is_empty() {
            EMPTY_HISTORY.to_string()
        } else {
            self.lines().join("\n")
        }
    }

    /// Encode with `today` in front.
    ///
    /// # Errors
    ///
    /// JSON encoding errors.
    pub fn to_json_with(&self, today: &HistoryRecord) -> Result<String, PersistError> {
        let all: Vec<&HistoryRecord> = std::iter::once(today).chain(&self.records).collect();
        Ok(serde_json::to_string(&all)?)
    }

    /// Write history to `path` with `today` in front.
    ///
    /// # Errors
    ///
    /// Encoding or I/O errors.
    pub fn save(&self, path: &Path, today: &HistoryRecord) -> Result<(), PersistError> {
        let content = self.to_json_with(today)?;
        std::fs::write(path, content).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), records = self.records.len() + 1, "History saved");
        Ok(())
    }
}

fn is_dated(entry: &Value, date: NaiveDate) -> bool {
    let field = |key: &str| entry.get(key).and_then(Value::as_i64);
    field("year") == Some(i64::from(date.year()))
        && field("mon") == Some(i64::from(date.month()))
        && field("day") == Some(i64::from(date.day()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const DOC: &str = r#"[
        {"year": 2024, "mon": 3, "day": 5, "wday": "Tues", "secSoFar": 100.0, "earnings": 1.0, "percent": 5.0},
        {"year": 2024, "mon": 3, "day": 4, "wday": "Mon", "secSoFar": 28800.5, "earnings": 152.64, "percent": 100.017},
        {"year": 2024, "mon": 3, "day": 1, "wday": "Fri", "secSoFar": 3723.0, "earnings": 15.5, "percent": 12.999}
    ]"#;

    #[test]
    fn test_load_drops_today_and_truncates_percent() {
        let history = History::from_json(DOC, date(2024, 3, 5));
        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].wday, "Mon");
        assert_eq!(history.records()[0].percent, 100.01);
        assert_eq!(history.records()[1].percent, 12.99);
    }

    #[test]
    fn test_malformed_record_discards_everything() {
        let doc = r#"[
            {"year": 2024, "mon": 3, "day": 4, "wday": "Mon", "secSoFar": 1.0, "earnings": 1.0, "percent": 1.0},
            {"year": 2024, "mon": 3, "day": 1, "wday": 5, "secSoFar": 1.0, "earnings": 1.0, "percent": 1.0}
        ]"#;
        assert!(History::from_json(doc, date(2024, 3, 5)).is_empty());

        let missing = r#"[{"year": 2024, "mon": 3, "day": 4, "wday": "Mon"}]"#;
        assert!(History::from_json(missing, date(2024, 3, 5)).is_empty());
    }

    #[test]
    fn test_malformed_today_is_still_dropped() {
        let doc = r#"[{"year": 2024, "mon": 3, "day": 5, "oops": true}]"#;
        let history = History::from_json(doc, date(2024, 3, 5));
        assert!(history.is_empty());
    }

    #[test]
    fn test_garbage_document_is_empty() {
        assert!(History::from_json("{}", date(2024, 1, 1)).is_empty());
        assert!(History::from_json("", date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_record_for_day_truncates() {
        let record = HistoryRecord::for_day(date(2024, 3, 7), 3600.0, 15.2659, 0.123_456);
        assert_eq!(record.wday, "Thurs");
        assert_eq!(record.earnings, 15.26);
        assert_eq!(record.percent, 12.34);
    }

    #[test]
    fn test_line_format() {
        let record = HistoryRecord {
            year: 2024,
            mon: 3,
            day: 4,
            wday: "Mon".into(),
            sec_so_far: 3723.0,
            earnings: 15.5,
            percent: 12.5,
        };
        assert_eq!(record.line(), "2024-03-04 Mon  \t1:02:03\t$15.50  \t12.5%");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(History::default().render(), EMPTY_HISTORY);
    }

    #[test]
    fn test_save_prepends_today() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let today = date(2024, 3, 5);

        let history = History::from_json(DOC, today);
        let record = HistoryRecord::for_day(today, 7200.0, 30.53, 0.25);
        history.save(&path, &record).unwrap();

        let reloaded = History::load(&path, date(2024, 3, 6));
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.records()[0], record);

        // Reloading on the same day drops the record just written.
        assert_eq!(History::load(&path, today).len(), 2);
    }
}
