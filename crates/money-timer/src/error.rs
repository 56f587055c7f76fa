//! Error types for time entry and persistence.

use crate::entry::ClockTime;
use std::path::PathBuf;
use thiserror::Error;

/// A rejected time or number typed by the user.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntryError {
    /// Text is not `hh:mm` or `h:mm`.
    #[error("'{0}' is not a time (expected hh:mm or h:mm)")]
    Format(String),

    /// Hour outside the accepted range.
    #[error("hour {0} is out of range")]
    Hour(u32),

    /// Minute outside 0..=59.
    #[error("minute {0} is out of range")]
    Minute(u32),

    /// Start time lies after the current time of day.
    #[error("start time {0} is later than now")]
    StartInFuture(ClockTime),

    /// Lunch break does not end after it starts.
    #[error("lunch break must end after it starts ({start} to {stop})")]
    LunchOrder {
        /// Entered start.
        start: ClockTime,
        /// Entered stop.
        stop: ClockTime,
    },

    /// Text is not a decimal number.
    #[error("'{value}' is not a number")]
    Number {
        /// Offending text.
        value: String,
    },

    /// An error tied to one form field.
    #[error("{field}: {source}")]
    Field {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        #[source]
        source: Box<EntryError>,
    },
}

impl EntryError {
    /// Attach a field name.
    #[must_use]
    pub fn in_field(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Field this error belongs to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Field { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Every error found in one settings form submission.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid settings: {}", join(.0))]
pub struct FormErrors(pub Vec<EntryError>);

fn join(errors: &[EntryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to write settings or history.
#[derive(Debug, Error)]
pub enum PersistError {
    /// File I/O error.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding error.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
