use thiserror::Error;

/// Clock error types covering option validation, unfinished features, and lifecycle misuse.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    /// Option name is not recognized by the component.
    #[error("option '{0}' not recognized")]
    UnknownOption(String),

    /// Option value has the wrong kind (e.g. text where a number is required).
    #[error("option '{option}' must be of type {expected}")]
    WrongType {
        /// Option that rejected the value.
        option: String,
        /// Kind of value the option accepts.
        expected: &'static str,
    },

    /// Option value has the right kind but falls outside the accepted domain.
    #[error("option '{option}' received invalid value '{value}'")]
    InvalidValue {
        /// Option that rejected the value.
        option: String,
        /// Offending value, rendered for diagnostics.
        value: String,
    },

    /// Option is recognized but the feature behind it was never built.
    #[error("option '{0}' is not implemented")]
    NotImplemented(String),

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Source state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

impl ClockError {
    /// Build a [`ClockError::WrongType`].
    pub fn wrong_type(option: &str, expected: &'static str) -> Self {
        Self::WrongType {
            option: option.to_string(),
            expected,
        }
    }

    /// Build a [`ClockError::InvalidValue`].
    pub fn invalid_value(option: &str, value: impl ToString) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    /// Name of the option this error refers to, if any.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::UnknownOption(option) | Self::NotImplemented(option) => Some(option),
            Self::WrongType { option, .. } | Self::InvalidValue { option, .. } => Some(option),
            Self::InvalidStateTransition { .. } => None,
        }
    }
}

/// Convenience type alias for clock operations.
pub type ClockResult<T> = Result<T, ClockError>;
