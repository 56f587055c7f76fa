//! Work-session lifecycle.
//!
//! State transitions:
//! SETUP → RUNNING ⇄ PAUSED → STOPPED
//!
//! A session can be stopped from any state so that closing the
//! application always has a valid path.

use crate::error::{ClockError, ClockResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Lifecycle states of a tracked work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Waiting for the start time to be entered.
    #[default]
    Setup,
    /// Elapsed time is being accumulated.
    Running,
    /// Accumulation suspended; no update is pending.
    Paused,
    /// Session closed; results have been handed off for saving.
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "SETUP"),
            Self::Running => write!(f, "RUNNING"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Stopped => write!(f, "STOPPED"),
        }
    }
}

impl SessionState {
    /// Check if a transition to `target` is valid from the current state.
    #[must_use]
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::{Paused, Running, Setup, Stopped};

        matches!(
            (self, target),
            (Setup, Running)
                | (Running, Paused)
                | (Paused, Running)
                | (Setup, Stopped)
                | (Running, Stopped)
                | (Paused, Stopped)
        )
    }

    /// Returns true while the session clock is advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true once setup has completed and before the session stops.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// State machine wrapper with transition history tracking.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: SessionState,
    previous: Option<SessionState>,
    transition_count: u64,
}

impl StateMachine {
    /// Create a new state machine starting in SETUP.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.current
    }

    /// Get the previous state (if any transition occurred).
    #[must_use]
    pub fn previous_state(&self) -> Option<SessionState> {
        self.previous
    }

    /// Get total number of transitions.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Attempt a state transition.
    pub fn transition(&mut self, target: SessionState) -> ClockResult<()> {
        if self.current.can_transition_to(target) {
            debug!(from = %self.current, to = %target, "Session state transition");
            self.previous = Some(self.current);
            self.current = target;
            self.transition_count += 1;
            Ok(())
        } else {
            Err(ClockError::InvalidStateTransition {
                from: self.current.to_string(),
                to: target.to_string(),
            })
        }
    }
}
