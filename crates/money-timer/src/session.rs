//! The running work session.
//!
//! A session counts worked seconds in fixed steps. Each [`TimerEvent::Update`]
//! adds the nominal update interval and schedules the next one, so the
//! total drifts by however late the loop runs; the same approximation the
//! clock face uses for sub-second movement.
//!
//! Pausing cancels the pending update. Resuming counts one step right
//! away and restarts the cadence.

use crate::entry::SettingsUpdate;
use crate::history::HistoryRecord;
use crate::lunch::lunch_delays;
use crate::settings::Settings;
use chrono::{Datelike, NaiveDate};
use clock_common::config::TimerConfig;
use clock_common::error::{ClockError, ClockResult};
use clock_common::state::{SessionState, StateMachine};
use clock_common::time::TimeSample;
use clock_runtime::scheduler::{EventLoop, TimerId};
use tracing::{debug, info, trace, warn};

/// Events a session schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Count one update interval.
    Update,
    /// Automatic lunch break begins.
    LunchStart,
    /// Automatic lunch break ends.
    LunchEnd,
}

/// Format seconds as `H:MM:SS`. Hours are not padded.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

/// Progress bar geometry for the day's goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Filled width in pixels.
    pub fill: f64,
    /// Percentage label, e.g. `42%`.
    pub label: String,
}

/// A day of tracked work.
#[derive(Debug)]
pub struct WorkSession {
    state: StateMachine,
    settings: Settings,
    config: TimerConfig,
    date: NaiveDate,
    goal_hours: f64,
    seconds: f64,
    pending_update: Option<TimerId>,
    lunch_start: Option<TimerId>,
    lunch_end: Option<TimerId>,
}

impl WorkSession {
    /// Create a session for `date` in the setup state.
    #[must_use]
    pub fn new(settings: Settings, config: TimerConfig, date: NaiveDate) -> Self {
        let goal_hours = settings.goal_for(date.weekday());
        Self {
            state: StateMachine::new(),
            settings,
            config,
            date,
            goal_hours,
            seconds: 0.0,
            pending_update: None,
            lunch_start: None,
            lunch_end: None,
        }
    }

    /// Finish setup with `elapsed` seconds already worked and start
    /// counting. Lunch events are scheduled relative to `now`.
    ///
    /// # Errors
    ///
    /// If the session was already started.
    pub fn start<E: From<TimerEvent>>(
        &mut self,
        elapsed: f64,
        now: TimeSample,
        timers: &mut EventLoop<E>,
    ) -> ClockResult<()> {
        self.state.transition(SessionState::Running)?;
        self.seconds = elapsed.max(0.0);
        info!(
            date = %self.date,
            elapsed = %format_elapsed(self.seconds),
            goal_hours = self.goal_hours,
            "Work session started"
        );
        self.schedule_lunch(now, timers);
        self.update(timers);
        Ok(())
    }

    /// Handle one of the session's own events.
    pub fn handle<E: From<TimerEvent>>(&mut self, event: TimerEvent, timers: &mut EventLoop<E>) {
        match event {
            TimerEvent::Update => {
                self.pending_update = None;
                if self.state.state().is_running() {
                    self.update(timers);
                }
            }
            TimerEvent::LunchStart => {
                self.lunch_start = None;
                if self.state.state().is_running() {
                    info!("Lunch break, pausing");
                    if let Err(e) = self.pause(timers) {
                        warn!(error = %e, "Automatic pause failed");
                    }
                }
            }
            TimerEvent::LunchEnd => {
                self.lunch_end = None;
                if self.state.state() == SessionState::Paused {
                    info!("Lunch over, resuming");
                    if let Err(e) = self.resume(timers) {
                        warn!(error = %e, "Automatic resume failed");
                    }
                }
            }
        }
    }

    /// Count one interval and schedule the next update.
    pub fn update<E: From<TimerEvent>>(&mut self, timers: &mut EventLoop<E>) {
        self.seconds += self.config.update_interval.as_secs_f64();
        trace!(seconds = self.seconds, earnings = self.earnings(), "Session update");
        let id = timers.schedule_after(self.config.update_interval, E::from(TimerEvent::Update));
        self.pending_update = Some(id);
    }

    /// Stop counting.
    ///
    /// # Errors
    ///
    /// If the session is not running.
    pub fn pause<E>(&mut self, timers: &mut EventLoop<E>) -> ClockResult<()> {
        self.state.transition(SessionState::Paused)?;
        if let Some(id) = self.pending_update.take() {
            timers.cancel(id);
        }
        info!(elapsed = %format_elapsed(self.seconds), "Work session paused");
        Ok(())
    }

    /// Resume counting, with one update right away.
    ///
    /// # Errors
    ///
    /// If the session is not paused.
    pub fn resume<E: From<TimerEvent>>(&mut self, timers: &mut EventLoop<E>) -> ClockResult<()> {
        if self.state.state() != SessionState::Paused {
            return Err(ClockError::InvalidStateTransition {
                from: self.state.state().to_string(),
                to: SessionState::Running.to_string(),
            });
        }
        self.state.transition(SessionState::Running)?;
        info!("Work session resumed");
        self.update(timers);
        Ok(())
    }

    /// Pause if running, resume if paused.
    ///
    /// # Errors
    ///
    /// If the session is neither running nor paused.
    pub fn toggle_pause<E: From<TimerEvent>>(&mut self, timers: &mut EventLoop<E>) -> ClockResult<()> {
        if self.state.state().is_running() {
            self.pause(timers)
        } else {
            self.resume(timers)
        }
    }

    /// Apply new settings: refresh today's goal and re-create the lunch
    /// events.
    pub fn reconfigure<E: From<TimerEvent>>(
        &mut self,
        update: &SettingsUpdate,
        now: TimeSample,
        timers: &mut EventLoop<E>,
    ) {
        self.settings.apply(update);
        self.replace_settings(self.settings.clone(), now, timers);
    }

    /// Swap in a full settings value, e.g. after reloading the file.
    pub fn replace_settings<E: From<TimerEvent>>(
        &mut self,
        settings: Settings,
        now: TimeSample,
        timers: &mut EventLoop<E>,
    ) {
        self.settings = settings;
        self.goal_hours = self.settings.goal_for(self.date.weekday());
        debug!(
            hourly_rate = self.settings.hourly_rate,
            goal_hours = self.goal_hours,
            auto_lunch = self.settings.auto_lunch_enabled,
            "Session settings updated"
        );

        self.cancel_lunch(timers);
        if self.state.state().is_active() {
            self.schedule_lunch(now, timers);
        }
    }

    /// End the session and cancel everything it scheduled.
    ///
    /// # Errors
    ///
    /// If the session already stopped.
    pub fn stop<E>(&mut self, timers: &mut EventLoop<E>) -> ClockResult<()> {
        self.state.transition(SessionState::Stopped)?;
        if let Some(id) = self.pending_update.take() {
            timers.cancel(id);
        }
        self.cancel_lunch(timers);
        info!(
            elapsed = %format_elapsed(self.seconds),
            earnings = %self.earnings_display(),
            "Work session stopped"
        );
        Ok(())
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.state()
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Day this session belongs to.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Today's goal in hours.
    #[must_use]
    pub fn goal_hours(&self) -> f64 {
        self.goal_hours
    }

    /// Seconds worked.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Whether an update is scheduled.
    #[must_use]
    pub fn has_pending_update(&self) -> bool {
        self.pending_update.is_some()
    }

    /// Scheduled lunch events: (start, end).
    #[must_use]
    pub fn lunch_events(&self) -> (Option<TimerId>, Option<TimerId>) {
        (self.lunch_start, self.lunch_end)
    }

    /// Net earnings so far.
    #[must_use]
    pub fn earnings(&self) -> f64 {
        self.seconds / 3600.0 * self.settings.hourly_rate * self.config.earnings_fraction
    }

    /// Share of today's goal reached; 1.0 when there is no goal.
    #[must_use]
    pub fn goal_fraction(&self) -> f64 {
        if self.goal_hours == 0.0 {
            1.0
        } else {
            self.seconds / (self.goal_hours * 3600.0)
        }
    }

    /// Progress bar for today's goal.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let fraction = self.goal_fraction();
        Progress {
            fill: fraction.min(1.0) * self.config.bar_width,
            label: format!("{:.0}%", fraction * 100.0),
        }
    }

    /// Worked time as `H:MM:SS`.
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.seconds)
    }

    /// Earnings as `$E.EE`.
    #[must_use]
    pub fn earnings_display(&self) -> String {
        format!("${:.2}", self.earnings())
    }

    /// History record for today.
    #[must_use]
    pub fn record(&self) -> HistoryRecord {
        HistoryRecord::for_day(self.date, self.seconds, self.earnings(), self.goal_fraction())
    }

    fn schedule_lunch<E: From<TimerEvent>>(&mut self, now: TimeSample, timers: &mut EventLoop<E>) {
        if !self.settings.auto_lunch_enabled {
            return;
        }
        let delays = lunch_delays(self.settings.auto_lunch_start, self.settings.auto_lunch_stop, now);
        self.lunch_start = delays
            .pause
            .map(|delay| timers.schedule_after(delay, E::from(TimerEvent::LunchStart)));
        self.lunch_end = delays
            .resume
            .map(|delay| timers.schedule_after(delay, E::from(TimerEvent::LunchEnd)));
        debug!(
            pause_in = ?delays.pause,
            resume_in = ?delays.resume,
            "Lunch break scheduled"
        );
    }

    fn cancel_lunch<E>(&mut self, timers: &mut EventLoop<E>) {
        for id in [self.lunch_start.take(), self.lunch_end.take()].into_iter().flatten() {
            timers.cancel(id);
        }
    }
}
