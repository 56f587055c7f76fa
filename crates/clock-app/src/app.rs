//! Application wiring: one event loop driving the clock face and the work
//! session, with signal requests checked between dispatches.

use crate::ascii::{status_line, AsciiSurface};
use crate::signals::SignalHandler;
use anyhow::{Context, Result};
use clock_common::config::{AppConfig, FaceConfig, StorageConfig};
use clock_common::time::TimeSource;
use clock_face::{ClockFace, OptionValue, RefreshTick, SubSecond};
use clock_runtime::scheduler::{EventLoop, Handler};
use money_timer::{History, Settings, TimerEvent, WorkSession};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Every event the application schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Clock face refresh.
    Refresh,
    /// Work session event.
    Timer(TimerEvent),
}

impl From<RefreshTick> for AppEvent {
    fn from(_: RefreshTick) -> Self {
        Self::Refresh
    }
}

impl From<TimerEvent> for AppEvent {
    fn from(event: TimerEvent) -> Self {
        Self::Timer(event)
    }
}

/// Initial face options, in the order they are applied.
pub fn face_options(face: &FaceConfig) -> Vec<(&'static str, OptionValue)> {
    vec![
        ("background", face.background.clone().into()),
        ("handcolor", face.hand_color.clone().into()),
        ("markcolor", face.mark_color.clone().into()),
        ("marks", face.marks.clone().into()),
        ("size", face.size.into()),
        ("smooth", face.smooth.into()),
        ("update_rate", face.update_rate.into()),
    ]
}

/// The money clock: a face, a session, and their persistence.
#[derive(Debug)]
pub struct App<T> {
    face: ClockFace<AsciiSurface>,
    session: WorkSession,
    history: History,
    time: T,
    signals: SignalHandler,
    storage: StorageConfig,
    display: bool,
    bar_width: f64,
    max_ticks: u64,
    ticks: u64,
}

impl<T: TimeSource> App<T> {
    /// Build the face and load settings and history.
    ///
    /// # Errors
    ///
    /// Rejected face options.
    pub fn new(config: &AppConfig, time: T, signals: SignalHandler) -> Result<Self> {
        let mode = if config.face.measured_subsecond {
            SubSecond::Measured
        } else {
            SubSecond::Accumulated
        };
        let mut face = ClockFace::new(AsciiSurface::new(config.display.columns)).with_subsecond(mode);
        face.configure(face_options(&config.face))
            .context("Invalid [face] configuration")?;

        let today = time.now().date();
        let settings = Settings::load(&config.storage.settings_file);
        let history = History::load(&config.storage.history_file, today);
        info!(%today, history = history.len(), "Loaded settings and history");

        Ok(Self {
            face,
            session: WorkSession::new(settings, config.timer.clone(), today),
            history,
            time,
            signals,
            storage: config.storage.clone(),
            display: config.display.enabled,
            bar_width: config.timer.bar_width,
            max_ticks: 0,
            ticks: 0,
        })
    }

    /// Stop after `ticks` face refreshes; 0 runs until a shutdown signal.
    #[must_use]
    pub fn max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = ticks;
        self
    }

    /// Start the session with `elapsed` seconds already worked, and the face.
    ///
    /// # Errors
    ///
    /// If the session was already started.
    pub fn start(&mut self, elapsed: f64, timers: &mut EventLoop<AppEvent>) -> Result<()> {
        if self.display {
            println!("{}", self.history.render());
        }
        self.session
            .start(elapsed, self.time.sample(), timers)
            .context("Failed to start work session")?;
        self.face.start(&self.time, timers);
        Ok(())
    }

    /// Stop the session and save settings and history. Save failures are
    /// logged, not returned.
    pub fn shutdown(&mut self, timers: &mut EventLoop<AppEvent>) {
        if let Err(e) = self.session.stop(timers) {
            warn!(error = %e, "Session stop failed");
        }
        self.face.stop(timers);

        if let Err(e) = self.session.settings().save(&self.storage.settings_file) {
            warn!(error = %e, "Failed to save settings");
        }
        if let Err(e) = self.history.save(&self.storage.history_file, &self.session.record()) {
            warn!(error = %e, "Failed to save history");
        }

        let metrics = timers.metrics().snapshot();
        info!(
            ticks = self.ticks,
            renders = self.face.surface().renders(),
            dispatched = metrics.total_ticks,
            late = metrics.late_count,
            max_late_us = metrics.max_ns.unwrap_or(0) / 1_000,
            signals = self.signals.state().signal_count(),
            elapsed = %self.session.elapsed_display(),
            earnings = %self.session.earnings_display(),
            "Money clock shut down"
        );
    }

    /// The work session.
    pub fn session(&self) -> &WorkSession {
        &self.session
    }

    /// Face refreshes so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn reload_settings(&mut self, timers: &mut EventLoop<AppEvent>) {
        let settings = Settings::load(&self.storage.settings_file);
        self.session.replace_settings(settings, self.time.sample(), timers);
        info!("Settings reloaded");
    }

    fn draw(&self) {
        if !self.display {
            return;
        }
        // Home the cursor and clear, then redraw.
        print!("\x1b[H\x1b[2J");
        println!("{}", self.face.surface().frame());
        println!("{}", status_line(&self.session, self.bar_width));
    }
}

impl<T: TimeSource> Handler<AppEvent> for App<T> {
    fn handle(&mut self, event: AppEvent, timers: &mut EventLoop<AppEvent>) {
        match event {
            AppEvent::Refresh => {
                self.face.refresh(&self.time, timers);
                self.ticks += 1;
                self.draw();
            }
            AppEvent::Timer(event) => self.session.handle(event, timers),
        }
    }

    fn poll(&mut self, timers: &mut EventLoop<AppEvent>) -> ControlFlow<()> {
        self.signals.poll();

        if self.signals.shutdown_requested() {
            info!("Shutdown requested");
            return ControlFlow::Break(());
        }
        if self.max_ticks > 0 && self.ticks >= self.max_ticks {
            info!(ticks = self.ticks, "Maximum tick count reached");
            return ControlFlow::Break(());
        }
        if self.signals.take_reload_request() {
            self.reload_settings(timers);
        }
        if self.signals.take_pause_toggle() {
            match self.session.toggle_pause(timers) {
                Ok(()) => debug!(state = %self.session.state(), "Pause toggled"),
                Err(e) => warn!(error = %e, "Pause toggle ignored"),
            }
        }
        ControlFlow::Continue(())
    }
}
