//! Common utilities for integration tests.
//!
//! Provides a desk: a clock face and a work session sharing one event
//! loop, with the face's time source kept in step with loop time.

#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use clock_common::config::TimerConfig;
use clock_common::time::{ManualTimeSource, TimeSample, TimeSource};
use clock_face::{ClockFace, FaceScene, HandLines, RefreshTick, Surface};
use clock_runtime::scheduler::{EventLoop, Handler};
use money_timer::{Settings, TimerEvent, WorkSession};

/// Monday 4 March 2024.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

/// `hh:mm:ss` on [`monday`].
pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    monday().and_hms_opt(hour, minute, second).unwrap()
}

/// Surface that counts what it was asked to draw.
#[derive(Debug, Default)]
pub struct CountingSurface {
    pub resizes: u32,
    pub renders: u32,
    pub moves: u32,
    pub last_hands: Option<HandLines>,
}

impl Surface for CountingSurface {
    fn resize(&mut self, _canvas: f64) {
        self.resizes += 1;
    }

    fn render(&mut self, scene: &FaceScene) {
        self.renders += 1;
        self.last_hands = Some(scene.hands);
    }

    fn move_hands(&mut self, hands: &HandLines) {
        self.moves += 1;
        self.last_hands = Some(*hands);
    }
}

/// Every event on the desk's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskEvent {
    Refresh,
    Timer(TimerEvent),
}

impl From<RefreshTick> for DeskEvent {
    fn from(_: RefreshTick) -> Self {
        Self::Refresh
    }
}

impl From<TimerEvent> for DeskEvent {
    fn from(event: TimerEvent) -> Self {
        Self::Timer(event)
    }
}

/// A face and a session on one loop.
pub struct Desk {
    pub face: ClockFace<CountingSurface>,
    pub session: WorkSession,
    pub time: ManualTimeSource,
    pub started_at: NaiveDateTime,
    pub refreshes: u32,
}

impl Desk {
    /// Desk whose wall clock reads `start` at loop time zero.
    pub fn new(start: NaiveDateTime, settings: Settings) -> Self {
        Self {
            face: ClockFace::new(CountingSurface::default()),
            session: WorkSession::new(settings, TimerConfig::default(), start.date()),
            time: ManualTimeSource::new(start),
            started_at: start,
            refreshes: 0,
        }
    }

    /// Start the session with `elapsed` seconds already worked, then the face.
    pub fn start(&mut self, elapsed: f64, timers: &mut EventLoop<DeskEvent>) {
        self.session
            .start(elapsed, self.time.sample(), timers)
            .unwrap();
        self.face.start(&self.time, timers);
    }

    /// Current wall-clock time of day.
    pub fn now(&self) -> TimeSample {
        self.time.sample()
    }

    fn sync_time(&self, timers: &EventLoop<DeskEvent>) {
        let offset = ChronoDuration::from_std(timers.now()).unwrap();
        self.time.set(self.started_at + offset);
    }
}

impl Handler<DeskEvent> for Desk {
    fn handle(&mut self, event: DeskEvent, timers: &mut EventLoop<DeskEvent>) {
        self.sync_time(timers);
        match event {
            DeskEvent::Refresh => {
                self.face.refresh(&self.time, timers);
                self.refreshes += 1;
            }
            DeskEvent::Timer(event) => self.session.handle(event, timers),
        }
    }
}

/// Assert two floats agree to within 1e-9.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
