//! Face and session sharing one event loop.

use super::common::{assert_close, at, Desk, DeskEvent};
use clock_common::state::SessionState;
use clock_face::geometry::STEP_60;
use clock_runtime::scheduler::EventLoop;
use money_timer::entry::{start_offset, ClockTime, SettingsForm};
use money_timer::Settings;
use std::f64::consts::PI;
use std::time::Duration;

#[test]
fn test_six_oclock_hands() {
    let mut timers: EventLoop<DeskEvent> = EventLoop::new();
    let mut desk = Desk::new(at(6, 0, 0), Settings::default());
    desk.start(0.0, &mut timers);

    let angles = desk.face.angles();
    assert_close(angles.hour, PI);
    assert_close(angles.minute, 0.0);
    assert_close(angles.second, 0.0);

    // Hour hand points straight down from the center.
    let hands = desk.face.surface().last_hands.unwrap();
    assert_close(hands.hour.line.start.x, hands.hour.line.end.x);
    assert!(hands.hour.line.end.y > hands.hour.line.start.y);
}

#[test]
fn test_face_and_session_advance_together() {
    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(9, 0, 0), Settings::default());
    let elapsed = start_offset("8:00", desk.now()).unwrap();
    assert_close(elapsed, 3600.0);

    desk.start(elapsed, &mut timers);
    timers.run_for(Duration::from_secs(10), &mut desk);

    // One refresh per second; one half-second update per step plus the
    // immediate one at start.
    assert_eq!(desk.refreshes, 10);
    assert_close(desk.session.seconds(), 3610.5);
    assert_eq!(desk.session.elapsed_display(), "1:00:10");
    assert_close(desk.face.angles().second, 10.0 * STEP_60);

    let surface = desk.face.surface();
    assert_eq!(surface.renders, 1);
    assert_eq!(surface.moves, 11);
    assert_eq!(timers.metrics().snapshot().late_count, 0);
}

#[test]
fn test_pause_stops_count_but_not_face() {
    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(14, 0, 0), Settings::default());
    desk.start(0.0, &mut timers);
    timers.run_for(Duration::from_secs(5), &mut desk);
    assert_close(desk.session.seconds(), 5.5);

    desk.session.pause(&mut timers).unwrap();
    assert!(!desk.session.has_pending_update());
    timers.run_for(Duration::from_secs(60), &mut desk);

    assert_eq!(desk.session.state(), SessionState::Paused);
    assert_close(desk.session.seconds(), 5.5);
    assert_eq!(desk.refreshes, 65);

    desk.session.resume(&mut timers).unwrap();
    assert_close(desk.session.seconds(), 6.0);
    timers.run_for(Duration::from_secs(2), &mut desk);
    assert_close(desk.session.seconds(), 8.0);
}

#[test]
fn test_lunch_break_pauses_and_resumes() {
    let mut settings = Settings::default();
    settings.auto_lunch_enabled = true;
    settings.auto_lunch_start = ClockTime::new(12, 0);
    settings.auto_lunch_stop = ClockTime::new(12, 1);

    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(11, 59, 0), settings);
    desk.start(0.0, &mut timers);
    let (start, end) = desk.session.lunch_events();
    assert!(start.is_some() && end.is_some());

    timers.run_for(Duration::from_secs(61), &mut desk);
    assert_eq!(desk.session.state(), SessionState::Paused);
    assert_close(desk.session.seconds(), 60.0);
    assert_eq!(desk.now().minute, 0);

    timers.run_for(Duration::from_secs(59), &mut desk);
    assert_eq!(desk.session.state(), SessionState::Running);
    assert_close(desk.session.seconds(), 60.5);
    assert_eq!(desk.session.lunch_events(), (None, None));

    timers.run_for(Duration::from_secs(10), &mut desk);
    assert_close(desk.session.seconds(), 70.5);
}

#[test]
fn test_lunch_already_over_is_not_scheduled() {
    let mut settings = Settings::default();
    settings.auto_lunch_enabled = true;

    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(15, 0, 0), settings);
    desk.start(0.0, &mut timers);

    assert_eq!(desk.session.lunch_events(), (None, None));
    timers.run_for(Duration::from_secs(3600), &mut desk);
    assert_eq!(desk.session.state(), SessionState::Running);
}

#[test]
fn test_settings_form_applies_mid_session() {
    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(10, 30, 0), Settings::default());
    desk.start(5399.5, &mut timers);
    assert_eq!(desk.session.earnings_display(), "$22.90");

    let mut form = SettingsForm {
        auto_lunch_enabled: false,
        lunch_start: String::new(),
        lunch_stop: String::new(),
        hourly_rate: "30".into(),
        daily_goals: Default::default(),
    };
    form.daily_goals[0] = "6".into();
    let update = form.validate().unwrap();

    let now = desk.now();
    desk.session.reconfigure(&update, now, &mut timers);

    assert_eq!(desk.session.goal_hours(), 6.0);
    assert_eq!(desk.session.earnings_display(), "$31.95");
    assert_eq!(desk.session.progress().label, "25%");
    // Counting carries on at the same cadence.
    assert!(desk.session.has_pending_update());
}

#[test]
fn test_invalid_form_reports_every_field() {
    let form = SettingsForm {
        auto_lunch_enabled: true,
        lunch_start: "13:00".into(),
        lunch_stop: "12:00".into(),
        hourly_rate: "lots".into(),
        daily_goals: Default::default(),
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.0.len(), 2);
    assert!(errors.to_string().contains("hourlyRate"));
}

#[test]
fn test_stop_leaves_face_running() {
    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(17, 0, 0), Settings::default());
    desk.start(0.0, &mut timers);

    desk.session.stop(&mut timers).unwrap();
    assert_eq!(timers.pending_count(), 1);

    timers.run_for(Duration::from_secs(3), &mut desk);
    assert_eq!(desk.refreshes, 3);
    assert_close(desk.session.seconds(), 0.5);

    desk.face.stop(&mut timers);
    assert_eq!(timers.pending_count(), 0);
}
