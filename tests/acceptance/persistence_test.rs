//! Settings and history across restarts.

use super::common::{assert_close, at, monday, Desk};
use clock_runtime::scheduler::EventLoop;
use money_timer::{History, Settings};
use tempfile::TempDir;

#[test]
fn test_day_is_recorded_and_shown_next_day() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.json");
    let history_path = dir.path().join("history.json");

    let mut timers = EventLoop::new();
    let mut desk = Desk::new(at(10, 30, 0), Settings::load(&settings_path));
    let history = History::load(&history_path, monday());
    assert!(history.is_empty());

    desk.start(5399.5, &mut timers);
    desk.session.stop(&mut timers).unwrap();
    desk.session.settings().save(&settings_path).unwrap();
    history.save(&history_path, &desk.session.record()).unwrap();

    let tuesday = monday().succ_opt().unwrap();
    let next = History::load(&history_path, tuesday);
    assert_eq!(next.len(), 1);

    let record = &next.records()[0];
    assert_eq!((record.year, record.mon, record.day), (2024, 3, 4));
    assert_eq!(record.wday, "Mon");
    assert_close(record.sec_so_far, 5400.0);
    assert_close(record.earnings, 22.89);
    assert_close(record.percent, 18.75);
    assert!(record.line().starts_with("2024-03-04 Mon  \t1:30:00\t$22.89  \t"));

    // Restarting on the same day replaces today's record instead of
    // listing it twice.
    assert!(History::load(&history_path, monday()).is_empty());
}

#[test]
fn test_settings_keep_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"hourlyRate": 40, "Fri": 4.5, "theme": "dark", "autoLunchEnabled": "yes"}"#,
    )
    .unwrap();

    let settings = Settings::load(&path);
    assert_eq!(settings.hourly_rate, 40.0);
    assert_eq!(settings.daily_goals[4], 4.5);
    // Wrong type falls back to the default.
    assert!(!settings.auto_lunch_enabled);

    settings.save(&path).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["theme"], "dark");
    assert_eq!(saved["Fri"], 4.5);
}

#[test]
fn test_corrupt_files_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.json");
    let history_path = dir.path().join("history.json");
    std::fs::write(&settings_path, "not json").unwrap();
    std::fs::write(&history_path, "[{\"year\": \"soon\"}]").unwrap();

    assert_eq!(Settings::load(&settings_path), Settings::default());
    assert!(History::load(&history_path, monday()).is_empty());
}
