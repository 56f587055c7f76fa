//! Work session timer.
//!
//! Tracks how long you have worked today and what it earned:
//!
//! - **Session** ([`session`]): counting, pause/resume, progress toward the day's goal
//! - **Entry** ([`entry`]): start-time and settings form parsing
//! - **Settings** ([`settings`]): lenient JSON settings with defaults
//! - **History** ([`history`]): one record per day, newest first
//! - **Lunch** ([`lunch`]): automatic lunch break timing
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use clock_common::config::TimerConfig;
//! use clock_common::time::TimeSample;
//! use clock_runtime::scheduler::EventLoop;
//! use money_timer::entry::start_offset;
//! use money_timer::session::{TimerEvent, WorkSession};
//! use money_timer::settings::Settings;
//!
//! let now = TimeSample::new(10, 0, 0, 0);
//! let elapsed = start_offset("9:00", now).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let mut session = WorkSession::new(Settings::default(), TimerConfig::default(), date);
//! let mut timers: EventLoop<TimerEvent> = EventLoop::new();
//!
//! session.start(elapsed, now, &mut timers).unwrap();
//! assert_eq!(session.elapsed_display(), "1:00:00");
//! ```

pub mod entry;
pub mod error;
pub mod history;
pub mod lunch;
pub mod session;
pub mod settings;

pub use entry::{parse_clock_time, start_offset, ClockTime, SettingsForm, SettingsUpdate};
pub use error::{EntryError, FormErrors, PersistError};
pub use history::{History, HistoryRecord};
pub use lunch::{lunch_delays, LunchDelays};
pub use session::{format_elapsed, Progress, TimerEvent, WorkSession};
pub use settings::{day_name, Settings, DAY_NAMES};
