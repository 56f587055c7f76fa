//! Analog clock face.
//!
//! This crate turns a time of day into drawable geometry and keeps it
//! current:
//!
//! - [`geometry`]: hand angles and polar-to-screen conversion
//! - [`options`]: validated configuration updates
//! - [`layout`]: hand, tick and numeral placement
//! - [`refresh`]: refresh cadence and sub-second estimation
//! - [`face`]: the [`ClockFace`] component and its [`Surface`] trait

pub mod face;
pub mod geometry;
pub mod layout;
pub mod options;
pub mod refresh;

pub use face::{ClockFace, RefreshTick, Surface};
pub use geometry::{hand_angles, HandAngles, LineSegment, Point};
pub use layout::{roman, FaceLayout, FaceScene, HandLines, Mark, Stroke};
pub use options::{Background, Change, ClockConfiguration, ImageHandle, MarkStyle, OptionValue, Shape};
pub use refresh::{refresh_interval, SubSecond, SubSecondCounter};
