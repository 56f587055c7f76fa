//! Hand angles and polar-to-screen conversion.
//!
//! Angles are radians measured clockwise from 12 o'clock. Screen
//! coordinates have y growing downward, so "up" on the dial is −y.

use clock_common::time::TimeSample;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Angular step between hour positions.
pub const STEP_12: f64 = TAU / 12.0;

/// Angular step between minute (and second) positions.
pub const STEP_60: f64 = TAU / 60.0;

/// Angles of the three hands, each in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandAngles {
    /// Hour hand.
    pub hour: f64,
    /// Minute hand.
    pub minute: f64,
    /// Second hand.
    pub second: f64,
}

/// Compute hand angles for a time of day.
///
/// When `smooth` is false the second hand ignores the sub-second part and
/// jumps once per second.
#[must_use]
pub fn hand_angles(sample: TimeSample, smooth: bool) -> HandAngles {
    let hour = f64::from(sample.hour % 12);
    let minute = f64::from(sample.minute);
    let second = f64::from(sample.second);

    let second_hand = if smooth {
        second + f64::from(sample.millis) / 1000.0
    } else {
        second
    };

    HandAngles {
        hour: STEP_12 * (hour + minute / 60.0 + second / 3600.0),
        minute: STEP_60 * (minute + second / 60.0),
        second: STEP_60 * second_hand,
    }
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, growing right.
    pub x: f64,
    /// Vertical position, growing down.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A straight line between two screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

/// Offset of a point at `radius` and `angle` from the center, in dial
/// orientation: `(r·sin θ, r·cos θ)` with positive dy meaning "up".
#[must_use]
pub fn polar_offset(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), radius * angle.cos())
}

/// Screen point at `radius` and `angle` from `center`.
#[must_use]
pub fn polar_point(center: Point, radius: f64, angle: f64) -> Point {
    let (dx, dy) = polar_offset(radius, angle);
    Point::new(center.x + dx, center.y - dy)
}

/// Line from `center` out to `radius` at `angle`.
#[must_use]
pub fn radial_line(center: Point, radius: f64, angle: f64) -> LineSegment {
    LineSegment {
        start: center,
        end: polar_point(center, radius, angle),
    }
}

/// Line between two radii along the same angle.
#[must_use]
pub fn radial_span(center: Point, inner: f64, outer: f64, angle: f64) -> LineSegment {
    LineSegment {
        start: polar_point(center, inner, angle),
        end: polar_point(center, outer, angle),
    }
}
