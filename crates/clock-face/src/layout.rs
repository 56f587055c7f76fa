//! Face layout: where the hands, ticks and numerals go for a given size.

use crate::geometry::{polar_point, radial_line, radial_span, HandAngles, LineSegment, Point, STEP_12};
use crate::options::{Background, ClockConfiguration, ImageHandle, MarkStyle};
use serde::Serialize;

/// Gap between the canvas edge and the dial.
pub const BORDER: f64 = 3.0;

/// Surface background color used behind an image.
pub const IMAGE_BACKDROP: &str = "#000000";

const TENS: [&str; 10] = ["", "X", "XX", "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC"];
const ONES: [&str; 10] = ["", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];

/// Roman numeral for `n` in `1..=99`.
#[must_use]
pub fn roman(n: u32) -> Option<String> {
    if !(1..=99).contains(&n) {
        return None;
    }
    Some(format!("{}{}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]))
}

/// A line with a stroke width. Caps are round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    /// Geometry.
    pub line: LineSegment,
    /// Stroke width in pixels.
    pub width: f64,
}

/// The three hand strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandLines {
    /// Hour hand.
    pub hour: Stroke,
    /// Minute hand.
    pub minute: Stroke,
    /// Second hand.
    pub second: Stroke,
}

/// One hour mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Mark {
    /// Radial tick.
    Tick(Stroke),
    /// Centered text label.
    Label {
        /// Label text.
        text: String,
        /// Anchor (label center).
        at: Point,
        /// Font family.
        font: &'static str,
        /// Pixel size.
        pixel_size: f64,
    },
}

/// Everything needed to draw a face from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceScene {
    /// Canvas side length including the border on both sides.
    pub canvas: f64,
    /// Color to fill the canvas with.
    pub background_color: String,
    /// Image centered on the canvas, if any.
    pub background_image: Option<ImageHandle>,
    /// Hour marks, position 0 (12 o'clock) first.
    pub marks: Vec<Mark>,
    /// Mark color.
    pub mark_color: String,
    /// Hands.
    pub hands: HandLines,
    /// Hand color.
    pub hand_color: String,
}

/// Dimensions derived from the face size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    size: f64,
}

impl FaceLayout {
    /// Layout for a face of `size` pixels.
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Face size.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Dial radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Dial center on the canvas.
    #[must_use]
    pub fn center(&self) -> Point {
        let c = self.size / 2.0 + BORDER;
        Point::new(c, c)
    }

    /// Canvas side length.
    #[must_use]
    pub fn canvas(&self) -> f64 {
        self.size + 2.0 * BORDER
    }

    /// Hand strokes for the given angles.
    #[must_use]
    pub fn hands(&self, angles: HandAngles) -> HandLines {
        let center = self.center();
        let s = self.size;
        HandLines {
            hour: Stroke {
                line: radial_line(center, 0.2 * s, angles.hour),
                width: 0.03 * s,
            },
            minute: Stroke {
                line: radial_line(center, 0.3 * s, angles.minute),
                width: 0.02 * s,
            },
            second: Stroke {
                line: radial_line(center, 0.4 * s, angles.second),
                width: 0.01 * s,
            },
        }
    }

    /// The twelve hour marks in `style`.
    #[must_use]
    pub fn marks(&self, style: MarkStyle) -> Vec<Mark> {
        let center = self.center();
        let r = self.radius();

        (0..12u32)
            .map(|pos| {
                let angle = STEP_12 * f64::from(pos);
                let label = if pos == 0 { 12 } else { pos };
                match style {
                    MarkStyle::Ticks => Mark::Tick(Stroke {
                        line: radial_span(center, 0.8 * r, r, angle),
                        width: self.size * if pos % 3 == 0 { 0.02 } else { 0.01 },
                    }),
                    MarkStyle::Arabic => Mark::Label {
                        text: label.to_string(),
                        at: polar_point(center, 0.9 * r, angle),
                        font: "Helvetica",
                        pixel_size: self.size / 10.0,
                    },
                    MarkStyle::Roman => Mark::Label {
                        text: roman(label).unwrap_or_default(),
                        at: polar_point(center, 0.9 * r, angle),
                        font: "Times New Roman",
                        pixel_size: self.size / 10.0,
                    },
                }
            })
            .collect()
    }

    /// Full scene for `config` with hands at `angles`.
    #[must_use]
    pub fn scene(&self, config: &ClockConfiguration, angles: HandAngles) -> FaceScene {
        let (background_color, background_image) = match &config.background {
            Background::Color(color) => (color.clone(), None),
            Background::Image(handle) => (IMAGE_BACKDROP.to_string(), Some(*handle)),
        };

        FaceScene {
            canvas: self.canvas(),
            background_color,
            background_image,
            marks: self.marks(config.marks),
            mark_color: config.mark_color.clone(),
            hands: self.hands(angles),
            hand_color: config.hand_color.clone(),
        }
    }
}
