//! Clock face configuration and its validated update path.
//!
//! [`ClockConfiguration::apply`] is the only way a configuration changes:
//! it validates one option and returns the updated configuration together
//! with the [`Change`] the face must act on, or an error naming the option.

use clock_common::error::{ClockError, ClockResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-owned image, referenced by an opaque id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// Face background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    /// Solid color, passed to the surface as-is.
    Color(String),
    /// Image centered on the face.
    Image(ImageHandle),
}

/// Hour mark style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkStyle {
    /// Plain radial ticks.
    #[default]
    Ticks,
    /// 1..12 in arabic digits.
    Arabic,
    /// I..XII in roman numerals.
    Roman,
}

impl MarkStyle {
    /// Parse a style name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ticks" => Some(Self::Ticks),
            "arabic" => Some(Self::Arabic),
            "roman" => Some(Self::Roman),
            _ => None,
        }
    }
}

impl fmt::Display for MarkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticks => write!(f, "ticks"),
            Self::Arabic => write!(f, "arabic"),
            Self::Roman => write!(f, "roman"),
        }
    }
}

/// Outline of the face. Only the default is drawn; selecting a shape
/// explicitly is rejected as not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Square canvas.
    #[default]
    Square,
    /// Round canvas.
    Round,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square => write!(f, "square"),
            Self::Round => write!(f, "round"),
        }
    }
}

/// A value offered for one option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Text (colors, style names).
    Text(String),
    /// Any numeric value.
    Number(f64),
    /// Boolean flag.
    Flag(bool),
    /// Host image.
    Image(ImageHandle),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Image(h) => write!(f, "image#{}", h.0),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<ImageHandle> for OptionValue {
    fn from(h: ImageHandle) -> Self {
        Self::Image(h)
    }
}

/// What the face must do after an option was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing drawn changed; the next tick picks up the new cadence.
    Cadence,
    /// Colors or marks changed; rebuild the scene.
    Redraw,
    /// Size changed; resize the surface and rebuild.
    Resize,
    /// Background changed; `released` is an image no longer referenced.
    Background {
        /// Previously displayed image, if replaced.
        released: Option<ImageHandle>,
    },
}

/// Recognized option names, in display order.
pub const OPTION_KEYS: [&str; 9] = [
    "background",
    "handcolor",
    "markcolor",
    "marks",
    "shape",
    "size",
    "smooth",
    "wedge_size",
    "update_rate",
];

/// Validated clock face configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfiguration {
    /// Background color or image.
    pub background: Background,
    /// Hand color, `#RRGGBB`.
    pub hand_color: String,
    /// Mark color, `#RRGGBB`.
    pub mark_color: String,
    /// Hour mark style.
    pub marks: MarkStyle,
    /// Face outline.
    pub shape: Shape,
    /// Face size in pixels, > 0.
    pub size: f64,
    /// Sub-second second-hand movement.
    pub smooth: bool,
    /// Radius fraction for wedges.
    pub wedge_size: f64,
    /// Refreshes per second while smooth, > 0.
    pub update_rate: f64,
}

impl Default for ClockConfiguration {
    fn default() -> Self {
        Self {
            background: Background::Color(String::from("#DDEEEE")),
            hand_color: String::from("#0000EE"),
            mark_color: String::from("#FF9933"),
            marks: MarkStyle::Ticks,
            shape: Shape::Square,
            size: 300.0,
            smooth: false,
            wedge_size: 0.5,
            update_rate: 10.0,
        }
    }
}

impl ClockConfiguration {
    /// Validate `value` for `option` and return the updated configuration.
    ///
    /// `self` is left untouched; on error nothing is applied.
    ///
    /// # Errors
    ///
    /// [`ClockError::UnknownOption`] for unrecognized names,
    /// [`ClockError::WrongType`] when the value kind does not fit,
    /// [`ClockError::InvalidValue`] when it is out of domain, and
    /// [`ClockError::NotImplemented`] for `shape` and `wedge_size`.
    pub fn apply(&self, option: &str, value: &OptionValue) -> ClockResult<(Self, Change)> {
        let mut next = self.clone();

        let change = match option {
            "background" | "bg" => {
                let released = match &self.background {
                    Background::Image(old) => Some(*old),
                    Background::Color(_) => None,
                };
                next.background = match value {
                    OptionValue::Text(color) => Background::Color(color.clone()),
                    OptionValue::Image(handle) => Background::Image(*handle),
                    _ => return Err(ClockError::wrong_type("background", "text or image")),
                };
                let released = released.filter(|old| next.background != Background::Image(*old));
                Change::Background { released }
            }

            "handcolor" => {
                next.hand_color = hex_color("handcolor", value)?;
                Change::Redraw
            }

            "markcolor" | "mk" => {
                next.mark_color = hex_color("markcolor", value)?;
                Change::Redraw
            }

            "marks" => {
                let OptionValue::Text(name) = value else {
                    return Err(ClockError::wrong_type("marks", "text"));
                };
                next.marks = MarkStyle::parse(name)
                    .ok_or_else(|| ClockError::invalid_value("marks", name))?;
                Change::Redraw
            }

            "shape" => {
                let OptionValue::Text(name) = value else {
                    return Err(ClockError::wrong_type("shape", "text"));
                };
                return match name.to_ascii_lowercase().as_str() {
                    "square" | "round" => Err(ClockError::NotImplemented("shape".into())),
                    _ => Err(ClockError::invalid_value("shape", name)),
                };
            }

            "size" => {
                next.size = positive_number("size", value)?;
                Change::Resize
            }

            "smooth" => {
                let OptionValue::Flag(flag) = value else {
                    return Err(ClockError::wrong_type("smooth", "flag"));
                };
                next.smooth = *flag;
                Change::Cadence
            }

            "wedge_size" => {
                let OptionValue::Number(n) = value else {
                    return Err(ClockError::wrong_type("wedge_size", "number"));
                };
                return if *n > 0.0 && *n <= 1.0 {
                    Err(ClockError::NotImplemented("wedge_size".into()))
                } else {
                    Err(ClockError::invalid_value("wedge_size", n))
                };
            }

            "update_rate" => {
                next.update_rate = positive_number("update_rate", value)?;
                Change::Cadence
            }

            other => return Err(ClockError::UnknownOption(other.to_string())),
        };

        Ok((next, change))
    }

    /// Current value of an option. Aliases (`bg`, `mk`) are accepted.
    ///
    /// # Errors
    ///
    /// [`ClockError::UnknownOption`] for unrecognized names.
    pub fn get(&self, option: &str) -> ClockResult<OptionValue> {
        Ok(match option {
            "background" | "bg" => match &self.background {
                Background::Color(color) => OptionValue::Text(color.clone()),
                Background::Image(handle) => OptionValue::Image(*handle),
            },
            "handcolor" => OptionValue::Text(self.hand_color.clone()),
            "markcolor" | "mk" => OptionValue::Text(self.mark_color.clone()),
            "marks" => OptionValue::Text(self.marks.to_string()),
            "shape" => OptionValue::Text(self.shape.to_string()),
            "size" => OptionValue::Number(self.size),
            "smooth" => OptionValue::Flag(self.smooth),
            "wedge_size" => OptionValue::Number(self.wedge_size),
            "update_rate" => OptionValue::Number(self.update_rate),
            other => return Err(ClockError::UnknownOption(other.to_string())),
        })
    }
}

/// Whether `s` is `#` followed by exactly six hex digits.
#[must_use]
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn hex_color(option: &str, value: &OptionValue) -> ClockResult<String> {
    match value {
        OptionValue::Text(s) if is_hex_color(s) => Ok(s.clone()),
        OptionValue::Text(s) => Err(ClockError::invalid_value(option, s)),
        _ => Err(ClockError::wrong_type(option, "text")),
    }
}

fn positive_number(option: &str, value: &OptionValue) -> ClockResult<f64> {
    match value {
        OptionValue::Number(n) if n.is_finite() && *n > 0.0 => Ok(*n),
        OptionValue::Number(n) => Err(ClockError::invalid_value(option, n)),
        _ => Err(ClockError::wrong_type(option, "number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(option: &str, value: impl Into<OptionValue>) -> ClockResult<(ClockConfiguration, Change)> {
        ClockConfiguration::default().apply(option, &value.into())
    }

    #[test]
    fn test_hex_color_validation() {
        assert!(is_hex_color("#00ff00"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("00ff00"));
        assert!(!is_hex_color("#00ff0"));
        assert!(!is_hex_color("#00ff000"));
        assert!(!is_hex_color("#00gg00"));
        assert!(!is_hex_color("#ééé"));
    }

    #[test]
    fn test_colors_trigger_redraw() {
        let (cfg, change) = apply("handcolor", "#00FF00").unwrap();
        assert_eq!(cfg.hand_color, "#00FF00");
        assert_eq!(change, Change::Redraw);

        let (cfg, change) = apply("mk", "#ffffff").unwrap();
        assert_eq!(cfg.mark_color, "#ffffff");
        assert_eq!(change, Change::Redraw);
    }

    #[test]
    fn test_bad_color_value_and_type() {
        assert_eq!(
            apply("handcolor", "green").unwrap_err(),
            ClockError::invalid_value("handcolor", "green")
        );
        assert_eq!(
            apply("markcolor", 3).unwrap_err(),
            ClockError::wrong_type("markcolor", "text")
        );
    }

    #[test]
    fn test_marks_case_insensitive() {
        let (cfg, change) = apply("marks", "ROMAN").unwrap();
        assert_eq!(cfg.marks, MarkStyle::Roman);
        assert_eq!(change, Change::Redraw);
        assert!(apply("marks", "dots").is_err());
    }

    #[test]
    fn test_shape_not_implemented() {
        assert_eq!(
            apply("shape", "round").unwrap_err(),
            ClockError::NotImplemented("shape".into())
        );
        assert_eq!(
            apply("shape", "SQUARE").unwrap_err(),
            ClockError::NotImplemented("shape".into())
        );
        assert_eq!(
            apply("shape", "hexagon").unwrap_err(),
            ClockError::invalid_value("shape", "hexagon")
        );
    }

    #[test]
    fn test_wedge_size_rules() {
        assert_eq!(
            apply("wedge_size", 0.5).unwrap_err(),
            ClockError::NotImplemented("wedge_size".into())
        );
        assert_eq!(
            apply("wedge_size", 1.0).unwrap_err(),
            ClockError::NotImplemented("wedge_size".into())
        );
        assert!(matches!(
            apply("wedge_size", 0.0).unwrap_err(),
            ClockError::InvalidValue { .. }
        ));
        assert!(matches!(
            apply("wedge_size", "half").unwrap_err(),
            ClockError::WrongType { .. }
        ));
    }

    #[test]
    fn test_size_and_rate_domain() {
        let (cfg, change) = apply("size", 150).unwrap();
        assert_eq!(cfg.size, 150.0);
        assert_eq!(change, Change::Resize);

        assert!(apply("size", 0.0).is_err());
        assert!(apply("size", f64::NAN).is_err());

        let (cfg, change) = apply("update_rate", 2.5).unwrap();
        assert_eq!(cfg.update_rate, 2.5);
        assert_eq!(change, Change::Cadence);
        assert!(apply("update_rate", -1.0).is_err());
        assert!(matches!(
            apply("update_rate", true).unwrap_err(),
            ClockError::WrongType { .. }
        ));
    }

    #[test]
    fn test_smooth_requires_flag() {
        let (cfg, change) = apply("smooth", true).unwrap();
        assert!(cfg.smooth);
        assert_eq!(change, Change::Cadence);
        assert!(apply("smooth", 1).is_err());
    }

    #[test]
    fn test_background_image_replaces_previous() {
        let cfg = ClockConfiguration::default();
        let (cfg, change) = cfg.apply("bg", &ImageHandle(1).into()).unwrap();
        assert_eq!(cfg.background, Background::Image(ImageHandle(1)));
        assert_eq!(change, Change::Background { released: None });

        let (cfg, change) = cfg.apply("background", &ImageHandle(2).into()).unwrap();
        assert_eq!(
            change,
            Change::Background {
                released: Some(ImageHandle(1))
            }
        );

        // Same image again is not released.
        let (cfg, change) = cfg.apply("background", &ImageHandle(2).into()).unwrap();
        assert_eq!(change, Change::Background { released: None });

        let (cfg, change) = cfg.apply("background", &"not even a color".into()).unwrap();
        assert_eq!(cfg.background, Background::Color("not even a color".into()));
        assert_eq!(
            change,
            Change::Background {
                released: Some(ImageHandle(2))
            }
        );
        assert!(cfg.apply("background", &false.into()).is_err());
    }

    #[test]
    fn test_unknown_option() {
        assert_eq!(
            apply("colour", "#000000").unwrap_err(),
            ClockError::UnknownOption("colour".into())
        );
    }

    #[test]
    fn test_get_with_aliases() {
        let cfg = ClockConfiguration::default();
        assert_eq!(cfg.get("bg").unwrap(), OptionValue::Text("#DDEEEE".into()));
        assert_eq!(cfg.get("mk").unwrap(), OptionValue::Text("#FF9933".into()));
        assert_eq!(cfg.get("marks").unwrap(), OptionValue::Text("ticks".into()));
        assert_eq!(cfg.get("size").unwrap(), OptionValue::Number(300.0));
        assert!(cfg.get("nope").is_err());
        for key in OPTION_KEYS {
            assert!(cfg.get(key).is_ok(), "{key}");
        }
    }
}
