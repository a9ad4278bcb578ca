//! Per-kind element properties.
//!
//! Every element kind has a fixed set of well-known keys (`content`,
//! `fontSize`, `fillColor`, …) stored as typed fields. Keys outside that set
//! live in a free-form map on the element (see [`crate::Element`]), so a
//! layout written by a newer designer still round-trips through this one.

use crate::color::Color;
use crate::model::ElementKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ─── Values ──────────────────────────────────────────────────────────────

/// A dynamically-typed property value, as seen through the string-keyed
/// property interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "boolean",
            PropValue::Number(_) => "number",
            PropValue::Text(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<Color> for PropValue {
    fn from(c: Color) -> Self {
        PropValue::Text(c.to_hex())
    }
}

/// Rejected property write. The element is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("property `{key}` expects a {expected}, got a {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property `{key}` must be a finite number")]
    NotFinite { key: String },

    #[error("property `{key}`: `{value}` is not a hex color")]
    InvalidColor { key: String, value: String },

    #[error("property `{key}`: `{value}` is not one of {allowed}")]
    InvalidValue {
        key: String,
        value: String,
        allowed: &'static str,
    },
}

// ─── Typed property sets ─────────────────────────────────────────────────

/// How an image fills its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stretch {
    None,
    Fill,
    #[default]
    Uniform,
    UniformToFill,
}

impl Stretch {
    const ALLOWED: &'static str = "None, Fill, Uniform, UniformToFill";

    pub fn as_str(self) -> &'static str {
        match self {
            Stretch::None => "None",
            Stretch::Fill => "Fill",
            Stretch::Uniform => "Uniform",
            Stretch::UniformToFill => "UniformToFill",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "None" => Some(Stretch::None),
            "Fill" => Some(Stretch::Fill),
            "Uniform" => Some(Stretch::Uniform),
            "UniformToFill" => Some(Stretch::UniformToFill),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: Color,
    pub font_weight: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: "Text".into(),
            font_family: "Arial".into(),
            font_size: 24.0,
            color: Color::WHITE,
            font_weight: "Normal".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageProps {
    pub source: String,
    pub stretch: Stretch,
}

/// Fill/border set shared by rectangles and circles.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProps {
    pub fill_color: Color,
    pub border_color: Color,
    pub border_thickness: f64,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            fill_color: Color::rgb(0x34, 0x98, 0xDB),
            border_color: Color::rgb(0x2C, 0x3E, 0x50),
            border_thickness: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoProps {
    pub source: String,
    pub looping: bool,
    pub muted: bool,
}

impl Default for VideoProps {
    fn default() -> Self {
        Self {
            source: String::new(),
            looping: true,
            muted: true,
        }
    }
}

/// Typed properties, tagged by element kind. The kind of an element is
/// derived from this value, so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementProps {
    Text(TextProps),
    Image(ImageProps),
    Rectangle(ShapeProps),
    Circle(ShapeProps),
    Video(VideoProps),
}

/// Result of writing a key through [`ElementProps::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Applied,
    /// Not a well-known key for this kind; the caller keeps it free-form.
    Unknown,
}

impl ElementProps {
    /// Default property set for a kind.
    pub fn defaults(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => ElementProps::Text(TextProps::default()),
            ElementKind::Image => ElementProps::Image(ImageProps::default()),
            ElementKind::Rectangle => ElementProps::Rectangle(ShapeProps::default()),
            ElementKind::Circle => ElementProps::Circle(ShapeProps::default()),
            ElementKind::Video => ElementProps::Video(VideoProps::default()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementProps::Text(_) => ElementKind::Text,
            ElementProps::Image(_) => ElementKind::Image,
            ElementProps::Rectangle(_) => ElementKind::Rectangle,
            ElementProps::Circle(_) => ElementKind::Circle,
            ElementProps::Video(_) => ElementKind::Video,
        }
    }

    /// Well-known keys for this kind, in display order.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            ElementProps::Text(_) => &["content", "fontFamily", "fontSize", "color", "fontWeight"],
            ElementProps::Image(_) => &["source", "stretch"],
            ElementProps::Rectangle(_) | ElementProps::Circle(_) => {
                &["fillColor", "borderColor", "borderThickness"]
            }
            ElementProps::Video(_) => &["source", "loop", "muted"],
        }
    }

    /// Read a well-known key.
    pub fn get(&self, key: &str) -> Option<PropValue> {
        let value: PropValue = match (self, key) {
            (ElementProps::Text(t), "content") => t.content.as_str().into(),
            (ElementProps::Text(t), "fontFamily") => t.font_family.as_str().into(),
            (ElementProps::Text(t), "fontSize") => t.font_size.into(),
            (ElementProps::Text(t), "color") => t.color.into(),
            (ElementProps::Text(t), "fontWeight") => t.font_weight.as_str().into(),
            (ElementProps::Image(i), "source") => i.source.as_str().into(),
            (ElementProps::Image(i), "stretch") => i.stretch.as_str().into(),
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "fillColor") => {
                s.fill_color.into()
            }
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "borderColor") => {
                s.border_color.into()
            }
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "borderThickness") => {
                s.border_thickness.into()
            }
            (ElementProps::Video(v), "source") => v.source.as_str().into(),
            (ElementProps::Video(v), "loop") => v.looping.into(),
            (ElementProps::Video(v), "muted") => v.muted.into(),
            _ => return None,
        };
        Some(value)
    }

    /// Write a well-known key. Values are validated before anything is
    /// changed.
    pub fn set(&mut self, key: &str, value: &PropValue) -> Result<SetOutcome, PropertyError> {
        expect_finite(key, value)?;
        match (self, key) {
            (ElementProps::Text(t), "content") => t.content = expect_text(key, value)?,
            (ElementProps::Text(t), "fontFamily") => t.font_family = expect_text(key, value)?,
            (ElementProps::Text(t), "fontSize") => t.font_size = expect_number(key, value)?,
            (ElementProps::Text(t), "color") => t.color = expect_color(key, value)?,
            (ElementProps::Text(t), "fontWeight") => t.font_weight = expect_text(key, value)?,
            (ElementProps::Image(i), "source") => i.source = expect_text(key, value)?,
            (ElementProps::Image(i), "stretch") => {
                let raw = expect_text(key, value)?;
                i.stretch = Stretch::parse(&raw).ok_or(PropertyError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                    allowed: Stretch::ALLOWED,
                })?;
            }
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "fillColor") => {
                s.fill_color = expect_color(key, value)?
            }
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "borderColor") => {
                s.border_color = expect_color(key, value)?
            }
            (ElementProps::Rectangle(s) | ElementProps::Circle(s), "borderThickness") => {
                s.border_thickness = expect_number(key, value)?
            }
            (ElementProps::Video(v), "source") => v.source = expect_text(key, value)?,
            (ElementProps::Video(v), "loop") => v.looping = expect_bool(key, value)?,
            (ElementProps::Video(v), "muted") => v.muted = expect_bool(key, value)?,
            _ => return Ok(SetOutcome::Unknown),
        }
        Ok(SetOutcome::Applied)
    }
}

fn wrong_type(key: &str, expected: &'static str, value: &PropValue) -> PropertyError {
    PropertyError::WrongType {
        key: key.to_string(),
        expected,
        found: value.type_name(),
    }
}

pub(crate) fn expect_bool(key: &str, value: &PropValue) -> Result<bool, PropertyError> {
    value.as_bool().ok_or_else(|| wrong_type(key, "boolean", value))
}

/// Numbers must survive a JSON round-trip, which has no `inf` or `NaN`.
pub(crate) fn expect_finite(key: &str, value: &PropValue) -> Result<(), PropertyError> {
    match value {
        PropValue::Number(n) if !n.is_finite() => Err(PropertyError::NotFinite {
            key: key.to_string(),
        }),
        _ => Ok(()),
    }
}

fn expect_number(key: &str, value: &PropValue) -> Result<f64, PropertyError> {
    value.as_f64().ok_or_else(|| wrong_type(key, "number", value))
}

fn expect_text(key: &str, value: &PropValue) -> Result<String, PropertyError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(key, "string", value))
}

fn expect_color(key: &str, value: &PropValue) -> Result<Color, PropertyError> {
    let raw = value.as_str().ok_or_else(|| wrong_type(key, "string", value))?;
    Color::from_hex(raw).ok_or_else(|| PropertyError::InvalidColor {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
