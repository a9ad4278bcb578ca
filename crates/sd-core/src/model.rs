//! Core data model for display layouts.
//!
//! A `Layout` is a named canvas with a target resolution and an ordered
//! list of `Element`s. The list order is creation order; paint order comes
//! from each element's `z_index` and is derived on demand, so duplicate or
//! gapped z values are legal everywhere.

use crate::color::Color;
use crate::id::{ElementId, LayoutId};
use crate::props::{ElementProps, PropValue, PropertyError, SetOutcome, expect_bool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reserved boolean key: element is drawn (default `true`).
pub const KEY_VISIBLE: &str = "isVisible";
/// Reserved boolean key: element ignores canvas moves/resizes (default `false`).
pub const KEY_LOCKED: &str = "isLocked";

// ─── Element kinds ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Rectangle,
    Circle,
    Video,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Text,
        ElementKind::Image,
        ElementKind::Rectangle,
        ElementKind::Circle,
        ElementKind::Video,
    ];

    /// Lowercase identifier, also used as the id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Video => "video",
        }
    }

    /// Human-readable label used for default element names.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Image => "Image",
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Circle => "Circle",
            ElementKind::Video => "Video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Size a freshly added element of this kind gets.
    pub fn default_size(self) -> Size {
        match self {
            ElementKind::Text => Size::new(200.0, 50.0),
            ElementKind::Image => Size::new(300.0, 200.0),
            ElementKind::Rectangle => Size::new(200.0, 150.0),
            ElementKind::Circle => Size::new(150.0, 150.0),
            ElementKind::Video => Size::new(320.0, 180.0),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Element size. Callers supply positive values; the model does not clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// One positioned, sized, typed visual item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ElementRecord", try_from = "ElementRecord")]
pub struct Element {
    /// Assigned at creation, never changed.
    pub id: ElementId,
    pub name: String,
    pub position: Position,
    pub size: Size,
    /// Stacking key: higher paints and lists on top.
    pub z_index: i32,
    /// Typed properties; also determines the element kind.
    pub props: ElementProps,
    pub visible: bool,
    pub locked: bool,
    /// Free-form properties with no typed field for this kind.
    pub extra: BTreeMap<String, PropValue>,
}

impl Element {
    /// A new element with the kind's default size and properties, at the
    /// origin with z-index 0.
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            name: kind.label().to_string(),
            position: Position::default(),
            size: kind.default_size(),
            z_index: 0,
            props: ElementProps::defaults(kind),
            visible: true,
            locked: false,
            extra: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.props.kind()
    }

    /// Read a property by key: reserved flags, then typed keys, then the
    /// free-form map.
    pub fn property(&self, key: &str) -> Option<PropValue> {
        match key {
            KEY_VISIBLE => Some(PropValue::Bool(self.visible)),
            KEY_LOCKED => Some(PropValue::Bool(self.locked)),
            _ => self
                .props
                .get(key)
                .or_else(|| self.extra.get(key).cloned()),
        }
    }

    /// Write a property by key. Known keys are type-checked; unknown keys
    /// are stored free-form.
    pub fn set_property(&mut self, key: &str, value: PropValue) -> Result<(), PropertyError> {
        match key {
            KEY_VISIBLE => self.visible = expect_bool(key, &value)?,
            KEY_LOCKED => self.locked = expect_bool(key, &value)?,
            _ => {
                if self.props.set(key, &value)? == SetOutcome::Unknown {
                    self.extra.insert(key.to_string(), value);
                }
            }
        }
        Ok(())
    }

    /// Flattened view of every property, including the reserved flags.
    pub fn properties(&self) -> BTreeMap<String, PropValue> {
        let mut all = self.extra.clone();
        for key in self.props.keys() {
            if let Some(value) = self.props.get(key) {
                all.insert((*key).to_string(), value);
            }
        }
        all.insert(KEY_VISIBLE.to_string(), PropValue::Bool(self.visible));
        all.insert(KEY_LOCKED.to_string(), PropValue::Bool(self.locked));
        all
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.position.x
            && px <= self.position.x + self.size.width
            && py >= self.position.y
            && py <= self.position.y + self.size.height
    }
}

/// Wire shape of an element: typed properties are flattened into one
/// string-keyed map so storage never needs to know about kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    id: ElementId,
    kind: ElementKind,
    name: String,
    position: Position,
    size: Size,
    z_index: i32,
    #[serde(default)]
    properties: BTreeMap<String, PropValue>,
}

impl From<Element> for ElementRecord {
    fn from(e: Element) -> Self {
        Self {
            properties: e.properties(),
            id: e.id,
            kind: e.kind(),
            name: e.name,
            position: e.position,
            size: e.size,
            z_index: e.z_index,
        }
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = PropertyError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let mut element = Element::new(record.id, record.kind);
        element.name = record.name;
        element.position = record.position;
        element.size = record.size;
        element.z_index = record.z_index;
        for (key, value) in record.properties {
            if let Err(e) = element.set_property(&key, value) {
                log::warn!("rejected stored element {}: {e}", element.id);
                return Err(e);
            }
        }
        Ok(element)
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "landscape" => Some(Orientation::Landscape),
            "portrait" => Some(Orientation::Portrait),
            _ => None,
        }
    }
}

/// Target display resolution of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            orientation: Orientation::Landscape,
        }
    }
}

/// A named canvas of elements with a target resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub background_color: Color,
    /// Creation order, independent of z-index.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Layout {
    /// An empty layout with a fresh id and default canvas settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayoutId::generate(),
            name: name.into(),
            resolution: Resolution::default(),
            background_color: Color::BLACK,
            elements: Vec::new(),
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Whether every element id occurs once.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.elements.len());
        self.elements.iter().all(|e| seen.insert(e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_element_uses_kind_defaults() {
        let e = Element::new(ElementId::intern("img"), ElementKind::Image);
        assert_eq!(e.kind(), ElementKind::Image);
        assert_eq!(e.size, Size::new(300.0, 200.0));
        assert_eq!(e.property("stretch"), Some(PropValue::Text("Uniform".into())));
        assert_eq!(e.property(KEY_VISIBLE), Some(PropValue::Bool(true)));
        assert_eq!(e.property(KEY_LOCKED), Some(PropValue::Bool(false)));
    }

    #[test]
    fn unknown_keys_are_kept_free_form() {
        let mut e = Element::new(ElementId::intern("box"), ElementKind::Rectangle);
        e.set_property("cornerRadius", PropValue::Number(8.0)).unwrap();
        assert_eq!(e.property("cornerRadius"), Some(PropValue::Number(8.0)));
        assert_eq!(e.extra.len(), 1);

        e.set_property("borderThickness", PropValue::Number(4.0)).unwrap();
        assert_eq!(e.extra.len(), 1, "typed key must not leak into extras");
    }

    #[test]
    fn reserved_flags_are_type_checked() {
        let mut e = Element::new(ElementId::intern("clip"), ElementKind::Video);
        assert!(e.set_property(KEY_LOCKED, "yes".into()).is_err());
        assert!(!e.locked);
        e.set_property(KEY_LOCKED, true.into()).unwrap();
        assert!(e.locked);
    }

    #[test]
    fn flattened_properties_include_every_key() {
        let e = Element::new(ElementId::intern("caption"), ElementKind::Text);
        let keys: Vec<String> = e.properties().into_keys().collect();
        assert_eq!(
            keys,
            vec![
                "color",
                "content",
                "fontFamily",
                "fontSize",
                "fontWeight",
                "isLocked",
                "isVisible",
            ]
        );
    }

    #[test]
    fn contains_is_inclusive() {
        let mut e = Element::new(ElementId::intern("hit"), ElementKind::Rectangle);
        e.position = Position::new(10.0, 10.0);
        assert!(e.contains(10.0, 10.0));
        assert!(e.contains(210.0, 160.0));
        assert!(!e.contains(211.0, 50.0));
    }

    #[test]
    fn layout_defaults() {
        let layout = Layout::new("Lobby");
        assert_eq!(layout.resolution, Resolution::default());
        assert_eq!(layout.background_color, Color::BLACK);
        assert!(layout.elements.is_empty());
        assert!(layout.has_unique_ids());
    }
}
