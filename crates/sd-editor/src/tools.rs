//! Active tool state.
//!
//! The designer does not interpret pointer input itself; the active tool
//! only tells the presentation layer what a canvas click means. Creation
//! tools map to an element kind (see [`crate::designer::Designer::click_canvas`]).

use sd_core::ElementKind;
use std::fmt;

/// A canvas tool. Names outside the known set are carried through as
/// `Custom` so UI affordances this crate knows nothing about still work.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Text,
    Image,
    Rectangle,
    Circle,
    Video,
    Custom(String),
}

impl Tool {
    pub fn from_name(name: &str) -> Self {
        match name {
            "select" => Tool::Select,
            "text" => Tool::Text,
            "image" => Tool::Image,
            "rectangle" => Tool::Rectangle,
            "circle" => Tool::Circle,
            "video" => Tool::Video,
            other => Tool::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tool::Select => "select",
            Tool::Text => "text",
            Tool::Image => "image",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Video => "video",
            Tool::Custom(name) => name,
        }
    }

    /// The element kind this tool creates, if it is a creation tool.
    pub fn creates(&self) -> Option<ElementKind> {
        match self {
            Tool::Text => Some(ElementKind::Text),
            Tool::Image => Some(ElementKind::Image),
            Tool::Rectangle => Some(ElementKind::Rectangle),
            Tool::Circle => Some(ElementKind::Circle),
            Tool::Video => Some(ElementKind::Video),
            Tool::Select | Tool::Custom(_) => None,
        }
    }
}

impl From<&str> for Tool {
    fn from(name: &str) -> Self {
        Tool::from_name(name)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Active tool, plus the previous one for the Tab toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolState {
    active: Tool,
    previous: Tool,
}

impl ToolState {
    pub fn active(&self) -> &Tool {
        &self.active
    }

    /// Replace the active tool. No validation.
    pub fn set_tool(&mut self, tool: impl Into<Tool>) {
        let tool = tool.into();
        if tool != self.active {
            self.previous = std::mem::replace(&mut self.active, tool);
        }
    }

    /// Swap active and previous tool.
    pub fn toggle_last(&mut self) {
        std::mem::swap(&mut self.active, &mut self.previous);
    }
}
