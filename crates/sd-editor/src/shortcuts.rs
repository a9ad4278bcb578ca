//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos straight to `DesignerCommand`s, so a shell
//! only has to forward key events and hand the result to
//! [`crate::designer::Designer::execute`].
//!
//! On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.

use crate::commands::DesignerCommand;
use crate::store::{SwapDirection, ZStep};
use crate::tools::Tool;

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to a command.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"d"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<DesignerCommand> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "]" | "}" => Some(DesignerCommand::SwapLayer(SwapDirection::Up)),
                "[" | "{" => Some(DesignerCommand::SwapLayer(SwapDirection::Down)),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "d" | "D" => Some(DesignerCommand::Duplicate),
                "=" | "+" => Some(DesignerCommand::ZoomIn),
                "-" => Some(DesignerCommand::ZoomOut),
                "0" => Some(DesignerCommand::ZoomToFit),
                "]" => Some(DesignerCommand::BumpZ(ZStep::Forward)),
                "[" => Some(DesignerCommand::BumpZ(ZStep::Backward)),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "v" | "V" => Some(DesignerCommand::SetTool(Tool::Select)),
            "t" | "T" => Some(DesignerCommand::SetTool(Tool::Text)),
            "i" | "I" => Some(DesignerCommand::SetTool(Tool::Image)),
            "r" | "R" => Some(DesignerCommand::SetTool(Tool::Rectangle)),
            "c" | "C" => Some(DesignerCommand::SetTool(Tool::Circle)),
            "m" | "M" => Some(DesignerCommand::SetTool(Tool::Video)),
            "Tab" => Some(DesignerCommand::ToggleLastTool),
            "Delete" | "Backspace" => Some(DesignerCommand::Delete),
            "Escape" => Some(DesignerCommand::Deselect),
            _ => None,
        }
    }
}
