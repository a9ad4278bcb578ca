pub mod commands;
pub mod config;
pub mod designer;
pub mod layers;
pub mod selection;
pub mod shortcuts;
pub mod status;
pub mod store;
pub mod tools;
pub mod viewport;

pub use commands::{DesignerCommand, parse_command, parse_script};
pub use config::DesignerConfig;
pub use designer::{Designer, LayoutHeader, PendingSave, SaveReceipt};
pub use layers::LayerProjection;
pub use selection::Selection;
pub use shortcuts::ShortcutMap;
pub use status::{StatusEntry, StatusLevel, StatusLog};
pub use store::{ElementStore, SwapDirection, ZStep};
pub use tools::{Tool, ToolState};
pub use viewport::ViewportController;
