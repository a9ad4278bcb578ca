//! Designer session: one open layout plus the editor state around it.
//!
//! `Designer` is what a shell talks to. It owns the layout header, the
//! element store, tool and viewport state, and reports outcomes to the
//! shared [`StatusLog`]. Persistence goes through any [`LayoutStorage`].
//!
//! Saving is split in two so the document stays editable while the
//! write is in flight:
//!
//! ```text
//! let pending = designer.save_request();   // snapshot + revision
//! let receipt = pending.send(&storage).await;
//! designer.finish_save(receipt);           // clean only if unchanged since
//! ```

use crate::commands::{DesignerCommand, parse_script};
use crate::config::DesignerConfig;
use crate::status::StatusLog;
use crate::store::ElementStore;
use crate::tools::{Tool, ToolState};
use crate::viewport::ViewportController;
use sd_core::{Color, ElementId, Layout, LayoutId, Position, Resolution};
use sd_store::{LayoutStorage, StorageError};

/// Everything about a layout that is not its element list.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutHeader {
    pub id: LayoutId,
    pub name: String,
    pub resolution: Resolution,
    pub background_color: Color,
}

impl LayoutHeader {
    fn from_layout(layout: &Layout) -> Self {
        Self {
            id: layout.id.clone(),
            name: layout.name.clone(),
            resolution: layout.resolution,
            background_color: layout.background_color,
        }
    }
}

/// A layout snapshot on its way to storage.
#[derive(Debug, Clone)]
pub struct PendingSave {
    layout: Layout,
    document: u64,
    revision: u64,
}

impl PendingSave {
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Push the snapshot. Does not touch the designer.
    pub async fn send(self, storage: &dyn LayoutStorage) -> SaveReceipt {
        let result = storage.update_layout(&self.layout).await;
        SaveReceipt {
            layout_id: self.layout.id,
            name: self.layout.name,
            document: self.document,
            revision: self.revision,
            result,
        }
    }
}

/// Outcome of a [`PendingSave`], handed back to [`Designer::finish_save`].
#[derive(Debug)]
pub struct SaveReceipt {
    layout_id: LayoutId,
    name: String,
    document: u64,
    revision: u64,
    pub result: Result<(), StorageError>,
}

#[derive(Debug)]
pub struct Designer {
    header: LayoutHeader,
    store: ElementStore,
    tools: ToolState,
    viewport: ViewportController,
    config: DesignerConfig,
    status: StatusLog,
    /// Bumped by header edits; element edits are counted by the store.
    header_revision: u64,
    saved_revision: u64,
    /// Bumped whenever a different document is opened, so a save started
    /// on an earlier one cannot mark this one clean.
    document: u64,
}

impl Designer {
    /// A session with an empty, untitled layout.
    pub fn new(config: DesignerConfig, status: StatusLog) -> Self {
        let layout = Layout::new("Untitled Layout");
        let mut designer = Self {
            header: LayoutHeader::from_layout(&layout),
            store: ElementStore::new(&config),
            tools: ToolState::default(),
            viewport: ViewportController::default(),
            config,
            status,
            header_revision: 0,
            saved_revision: 0,
            document: 0,
        };
        designer.mark_clean();
        designer
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn header(&self) -> &LayoutHeader {
        &self.header
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Direct store access. Element edits made here count toward
    /// `is_dirty` like any other.
    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.store
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolState {
        &mut self.tools
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Combined document revision. Both parts only grow, so equality with
    /// the saved value means nothing changed.
    pub fn revision(&self) -> u64 {
        self.store.revision() + self.header_revision
    }

    /// Unsaved changes since the last load, save or new layout.
    pub fn is_dirty(&self) -> bool {
        self.revision() != self.saved_revision
    }

    /// The open layout as a value, elements in insertion order.
    pub fn layout_snapshot(&self) -> Layout {
        Layout {
            id: self.header.id.clone(),
            name: self.header.name.clone(),
            resolution: self.header.resolution,
            background_color: self.header.background_color,
            elements: self.store.elements().to_vec(),
        }
    }

    /// Start over with an empty layout under a fresh id.
    pub fn new_layout(&mut self, name: impl Into<String>) {
        let layout = Layout::new(name);
        self.status.info(format!("New layout '{}'", layout.name));
        self.open(layout);
    }

    pub fn rename_layout(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.header.name {
            return false;
        }
        self.header.name = name;
        self.header_revision += 1;
        true
    }

    pub fn set_background(&mut self, color: Color) -> bool {
        if color == self.header.background_color {
            return false;
        }
        self.header.background_color = color;
        self.header_revision += 1;
        true
    }

    pub fn set_resolution(&mut self, resolution: Resolution) -> bool {
        if resolution.width == 0 || resolution.height == 0 {
            self.status.warn(format!(
                "Ignored resolution {}x{}: dimensions must be positive",
                resolution.width, resolution.height
            ));
            return false;
        }
        if resolution == self.header.resolution {
            return false;
        }
        self.header.resolution = resolution;
        self.header_revision += 1;
        true
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Replace the open layout with the stored one. On a storage error or
    /// a missing layout the current document is kept and a status entry
    /// explains why.
    pub async fn load(&mut self, storage: &dyn LayoutStorage, id: &LayoutId) -> bool {
        match storage.get_layout_by_id(id).await {
            Ok(Some(layout)) => {
                let name = layout.name.clone();
                let count = layout.elements.len();
                let reissued = self.open(layout);
                if reissued > 0 {
                    self.status
                        .warn(format!("Layout '{name}' had {reissued} repeated element id(s); re-issued"));
                }
                self.status
                    .info(format!("Loaded layout '{name}' ({count} elements)"));
                true
            }
            Ok(None) => {
                self.status.warn(format!("Layout {id} not found"));
                false
            }
            Err(e) => {
                self.status.error(format!("Failed to load layout {id}: {e}"));
                false
            }
        }
    }

    /// Snapshot the document for a save that may finish after more edits.
    pub fn save_request(&self) -> PendingSave {
        PendingSave {
            layout: self.layout_snapshot(),
            document: self.document,
            revision: self.revision(),
        }
    }

    /// Apply a save outcome. The document becomes clean only if it is still
    /// the one that was snapshotted and nothing changed since; a failure
    /// leaves the dirty flag alone.
    pub fn finish_save(&mut self, receipt: SaveReceipt) -> bool {
        match receipt.result {
            Ok(()) if receipt.document == self.document && receipt.layout_id == self.header.id => {
                self.saved_revision = receipt.revision;
                self.status.info(format!("Saved layout '{}'", receipt.name));
                true
            }
            Ok(()) => {
                log::debug!(
                    "save of {} finished after another layout was opened",
                    receipt.layout_id
                );
                self.status.info(format!(
                    "Saved previous layout '{}' ({})",
                    receipt.name, receipt.layout_id
                ));
                true
            }
            Err(e) => {
                self.status
                    .error(format!("Failed to save layout '{}': {e}", receipt.name));
                false
            }
        }
    }

    /// `save_request` + `send` + `finish_save` in one go.
    pub async fn save(&mut self, storage: &dyn LayoutStorage) -> bool {
        let receipt = self.save_request().send(storage).await;
        self.finish_save(receipt)
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Run one command. Returns whether anything changed. Element commands
    /// target the selection and do nothing without one.
    pub fn execute(&mut self, command: DesignerCommand) -> bool {
        log::debug!("execute {command:?}");
        match command {
            DesignerCommand::Add(kind) => {
                self.store.add(kind);
                true
            }
            DesignerCommand::Duplicate => {
                self.with_selected(|store, id| store.duplicate(id).is_some())
            }
            DesignerCommand::Delete => self.with_selected(|store, id| store.remove(id).is_some()),
            DesignerCommand::Select(id) => {
                let found = self.store.select(id);
                if !found {
                    self.status.warn(format!("No element {id}"));
                }
                found
            }
            DesignerCommand::SelectLayer(index) => self.store.select_layer(index),
            DesignerCommand::Deselect => {
                let had = self.store.selection().id().is_some();
                self.store.clear_selection();
                had
            }
            DesignerCommand::BumpZ(step) => {
                self.with_selected(|store, id| store.bump_z_index(id, step))
            }
            DesignerCommand::SwapLayer(direction) => {
                self.with_selected(|store, id| store.swap_with_neighbor(id, direction))
            }
            DesignerCommand::SetZIndex(z) => {
                self.with_selected(|store, id| store.set_z_index(id, z))
            }
            DesignerCommand::MoveBy { dx, dy } => {
                self.with_selected(|store, id| store.move_by(id, dx, dy))
            }
            DesignerCommand::MoveTo { x, y } => {
                self.with_selected(|store, id| store.move_to(id, x, y))
            }
            DesignerCommand::Resize { width, height } => {
                self.with_selected(|store, id| store.resize(id, width, height))
            }
            DesignerCommand::Rename(name) => {
                self.with_selected(|store, id| store.rename(id, name))
            }
            DesignerCommand::SetProperty { key, value } => {
                let Some(id) = self.store.selection().id() else {
                    return false;
                };
                match self.store.set_property(id, &key, value) {
                    Ok(changed) => changed,
                    Err(e) => {
                        self.status.warn(e.to_string());
                        false
                    }
                }
            }
            DesignerCommand::SetTool(tool) => {
                self.tools.set_tool(tool);
                true
            }
            DesignerCommand::ToggleLastTool => {
                self.tools.toggle_last();
                true
            }
            DesignerCommand::ZoomIn => {
                self.viewport.zoom_in();
                true
            }
            DesignerCommand::ZoomOut => {
                self.viewport.zoom_out();
                true
            }
            DesignerCommand::ZoomToFit => {
                self.viewport.zoom_to_fit();
                true
            }
            DesignerCommand::SetBackground(color) => self.set_background(color),
            DesignerCommand::RenameLayout(name) => self.rename_layout(name),
            DesignerCommand::SetResolution(resolution) => self.set_resolution(resolution),
        }
    }

    /// Parse and run a command script. Returns how many commands changed
    /// something; nothing runs if the script does not parse.
    pub fn run_script(&mut self, script: &str) -> Result<usize, String> {
        let commands = parse_script(script)?;
        let mut changed = 0;
        for command in commands {
            if self.execute(command) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// A click on the canvas at `(x, y)`. A creation tool places a new
    /// element there and hands control back to `select`; otherwise the
    /// top-most visible element under the point is selected, or the
    /// selection cleared. Returns the element now selected.
    pub fn click_canvas(&mut self, x: f64, y: f64) -> Option<ElementId> {
        if let Some(kind) = self.tools.active().creates() {
            let id = self.store.add_at(kind, Position::new(x, y)).id;
            self.tools.set_tool(Tool::Select);
            return Some(id);
        }
        match self.store.hit_test(x, y) {
            Some(id) => {
                self.store.select(id);
                Some(id)
            }
            None => {
                self.store.clear_selection();
                None
            }
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn with_selected(&mut self, f: impl FnOnce(&mut ElementStore, ElementId) -> bool) -> bool {
        match self.store.selection().id() {
            Some(id) => f(&mut self.store, id),
            None => false,
        }
    }

    /// Swap in a layout wholesale and mark it clean. Returns how many
    /// element ids had to be re-issued.
    fn open(&mut self, layout: Layout) -> usize {
        self.document += 1;
        self.header = LayoutHeader::from_layout(&layout);
        let reissued = self.store.replace_all(layout.elements);
        self.mark_clean();
        reissued
    }

    fn mark_clean(&mut self) {
        self.saved_revision = self.revision();
    }
}
