//! Integration tests: designer load/save against layout storage (sd-editor).

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sd_core::{Color, ElementId, ElementKind, Layout, LayoutId, PropValue};
use sd_editor::{Designer, DesignerCommand, DesignerConfig, StatusLevel, StatusLog};
use sd_store::{Encoding, FileStore, LayoutStorage, MemoryStore, StorageError};

/// Storage whose every call fails.
struct Offline;

#[async_trait]
impl LayoutStorage for Offline {
    async fn get_layout_by_id(&self, _id: &LayoutId) -> Result<Option<Layout>, StorageError> {
        Err(StorageError::Unavailable("network down".into()))
    }

    async fn update_layout(&self, _layout: &Layout) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("network down".into()))
    }
}

fn designer() -> Designer {
    Designer::new(DesignerConfig::default(), StatusLog::default())
}

fn edited_designer() -> Designer {
    let mut d = designer();
    d.rename_layout("Menu Board");
    d.execute(DesignerCommand::Add(ElementKind::Text));
    d.execute(DesignerCommand::Add(ElementKind::Image));
    d
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let storage = MemoryStore::new();
    let mut d = edited_designer();
    assert!(d.is_dirty());
    assert!(d.save(&storage).await);
    assert!(!d.is_dirty());

    let saved = d.layout_snapshot();
    let mut other = designer();
    assert!(other.load(&storage, &saved.id).await);
    assert_eq!(other.layout_snapshot(), saved);
    assert!(!other.is_dirty());
    assert_eq!(other.store().selection().id(), None);
}

#[tokio::test]
async fn missing_layout_keeps_current_document() {
    let storage = MemoryStore::new();
    let mut d = edited_designer();
    let before = d.layout_snapshot();

    assert!(!d.load(&storage, &LayoutId::from("nope")).await);
    assert_eq!(d.layout_snapshot(), before);
    assert!(d.is_dirty());
    assert_eq!(d.status().latest().unwrap().level, StatusLevel::Warning);
}

#[tokio::test]
async fn load_error_keeps_current_document() {
    let mut d = edited_designer();
    let before = d.layout_snapshot();

    assert!(!d.load(&Offline, &before.id).await);
    assert_eq!(d.layout_snapshot(), before);
    let entry = d.status().latest().unwrap();
    assert_eq!(entry.level, StatusLevel::Error);
    assert!(entry.message.contains("network down"), "{}", entry.message);
}

#[tokio::test]
async fn failed_save_stays_dirty() {
    let mut d = edited_designer();
    let before = d.layout_snapshot();

    assert!(!d.save(&Offline).await);
    assert!(d.is_dirty());
    assert_eq!(d.layout_snapshot(), before);
    assert_eq!(d.status().latest().unwrap().level, StatusLevel::Error);
}

#[tokio::test]
async fn edit_during_save_stays_dirty() {
    let storage = MemoryStore::new();
    let mut d = edited_designer();

    let pending = d.save_request();
    d.set_background(Color::WHITE);
    let receipt = pending.send(&storage).await;
    assert!(d.finish_save(receipt));
    assert!(d.is_dirty());

    // storage holds the snapshot, not the later edit
    let id = d.header().id.clone();
    let stored = storage.get_layout_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.background_color, Color::BLACK);

    assert!(d.save(&storage).await);
    assert!(!d.is_dirty());
}

#[tokio::test]
async fn repeated_ids_are_reissued_on_load() {
    let mut layout = Layout::new("Clashing");
    let mut first = sd_core::Element::new(ElementId::intern("dup"), ElementKind::Text);
    first.z_index = 0;
    let mut second = sd_core::Element::new(ElementId::intern("dup"), ElementKind::Circle);
    second.z_index = 1;
    layout.elements = vec![first, second];
    let storage = MemoryStore::with_layouts([layout.clone()]);

    let mut d = designer();
    assert!(d.load(&storage, &layout.id).await);
    let ids: Vec<ElementId> = d.store().elements().iter().map(|e| e.id).collect();
    assert_eq!(ids[0], ElementId::intern("dup"));
    assert_ne!(ids[1], ids[0]);
    assert!(d.layout_snapshot().has_unique_ids());

    let levels: Vec<StatusLevel> = d.status().entries().iter().map(|e| e.level).collect();
    assert!(levels.contains(&StatusLevel::Warning));
}

#[tokio::test]
async fn new_layout_replaces_document() {
    let storage = MemoryStore::new();
    let mut d = edited_designer();
    d.save(&storage).await;
    let old_id = d.header().id.clone();

    d.new_layout("Fresh");
    assert_ne!(d.header().id, old_id);
    assert_eq!(d.header().name, "Fresh");
    assert!(d.store().is_empty());
    assert!(!d.is_dirty());
}

#[tokio::test]
async fn overflowing_numbers_never_reach_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path(), Encoding::Json);
    let huge = "9".repeat(400);

    let mut d = designer();
    d.execute(DesignerCommand::Add(ElementKind::Text));
    assert!(d.run_script(&format!("move {huge} 0")).is_err());
    assert!(!d.execute(DesignerCommand::MoveBy {
        dx: f64::INFINITY,
        dy: 0.0
    }));
    assert!(!d.execute(DesignerCommand::SetProperty {
        key: "fontSize".into(),
        value: PropValue::Number(f64::NAN),
    }));
    assert!(!d.execute(DesignerCommand::SetProperty {
        key: "fontSize".into(),
        value: PropValue::Text(huge),
    }));
    assert!(d.save(&storage).await);

    let saved = d.layout_snapshot();
    let mut reopened = designer();
    assert!(reopened.load(&storage, &saved.id).await);
    assert_eq!(reopened.layout_snapshot(), saved);
    let text = &reopened.store().elements()[0];
    assert_eq!(text.position.x, 100.0);
    assert_eq!(text.property("fontSize"), Some(PropValue::Number(24.0)));
}

#[tokio::test]
async fn save_finishing_after_switch_leaves_new_document_alone() {
    let storage = MemoryStore::new();
    let mut d = edited_designer();
    let old_id = d.header().id.clone();

    let pending = d.save_request();
    d.new_layout("Next");
    d.execute(DesignerCommand::Add(ElementKind::Circle));
    let receipt = pending.send(&storage).await;
    assert!(d.finish_save(receipt));

    // the old layout was written, the open one is still unsaved
    assert!(storage.get_layout_by_id(&old_id).await.unwrap().is_some());
    assert_eq!(d.header().name, "Next");
    assert!(d.is_dirty());
    let latest = d.status().latest().unwrap().message;
    assert!(latest.contains("Menu Board"), "{latest}");
}
