use crate::{LayoutStorage, StorageError};
use async_trait::async_trait;
use sd_core::{Layout, LayoutId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process layout storage. Layouts are cloned in and out, so callers
/// never share state with the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    layouts: RwLock<HashMap<LayoutId, Layout>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `layouts`.
    pub fn with_layouts(layouts: impl IntoIterator<Item = Layout>) -> Self {
        let map = layouts.into_iter().map(|l| (l.id.clone(), l)).collect();
        Self {
            layouts: RwLock::new(map),
        }
    }

    pub async fn len(&self) -> usize {
        self.layouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.layouts.read().await.is_empty()
    }
}

#[async_trait]
impl LayoutStorage for MemoryStore {
    async fn get_layout_by_id(&self, id: &LayoutId) -> Result<Option<Layout>, StorageError> {
        Ok(self.layouts.read().await.get(id).cloned())
    }

    async fn update_layout(&self, layout: &Layout) -> Result<(), StorageError> {
        log::debug!(
            "memory store: saving layout {} ({} elements)",
            layout.id,
            layout.elements.len()
        );
        self.layouts
            .write()
            .await
            .insert(layout.id.clone(), layout.clone());
        Ok(())
    }
}
