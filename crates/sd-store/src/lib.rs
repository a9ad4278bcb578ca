//! Layout storage: the persistence boundary of the designer.
//!
//! The designer only ever talks to a [`LayoutStorage`]. Two backends ship
//! here: [`MemoryStore`] for tests and embedding, and [`FileStore`] which
//! keeps one JSON or MessagePack file per layout.

pub mod file;
pub mod memory;

pub use file::{Encoding, FileStore};
pub use memory::MemoryStore;

use async_trait::async_trait;
use sd_core::{Layout, LayoutId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors a storage backend may report. The designer never propagates
/// these past its status log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode layout as MessagePack: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("invalid layout MessagePack: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// The id cannot be mapped to a storage key.
    #[error("invalid layout id `{0}`")]
    InvalidId(String),

    /// Backend-specific failure (connection lost, quota, …).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous layout persistence.
///
/// Both calls are all-or-nothing: a failed `update_layout` must not leave a
/// partially written layout behind.
#[async_trait]
pub trait LayoutStorage: Send + Sync {
    /// Fetch a layout. `Ok(None)` when no layout has this id.
    async fn get_layout_by_id(&self, id: &LayoutId) -> Result<Option<Layout>, StorageError>;

    /// Insert or replace a layout, keyed by `layout.id`.
    async fn update_layout(&self, layout: &Layout) -> Result<(), StorageError>;
}
