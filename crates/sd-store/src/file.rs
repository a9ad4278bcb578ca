//! File-backed layout storage: one file per layout in a directory.
//!
//! File names are `<layout id>.<ext>`, where the extension follows the
//! configured [`Encoding`]. Writes go to a sibling temp file which is then
//! renamed over the target, so a crash mid-write leaves the previous
//! version intact.

use crate::{LayoutStorage, StorageError};
use async_trait::async_trait;
use sd_core::{Layout, LayoutId};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// On-disk encoding of a layout file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Pretty-printed JSON (`.json`).
    #[default]
    Json,
    /// MessagePack with named fields (`.msgpack`).
    MessagePack,
}

impl Encoding {
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::MessagePack => "msgpack",
        }
    }

    pub fn encode(self, layout: &Layout) -> Result<Vec<u8>, StorageError> {
        Ok(match self {
            Encoding::Json => serde_json::to_vec_pretty(layout)?,
            Encoding::MessagePack => rmp_serde::to_vec_named(layout)?,
        })
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Layout, StorageError> {
        Ok(match self {
            Encoding::Json => serde_json::from_slice(bytes)?,
            Encoding::MessagePack => rmp_serde::from_slice(bytes)?,
        })
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "msgpack" | "messagepack" => Ok(Encoding::MessagePack),
            other => Err(format!("unknown encoding `{other}` (expected json or msgpack)")),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Layout storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    encoding: Encoding,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>, encoding: Encoding) -> Self {
        Self {
            root: root.into(),
            encoding,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Path of the file holding `id`. Ids are restricted to
    /// `[A-Za-z0-9_-]` so they can never escape the root directory.
    pub fn path_for(&self, id: &LayoutId) -> Result<PathBuf, StorageError> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidId(raw.to_string()));
        }
        Ok(self
            .root
            .join(format!("{raw}.{}", self.encoding.extension())))
    }

    /// Ids of every layout stored in this encoding, sorted.
    pub async fn list_layouts(&self) -> Result<Vec<LayoutId>, StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.root.clone(),
            source,
        };
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.encoding.extension()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(LayoutId::from(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl LayoutStorage for FileStore {
    async fn get_layout_by_id(&self, id: &LayoutId) -> Result<Option<Layout>, StorageError> {
        let path = self.path_for(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("file store: no layout at {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        let layout = self.encoding.decode(&bytes)?;
        log::debug!(
            "file store: loaded {} ({} elements) from {}",
            layout.id,
            layout.elements.len(),
            path.display()
        );
        Ok(Some(layout))
    }

    async fn update_layout(&self, layout: &Layout) -> Result<(), StorageError> {
        let path = self.path_for(&layout.id)?;
        let bytes = self.encoding.encode(layout)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;

        let tmp = path.with_extension(format!("{}.tmp", self.encoding.extension()));
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Io { path, source });
        }

        log::debug!(
            "file store: wrote {} ({} bytes) to {}",
            layout.id,
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}
