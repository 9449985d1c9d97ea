//! Media-source store — the list of scraped news sites, kept as a JSON
//! array in a single file (`media-sources.json` by default).

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::source::{MediaSource, NewMediaSource};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed sources file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid source: {0}")]
    Invalid(String),

    #[error("Source {0} not found")]
    NotFound(Uuid),
}

/// File-backed source list. Clones share one write lock.
#[derive(Clone)]
pub struct SourceStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl SourceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All sources in insertion order. A missing file is an empty list.
    pub async fn list(&self) -> Result<Vec<MediaSource>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn add(&self, new: NewMediaSource) -> Result<MediaSource, StoreError> {
        let name = new.name.trim();
        let url = new.url.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("name cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StoreError::Invalid(format!(
                "url must start with http:// or https://, got '{url}'"
            )));
        }

        let _guard = self.lock.lock().await;
        let mut sources = self.read().await?;
        if sources.iter().any(|s| s.url.eq_ignore_ascii_case(url)) {
            return Err(StoreError::Invalid(format!("source with url '{url}' already exists")));
        }

        let source = MediaSource {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
        };
        sources.push(source.clone());
        self.write(&sources).await?;

        info!("Added media source '{}' ({})", source.name, source.url);
        Ok(source)
    }

    pub async fn remove(&self, id: Uuid) -> Result<MediaSource, StoreError> {
        let _guard = self.lock.lock().await;
        let mut sources = self.read().await?;
        let position = sources
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = sources.remove(position);
        self.write(&sources).await?;

        info!("Removed media source '{}'", removed.name);
        Ok(removed)
    }

    async fn read(&self) -> Result<Vec<MediaSource>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Writes to a sibling temp file, then renames over the target.
    async fn write(&self, sources: &[MediaSource]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(sources).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
