//! Directory-of-JSON-documents HistoryRepository implementation.

use crate::paths::{ServiceType, SleuthPaths};
use crate::storage::AtomicFile;
use async_trait::async_trait;
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::history::{EntryId, HistoryEntry, HistoryRepository};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// File-backed history collection.
///
/// Directory structure:
/// ```text
/// data_dir/
/// └── history/
///     ├── 550e8400-e29b-41d4-a716-446655440000.json
///     └── 6fa459ea-ee8a-4ca4-894e-db77e160355e.json
/// ```
///
/// Each document is written once, atomically, and never touched again.
pub struct JsonDirHistoryRepository {
    dir: PathBuf,
}

impl JsonDirHistoryRepository {
    /// Creates the repository in the default history directory.
    pub async fn from_paths(paths: &SleuthPaths) -> Result<Self> {
        Self::new(paths.get_path(ServiceType::History)).await
    }

    /// Creates the repository in `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!(dir = %dir.display(), error = %e, "Failed to create history directory");
            SleuthError::storage("Could not open your history.")
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, id: &EntryId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn read_entry(path: &Path) -> Result<Option<HistoryEntry>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            SleuthError::storage(format!("Corrupt history document {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl HistoryRepository for JsonDirHistoryRepository {
    async fn insert_one(&self, entry: &HistoryEntry) -> Result<()> {
        let path = self.entry_path(&entry.id);
        if tokio::fs::try_exists(&path).await? {
            return Err(SleuthError::storage(format!(
                "History entry {} already exists",
                entry.id
            )));
        }

        let entry = entry.clone();
        tokio::task::spawn_blocking(move || AtomicFile::<HistoryEntry>::json(path).save(&entry))
            .await
            .map_err(|e| SleuthError::internal(format!("History writer panicked: {}", e)))?
            .map_err(SleuthError::from)
    }

    async fn find_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;

        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(Some(entry)) if entry.belongs_to(user_id) => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable history document"),
            }
        }

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn find_one(&self, id: &EntryId, user_id: &str) -> Result<Option<HistoryEntry>> {
        let entry = Self::read_entry(&self.entry_path(id)).await?;
        Ok(entry.filter(|entry| entry.belongs_to(user_id)))
    }
}
