//! Process-local HistoryRepository implementation.

use async_trait::async_trait;
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::history::{EntryId, HistoryEntry, HistoryRepository};
use tokio::sync::RwLock;

/// History collection that lives only as long as the process.
///
/// Used by tests and by `--ephemeral` runs.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all users.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn insert_one(&self, entry: &HistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(SleuthError::storage(format!(
                "History entry {} already exists",
                entry.id
            )));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut found: Vec<HistoryEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.belongs_to(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        found.truncate(limit);
        Ok(found)
    }

    async fn find_one(&self, id: &EntryId, user_id: &str) -> Result<Option<HistoryEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == *id && entry.belongs_to(user_id))
            .cloned())
    }
}
