//! History store.
//!
//! Wraps a [`HistoryRepository`] with argument validation, tenant filtering
//! and the user-facing error messages of the history feature.

use super::model::{EntryId, HistoryEntry};
use super::repository::HistoryRepository;
use crate::assessment::AccuracyAssessment;
use crate::claim::Claim;
use crate::error::{Result, SleuthError};
use crate::evidence::EvidenceSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Maximum number of entries returned by [`HistoryStore::list_entries`].
pub const HISTORY_LIST_LIMIT: usize = 50;

const SAVE_FAILED: &str = "Could not save your query to history.";
const LIST_FAILED: &str = "Could not retrieve your history.";
const GET_FAILED: &str = "Could not retrieve the specific history entry.";

/// Per-user history of completed fact-checks.
#[derive(Clone)]
pub struct HistoryStore {
    repository: Arc<dyn HistoryRepository>,
}

impl HistoryStore {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self { repository }
    }

    /// Persists a new entry for `user_id`.
    ///
    /// The identifier and timestamp are assigned here.
    ///
    /// # Errors
    ///
    /// - `SleuthError::Validation` if `user_id` is empty
    /// - `SleuthError::Storage` if the write fails
    pub async fn add_entry(
        &self,
        user_id: &str,
        claim: &Claim,
        evidence: Option<EvidenceSet>,
        assessment: Option<AccuracyAssessment>,
    ) -> Result<EntryId> {
        if user_id.is_empty() {
            return Err(SleuthError::validation(
                "User ID is required to save history.",
            ));
        }

        let entry = HistoryEntry::create(user_id, claim.clone(), evidence, assessment);
        match self.repository.insert_one(&entry).await {
            Ok(()) => {
                debug!(entry_id = %entry.id, user = user_id, "History entry saved");
                Ok(entry.id)
            }
            Err(e) => {
                error!(user = user_id, error = %e, "Failed to add history entry");
                Err(SleuthError::storage(SAVE_FAILED))
            }
        }
    }

    /// Lists the newest entries of `user_id`, at most [`HISTORY_LIST_LIMIT`].
    ///
    /// A user without entries gets an empty list.
    ///
    /// # Errors
    ///
    /// - `SleuthError::Validation` if `user_id` is empty
    /// - `SleuthError::Storage` if the read fails
    pub async fn list_entries(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        if user_id.is_empty() {
            return Err(SleuthError::validation(
                "User ID is required to fetch history.",
            ));
        }

        let mut entries = self
            .repository
            .find_by_user(user_id, HISTORY_LIST_LIMIT)
            .await
            .map_err(|e| {
                error!(user = user_id, error = %e, "Failed to get history entries");
                SleuthError::storage(LIST_FAILED)
            })?;

        entries.retain(|entry| entry.belongs_to(user_id));
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(HISTORY_LIST_LIMIT);
        Ok(entries)
    }

    /// Looks up one entry of `user_id`.
    ///
    /// Returns `Ok(None)` when the entry does not exist, belongs to somebody
    /// else, or `entry_id` is not a valid identifier.
    ///
    /// # Errors
    ///
    /// - `SleuthError::Validation` if either argument is empty
    /// - `SleuthError::Storage` on any other persistence fault
    pub async fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<Option<HistoryEntry>> {
        if user_id.is_empty() || entry_id.is_empty() {
            return Err(SleuthError::validation(
                "User ID and Entry ID are required.",
            ));
        }

        let Some(id) = EntryId::parse(entry_id) else {
            warn!(entry_id, "Invalid entryId format");
            return Ok(None);
        };

        let entry = self.repository.find_one(&id, user_id).await.map_err(|e| {
            error!(user = user_id, %id, error = %e, "Failed to get history entry by ID");
            SleuthError::storage(GET_FAILED)
        })?;

        Ok(entry.filter(|entry| entry.belongs_to(user_id)))
    }
}
