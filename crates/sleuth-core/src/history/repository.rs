//! History repository trait.
//!
//! Defines the document-collection contract the history store is built on.

use super::model::{EntryId, HistoryEntry};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract collection of history documents.
///
/// This trait decouples the history store from the specific storage mechanism
/// (JSON files, in-memory, a document database). Entries are immutable, so
/// implementations only need single-document atomic inserts and filtered reads.
///
/// # Implementation Notes
///
/// Every read must be filtered by `user_id`. The store filters again on top,
/// but implementations should not rely on that.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Inserts a single entry.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entry stored
    /// - `Err(_)`: Error occurred during write
    async fn insert_one(&self, entry: &HistoryEntry) -> Result<()>;

    /// Finds the entries of one user, newest first, at most `limit`.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<HistoryEntry>)`: Matching entries (possibly empty)
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Finds one entry by id, restricted to `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))`: Entry found and owned by `user_id`
    /// - `Ok(None)`: No such entry for this user
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_one(&self, id: &EntryId, user_id: &str) -> Result<Option<HistoryEntry>>;
}
