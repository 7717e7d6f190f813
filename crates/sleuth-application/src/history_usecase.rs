//! Reading the current user's history.

use sleuth_core::error::Result;
use sleuth_core::history::{HistoryEntry, HistoryStore};
use sleuth_core::session::SessionContext;

/// History reads on behalf of the verified session.
///
/// The user id is never taken from the caller; it always comes from the
/// session authority.
#[derive(Clone)]
pub struct HistoryUseCase {
    session: SessionContext,
    history: HistoryStore,
}

impl HistoryUseCase {
    pub fn new(session: SessionContext, history: HistoryStore) -> Self {
        Self { session, history }
    }

    /// Newest entries first, at most fifty.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let identity = self.session.require_identity().await?;
        self.history.list_entries(&identity.email).await
    }

    /// One entry by id; `None` for unknown, foreign or malformed ids.
    pub async fn show(&self, entry_id: &str) -> Result<Option<HistoryEntry>> {
        let identity = self.session.require_identity().await?;
        self.history.get_entry(&identity.email, entry_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::claim::Claim;
    use sleuth_infrastructure::{
        InMemoryHistoryRepository, InMemorySessionStore, LocalSessionAuthority,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_are_scoped_to_session() {
        let temp_dir = TempDir::new().unwrap();
        let session = SessionContext::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(LocalSessionAuthority::new(temp_dir.path().join("sessions.toml"))),
        );
        let history = HistoryStore::new(Arc::new(InMemoryHistoryRepository::new()));
        let usecase = HistoryUseCase::new(session.clone(), history.clone());

        assert!(usecase.list().await.unwrap_err().is_validation());

        let theirs = history
            .add_entry("eve@example.com", &Claim::parse("Eve's").unwrap(), None, None)
            .await
            .unwrap();
        let mine = history
            .add_entry("ada@example.com", &Claim::parse("Ada's").unwrap(), None, None)
            .await
            .unwrap();

        let (token, _) = session.authority().issue("ada@example.com").await.unwrap();
        session.store().store_token(&token).await.unwrap();

        let listed = usecase.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine);
        assert!(usecase.show(&theirs.to_string()).await.unwrap().is_none());
        assert!(usecase.show(&mine.to_string()).await.unwrap().is_some());
        assert!(usecase.show("507f1f77bcf86cd799439011").await.unwrap().is_none());
    }
}
