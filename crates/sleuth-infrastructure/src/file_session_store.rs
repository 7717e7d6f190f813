//! Client-side SessionStore implementations.

use crate::paths::{ServiceType, SleuthPaths};
use crate::storage::{AtomicFile, AtomicFileError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::session::{SessionStore, SessionToken};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::error;

const LOGIN_UNAVAILABLE: &str = "Could not access your saved login.";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurrentSession {
    token: SessionToken,
}

/// Keeps the current token in `current_session.toml`, so a login survives
/// between CLI invocations.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &SleuthPaths) -> Self {
        Self::new(paths.get_path(ServiceType::CurrentSession))
    }

    fn file(&self) -> AtomicFile<CurrentSession> {
        AtomicFile::toml(self.path.clone())
    }

    async fn run<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(AtomicFile<CurrentSession>) -> std::result::Result<R, AtomicFileError>
            + Send
            + 'static,
    {
        let file = self.file();
        tokio::task::spawn_blocking(move || f(file))
            .await
            .map_err(|e| SleuthError::internal(format!("Session file task failed: {}", e)))?
            .map_err(|e| login_unavailable(&self.path, e))
    }
}

/// Logs the file fault and hides its details from the user.
fn login_unavailable(path: &Path, err: AtomicFileError) -> SleuthError {
    error!(path = %path.display(), error = %err, "Session file is unusable");
    SleuthError::storage(LOGIN_UNAVAILABLE)
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn current_token(&self) -> Result<Option<SessionToken>> {
        self.run(|file| Ok(file.load()?.map(|current| current.token)))
            .await
    }

    async fn store_token(&self, token: &SessionToken) -> Result<()> {
        let current = CurrentSession {
            token: token.clone(),
        };
        self.run(move |file| file.save(&current)).await
    }

    async fn clear(&self) -> Result<()> {
        self.run(|file| file.remove()).await
    }
}

/// Token holder for a single process (`--ephemeral` runs and tests).
#[derive(Default)]
pub struct InMemorySessionStore {
    token: RwLock<Option<SessionToken>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn current_token(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.read().await.clone())
    }

    async fn store_token(&self, token: &SessionToken) -> Result<()> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::from_paths(&SleuthPaths::rooted(temp_dir.path()));
        assert!(store.current_token().await.unwrap().is_none());

        let token = SessionToken::generate();
        store.store_token(&token).await.unwrap();

        let reopened = FileSessionStore::from_paths(&SleuthPaths::rooted(temp_dir.path()));
        assert_eq!(reopened.current_token().await.unwrap(), Some(token));

        reopened.clear().await.unwrap();
        reopened.clear().await.unwrap();
        assert!(store.current_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_hides_details() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("current_session.toml");
        std::fs::write(&path, "token = [").unwrap();
        let store = FileSessionStore::new(&path);

        let err = store.current_token().await.unwrap_err();
        assert_eq!(err, SleuthError::storage(LOGIN_UNAVAILABLE));
        assert!(!err.user_message().contains("current_session.toml"));

        // Overwriting repairs it
        let token = SessionToken::generate();
        store.store_token(&token).await.unwrap();
        assert_eq!(store.current_token().await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn test_memory_store_replaces_token() {
        let store = InMemorySessionStore::new();
        let first = SessionToken::generate();
        let second = SessionToken::generate();

        store.store_token(&first).await.unwrap();
        store.store_token(&second).await.unwrap();
        assert_eq!(store.current_token().await.unwrap(), Some(second));

        store.clear().await.unwrap();
        assert!(store.current_token().await.unwrap().is_none());
    }
}
