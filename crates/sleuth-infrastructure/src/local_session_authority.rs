//! File-backed SessionAuthority implementation.

use crate::paths::{ServiceType, SleuthPaths};
use crate::storage::{AtomicFile, AtomicFileError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::session::{SessionAuthority, SessionIdentity, SessionToken};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{error, info};

const REGISTRY_UNAVAILABLE: &str = "Could not access the session registry.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionRegistry {
    #[serde(default, rename = "session")]
    sessions: Vec<SessionRecord>,
    #[serde(default, rename = "profile")]
    profiles: Vec<ProfileRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    token: SessionToken,
    email: String,
    issued_at: DateTime<Utc>,
}

/// Per-user data that outlives individual sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    email: String,
    name: String,
}

impl SessionRegistry {
    fn identity_for(&self, token: &SessionToken) -> Option<SessionIdentity> {
        let record = self.sessions.iter().find(|s| s.token == *token)?;
        let name = self
            .profiles
            .iter()
            .find(|p| p.email == record.email)
            .map(|p| p.name.clone());
        Some(SessionIdentity {
            email: record.email.clone(),
            name,
        })
    }
}

/// Issues opaque tokens and keeps the live ones in `sessions.toml`.
///
/// ```text
/// [[session]]
/// token = "3f2b..."
/// email = "ada@example.com"
/// issued_at = "2025-01-01T00:00:00Z"
///
/// [[profile]]
/// email = "ada@example.com"
/// name = "Ada"
/// ```
pub struct LocalSessionAuthority {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl LocalSessionAuthority {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn from_paths(paths: &SleuthPaths) -> Self {
        Self::new(paths.get_path(ServiceType::Sessions))
    }

    async fn load(&self) -> Result<SessionRegistry> {
        let file = AtomicFile::<SessionRegistry>::toml(self.path.clone());
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(join_error)?
            .map(Option::unwrap_or_default)
            .map_err(|e| registry_unavailable(&self.path, e))
    }

    /// Runs `f` as a locked read-modify-write of the registry.
    async fn update<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut SessionRegistry) -> Result<R> + Send + 'static,
    {
        let _guard = self.write_guard.lock().await;
        let file = AtomicFile::<SessionRegistry>::toml(self.path.clone());
        let outcome = tokio::task::spawn_blocking(move || {
            file.update(SessionRegistry::default(), |registry| {
                f(registry).map_err(UpdateError::Rejected)
            })
        })
        .await
        .map_err(join_error)?;

        outcome.map_err(|e| match e {
            UpdateError::File(e) => registry_unavailable(&self.path, e),
            UpdateError::Rejected(e) => e,
        })
    }
}

/// Failure of a registry update: the file itself, or the update closure.
enum UpdateError {
    File(AtomicFileError),
    Rejected(SleuthError),
}

impl From<AtomicFileError> for UpdateError {
    fn from(err: AtomicFileError) -> Self {
        Self::File(err)
    }
}

fn join_error(err: tokio::task::JoinError) -> SleuthError {
    SleuthError::internal(format!("Session registry task failed: {}", err))
}

/// Logs the file fault and hides its details from the user.
fn registry_unavailable(path: &Path, err: AtomicFileError) -> SleuthError {
    error!(path = %path.display(), error = %err, "Session registry is unusable");
    SleuthError::storage(REGISTRY_UNAVAILABLE)
}

#[async_trait]
impl SessionAuthority for LocalSessionAuthority {
    async fn issue(&self, email: &str) -> Result<(SessionToken, SessionIdentity)> {
        let mut identity = SessionIdentity::from_email(email)?;
        let token = SessionToken::generate();

        let record = SessionRecord {
            token: token.clone(),
            email: identity.email.clone(),
            issued_at: Utc::now(),
        };
        let email = identity.email.clone();
        identity.name = self
            .update(move |registry| {
                registry.sessions.push(record);
                Ok(registry
                    .profiles
                    .iter()
                    .find(|p| p.email == email)
                    .map(|p| p.name.clone()))
            })
            .await?;

        info!(user = %identity.email, "Session issued");
        Ok((token, identity))
    }

    async fn verify(&self, token: &SessionToken) -> Result<SessionIdentity> {
        self.load()
            .await?
            .identity_for(token)
            .ok_or_else(|| SleuthError::unauthenticated("session is unknown or has ended"))
    }

    async fn update_name(
        &self,
        token: &SessionToken,
        name: Option<String>,
    ) -> Result<SessionIdentity> {
        let token = token.clone();
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        self.update(move |registry| {
            let email = registry
                .identity_for(&token)
                .ok_or_else(|| SleuthError::unauthenticated("session is unknown or has ended"))?
                .email;

            registry.profiles.retain(|p| p.email != email);
            if let Some(name) = name {
                registry.profiles.push(ProfileRecord {
                    email: email.clone(),
                    name,
                });
            }
            registry
                .identity_for(&token)
                .ok_or_else(|| SleuthError::internal("session vanished during update"))
        })
        .await
    }

    async fn revoke(&self, token: &SessionToken) -> Result<()> {
        let token = token.clone();
        let removed = self
            .update(move |registry| {
                let before = registry.sessions.len();
                registry.sessions.retain(|s| s.token != token);
                Ok(before != registry.sessions.len())
            })
            .await?;
        if removed {
            info!("Session revoked");
        }
        Ok(())
    }
}
