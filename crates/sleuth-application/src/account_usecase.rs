//! Login, logout and profile operations.

use sleuth_core::error::{Result, SleuthError};
use sleuth_core::session::{SessionContext, SessionIdentity};
use tracing::{info, warn};

/// Use case for the current user's session and profile.
#[derive(Clone)]
pub struct AccountUseCase {
    session: SessionContext,
}

impl AccountUseCase {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    /// Logs in as `email`, replacing any current session.
    ///
    /// # Errors
    ///
    /// `SleuthError::Validation` if the email is blank or malformed. The
    /// current session is left untouched in that case, and also when the new
    /// token cannot be stored.
    pub async fn login(&self, email: &str) -> Result<SessionIdentity> {
        let (token, identity) = self.session.authority().issue(email).await?;

        // An unreadable token file is replaced below.
        let previous = match self.session.store().current_token().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "Could not read previous session");
                None
            }
        };

        if let Err(e) = self.session.store().store_token(&token).await {
            if let Err(revoke_err) = self.session.authority().revoke(&token).await {
                warn!(error = %revoke_err, "Failed to revoke unstored session");
            }
            return Err(e);
        }

        if let Some(previous) = previous {
            if let Err(e) = self.session.authority().revoke(&previous).await {
                warn!(error = %e, "Failed to revoke previous session");
            }
        }

        info!(user = %identity.email, "Logged in");
        Ok(identity)
    }

    /// Ends the current session. Returns `false` if nobody was logged in.
    pub async fn logout(&self) -> Result<bool> {
        let Some(token) = self.session.store().current_token().await? else {
            return Ok(false);
        };

        // Forget the token locally even if the authority is unreachable.
        let revoked = self.session.authority().revoke(&token).await;
        self.session.store().clear().await?;
        revoked?;

        info!("Logged out");
        Ok(true)
    }

    /// The verified identity of the current session, if any.
    pub async fn whoami(&self) -> Result<Option<SessionIdentity>> {
        self.session.current_identity().await
    }

    /// Sets the display name; `None` or a blank name clears it.
    pub async fn update_name(&self, name: Option<String>) -> Result<SessionIdentity> {
        let Some((token, _)) = self.session.current().await? else {
            return Err(SleuthError::validation(
                "You must be logged in to update your profile.",
            ));
        };
        let identity = self.session.authority().update_name(&token, name).await?;
        info!(user = %identity.email, "Profile updated");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sleuth_core::session::{SessionAuthority, SessionStore, SessionToken};
    use sleuth_infrastructure::{InMemorySessionStore, LocalSessionAuthority};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Holds a token but refuses to replace it.
    struct ReadOnlyStore {
        current: Option<SessionToken>,
        attempted: Mutex<Option<SessionToken>>,
    }

    #[async_trait]
    impl SessionStore for ReadOnlyStore {
        async fn current_token(&self) -> Result<Option<SessionToken>> {
            Ok(self.current.clone())
        }

        async fn store_token(&self, token: &SessionToken) -> Result<()> {
            *self.attempted.lock().unwrap() = Some(token.clone());
            Err(SleuthError::storage("Could not access your saved login."))
        }

        async fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    fn account(temp_dir: &TempDir) -> AccountUseCase {
        AccountUseCase::new(SessionContext::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(LocalSessionAuthority::new(temp_dir.path().join("sessions.toml"))),
        ))
    }

    #[tokio::test]
    async fn test_login_whoami_logout() {
        let temp_dir = TempDir::new().unwrap();
        let account = account(&temp_dir);

        assert!(account.whoami().await.unwrap().is_none());
        account.login("ada@example.com").await.unwrap();
        assert_eq!(
            account.whoami().await.unwrap().unwrap().email,
            "ada@example.com"
        );

        assert!(account.logout().await.unwrap());
        assert!(account.whoami().await.unwrap().is_none());
        assert!(!account.logout().await.unwrap());
    }

    #[tokio::test]
    async fn test_relogin_revokes_previous_token() {
        let temp_dir = TempDir::new().unwrap();
        let account = account(&temp_dir);

        account.login("ada@example.com").await.unwrap();
        let first = account.session.store().current_token().await.unwrap().unwrap();
        account.login("eve@example.com").await.unwrap();

        let err = account.session.authority().verify(&first).await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert_eq!(account.whoami().await.unwrap().unwrap().email, "eve@example.com");
    }

    #[tokio::test]
    async fn test_bad_email_keeps_current_session() {
        let temp_dir = TempDir::new().unwrap();
        let account = account(&temp_dir);
        account.login("ada@example.com").await.unwrap();

        assert!(account.login("not-an-email").await.unwrap_err().is_validation());
        assert!(account.whoami().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unstored_login_is_revoked_and_keeps_previous() {
        let temp_dir = TempDir::new().unwrap();
        let authority = Arc::new(LocalSessionAuthority::new(
            temp_dir.path().join("sessions.toml"),
        ));
        let (previous, _) = authority.issue("ada@example.com").await.unwrap();
        let store = Arc::new(ReadOnlyStore {
            current: Some(previous.clone()),
            attempted: Mutex::new(None),
        });
        let account = AccountUseCase::new(SessionContext::new(store.clone(), authority.clone()));

        let err = account.login("eve@example.com").await.unwrap_err();
        assert!(err.is_storage());

        let attempted = store.attempted.lock().unwrap().clone().unwrap();
        assert!(authority.verify(&attempted).await.unwrap_err().is_unauthenticated());
        assert_eq!(
            authority.verify(&previous).await.unwrap().email,
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn test_update_name() {
        let temp_dir = TempDir::new().unwrap();
        let account = account(&temp_dir);

        let err = account.update_name(Some("Ada".to_string())).await.unwrap_err();
        assert!(err.is_validation());

        account.login("ada@example.com").await.unwrap();
        let identity = account.update_name(Some("Ada".to_string())).await.unwrap();
        assert_eq!(identity.display_name(), "Ada");

        let cleared = account.update_name(None).await.unwrap();
        assert_eq!(cleared.display_name(), "ada@example.com");
    }
}
