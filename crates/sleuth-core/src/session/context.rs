//! Resolution of the current session.

use super::authority::SessionAuthority;
use super::model::{SessionIdentity, SessionToken};
use super::store::SessionStore;
use crate::error::{Result, SleuthError};
use std::sync::Arc;
use tracing::warn;

/// Combines the client-side token holder with the authority that verifies it.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    authority: Arc<dyn SessionAuthority>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>, authority: Arc<dyn SessionAuthority>) -> Self {
        Self { store, authority }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn authority(&self) -> &Arc<dyn SessionAuthority> {
        &self.authority
    }

    /// Returns the verified identity of the current session.
    ///
    /// A token the authority no longer recognises counts as "not logged in".
    pub async fn current_identity(&self) -> Result<Option<SessionIdentity>> {
        Ok(self.current().await?.map(|(_, identity)| identity))
    }

    /// Returns the current token together with its verified identity.
    pub async fn current(&self) -> Result<Option<(SessionToken, SessionIdentity)>> {
        let Some(token) = self.store.current_token().await? else {
            return Ok(None);
        };

        match self.authority.verify(&token).await {
            Ok(identity) => Ok(Some((token, identity))),
            Err(SleuthError::Unauthenticated(reason)) => {
                warn!(%reason, "Stored session token was rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`current_identity`](Self::current_identity), but a missing
    /// session is a validation error.
    pub async fn require_identity(&self) -> Result<SessionIdentity> {
        self.current_identity()
            .await?
            .ok_or_else(|| SleuthError::validation("You must be logged in to do that."))
    }
}
