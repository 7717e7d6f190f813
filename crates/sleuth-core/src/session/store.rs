//! Client-side session store trait.

use super::model::SessionToken;
use crate::error::Result;
use async_trait::async_trait;

/// Holds the token of the current session on the client side.
///
/// Durability is up to the implementation (a file, memory, a keychain).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current token, if logged in.
    async fn current_token(&self) -> Result<Option<SessionToken>>;

    /// Replaces the current token.
    async fn store_token(&self, token: &SessionToken) -> Result<()>;

    /// Forgets the current token.
    async fn clear(&self) -> Result<()>;
}
