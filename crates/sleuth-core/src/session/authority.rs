//! Session authority trait.

use super::model::{SessionIdentity, SessionToken};
use crate::error::Result;
use async_trait::async_trait;

/// Issues and verifies session tokens.
///
/// The authority is the only party allowed to turn a token into an identity;
/// clients never assert their own email.
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    /// Logs in with an email and issues a fresh token.
    ///
    /// # Returns
    ///
    /// - `Ok((token, identity))`: Session created
    /// - `Err(SleuthError::Validation)`: Email rejected
    async fn issue(&self, email: &str) -> Result<(SessionToken, SessionIdentity)>;

    /// Resolves a token to its identity.
    ///
    /// # Returns
    ///
    /// - `Ok(identity)`: Token is live
    /// - `Err(SleuthError::Unauthenticated)`: Unknown or revoked token
    async fn verify(&self, token: &SessionToken) -> Result<SessionIdentity>;

    /// Sets (or clears, with `None`) the display name of the session's user.
    async fn update_name(
        &self,
        token: &SessionToken,
        name: Option<String>,
    ) -> Result<SessionIdentity>;

    /// Ends the session. Revoking an unknown token is not an error.
    async fn revoke(&self, token: &SessionToken) -> Result<()>;
}
