//! Session domain models.

use crate::error::{Result, SleuthError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The authenticated user behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Unique user key; also the history tenant id.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SessionIdentity {
    /// Creates an identity from a login email.
    ///
    /// # Errors
    ///
    /// Returns `SleuthError::Validation` if the email is blank or has no `@`.
    pub fn from_email(email: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SleuthError::validation("Email is required to log in."));
        }
        if !email.contains('@') {
            return Err(SleuthError::validation(format!(
                "'{}' is not an email address.",
                email
            )));
        }
        Ok(Self {
            email: email.to_string(),
            name: None,
        })
    }

    /// Name to greet the user with, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Opaque bearer credential issued at login.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are secrets; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({}…)", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_email_trims_and_validates() {
        let identity = SessionIdentity::from_email("  ada@example.com ").unwrap();
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.display_name(), "ada@example.com");

        assert!(SessionIdentity::from_email("").unwrap_err().is_validation());
        assert!(SessionIdentity::from_email("ada").unwrap_err().is_validation());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::from_raw("abcdef0123456789");
        assert_eq!(format!("{:?}", token), "SessionToken(abcdef…)");
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }
}
