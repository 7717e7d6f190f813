//! Claim domain model and the claim suggestion capability.

use crate::error::{Result, SleuthError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-supplied statement to be fact-checked.
///
/// The text is kept exactly as entered. The only rule enforced here is that
/// it contains something other than whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim(String);

impl Claim {
    /// Validates and wraps a claim.
    ///
    /// # Errors
    ///
    /// Returns `SleuthError::Validation` if the text is empty or whitespace-only.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SleuthError::validation("Claim cannot be empty."));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Claim {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces a starting claim for users who have not typed one yet.
#[async_trait]
pub trait ClaimSuggester: Send + Sync {
    /// Returns a single short, checkable claim.
    async fn suggest_claim(&self) -> Result<String>;
}
