//! Evidence retrieval capability.

use super::model::EvidenceSet;
use crate::claim::Claim;
use crate::error::Result;
use async_trait::async_trait;

/// Retrieves articles and fact-checks related to a claim.
///
/// This trait decouples the orchestration logic from any specific knowledge
/// or model service, so deterministic fakes can stand in during tests.
///
/// # Implementation Notes
///
/// Implementations should:
/// - perform a single round trip (no retries, no caching, no pagination)
/// - fail with `SleuthError::Upstream` on transport errors or on any response
///   that does not conform to "array of strings"
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Retrieves evidence for the given claim.
    ///
    /// # Returns
    ///
    /// - `Ok(EvidenceSet)`: Retrieved articles, possibly none
    /// - `Err(_)`: Service failure or malformed response
    async fn retrieve_evidence(&self, claim: &Claim) -> Result<EvidenceSet>;
}
