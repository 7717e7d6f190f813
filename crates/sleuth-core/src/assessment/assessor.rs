//! Accuracy scoring capability.

use super::model::AccuracyAssessment;
use crate::claim::Claim;
use crate::error::Result;
use async_trait::async_trait;

/// Scores a claim against an evidence blob.
///
/// Implementations perform a single round trip and must fail with
/// `SleuthError::Upstream` on any schema mismatch rather than coercing the
/// response. Range checking of the score is the caller's job.
#[async_trait]
pub trait AssessmentModel: Send + Sync {
    /// Assesses `claim` using `evidence`, which may be empty.
    async fn assess_accuracy(&self, claim: &Claim, evidence: &str) -> Result<AccuracyAssessment>;
}
