//! AssessmentModel backed by a hosted model.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::prompts::{AssessAccuracyPrompt, PromptTemplate, SYSTEM_INSTRUCTION};
use crate::structured::parse_structured;
use async_trait::async_trait;
use sleuth_core::assessment::{AccuracyAssessment, AssessmentModel};
use sleuth_core::claim::Claim;
use sleuth_core::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Scores a claim against an evidence blob.
///
/// The answer is decoded as-is; range checks on the score are left to the
/// caller.
#[derive(Clone)]
pub struct LlmAssessmentModel {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmAssessmentModel {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AssessmentModel for LlmAssessmentModel {
    async fn assess_accuracy(&self, claim: &Claim, evidence: &str) -> Result<AccuracyAssessment> {
        let prompt = AssessAccuracyPrompt::new(claim, evidence).to_prompt()?;
        let answer = self
            .backend
            .complete(CompletionRequest::json(prompt).with_system(SYSTEM_INSTRUCTION))
            .await?;

        let assessment: AccuracyAssessment = parse_structured(&answer, "Accuracy assessment")?;
        debug!(
            provider = self.backend.name(),
            score = assessment.accuracy_score,
            sources = assessment.sources.len(),
            "Accuracy assessed"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::error::UpstreamErrorKind;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn model(answer: &'static str) -> LlmAssessmentModel {
        LlmAssessmentModel::new(Arc::new(FixedBackend(answer)))
    }

    #[tokio::test]
    async fn test_parses_assessment() {
        let claim = Claim::parse("Water boils at 100C at sea level").unwrap();
        let assessment = model(
            r#"{"accuracyScore": 0.95, "explanation": "Standard physics.", "sources": ["https://example.org/boiling"]}"#,
        )
        .assess_accuracy(&claim, "Article text")
        .await
        .unwrap();

        assert_eq!(assessment.accuracy_score, 0.95);
        assert_eq!(assessment.sources, vec!["https://example.org/boiling"]);
    }

    #[tokio::test]
    async fn test_string_score_is_not_coerced() {
        let claim = Claim::parse("Claim").unwrap();
        let err = model(r#"{"accuracyScore": "0.5", "explanation": "x", "sources": []}"#)
            .assess_accuracy(&claim, "")
            .await
            .unwrap_err();
        assert_eq!(err.upstream_kind(), Some(UpstreamErrorKind::InvalidResponse));
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let claim = Claim::parse("Claim").unwrap();
        let err = model(r#"{"accuracyScore": 0.5, "explanation": "x"}"#)
            .assess_accuracy(&claim, "")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_returned_for_caller_to_judge() {
        let claim = Claim::parse("Claim").unwrap();
        let assessment = model(r#"{"accuracyScore": 1.7, "explanation": "x", "sources": []}"#)
            .assess_accuracy(&claim, "")
            .await
            .unwrap();
        assert!(assessment.validated().is_err());
    }
}
