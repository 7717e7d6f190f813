//! ClaimSuggester backed by a hosted model.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::prompts::{InitialClaimPrompt, InitialClaimResponse, PromptTemplate};
use crate::structured::parse_structured;
use async_trait::async_trait;
use sleuth_core::claim::ClaimSuggester;
use sleuth_core::error::{Result, SleuthError};
use std::sync::Arc;

/// Proposes a claim for the user to investigate.
#[derive(Clone)]
pub struct LlmClaimSuggester {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmClaimSuggester {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ClaimSuggester for LlmClaimSuggester {
    async fn suggest_claim(&self) -> Result<String> {
        let prompt = InitialClaimPrompt::default().to_prompt()?;
        let answer = self.backend.complete(CompletionRequest::json(prompt)).await?;

        let response: InitialClaimResponse = parse_structured(&answer, "Claim suggestion")?;
        let claim = response.claim.trim();
        if claim.is_empty() {
            return Err(SleuthError::invalid_response(
                "Claim suggestion response contained an empty claim",
            ));
        }
        Ok(claim.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[tokio::test]
    async fn test_suggestion_is_trimmed() {
        let suggester = LlmClaimSuggester::new(Arc::new(FixedBackend(
            "```json\n{\"claim\": \"  Humans only use 10% of their brains. \"}\n```",
        )));
        assert_eq!(
            suggester.suggest_claim().await.unwrap(),
            "Humans only use 10% of their brains."
        );
    }

    #[tokio::test]
    async fn test_blank_suggestion_is_invalid() {
        let suggester = LlmClaimSuggester::new(Arc::new(FixedBackend(r#"{"claim": "   "}"#)));
        assert!(suggester.suggest_claim().await.unwrap_err().is_upstream());
    }
}
