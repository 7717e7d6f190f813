//! EvidenceSource backed by a hosted model.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::prompts::{FactCheckPrompt, FactCheckResponse, PromptTemplate, SYSTEM_INSTRUCTION};
use crate::structured::parse_structured;
use async_trait::async_trait;
use sleuth_core::claim::Claim;
use sleuth_core::error::Result;
use sleuth_core::evidence::{EvidenceSet, EvidenceSource};
use std::sync::Arc;
use tracing::debug;

/// Retrieves evidence by asking the model for related articles and fact-checks.
#[derive(Clone)]
pub struct LlmEvidenceSource {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmEvidenceSource {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl EvidenceSource for LlmEvidenceSource {
    async fn retrieve_evidence(&self, claim: &Claim) -> Result<EvidenceSet> {
        let prompt = FactCheckPrompt::new(claim).to_prompt()?;
        let answer = self
            .backend
            .complete(CompletionRequest::json(prompt).with_system(SYSTEM_INSTRUCTION))
            .await?;

        let response: FactCheckResponse = parse_structured(&answer, "Fact-check retrieval")?;
        debug!(
            provider = self.backend.name(),
            articles = response.articles.len(),
            "Evidence retrieved"
        );
        Ok(EvidenceSet::new(response.articles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::error::{SleuthError, UpstreamErrorKind};
    use std::sync::Mutex;

    /// Replays a canned answer and records the prompts it was sent.
    struct ScriptedBackend {
        answer: Result<String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedBackend {
        fn new(answer: Result<String>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request);
            self.answer.clone()
        }
    }

    #[tokio::test]
    async fn test_articles_keep_their_order() {
        let backend = ScriptedBackend::new(Ok(
            r#"{"articles": ["Snopes: false", "Reuters: misleading"]}"#.to_string(),
        ));
        let source = LlmEvidenceSource::new(backend.clone());
        let claim = Claim::parse("Bats are blind").unwrap();

        let evidence = source.retrieve_evidence(&claim).await.unwrap();
        assert_eq!(evidence.articles(), ["Snopes: false", "Reuters: misleading"]);

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].json);
        assert!(seen[0].prompt.contains("Claim: Bats are blind"));
    }

    #[tokio::test]
    async fn test_empty_article_list_is_valid() {
        let source = LlmEvidenceSource::new(ScriptedBackend::new(Ok(
            r#"{"articles": []}"#.to_string(),
        )));
        let claim = Claim::parse("Obscure claim").unwrap();
        assert!(source.retrieve_evidence(&claim).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_conforming_answer_fails() {
        let source = LlmEvidenceSource::new(ScriptedBackend::new(Ok(
            r#"{"results": ["x"]}"#.to_string(),
        )));
        let claim = Claim::parse("Claim").unwrap();
        let err = source.retrieve_evidence(&claim).await.unwrap_err();
        assert_eq!(err.upstream_kind(), Some(UpstreamErrorKind::InvalidResponse));
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let source = LlmEvidenceSource::new(ScriptedBackend::new(Err(SleuthError::upstream(
            UpstreamErrorKind::Unreachable,
            "connection refused",
        ))));
        let claim = Claim::parse("Claim").unwrap();
        let err = source.retrieve_evidence(&claim).await.unwrap_err();
        assert_eq!(err.upstream_kind(), Some(UpstreamErrorKind::Unreachable));
    }
}
