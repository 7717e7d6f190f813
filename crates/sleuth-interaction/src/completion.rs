//! Provider-neutral completion interface.

use async_trait::async_trait;
use sleuth_core::error::Result;

/// A single-turn request to a hosted model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Optional system instruction sent ahead of the prompt.
    pub system: Option<String>,
    pub prompt: String,
    /// Ask the provider to constrain output to a JSON object.
    pub json: bool,
}

impl CompletionRequest {
    /// Creates a request expecting a JSON object back.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            json: true,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// One round trip to a model API. Implementations never retry.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short provider label used in logs.
    fn name(&self) -> &str;

    /// Sends the request and returns the raw text of the first answer.
    ///
    /// # Errors
    ///
    /// `SleuthError::Upstream` for transport failures, non-success statuses
    /// and answers without text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
