//! Builds the model-backed services from configuration.

use crate::completion::CompletionBackend;
use crate::gemini_api_backend::{DEFAULT_GEMINI_MODEL, GeminiApiBackend};
use crate::llm_assessment_model::LlmAssessmentModel;
use crate::llm_claim_suggester::LlmClaimSuggester;
use crate::llm_evidence_source::LlmEvidenceSource;
use crate::openai_api_backend::{DEFAULT_OPENAI_MODEL, OpenAIApiBackend};
use sleuth_core::assessment::AssessmentModel;
use sleuth_core::claim::ClaimSuggester;
use sleuth_core::config::{ModelProvider, ModelSettings, SecretConfig};
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::evidence::EvidenceSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Creates the completion backend selected by `settings`.
///
/// # Errors
///
/// `SleuthError::Config` when no API key is available for the provider.
pub fn build_backend(
    settings: &ModelSettings,
    secrets: &SecretConfig,
) -> Result<Arc<dyn CompletionBackend>> {
    let api_key = secrets.api_key_for(settings.provider).ok_or_else(|| {
        let env_var = match settings.provider {
            ModelProvider::OpenAi => "OPENAI_API_KEY",
            ModelProvider::Gemini => "GEMINI_API_KEY",
        };
        SleuthError::config(format!(
            "No API key for provider '{}'. Add it to secret.json or set {}.",
            settings.provider, env_var
        ))
    })?;
    let timeout = Duration::from_secs(settings.timeout_secs.max(1));

    let backend: Arc<dyn CompletionBackend> = match settings.provider {
        ModelProvider::OpenAi => {
            let model = settings.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);
            let mut backend = OpenAIApiBackend::new(api_key, model)?
                .with_timeout(timeout)?
                .with_temperature(settings.temperature);
            if let Some(base_url) = &settings.base_url {
                backend = backend.with_base_url(base_url);
            }
            info!(provider = "openai", model = backend.model(), "Model backend ready");
            Arc::new(backend)
        }
        ModelProvider::Gemini => {
            let model = settings.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            let mut backend = GeminiApiBackend::new(api_key, model)?
                .with_timeout(timeout)?
                .with_temperature(settings.temperature);
            if let Some(base_url) = &settings.base_url {
                backend = backend.with_base_url(base_url);
            }
            info!(provider = "gemini", model = backend.model(), "Model backend ready");
            Arc::new(backend)
        }
    };
    Ok(backend)
}

/// The three model capabilities, sharing one backend.
#[derive(Clone)]
pub struct ModelServices {
    pub evidence: Arc<dyn EvidenceSource>,
    pub assessor: Arc<dyn AssessmentModel>,
    pub suggester: Arc<dyn ClaimSuggester>,
}

impl ModelServices {
    pub fn from_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            evidence: Arc::new(LlmEvidenceSource::new(backend.clone())),
            assessor: Arc::new(LlmAssessmentModel::new(backend.clone())),
            suggester: Arc::new(LlmClaimSuggester::new(backend)),
        }
    }

    pub fn from_settings(settings: &ModelSettings, secrets: &SecretConfig) -> Result<Self> {
        build_backend(settings, secrets).map(Self::from_backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::config::ApiKeyConfig;

    fn secrets_with_openai() -> SecretConfig {
        SecretConfig {
            openai: Some(ApiKeyConfig {
                api_key: "sk-test".to_string(),
            }),
            gemini: None,
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = ModelSettings {
            provider: ModelProvider::Gemini,
            ..ModelSettings::default()
        };
        let err = build_backend(&settings, &secrets_with_openai())
            .err()
            .unwrap();
        assert!(matches!(err, SleuthError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_provider_selects_backend() {
        let backend = build_backend(&ModelSettings::default(), &secrets_with_openai()).unwrap();
        assert_eq!(backend.name(), "OpenAI");

        let secrets = SecretConfig {
            openai: None,
            gemini: Some(ApiKeyConfig {
                api_key: "g-test".to_string(),
            }),
        };
        let settings = ModelSettings {
            provider: ModelProvider::Gemini,
            model: Some("gemini-2.5-pro".to_string()),
            ..ModelSettings::default()
        };
        assert_eq!(build_backend(&settings, &secrets).unwrap().name(), "Gemini");
    }
}
