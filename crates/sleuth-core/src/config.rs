//! Configuration types.
//!
//! Loaded from `config.toml` and `secret.json` by the infrastructure layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// Which hosted model API answers the fact-checking prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelProvider {
    /// OpenAI or any server speaking the Chat Completions protocol.
    #[default]
    OpenAi,
    Gemini,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub provider: ModelProvider,
    /// Provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            model: None,
            base_url: None,
            timeout_secs: 120,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root for history and session files; platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `sleuth_application=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleuthConfig {
    pub model: ModelSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<ApiKeyConfig>,
    #[serde(default)]
    pub gemini: Option<ApiKeyConfig>,
}

impl SecretConfig {
    pub fn api_key_for(&self, provider: ModelProvider) -> Option<&str> {
        let entry = match provider {
            ModelProvider::OpenAi => self.openai.as_ref(),
            ModelProvider::Gemini => self.gemini.as_ref(),
        };
        entry
            .map(|config| config.api_key.as_str())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    pub api_key: String,
}
