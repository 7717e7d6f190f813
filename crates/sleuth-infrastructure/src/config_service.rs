//! Configuration loading.
//!
//! `config.toml` supplies the settings, `SLEUTH_*` environment variables
//! override them, and API keys come from `secret.json` with the usual
//! provider environment variables as fallback.

use crate::paths::{ServiceType, SleuthPaths};
use crate::storage::{AtomicFile, AtomicFileError};
use sleuth_core::config::{ApiKeyConfig, ModelProvider, SecretConfig, SleuthConfig};
use sleuth_core::error::{Result, SleuthError};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const ENV_PROVIDER: &str = "SLEUTH_MODEL_PROVIDER";
pub const ENV_MODEL: &str = "SLEUTH_MODEL";
pub const ENV_BASE_URL: &str = "SLEUTH_MODEL_BASE_URL";
pub const ENV_DATA_DIR: &str = "SLEUTH_DATA_DIR";
pub const ENV_LOG: &str = "SLEUTH_LOG";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Loads `config.toml` and `secret.json`.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_file: PathBuf,
    secret_file: PathBuf,
}

impl ConfigService {
    pub fn new(paths: &SleuthPaths) -> Self {
        Self {
            config_file: paths.get_path(ServiceType::Config),
            secret_file: paths.get_path(ServiceType::Secret),
        }
    }

    /// Reads the configuration from an explicit file instead.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Loads the configuration with environment overrides applied.
    ///
    /// A missing file yields the defaults.
    pub fn load_config(&self) -> Result<SleuthConfig> {
        let mut config = self.load_config_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads the configuration file alone, without environment overrides.
    pub fn load_config_file(&self) -> Result<SleuthConfig> {
        let file = AtomicFile::<SleuthConfig>::toml(self.config_file.clone());
        match file.load() {
            Ok(Some(config)) => {
                debug!(path = %self.config_file.display(), "Loaded config");
                Ok(config)
            }
            Ok(None) => Ok(SleuthConfig::default()),
            Err(e) => Err(config_error(e)),
        }
    }

    /// Writes the given configuration, creating parent directories.
    pub fn save_config(&self, config: &SleuthConfig) -> Result<()> {
        AtomicFile::<SleuthConfig>::toml(self.config_file.clone())
            .save(config)
            .map_err(config_error)
    }

    /// Loads API keys, falling back to environment variables per provider.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let mut secrets = AtomicFile::<SecretConfig>::json(self.secret_file.clone())
            .load()
            .map_err(config_error)?
            .unwrap_or_default();
        apply_secret_env(&mut secrets, |key| std::env::var(key).ok());
        Ok(secrets)
    }
}

fn config_error(err: AtomicFileError) -> SleuthError {
    SleuthError::config(err.to_string())
}

/// Applies `SLEUTH_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut SleuthConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(provider) = non_empty(ENV_PROVIDER) {
        config.model.provider = ModelProvider::from_str(provider.trim()).map_err(|_| {
            SleuthError::config(format!(
                "{} must be 'openai' or 'gemini', got '{}'",
                ENV_PROVIDER, provider
            ))
        })?;
    }
    if let Some(model) = non_empty(ENV_MODEL) {
        config.model.model = Some(model);
    }
    if let Some(base_url) = non_empty(ENV_BASE_URL) {
        config.model.base_url = Some(base_url);
    }
    if let Some(data_dir) = non_empty(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(data_dir));
    }
    if let Some(level) = non_empty(ENV_LOG) {
        config.logging.level = level;
    }
    Ok(())
}

/// Fills in API keys missing from `secret.json` from the environment.
pub fn apply_secret_env<F>(secrets: &mut SecretConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = |key: &str| {
        lookup(key)
            .filter(|value| !value.is_empty())
            .map(|api_key| ApiKeyConfig { api_key })
    };

    if secrets.api_key_for(ModelProvider::OpenAi).is_none() {
        if let Some(entry) = from_env(ENV_OPENAI_API_KEY) {
            secrets.openai = Some(entry);
        }
    }
    if secrets.api_key_for(ModelProvider::Gemini).is_none() {
        if let Some(entry) = from_env(ENV_GEMINI_API_KEY) {
            secrets.gemini = Some(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&SleuthPaths::rooted(temp_dir.path()));
        assert_eq!(service.load_config_file().unwrap(), SleuthConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&SleuthPaths::rooted(temp_dir.path()));

        let mut config = SleuthConfig::default();
        config.model.provider = ModelProvider::Gemini;
        config.model.model = Some("gemini-2.5-flash".to_string());
        service.save_config(&config).unwrap();

        assert_eq!(service.load_config_file().unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[model\nprovider = ").unwrap();

        let service =
            ConfigService::new(&SleuthPaths::rooted(temp_dir.path())).with_config_file(&path);
        let err = service.load_config_file().unwrap_err();
        assert!(matches!(err, SleuthError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (ENV_PROVIDER, "Gemini"),
            (ENV_MODEL, "gemini-2.5-pro"),
            (ENV_DATA_DIR, "/srv/sleuth"),
            (ENV_BASE_URL, ""),
        ]);
        let mut config = SleuthConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.model.provider, ModelProvider::Gemini);
        assert_eq!(config.model.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/sleuth")));
        assert!(config.model.base_url.is_none());
    }

    #[test]
    fn test_bad_provider_override_is_rejected() {
        let vars = env(&[(ENV_PROVIDER, "llama")]);
        let mut config = SleuthConfig::default();
        let err = apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_PROVIDER));
    }

    #[test]
    fn test_secret_file_wins_over_env() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"openai": {"api_key": "from-file"}}"#,
        )
        .unwrap();
        let service = ConfigService::new(&SleuthPaths::rooted(temp_dir.path()));
        let mut secrets = AtomicFile::<SecretConfig>::json(temp_dir.path().join("secret.json"))
            .load()
            .unwrap()
            .unwrap();

        let vars = env(&[
            (ENV_OPENAI_API_KEY, "from-env"),
            (ENV_GEMINI_API_KEY, "gemini-env"),
        ]);
        apply_secret_env(&mut secrets, |k| vars.get(k).cloned());

        assert_eq!(secrets.api_key_for(ModelProvider::OpenAi), Some("from-file"));
        assert_eq!(secrets.api_key_for(ModelProvider::Gemini), Some("gemini-env"));
        assert!(service.config_file().ends_with("config.toml"));
    }
}
