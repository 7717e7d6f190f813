//! Application wiring.
//!
//! Resolves paths, loads configuration and assembles the stores, use cases
//! and model services the CLI works with.

use crate::account_usecase::AccountUseCase;
use crate::config_usecase::ConfigUseCase;
use crate::history_usecase::HistoryUseCase;
use crate::orchestrator::SleuthOrchestrator;
use sleuth_core::config::SleuthConfig;
use sleuth_core::error::Result;
use sleuth_core::history::{HistoryRepository, HistoryStore};
use sleuth_core::session::SessionContext;
use sleuth_infrastructure::{
    ConfigService, FileSessionStore, InMemoryHistoryRepository, JsonDirHistoryRepository,
    LocalSessionAuthority, SleuthPaths,
};
use sleuth_interaction::ModelServices;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Startup options coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Explicit `config.toml` instead of the default location.
    pub config_file: Option<PathBuf>,
    /// Keep history in memory for this process only.
    pub ephemeral: bool,
}

/// Fully wired application.
pub struct SleuthApp {
    config: SleuthConfig,
    config_service: ConfigService,
    paths: SleuthPaths,
    session: SessionContext,
    history: HistoryStore,
}

impl SleuthApp {
    /// Opens the application rooted at `paths`.
    pub async fn open(paths: SleuthPaths, options: AppOptions) -> Result<Self> {
        Self::with_config(ConfigUseCase::new(paths, options.config_file), options.ephemeral).await
    }

    /// Opens the application from already located configuration.
    ///
    /// `[storage] data_dir` (or `SLEUTH_DATA_DIR`) moves the data root.
    pub async fn with_config(setup: ConfigUseCase, ephemeral: bool) -> Result<Self> {
        let (paths, config_service) = setup.into_parts();
        let config = config_service.load_config()?;

        let paths = match &config.storage.data_dir {
            Some(dir) => paths.with_data_dir(dir.clone()),
            None => paths,
        };
        debug!(
            config = %config_service.config_file().display(),
            data_dir = %paths.data_dir().display(),
            ephemeral,
            "Opening application"
        );

        let repository: Arc<dyn HistoryRepository> = if ephemeral {
            Arc::new(InMemoryHistoryRepository::new())
        } else {
            Arc::new(JsonDirHistoryRepository::from_paths(&paths).await?)
        };
        let session = SessionContext::new(
            Arc::new(FileSessionStore::from_paths(&paths)),
            Arc::new(LocalSessionAuthority::from_paths(&paths)),
        );

        Ok(Self {
            config,
            config_service,
            paths,
            session,
            history: HistoryStore::new(repository),
        })
    }

    pub fn config(&self) -> &SleuthConfig {
        &self.config
    }

    pub fn paths(&self) -> &SleuthPaths {
        &self.paths
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn account(&self) -> AccountUseCase {
        AccountUseCase::new(self.session.clone())
    }

    pub fn history(&self) -> HistoryUseCase {
        HistoryUseCase::new(self.session.clone(), self.history.clone())
    }

    /// Builds the model-backed services. Needs an API key.
    pub fn models(&self) -> Result<ModelServices> {
        let secrets = self.config_service.load_secrets()?;
        ModelServices::from_settings(&self.config.model, &secrets)
    }

    pub fn orchestrator(&self, models: &ModelServices) -> SleuthOrchestrator {
        SleuthOrchestrator::new(
            models.evidence.clone(),
            models.assessor.clone(),
            self.history.clone(),
            self.session.clone(),
        )
    }
}
