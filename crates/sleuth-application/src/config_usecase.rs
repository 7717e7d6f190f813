//! Locating and (re)writing the configuration file.
//!
//! Works without parsing `config.toml`, so a broken file can still be found
//! and replaced.

use sleuth_core::config::{LoggingSettings, SleuthConfig};
use sleuth_core::error::{Result, SleuthError};
use sleuth_infrastructure::config_service::ENV_LOG;
use sleuth_infrastructure::{ConfigService, SleuthPaths};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of [`ConfigUseCase::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Written,
    /// A file exists and `force` was not given; nothing was touched.
    AlreadyExists,
}

pub struct ConfigUseCase {
    paths: SleuthPaths,
    service: ConfigService,
}

impl ConfigUseCase {
    /// Uses the platform directories.
    pub fn resolve(config_file: Option<PathBuf>) -> Result<Self> {
        let paths = SleuthPaths::resolve(None, None)
            .map_err(|e| SleuthError::config(e.to_string()))?;
        Ok(Self::new(paths, config_file))
    }

    pub fn new(paths: SleuthPaths, config_file: Option<PathBuf>) -> Self {
        let mut service = ConfigService::new(&paths);
        if let Some(file) = config_file {
            service = service.with_config_file(file);
        }
        Self { paths, service }
    }

    pub(crate) fn into_parts(self) -> (SleuthPaths, ConfigService) {
        (self.paths, self.service)
    }

    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    pub fn config_file(&self) -> &Path {
        self.service.config_file()
    }

    /// The data root the application will use.
    ///
    /// Falls back to the default location when the configuration is unusable.
    pub fn data_dir(&self) -> PathBuf {
        match self.service.load_config() {
            Ok(config) => config
                .storage
                .data_dir
                .unwrap_or_else(|| self.paths.data_dir().to_path_buf()),
            Err(e) => {
                warn!(error = %e, "Configuration unusable; showing default data dir");
                self.paths.data_dir().to_path_buf()
            }
        }
    }

    /// Log level from the configuration. When it is unusable, `SLEUTH_LOG`
    /// or the default.
    ///
    /// Runs before logging is set up, so problems are left for the real load
    /// to report.
    pub fn logging_level(&self) -> String {
        self.service
            .load_config()
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| {
                std::env::var(ENV_LOG)
                    .ok()
                    .filter(|level| !level.trim().is_empty())
                    .unwrap_or_else(|| LoggingSettings::default().level)
            })
    }

    /// Writes the default configuration. An existing file (even an
    /// unparsable one) is replaced only with `force`.
    pub fn init(&self, force: bool) -> Result<InitOutcome> {
        if self.config_file().exists() && !force {
            return Ok(InitOutcome::AlreadyExists);
        }

        self.service.save_config(&SleuthConfig::default())?;
        info!(path = %self.config_file().display(), "Wrote default configuration");
        Ok(InitOutcome::Written)
    }
}
