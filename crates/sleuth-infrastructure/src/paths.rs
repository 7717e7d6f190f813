//! Unified path management for Truth Sleuth files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/truth-sleuth/          # Config directory
//! ├── config.toml                  # Application configuration
//! └── secret.json                  # API keys
//!
//! ~/.local/share/truth-sleuth/     # Data directory
//! ├── history/                     # One JSON document per history entry
//! │   └── <entry-id>.json
//! ├── sessions.toml                # Session authority registry
//! └── current_session.toml         # Token of the logged-in user
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "truth-sleuth";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// The files and directories managed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
    History,
    Sessions,
    CurrentSession,
}

/// Resolved config and data roots.
#[derive(Debug, Clone)]
pub struct SleuthPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl SleuthPaths {
    /// Resolves the platform directories, honouring explicit overrides.
    pub fn resolve(
        config_dir: Option<&Path>,
        data_dir: Option<&Path>,
    ) -> Result<Self, PathError> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR),
        };
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Puts everything under one directory (for testing).
    pub fn rooted(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.to_path_buf(),
        }
    }

    /// Same config root, different data root.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn get_path(&self, service: ServiceType) -> PathBuf {
        match service {
            ServiceType::Config => self.config_dir.join("config.toml"),
            ServiceType::Secret => self.config_dir.join("secret.json"),
            ServiceType::History => self.data_dir.join("history"),
            ServiceType::Sessions => self.data_dir.join("sessions.toml"),
            ServiceType::CurrentSession => self.data_dir.join("current_session.toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_layout() {
        let paths = SleuthPaths::rooted(Path::new("/tmp/sleuth"));
        assert_eq!(
            paths.get_path(ServiceType::Config),
            PathBuf::from("/tmp/sleuth/config.toml")
        );
        assert_eq!(
            paths.get_path(ServiceType::History),
            PathBuf::from("/tmp/sleuth/history")
        );
    }

    #[test]
    fn test_data_dir_override_keeps_config_dir() {
        let paths = SleuthPaths::rooted(Path::new("/etc/sleuth")).with_data_dir("/var/sleuth");
        assert!(paths.get_path(ServiceType::Secret).starts_with("/etc/sleuth"));
        assert!(paths.get_path(ServiceType::Sessions).starts_with("/var/sleuth"));
    }

    #[test]
    fn test_resolve_defaults_end_with_app_dir() {
        if let Ok(paths) = SleuthPaths::resolve(None, None) {
            assert!(paths.config_dir().ends_with(APP_DIR));
            assert!(paths.data_dir().ends_with(APP_DIR));
        }
    }
}
