//! Unified path management for the portal client.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/campus-portal/     # Config directory
//! ├── config.toml              # Client configuration
//! ├── local_storage.json       # Key/value store (auth session)
//! └── logs/                    # Application logs
//!     └── campus.log.YYYY-MM-DD
//! ```

use campus_core::PortalError;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "campus-portal";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PortalError {
    fn from(err: PathError) -> Self {
        PortalError::config(err.to_string())
    }
}

/// Resolves every file the client reads or writes.
///
/// With a base directory all paths live under it, which is what tests and the
/// `--config-dir` flag use.
#[derive(Debug, Clone, Default)]
pub struct PortalPaths {
    base: Option<PathBuf>,
}

impl PortalPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/campus-portal/`
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn local_storage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("local_storage.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
