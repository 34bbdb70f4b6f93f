//! Configuration service implementation.
//!
//! Loads [`PortalConfig`] from `config.toml`, writing a default file on first
//! run, then applies environment overrides.

use crate::paths::PortalPaths;
use campus_core::config::PortalConfig;
use campus_core::{PortalError, Result};
use std::fs;

pub const ENV_API_URL: &str = "CAMPUS_PORTAL_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CAMPUS_PORTAL_TIMEOUT_SECS";

#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    paths: PortalPaths,
}

impl ConfigService {
    pub fn new(paths: PortalPaths) -> Self {
        Self { paths }
    }

    /// Loads the configuration with environment overrides applied.
    pub fn load(&self) -> Result<PortalConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads `config.toml` as written, creating it with defaults when missing.
    pub fn load_file(&self) -> Result<PortalConfig> {
        let path = self.paths.config_file()?;

        if !path.exists() {
            let config = PortalConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, toml::to_string_pretty(&config)?)?;
            tracing::info!("[Config] Created default config at {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: PortalConfig = toml::from_str(&content).map_err(|e| {
            PortalError::config(format!("{} is invalid: {}", path.display(), e))
        })?;
        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(config)
    }
}

/// Applies `CAMPUS_PORTAL_*` overrides read through `lookup`.
pub fn apply_overrides<F>(config: &mut PortalConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            PortalError::config(format!("{ENV_TIMEOUT_SECS} must be a number of seconds, got '{raw}'"))
        })?;
    }

    Ok(())
}
