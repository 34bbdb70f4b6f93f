use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NOTIFICATION_POLL_SECS: u64 = 30;

/// Client configuration stored in `config.toml`.
///
/// Missing keys fall back to their defaults, so a partial file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL of the REST backend, including the `/api/v1` prefix.
    pub api_base_url: String,
    /// Upper bound for every HTTP call.
    pub request_timeout_secs: u64,
    /// Interval between notification fetches while a feed is being watched.
    pub notification_poll_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            notification_poll_secs: DEFAULT_NOTIFICATION_POLL_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl PortalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn notification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs.max(1))
    }

    /// Joins an endpoint path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PortalConfig =
            toml::from_str("api_base_url = \"https://portal.example.edu/api/v1\"").unwrap();
        assert_eq!(config.api_base_url, "https://portal.example.edu/api/v1");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.notification_poll_secs, 30);
    }

    #[test]
    fn test_endpoint_join() {
        let mut config = PortalConfig::default();
        config.api_base_url = "http://host/api/v1/".to_string();
        assert_eq!(config.endpoint("/requests"), "http://host/api/v1/requests");
        assert_eq!(config.endpoint("notifications"), "http://host/api/v1/notifications");
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut config = PortalConfig::default();
        config.request_timeout_secs = 0;
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
