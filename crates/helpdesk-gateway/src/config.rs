//! Gateway configuration types.
//!
//! This module defines configuration structures for the HTTP gateway.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8090").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Directory holding the ticket database.
    #[serde(default = "GatewayConfig::default_data_dir")]
    pub data_dir: PathBuf,

    /// Allowed CORS origins. `*` allows any origin.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8090".to_string()
    }

    fn default_data_dir() -> PathBuf {
        PathBuf::from("data/helpdesk")
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Whether any origin may call the API.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            data_dir: Self::default_data_dir(),
            cors_origins: Self::default_cors_origins(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}
