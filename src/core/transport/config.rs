//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_cors() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    100 * 1024
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            host: default_host(),
            enable_cors: default_cors(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl HttpConfig {
    /// Load HTTP config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("NOTES_HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let host = std::env::var("NOTES_HTTP_HOST").unwrap_or(defaults.host);
        let enable_cors = std::env::var("NOTES_HTTP_CORS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(defaults.enable_cors);
        let max_body_bytes = std::env::var("NOTES_MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_body_bytes);

        Self {
            port,
            host,
            enable_cors,
            max_body_bytes,
        }
    }

    /// The bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!("HTTP on {}", self.address())
    }
}
