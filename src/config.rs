//! Configuration for the retrieve API.
//!
//! # Example
//!
//! ```
//! use search_retrieve::RetrieveConfig;
//!
//! // Minimal config (uses defaults)
//! let config = RetrieveConfig::default();
//! assert_eq!(config.node_url(), "http://127.0.0.1:9200");
//!
//! // Full config
//! let config = RetrieveConfig {
//!     host: "search.internal".into(),
//!     port: 9243,
//!     ..Default::default()
//! };
//! assert_eq!(config.node_url(), "http://search.internal:9243");
//! ```

use serde::Deserialize;
use tracing::warn;

/// Environment variable naming the search node host.
pub const HOST_ENV: &str = "ELASTIC_HOST";
/// Environment variable naming the search node port.
pub const PORT_ENV: &str = "ELASTIC_PORT";

/// Configuration for the retrieve API and the HTTP backend.
///
/// All fields have sensible defaults, matching a local single-node engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrieveConfig {
    /// Search node host (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Search node port (default: 9200)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 9200 }
fn default_request_timeout_ms() -> u64 { 30_000 }

impl Default for RetrieveConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl RetrieveConfig {
    /// Defaults overridden by `ELASTIC_HOST` / `ELASTIC_PORT`.
    ///
    /// An unparseable port is logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid {}", PORT_ENV),
            }
        }
        config
    }

    /// Base URL of the search node, e.g. `http://127.0.0.1:9200`
    pub fn node_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
