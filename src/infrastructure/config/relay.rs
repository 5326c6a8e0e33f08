//! Execution relay configuration.

use serde::Deserialize;

/// Relay configuration (`[relay]`).
///
/// The API key is never read from the config file; it comes from
/// `RELAY_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
        }
    }
}
