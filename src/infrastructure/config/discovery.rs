//! Pair discovery feed configuration.

use serde::Deserialize;

/// Discovery configuration (`[discovery]`).
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8080/v1/pairs".into()
}

const fn default_reconnect_delay_ms() -> u64 {
    5_000
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}
