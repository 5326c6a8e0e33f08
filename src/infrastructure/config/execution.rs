//! Order execution configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Execution configuration (`[execution]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Quote spent per entry, in whole quote units.
    #[serde(default = "default_trade_size")]
    pub trade_size: Decimal,
    /// Address of the asset every pair is quoted against.
    #[serde(default = "default_quote_token")]
    pub quote_token: String,
    #[serde(default = "default_quote_decimals")]
    pub quote_decimals: u32,
    /// Window in which a repeated intent is dropped as a duplicate.
    #[serde(default = "default_dedup_ttl_secs")]
    pub dedup_ttl_secs: u64,
    #[serde(default = "default_dedup_max_entries")]
    pub dedup_max_entries: usize,
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,
}

fn default_trade_size() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

fn default_quote_token() -> String {
    // WETH on Ethereum mainnet.
    "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".into()
}

const fn default_quote_decimals() -> u32 {
    18
}

const fn default_dedup_ttl_secs() -> u64 {
    5
}

const fn default_dedup_max_entries() -> usize {
    10_000
}

const fn default_execution_timeout_secs() -> u64 {
    30
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            trade_size: default_trade_size(),
            quote_token: default_quote_token(),
            quote_decimals: default_quote_decimals(),
            dedup_ttl_secs: default_dedup_ttl_secs(),
            dedup_max_entries: default_dedup_max_entries(),
            execution_timeout_secs: default_execution_timeout_secs(),
        }
    }
}
