//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for secrets like `RELAY_API_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use pairsniper::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::discovery::DiscoveryConfig;
use super::execution::ExecutionConfig;
use super::exit::ExitConfig;
use super::logging::LoggingConfig;
use super::relay::RelayConfig;
use super::risk::RiskConfig;
use super::telegram::TelegramAppConfig;
use crate::application::entry::EntrySettings;
use crate::application::execution::{DedupConfig, ExecutorConfig};
use crate::application::position::ExitSettings;
use crate::application::risk::RiskLimits;
use crate::domain::money::MAX_DECIMALS;
use crate::domain::TokenAddress;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite database file holding the position ledger.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Simulate order submission instead of calling the relay.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub exit: ExitConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,
}

fn default_database_path() -> String {
    "pairsniper.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            dry_run: false,
            logging: LoggingConfig::default(),
            risk: RiskConfig::default(),
            execution: ExecutionConfig::default(),
            exit: ExitConfig::default(),
            relay: RelayConfig::default(),
            discovery: DiscoveryConfig::default(),
            telegram: TelegramAppConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

/// Reject fractions outside (0, 1].
fn check_fraction(field: &'static str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(field, "must be greater than 0 and at most 1"));
    }
    Ok(())
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets come from the environment only, never from the config file.
        config.relay.api_key = std::env::var("RELAY_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        config.validate()?;

        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let risk = &self.risk;
        if risk.capital <= Decimal::ZERO {
            return Err(invalid("capital", "must be greater than 0"));
        }
        check_fraction("max_exposure_pct", risk.max_exposure_pct)?;
        check_fraction("daily_loss_pct_limit", risk.daily_loss_pct_limit)?;
        check_fraction("max_price_run_up_pct", risk.max_price_run_up_pct)?;
        check_fraction("max_slippage", risk.max_slippage)?;
        if risk.min_liquidity < Decimal::ZERO {
            return Err(invalid("min_liquidity", "must be 0 or greater"));
        }

        let execution = &self.execution;
        if execution.quote_token.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "quote_token",
            }
            .into());
        }
        if execution.quote_decimals == 0 || execution.quote_decimals > MAX_DECIMALS {
            return Err(invalid("quote_decimals", "must be between 1 and 28"));
        }
        if execution.trade_size <= Decimal::ZERO {
            return Err(invalid("trade_size", "must be greater than 0"));
        }
        if execution.trade_size > risk.capital * risk.max_exposure_pct {
            return Err(invalid(
                "trade_size",
                "must not exceed capital * max_exposure_pct",
            ));
        }
        if execution.dedup_ttl_secs == 0 {
            return Err(invalid("dedup_ttl_secs", "must be greater than 0"));
        }
        if execution.dedup_max_entries == 0 {
            return Err(invalid("dedup_max_entries", "must be greater than 0"));
        }
        if execution.execution_timeout_secs == 0 {
            return Err(invalid("execution_timeout_secs", "must be greater than 0"));
        }

        let exit = &self.exit;
        check_fraction("take_profit_pct", exit.take_profit_pct)?;
        check_fraction("stop_loss_pct", exit.stop_loss_pct)?;
        if let Some(trailing) = exit.trailing_pct {
            check_fraction("trailing_pct", trailing)?;
        }
        if exit.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "must be greater than 0"));
        }

        if self.relay.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if self.relay.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than 0"));
        }
        if self.discovery.ws_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "ws_url" }.into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[must_use]
    pub fn quote_token(&self) -> TokenAddress {
        TokenAddress::new(self.execution.quote_token.as_str())
    }

    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            dry_run: self.dry_run,
            timeout: Duration::from_secs(self.execution.execution_timeout_secs),
            dedup: DedupConfig {
                ttl_secs: self.execution.dedup_ttl_secs,
                max_entries: self.execution.dedup_max_entries,
            },
        }
    }

    #[must_use]
    pub fn entry_settings(&self) -> EntrySettings {
        EntrySettings {
            quote_token: self.quote_token(),
            quote_decimals: self.execution.quote_decimals,
            trade_size: self.execution.trade_size,
            required_liquidity: self.risk.min_liquidity,
            max_slippage: self.risk.max_slippage,
        }
    }

    #[must_use]
    pub fn exit_settings(&self) -> ExitSettings {
        ExitSettings {
            thresholds: self.exit.thresholds(),
            poll_interval: Duration::from_secs(self.exit.poll_interval_secs),
            quote_token: self.quote_token(),
            quote_decimals: self.execution.quote_decimals,
            max_slippage: self.risk.max_slippage,
            max_trade_size: RiskLimits::from(&self.risk).max_trade_size(),
        }
    }
}
