//! Exit monitor configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::ExitThresholds;

/// Exit configuration (`[exit]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ExitConfig {
    #[serde(default = "default_take_profit_pct")]
    pub take_profit_pct: Decimal,
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: Decimal,
    /// Trailing stop below the highest observed price; off when absent.
    #[serde(default)]
    pub trailing_pct: Option<Decimal>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_take_profit_pct() -> Decimal {
    Decimal::new(30, 2) // 30%
}

fn default_stop_loss_pct() -> Decimal {
    Decimal::new(15, 2) // 15%
}

const fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            take_profit_pct: default_take_profit_pct(),
            stop_loss_pct: default_stop_loss_pct(),
            trailing_pct: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ExitConfig {
    #[must_use]
    pub const fn thresholds(&self) -> ExitThresholds {
        ExitThresholds {
            take_profit_pct: self.take_profit_pct,
            stop_loss_pct: self.stop_loss_pct,
            trailing_pct: self.trailing_pct,
        }
    }
}
