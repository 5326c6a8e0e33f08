//! Risk policy configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::risk::RiskLimits;

/// Risk policy configuration (`[risk]`).
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Trading capital in whole quote units.
    #[serde(default = "default_capital")]
    pub capital: Decimal,
    /// Largest single trade as a fraction of capital (e.g., 0.10 = 10%).
    #[serde(default = "default_max_exposure_pct")]
    pub max_exposure_pct: Decimal,
    #[serde(default = "default_max_trades_per_day")]
    pub max_trades_per_day: u32,
    #[serde(default = "default_loss_streak_limit")]
    pub loss_streak_limit: u32,
    /// Realized daily loss, as a fraction of capital, that halts trading.
    #[serde(default = "default_daily_loss_pct_limit")]
    pub daily_loss_pct_limit: Decimal,
    /// Minimum seconds between trades on the same pair and direction.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// How far above the last entry a new buy may be (e.g., 0.10 = 10%).
    #[serde(default = "default_max_price_run_up_pct")]
    pub max_price_run_up_pct: Decimal,
    /// Minimum pool liquidity for entries, in whole quote units.
    #[serde(default = "default_min_liquidity")]
    pub min_liquidity: Decimal,
    /// Maximum slippage tolerance (e.g., 0.05 = 5%).
    #[serde(default = "default_max_slippage")]
    pub max_slippage: Decimal,
}

fn default_capital() -> Decimal {
    Decimal::ONE
}

fn default_max_exposure_pct() -> Decimal {
    Decimal::new(10, 2) // 10%
}

const fn default_max_trades_per_day() -> u32 {
    10
}

const fn default_loss_streak_limit() -> u32 {
    3
}

fn default_daily_loss_pct_limit() -> Decimal {
    Decimal::new(15, 2) // 15%
}

const fn default_cooldown_secs() -> u64 {
    30
}

fn default_max_price_run_up_pct() -> Decimal {
    Decimal::new(10, 2) // 10%
}

fn default_min_liquidity() -> Decimal {
    Decimal::ONE
}

fn default_max_slippage() -> Decimal {
    Decimal::new(5, 2) // 5%
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            capital: default_capital(),
            max_exposure_pct: default_max_exposure_pct(),
            max_trades_per_day: default_max_trades_per_day(),
            loss_streak_limit: default_loss_streak_limit(),
            daily_loss_pct_limit: default_daily_loss_pct_limit(),
            cooldown_secs: default_cooldown_secs(),
            max_price_run_up_pct: default_max_price_run_up_pct(),
            min_liquidity: default_min_liquidity(),
            max_slippage: default_max_slippage(),
        }
    }
}

impl From<&RiskConfig> for RiskLimits {
    fn from(config: &RiskConfig) -> Self {
        Self {
            capital: config.capital,
            max_exposure_pct: config.max_exposure_pct,
            max_trades_per_day: config.max_trades_per_day,
            loss_streak_limit: config.loss_streak_limit,
            daily_loss_pct_limit: config.daily_loss_pct_limit,
            cooldown_secs: config.cooldown_secs,
            max_price_run_up_pct: config.max_price_run_up_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_limits() {
        assert_eq!(RiskLimits::from(&RiskConfig::default()), RiskLimits::default());
    }
}
