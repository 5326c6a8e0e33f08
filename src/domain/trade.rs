//! Trade intents and the context a risk decision is made on.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{PairId, TokenAddress};
use super::money::{Amount, Price};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Quote token in, target token out.
    Buy,
    /// Target token in, quote token out.
    Sell,
}

impl Side {
    /// Stable lowercase name used in logs, keys and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the risk policy needs to decide on one trade.
///
/// Sizes and prices are in whole quote units except `current_price` and
/// `last_price`, which use the same per-base-unit quoting as positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeContext {
    pub pair: PairId,
    pub direction: Side,
    /// Trade size in whole quote units.
    pub trade_size: Decimal,
    pub current_price: Price,
    /// Price of the last entry on this pair, if any.
    pub last_price: Option<Price>,
    pub required_liquidity: Decimal,
    pub observed_liquidity: Decimal,
    pub max_slippage: Decimal,
    pub observed_slippage: Decimal,
    pub observed_spread: Decimal,
    /// Supplied by the screening collaborator; `false` blocks the trade.
    pub not_honeypot: bool,
    pub timestamp: DateTime<Utc>,
}

impl TradeContext {
    /// Return this context with the direction replaced.
    #[must_use]
    pub fn with_direction(mut self, direction: Side) -> Self {
        self.direction = direction;
        self
    }
}

/// Token movement of an order, without its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLeg {
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    /// Amount of `token_in`, in base units.
    pub amount_in: Amount,
    /// Minimum acceptable amount of `token_out`, in base units.
    pub min_out: Amount,
}

/// A concrete order to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    pub side: Side,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    pub amount_in: Amount,
    pub min_out: Amount,
}

impl TradeIntent {
    /// Build an intent from a direction and an order leg.
    #[must_use]
    pub fn new(side: Side, leg: OrderLeg) -> Self {
        Self {
            side,
            token_in: leg.token_in,
            token_out: leg.token_out,
            amount_in: leg.amount_in,
            min_out: leg.min_out,
        }
    }

    /// Deduplication identity: amounts are deliberately excluded.
    #[must_use]
    pub fn key(&self) -> IntentKey {
        IntentKey {
            side: self.side,
            token_in: self.token_in.clone(),
            token_out: self.token_out.clone(),
        }
    }
}

/// Identity of an intent for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntentKey {
    pub side: Side,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
}

impl fmt::Display for IntentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}->{}", self.side, self.token_in, self.token_out)
    }
}
