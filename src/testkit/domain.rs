//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions so tests focus on assertions rather
//! than construction boilerplate. All builders trade against `0xweth`.

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

use crate::domain::{
    Amount, DexInfo, NewPair, OrderLeg, PairId, Position, Price, Side, TokenAddress, TradeContext,
};

/// Quote token used by every builder.
pub const QUOTE: &str = "0xweth";

/// A context that passes every risk check under `RiskLimits::default()`.
///
/// Size 0.05 against a limit of 0.1, price 1.0 with no prior entry,
/// liquidity 10 against 1 required, slippage 0.01 against 0.05 allowed.
pub fn trade_context(pair: &str, direction: Side, timestamp: DateTime<Utc>) -> TradeContext {
    TradeContext {
        pair: PairId::from(pair),
        direction,
        trade_size: dec!(0.05),
        current_price: dec!(1.0),
        last_price: None,
        required_liquidity: dec!(1),
        observed_liquidity: dec!(10),
        max_slippage: dec!(0.05),
        observed_slippage: dec!(0.01),
        observed_spread: dec!(0.001),
        not_honeypot: true,
        timestamp,
    }
}

/// Quote in, `token` out.
pub fn buy_leg(token: &str) -> OrderLeg {
    OrderLeg {
        token_in: TokenAddress::from(QUOTE),
        token_out: TokenAddress::from(token),
        amount_in: 1_000,
        min_out: 950,
    }
}

/// `token` in, quote out.
pub fn sell_leg(token: &str) -> OrderLeg {
    OrderLeg {
        token_in: TokenAddress::from(token),
        token_out: TokenAddress::from(QUOTE),
        amount_in: 1_000,
        min_out: 950,
    }
}

pub fn position(pair: &str, amount: Amount, avg_price: Price) -> Position {
    Position::new(PairId::from(pair), amount, avg_price)
}

/// A freshly listed `token`/quote pair on a uniswap-v2 style venue.
pub fn new_pair(token: &str) -> NewPair {
    NewPair {
        pair: PairId::from(format!("0xpool-{token}")),
        token0: TokenAddress::from(token),
        token1: TokenAddress::from(QUOTE),
        dex: DexInfo {
            name: "uniswap-v2".into(),
            router: "0xrouter".into(),
        },
    }
}
