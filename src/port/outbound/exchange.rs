//! Exchange ports: quotes, pair screening and order submission.

use async_trait::async_trait;

use crate::domain::{ExecutionHandle, NewPair, Price, Screening, TokenAddress, TradeIntent};
use crate::error::{ExecutionError, Result};

/// Price quotes for a token against the quote asset.
///
/// Prices use the same convention as positions: quote base units per token
/// base unit.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current price of `token` in `quote`.
    ///
    /// `Ok(None)` means the venue has no quote right now. Callers treat
    /// errors the same way: the price is unavailable this time around.
    async fn price(&self, token: &TokenAddress, quote: &TokenAddress) -> Result<Option<Price>>;
}

/// Liquidity, slippage and honeypot screening for a newly listed pair.
#[async_trait]
pub trait PairScreener: Send + Sync {
    /// Screen `pair` for a trade into `target`.
    async fn screen(&self, pair: &NewPair, target: &TokenAddress) -> Result<Option<Screening>>;
}

/// Order submission collaborator.
///
/// Signing and wallet management live behind this trait.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit an order and return its handle.
    async fn submit(&self, intent: &TradeIntent) -> std::result::Result<ExecutionHandle, ExecutionError>;
}
