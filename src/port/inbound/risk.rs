//! Risk gate port for trade validation.
//!
//! Defines the one fixed interface every trading path uses to ask the risk
//! policy for permission. The policy itself lives in
//! `application::risk::RiskManager`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{PairId, Side, TradeContext};
use crate::error::RiskError;

/// Result of a risk check for a proposed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskCheckResult {
    /// Trade passes all risk checks and may proceed.
    Approved,

    /// Trade is rejected due to a risk limit violation.
    Rejected(RiskError),
}

impl RiskCheckResult {
    /// Return `true` if the trade is approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, RiskCheckResult::Approved)
    }

    /// Return the rejection error if the trade was rejected.
    ///
    /// Returns `None` if the trade was approved.
    #[must_use]
    pub const fn rejection_error(&self) -> Option<&RiskError> {
        match self {
            RiskCheckResult::Rejected(e) => Some(e),
            RiskCheckResult::Approved => None,
        }
    }
}

/// Risk gate consulted before every order.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `can_trade` must not perform I/O or block on anything but its own state
/// - Every `can_trade` call records exactly one audit event
/// - An approval must reserve the `(pair, direction)` cooldown in the same
///   critical section as the decision
pub trait RiskGate: Send + Sync {
    /// Decide whether a trade may proceed.
    fn can_trade(&self, context: &TradeContext) -> RiskCheckResult;

    /// Record the result of an attempted trade.
    ///
    /// Called after every submission attempt that passed `can_trade`, whether
    /// it succeeded or not.
    fn register_trade(&self, success: bool, pair: &PairId, direction: Side, timestamp: DateTime<Utc>);

    /// Record realized profit (positive) or loss (negative) in whole quote units.
    fn record_realized_pnl(&self, pnl: Decimal, timestamp: DateTime<Utc>);
}
