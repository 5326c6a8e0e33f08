//! Exchange-agnostic domain types.
//!
//! Nothing in here performs I/O or holds shared state.

pub mod exit;
pub mod id;
pub mod money;
pub mod pair;
pub mod position;
pub mod risk;
pub mod trade;

pub use exit::{ExitReason, ExitThresholds};
pub use id::{ExecutionHandle, PairId, TokenAddress, SIMULATED_PREFIX};
pub use money::{Amount, Price};
pub use pair::{DexInfo, NewPair, Screening};
pub use position::Position;
pub use risk::{RiskEvent, RiskOutcome, APPROVED_REASON};
pub use trade::{IntentKey, OrderLeg, Side, TradeContext, TradeIntent};
