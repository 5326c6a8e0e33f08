//! Order execution: deduplication, submission and the risk-gated entry point.

pub mod dedup;
pub mod executor;
pub mod gated;

pub use dedup::{DedupConfig, IntentDeduplicator};
pub use executor::{ExecutorConfig, OrderExecutor, SubmitOutcome};
pub use gated::{RiskGatedExecutor, TradeOutcome};
