//! Position lifecycle: the durable ledger and the exit monitor.

pub mod exit;
pub mod ledger;

pub use exit::{ExitMonitor, ExitSettings, ScanSummary};
pub use ledger::PositionLedger;
