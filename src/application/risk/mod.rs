//! Risk policy evaluation and audit reporting.

pub mod manager;
pub mod report;

pub use manager::{RiskLimits, RiskManager, RiskSnapshot};
