//! Application services (use cases).
//!
//! These services hold the engine's decision logic and drive the ports.

pub mod entry;
pub mod execution;
pub mod position;
pub mod risk;
