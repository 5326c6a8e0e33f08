//! Inbound (driving) ports.
//!
//! - [`risk`]: the single risk policy interface every trade path goes through

pub mod risk;
