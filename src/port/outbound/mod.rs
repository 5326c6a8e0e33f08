//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod clock;
pub mod exchange;
pub mod feed;
pub mod notifier;
pub mod store;
