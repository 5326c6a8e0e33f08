//! Pairsniper - risk-gated order execution for newly created DEX pairs.
//!
//! Every order, buy or sell, passes a stateful risk policy before it reaches
//! the execution relay. Filled buys open a position in a persistent ledger;
//! a background monitor sells positions that hit their exit thresholds.
//!
//! # Architecture
//!
//! - **`domain`** - Pure types: pairs, positions, trade contexts, risk events
//! - **`port`** - Trait seams (`RiskGate`, `PriceSource`, `PositionStore`, ...)
//! - **`application`** - Risk manager, executor, ledger, exit monitor
//! - **`adapter`** - CLI, discovery feed, relay client, SQLite store, notifiers
//! - **`infrastructure`** - Configuration, wiring and the runtime loop
//!
//! # Features
//!
//! - `telegram` - Forward engine events to a Telegram chat (default)
//! - `testkit` - Deterministic fakes for tests
//!
//! # Example
//!
//! ```no_run
//! use pairsniper::application::risk::{RiskLimits, RiskManager};
//!
//! let risk = RiskManager::new(RiskLimits::default());
//! println!("{}", risk.report(false));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
