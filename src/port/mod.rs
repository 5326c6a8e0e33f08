//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the trading engine and everything it talks
//! to: the risk policy on the driving side, and exchanges, storage,
//! notification channels and time on the driven side.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     discovery ───▶ │  Entry / Exit monitor   │
//!                    │            │            │
//!                    │   RiskGate ▼ Executor   │
//!                    └─────────────────────────┘
//!                       │        │         │
//!                       ▼        ▼         ▼
//!                  ┌────────┐ ┌───────┐ ┌──────────┐
//!                  │ Relay  │ │ Store │ │ Notifier │
//!                  └────────┘ └───────┘ └──────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::risk::{RiskCheckResult, RiskGate};
pub use outbound::clock::{Clock, SystemClock};
pub use outbound::exchange::{OrderSubmitter, PairScreener, PriceSource};
pub use outbound::feed::PairFeed;
pub use outbound::notifier::{Event, Notifier, NotifierRegistry};
pub use outbound::store::PositionStore;
