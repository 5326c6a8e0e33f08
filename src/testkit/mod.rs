//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`] - `ManualClock`, a hand-driven [`Clock`](crate::port::Clock).
//! - [`exchange`] - Scripted relay collaborators: `ScriptedPriceSource`,
//!   `StaticScreener`, `ScriptedSubmitter`, `ScriptedFeed`.
//! - [`notifier`] - `RecordingNotifier` for asserting on emitted events.
//! - [`domain`] - Builders for trade contexts, legs, positions and pairs.

pub mod clock;
pub mod domain;
pub mod exchange;
pub mod notifier;
