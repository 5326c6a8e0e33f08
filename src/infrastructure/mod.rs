//! Configuration, wiring and process lifecycle.

pub mod bootstrap;
pub mod config;
pub mod lock;
pub mod runtime;
