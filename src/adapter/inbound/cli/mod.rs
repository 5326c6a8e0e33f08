//! CLI module graph.

pub mod check;
pub mod clear;
pub mod close;
pub mod command;
pub mod positions;
pub mod run;
