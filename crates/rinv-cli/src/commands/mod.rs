//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod render;
pub mod watch;
