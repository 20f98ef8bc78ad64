//! Data models: raw host rows, the canonical invoice, and configuration.

pub mod config;
pub mod embedded;
pub mod invoice;
pub mod row;
