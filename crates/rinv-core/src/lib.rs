//! Core library for rendering an invoice from one loosely-structured host record.
//!
//! This crate provides:
//! - Models for raw host rows and the canonical, display-ready invoice
//! - The normalization pipeline (References merge, line items, totals, URLs, placeholders)
//! - Pure presentation formatting (currency, dates)
//! - The update controller that turns host events into application state

pub mod controller;
pub mod error;
pub mod format;
pub mod models;
pub mod normalize;

pub use controller::{AppState, ConnectionMessage, Phase, StartupFlags, TableProbe, UpdateController};
pub use error::{Result, RinvError, ValidationError};
pub use format::{format_currency, format_date, Formatter};
pub use models::config::RinvConfig;
pub use models::invoice::{Invoice, LineItem, Party, Scalar};
pub use models::row::RawRow;
pub use normalize::{InvoiceNormalizer, Normalized, RowNormalizer};
