//! Row normalization: turns one raw host record into a canonical [`Invoice`].

mod normalizer;
pub mod rules;

pub use normalizer::{InvoiceNormalizer, Normalized};

use crate::error::ValidationError;
use crate::models::invoice::Invoice;
use crate::models::row::RawRow;

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Trait for turning host records into invoices.
pub trait RowNormalizer {
    /// Normalize a record; `None` means the host has no active record.
    fn normalize(&self, row: Option<&RawRow>) -> Result<Normalized>;

    /// Normalize and keep only the invoice.
    fn invoice(&self, row: Option<&RawRow>) -> Result<Invoice> {
        self.normalize(row).map(|n| n.invoice)
    }
}
