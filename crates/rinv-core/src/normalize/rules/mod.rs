//! Individual normalization steps.

pub mod items;
pub mod placeholder;
pub mod references;
pub mod totals;
pub mod url;

pub use items::{normalize_items, ItemNormalizer};
pub use placeholder::{fill_placeholders, PlaceholderFiller};
pub use references::merge_references;
pub use totals::{apply_totals, compute_totals, needs_totals, Totals};
pub use url::{normalize_url, normalize_url_with};
