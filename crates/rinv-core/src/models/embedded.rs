//! Sample data compiled into the binary.

use super::row::RawRow;

/// Example record used by the `demo` startup flag.
pub static EXAMPLE_ROW: &str = include_str!("../../data/example_row.json");

/// Parsed example record.
pub fn example_row() -> RawRow {
    serde_json::from_str(EXAMPLE_ROW).unwrap_or_default()
}
