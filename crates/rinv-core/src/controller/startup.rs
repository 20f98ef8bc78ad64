//! Launch-time flags that seed the controller with a record.

use crate::models::embedded::example_row;
use crate::models::row::RawRow;

/// Flags read once from the launch context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupFlags {
    /// Seed the fixed example record.
    pub demo: bool,
    /// Seed an empty record to show every placeholder label.
    pub labels: bool,
}

impl StartupFlags {
    /// Read flags from a URL query string such as `?demo` or `?labels=1`.
    pub fn from_query(search: &str) -> Self {
        Self {
            demo: search.contains("demo"),
            labels: search.contains("labels"),
        }
    }

    /// Records to feed at startup, in order. The demo record goes last so it
    /// is what remains on screen when both flags are set.
    pub fn records(&self) -> Vec<RawRow> {
        let mut records = Vec::new();
        if self.labels {
            records.push(RawRow::new());
        }
        if self.demo {
            records.push(example_row());
        }
        records
    }
}
