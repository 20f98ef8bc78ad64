//! Application state read by the view layer.

use serde::{Deserialize, Serialize};

use crate::models::invoice::Invoice;

/// Status shown before the first record arrives.
pub const WAITING_STATUS: &str = "waiting";

/// Where the controller stands after the last record event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No record seen yet.
    #[default]
    Waiting,
    /// Last normalization succeeded.
    Ready,
    /// Last normalization failed.
    Error,
}

/// Snapshot of everything the view renders.
///
/// Only [`UpdateController`](super::UpdateController) mutates it; the view
/// gets read access through the accessors or a serialized snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub(crate) phase: Phase,
    pub(crate) invoice: Option<Invoice>,
    pub(crate) status: String,
    pub(crate) table_connected: bool,
    pub(crate) row_connected: bool,
    pub(crate) have_rows: bool,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            invoice: None,
            status: WAITING_STATUS.to_string(),
            table_connected: false,
            row_connected: false,
            have_rows: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The invoice to render, `None` while waiting or after an error.
    pub fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    /// User-facing status; empty when an invoice is shown.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// A message named a table.
    pub fn table_connected(&self) -> bool {
        self.table_connected
    }

    /// A row-selection message arrived.
    pub fn row_connected(&self) -> bool {
        self.row_connected
    }

    /// The selected table reported at least one row.
    pub fn have_rows(&self) -> bool {
        self.have_rows
    }
}
