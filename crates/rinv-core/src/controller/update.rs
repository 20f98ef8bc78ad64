//! The update controller.

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::models::row::RawRow;
use crate::normalize::{InvoiceNormalizer, Normalized, RowNormalizer};

use super::probe::{ConnectionMessage, TableProbe};
use super::startup::StartupFlags;
use super::state::{AppState, Phase};

/// Owns the application state and applies host events to it.
///
/// Record events replace the invoice wholesale; there is no merging with the
/// previously displayed invoice. Connection flags only ever go from `false`
/// to `true`.
#[derive(Debug)]
pub struct UpdateController<N = InvoiceNormalizer> {
    normalizer: N,
    state: AppState,
    last_row: Option<RawRow>,
}

impl UpdateController {
    /// Create the controller with the default normalizer and apply startup flags.
    pub fn init(flags: StartupFlags) -> Self {
        Self::with_normalizer(InvoiceNormalizer::new(), flags)
    }
}

impl<N: RowNormalizer> UpdateController<N> {
    /// Create the controller around a custom normalizer and apply startup flags.
    pub fn with_normalizer(normalizer: N, flags: StartupFlags) -> Self {
        let mut controller = Self {
            normalizer,
            state: AppState::new(),
            last_row: None,
        };
        for row in flags.records() {
            controller.on_record_changed(Some(&row));
        }
        controller
    }

    /// Current state, for the view layer.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The last successfully normalized raw row. Diagnostic only.
    pub fn last_row(&self) -> Option<&RawRow> {
        self.last_row.as_ref()
    }

    /// Handle a record-changed event; `None` means no row is selected.
    pub fn on_record_changed(&mut self, row: Option<&RawRow>) -> Phase {
        match self.normalizer.normalize(row) {
            Ok(Normalized { invoice, row }) => {
                debug!("Record normalized, {} items", invoice.items.len());
                self.state.invoice = Some(invoice);
                self.state.status.clear();
                self.state.phase = Phase::Ready;
                self.last_row = Some(row);
            }
            Err(err) => self.fail(&err),
        }
        self.state.phase
    }

    /// Report any error to the user: clears the invoice and shows the message.
    ///
    /// Hosts also route rendering errors here.
    pub fn fail(&mut self, err: &dyn Display) {
        let status = status_message(err);
        warn!("Invoice update failed: {}", status);
        self.state.invoice = None;
        self.state.status = status;
        self.state.phase = Phase::Error;
    }

    /// Handle a connection message. Returns `true` when the host should start
    /// a have-rows probe for the selected table.
    pub fn on_connection_message(&mut self, msg: &ConnectionMessage) -> bool {
        if !msg.has_table() {
            return false;
        }
        let start_probe = !self.state.row_connected && !self.state.have_rows;

        if !self.state.table_connected {
            info!("Connected to table {:?}", msg.table_id);
        }
        self.state.table_connected = true;
        if !msg.data_change {
            self.state.row_connected = true;
        }
        start_probe
    }

    /// Apply the outcome of a have-rows probe.
    pub fn record_probe(&mut self, result: crate::Result<bool>) {
        match result {
            Ok(true) => self.state.have_rows = true,
            Ok(false) => debug!("Selected table has no rows"),
            Err(e) => warn!("Table probe failed: {}", e),
        }
    }

    /// Run a probe to completion and apply its result.
    pub async fn probe_rows<P: TableProbe>(&mut self, probe: &P) {
        let result = probe.has_rows().await;
        self.record_probe(result);
    }
}

/// The user-facing form of an error: its message without an `Error: ` label.
pub fn status_message(err: &dyn Display) -> String {
    let message = err.to_string();
    match message.strip_prefix("Error: ") {
        Some(rest) => rest.to_string(),
        None => message,
    }
}
