//! Host connection messages and the "does the table have rows" probe.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A connection-status notification from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMessage {
    /// Table the widget is attached to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,

    /// Set when the message only reports a data change.
    #[serde(default)]
    pub data_change: bool,
}

impl ConnectionMessage {
    /// A message naming `table_id`.
    pub fn table(table_id: impl Into<String>) -> Self {
        Self {
            table_id: Some(table_id.into()),
            data_change: false,
        }
    }

    /// Mark the message as a pure data-change notification.
    pub fn with_data_change(mut self, data_change: bool) -> Self {
        self.data_change = data_change;
        self
    }

    /// Whether the message names a (non-empty) table.
    pub fn has_table(&self) -> bool {
        self.table_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Asks the host whether the currently selected table has any rows.
///
/// Failures are logged by the controller and otherwise ignored.
pub trait TableProbe {
    fn has_rows(&self) -> impl Future<Output = crate::Result<bool>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_message() {
        let msg: ConnectionMessage =
            serde_json::from_value(json!({"tableId": "Invoices", "dataChange": true})).unwrap();
        assert_eq!(msg, ConnectionMessage::table("Invoices").with_data_change(true));

        let msg: ConnectionMessage = serde_json::from_value(json!({"settings": {}})).unwrap();
        assert!(!msg.has_table());
    }

    #[test]
    fn test_empty_table_id_is_no_table() {
        assert!(!ConnectionMessage::table("").has_table());
    }
}
