//! Watch command - drive the update controller from a stream of host events.
//!
//! Each input line is one JSON event:
//!
//! ```text
//! {"record": {"Number": 7, "Items": [...]}}
//! {"record": null}
//! {"message": {"tableId": "Invoices", "dataChange": false}}
//! ```
//!
//! The application state is printed as one JSON line after every event and
//! after every completed have-rows probe.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rinv_core::{
    AppState, ConnectionMessage, InvoiceNormalizer, RawRow, StartupFlags, TableProbe,
    UpdateController,
};

use super::config::load_config;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// JSON-lines event file; reads stdin when omitted
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// JSON file standing in for the selected table, used to answer have-rows probes
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Start with the built-in example record
    #[arg(long)]
    demo: bool,

    /// Start with an empty record to show every placeholder label
    #[arg(long)]
    labels: bool,
}

/// One event from the host.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum HostEvent {
    /// The active record changed; `null` means no row is selected.
    Record(Value),
    /// Connection-status notification.
    Message(ConnectionMessage),
}

/// Answers have-rows probes from a JSON file.
///
/// Accepts either an array of records or the host's column layout
/// (`{"id": [1, 2], ...}`).
pub struct FileTableProbe {
    path: PathBuf,
}

impl FileTableProbe {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TableProbe for FileTableProbe {
    async fn has_rows(&self) -> rinv_core::Result<bool> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let table: Value = serde_json::from_str(&text)?;
        Ok(table_has_rows(&table))
    }
}

fn table_has_rows(table: &Value) -> bool {
    match table {
        Value::Array(rows) => !rows.is_empty(),
        Value::Object(columns) => columns
            .get("id")
            .and_then(Value::as_array)
            .is_some_and(|ids| !ids.is_empty()),
        _ => false,
    }
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let flags = StartupFlags {
        demo: args.demo,
        labels: args.labels,
    };
    let mut controller =
        UpdateController::with_normalizer(InvoiceNormalizer::from_config(&config.normalize), flags);
    emit(controller.state())?;

    let input: Box<dyn AsyncRead + Unpin + Send> = match &args.events {
        Some(path) => {
            info!("Reading events from {}", path.display());
            Box::new(tokio::fs::File::open(path).await?)
        }
        None => Box::new(tokio::io::stdin()),
    };
    let mut lines = BufReader::new(input).lines();

    let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();
    let mut pending_probes = 0usize;
    let mut input_done = false;

    loop {
        tokio::select! {
            line = lines.next_line(), if !input_done => {
                let Some(line) = line? else {
                    debug!("Event stream closed, {} probes pending", pending_probes);
                    input_done = true;
                    continue;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match serde_json::from_str::<HostEvent>(line) {
                    Ok(HostEvent::Record(value)) => {
                        let row = RawRow::from_value(value);
                        controller.on_record_changed(row.as_ref());
                    }
                    Ok(HostEvent::Message(msg)) => {
                        if controller.on_connection_message(&msg) {
                            match &args.table {
                                Some(table) => {
                                    let probe = FileTableProbe::new(table.clone());
                                    let tx = probe_tx.clone();
                                    pending_probes += 1;
                                    tokio::spawn(async move {
                                        let _ = tx.send(probe.has_rows().await);
                                    });
                                }
                                None => debug!("No --table given, skipping have-rows probe"),
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Skipping malformed event: {}", e);
                        continue;
                    }
                }
                emit(controller.state())?;
            }
            Some(result) = probe_rx.recv(), if pending_probes > 0 => {
                pending_probes -= 1;
                controller.record_probe(result);
                emit(controller.state())?;
            }
            else => break,
        }
    }

    Ok(())
}

fn emit(state: &AppState) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, state)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events() {
        let event: HostEvent = serde_json::from_str(r#"{"record": {"Number": 1}}"#).unwrap();
        assert!(matches!(event, HostEvent::Record(Value::Object(_))));

        let event: HostEvent = serde_json::from_str(r#"{"record": null}"#).unwrap();
        assert!(matches!(event, HostEvent::Record(Value::Null)));

        let event: HostEvent =
            serde_json::from_str(r#"{"message": {"tableId": "Invoices"}}"#).unwrap();
        match event {
            HostEvent::Message(msg) => assert_eq!(msg.table_id.as_deref(), Some("Invoices")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_table_has_rows() {
        assert!(table_has_rows(&json!([{"Number": 1}])));
        assert!(!table_has_rows(&json!([])));
        assert!(table_has_rows(&json!({"id": [1, 2], "Number": [5, 6]})));
        assert!(!table_has_rows(&json!({"id": []})));
        assert!(!table_has_rows(&json!("rows")));
    }

    #[tokio::test]
    async fn test_file_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, r#"{"id": [1]}"#).unwrap();

        assert!(FileTableProbe::new(path).has_rows().await.unwrap());
        assert!(FileTableProbe::new(dir.path().join("missing.json")).has_rows().await.is_err());
    }
}
