//! Reactive update controller: host events in, application state out.

mod probe;
mod startup;
mod state;
mod update;

pub use probe::{ConnectionMessage, TableProbe};
pub use startup::StartupFlags;
pub use state::{AppState, Phase, WAITING_STATUS};
pub use update::{status_message, UpdateController};
