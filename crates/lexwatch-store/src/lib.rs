//! Storage layer: append-only snapshot store, change ledger, and source reports.

mod error;
pub use error::StoreError;

mod file;
mod history;
mod ledger;
mod memory;
mod report;

pub use file::{load_snapshots, save_snapshots};
pub use history::{HistoryStore, MemoryStore};
pub use ledger::ChangeLedger;
pub use memory::SnapshotStore;
pub use report::{SourceReport, TimeRange};
