//! Storage seam between the detection service and its backing collections.

use lexwatch_core::{ChangeDetection, DocumentSnapshot};

use crate::{ChangeLedger, SnapshotStore, SourceReport};

/// Snapshot store plus change ledger behind one interface, so the service
/// can run against memory in tests and a database elsewhere.
///
/// Both collections are append-only.
pub trait HistoryStore: Send + Sync {
    /// Append a snapshot under its `source_id`.
    fn put_snapshot(&mut self, snapshot: DocumentSnapshot);

    /// Snapshots of one source in insertion order.
    fn snapshots(&self, source_id: &str) -> Vec<DocumentSnapshot>;

    /// Snapshots of all sources.
    fn all_snapshots(&self) -> Vec<DocumentSnapshot>;

    /// Source ids with at least one snapshot, in first-seen order.
    fn source_ids(&self) -> Vec<String>;

    fn contains_snapshot(&self, source_id: &str, snapshot_id: &str) -> bool;

    /// Append a change record.
    fn record_change(&mut self, change: ChangeDetection);

    /// Ledger entries newest first (by `current_version.original_date`).
    fn query_changes(&self, source_id: Option<&str>, limit: Option<usize>) -> Vec<ChangeDetection>;

    fn report(&self, source_id: &str) -> SourceReport;
}

/// In-memory [`HistoryStore`], constructed once and dropped at shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: SnapshotStore,
    ledger: ChangeLedger,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn put_snapshot(&mut self, snapshot: DocumentSnapshot) {
        let source_id = snapshot.source_id.clone();
        self.snapshots.put(&source_id, snapshot);
    }

    fn snapshots(&self, source_id: &str) -> Vec<DocumentSnapshot> {
        self.snapshots.list(source_id).to_vec()
    }

    fn all_snapshots(&self) -> Vec<DocumentSnapshot> {
        self.snapshots.list_all().cloned().collect()
    }

    fn source_ids(&self) -> Vec<String> {
        self.snapshots.source_ids().to_vec()
    }

    fn contains_snapshot(&self, source_id: &str, snapshot_id: &str) -> bool {
        self.snapshots.contains(source_id, snapshot_id)
    }

    fn record_change(&mut self, change: ChangeDetection) {
        self.ledger.record(change);
    }

    fn query_changes(&self, source_id: Option<&str>, limit: Option<usize>) -> Vec<ChangeDetection> {
        self.ledger
            .query(source_id, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    fn report(&self, source_id: &str) -> SourceReport {
        SourceReport::build(
            source_id,
            self.snapshots.list(source_id),
            self.ledger.entries(),
        )
    }
}
