//! Service facade over the snapshot store, change ledger, and detection pipeline.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use lexwatch_core::{ChangeDetection, ChangeTypeMode, DocumentSnapshot};
use lexwatch_detect::{Classifier, detect_changes};
use lexwatch_store::{HistoryStore, MemoryStore, SourceReport};
use tokio::sync::RwLock;
use tracing::info;

/// `(source_id, previous_id, current_id)` of a pair already in the ledger.
type PairKey = (String, String, String);

struct State<S> {
    store: S,
    recorded_pairs: HashSet<PairKey>,
}

/// Owns the history store and runs detection passes over it.
///
/// All writes go through one lock, so concurrent monitor tasks never
/// interleave an ingest with a detection pass.
pub struct HistoryService<S = MemoryStore> {
    state: RwLock<State<S>>,
    classifier: Classifier,
}

impl HistoryService<MemoryStore> {
    /// Service backed by a fresh in-memory store.
    pub fn in_memory(mode: ChangeTypeMode) -> Self {
        Self::new(MemoryStore::new(), Classifier::new(mode))
    }
}

impl<S: HistoryStore> HistoryService<S> {
    pub fn new(store: S, classifier: Classifier) -> Self {
        Self {
            state: RwLock::new(State {
                store,
                recorded_pairs: HashSet::new(),
            }),
            classifier,
        }
    }

    /// Append a snapshot as-is.
    pub async fn put(&self, snapshot: DocumentSnapshot) {
        self.state.write().await.store.put_snapshot(snapshot);
    }

    /// Append snapshots whose id is not yet stored for their source, filling
    /// in missing checksums. Returns the number appended.
    pub async fn ingest(&self, snapshots: Vec<DocumentSnapshot>) -> usize {
        let mut state = self.state.write().await;
        let mut added = 0;
        for snapshot in snapshots {
            if state.store.contains_snapshot(&snapshot.source_id, &snapshot.id) {
                continue;
            }
            state.store.put_snapshot(snapshot.with_checksum());
            added += 1;
        }
        if added > 0 {
            info!(added, "ingested snapshots");
        }
        added
    }

    /// Run a detection pass over every stored snapshot. Returns the newly
    /// produced records, which are also appended to the ledger.
    pub async fn detect_changes(&self) -> Vec<ChangeDetection> {
        let mut state = self.state.write().await;
        let snapshots = state.store.all_snapshots();
        self.detect_and_record(&mut state, &snapshots)
    }

    /// Run a detection pass over one source's snapshots.
    pub async fn detect_changes_for(&self, source_id: &str) -> Vec<ChangeDetection> {
        let mut state = self.state.write().await;
        let snapshots = state.store.snapshots(source_id);
        self.detect_and_record(&mut state, &snapshots)
    }

    fn detect_and_record(
        &self,
        state: &mut State<S>,
        snapshots: &[DocumentSnapshot],
    ) -> Vec<ChangeDetection> {
        let recorded = &state.recorded_pairs;
        let changes = detect_changes(snapshots, &self.classifier, Utc::now(), |older, newer| {
            !recorded.contains(&pair_key(older, newer))
        });

        for change in &changes {
            state
                .recorded_pairs
                .insert(pair_key(&change.previous_version, &change.current_version));
            state.store.record_change(change.clone());
        }
        changes
    }

    /// Snapshots filtered by source and an inclusive `original_date` range,
    /// newest first.
    pub async fn get_historical_data(
        &self,
        source_id: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<DocumentSnapshot> {
        let state = self.state.read().await;
        let mut snapshots = match source_id {
            Some(id) => state.store.snapshots(id),
            None => state.store.all_snapshots(),
        };
        snapshots.retain(|s| {
            start.is_none_or(|t| s.original_date >= t) && end.is_none_or(|t| s.original_date <= t)
        });
        snapshots.sort_by(|a, b| b.original_date.cmp(&a.original_date));
        snapshots
    }

    /// Ledger entries newest first, optionally capped.
    pub async fn get_change_history(&self, limit: Option<usize>) -> Vec<ChangeDetection> {
        self.state.read().await.store.query_changes(None, limit)
    }

    /// Ledger entries for one source, newest first, optionally capped.
    pub async fn get_source_change_history(
        &self,
        source_id: &str,
        limit: Option<usize>,
    ) -> Vec<ChangeDetection> {
        self.state
            .read()
            .await
            .store
            .query_changes(Some(source_id), limit)
    }

    pub async fn generate_comprehensive_report(&self, source_id: &str) -> SourceReport {
        self.state.read().await.store.report(source_id)
    }

    pub async fn source_ids(&self) -> Vec<String> {
        self.state.read().await.store.source_ids()
    }
}

fn pair_key(older: &DocumentSnapshot, newer: &DocumentSnapshot) -> PairKey {
    (
        newer.source_id.clone(),
        older.id.clone(),
        newer.id.clone(),
    )
}
