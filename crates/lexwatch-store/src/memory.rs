//! In-memory snapshot store.

use std::collections::HashMap;

use lexwatch_core::DocumentSnapshot;

/// Append-only collection of document snapshots keyed by source.
///
/// Snapshots are kept in insertion order per source. No deduplication
/// happens here: two identical captures are both stored, and the comparator
/// reports them as an unchanged pair.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    by_source: HashMap<String, Vec<DocumentSnapshot>>,
    /// Source ids in first-seen order.
    sources: Vec<String>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot under `source_id`.
    pub fn put(&mut self, source_id: &str, snapshot: DocumentSnapshot) {
        match self.by_source.get_mut(source_id) {
            Some(list) => list.push(snapshot),
            None => {
                self.sources.push(source_id.to_string());
                self.by_source.insert(source_id.to_string(), vec![snapshot]);
            }
        }
    }

    /// All snapshots for a source in insertion order.
    pub fn list(&self, source_id: &str) -> &[DocumentSnapshot] {
        self.by_source
            .get(source_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Union across sources: sources in first-seen order, snapshots in
    /// insertion order within each source.
    pub fn list_all(&self) -> impl Iterator<Item = &DocumentSnapshot> {
        self.sources.iter().flat_map(move |id| self.list(id))
    }

    pub fn source_ids(&self) -> &[String] {
        &self.sources
    }

    pub fn contains(&self, source_id: &str, snapshot_id: &str) -> bool {
        self.list(source_id).iter().any(|s| s.id == snapshot_id)
    }

    /// Total number of snapshots across all sources.
    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
