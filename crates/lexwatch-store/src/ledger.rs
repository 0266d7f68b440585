//! Append-only change ledger.

use lexwatch_core::ChangeDetection;
use tracing::debug;

/// Immutable log of change records, addressed by insertion index.
///
/// Records are never updated or removed. A correction is a new record.
#[derive(Debug, Default)]
pub struct ChangeLedger {
    entries: Vec<ChangeDetection>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index. No deduplication.
    pub fn record(&mut self, change: ChangeDetection) -> usize {
        debug!(id = %change.id, source = %change.source_id, "ledger append");
        self.entries.push(change);
        self.entries.len() - 1
    }

    /// All records in insertion order.
    pub fn entries(&self) -> &[ChangeDetection] {
        &self.entries
    }

    /// Records sorted by `current_version.original_date`, newest first,
    /// optionally filtered to one source and capped at `limit`.
    ///
    /// Records with equal dates keep their insertion order.
    pub fn query(&self, source_id: Option<&str>, limit: Option<usize>) -> Vec<&ChangeDetection> {
        let mut matches: Vec<&ChangeDetection> = self
            .entries
            .iter()
            .filter(|c| source_id.is_none_or(|id| c.source_id == id))
            .collect();
        matches.sort_by(|a, b| {
            b.current_version
                .original_date
                .cmp(&a.current_version.original_date)
        });
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
