//! Grouper → Comparator → Classifier over a set of snapshots.

use chrono::{DateTime, Utc};
use lexwatch_core::{ChangeDetection, DocumentSnapshot};
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::comparator::compare;
use crate::grouper::group_versions;

/// Run one detection pass.
///
/// Every adjacent pair of every version chain is offered to `is_new`; pairs
/// it accepts are compared and classified. Records come back in chain order,
/// oldest pair first within a chain.
pub fn detect_changes(
    snapshots: &[DocumentSnapshot],
    classifier: &Classifier,
    detected_at: DateTime<Utc>,
    mut is_new: impl FnMut(&DocumentSnapshot, &DocumentSnapshot) -> bool,
) -> Vec<ChangeDetection> {
    let chains = group_versions(snapshots);
    let mut changes = Vec::new();

    for chain in &chains {
        for (older, newer) in chain.adjacent_pairs() {
            if !is_new(older, newer) {
                continue;
            }
            let comparison = compare(older, newer);
            debug!(
                source = chain.source_id,
                document = %chain.key,
                older = %older.id,
                newer = %newer.id,
                diff = comparison.content_diff_percentage,
                "compared versions"
            );
            changes.push(classifier.classify(older, newer, comparison, detected_at));
        }
    }

    info!(
        snapshots = snapshots.len(),
        chains = chains.len(),
        changes = changes.len(),
        "detection pass complete"
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snap(id: &str, title: &str, day: u32, content: &str) -> DocumentSnapshot {
        let date = Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
        DocumentSnapshot::new(id, "ema_eu", title, content, date)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn three_version_chain_yields_two_adjacent_records() {
        let snapshots = vec![
            snap("v3", "MDR Guidance - Update 3", 20, "a\nb\nc"),
            snap("v1", "MDR Guidance - Update 1", 1, "a"),
            snap("other", "FDA Notice", 5, "x"),
            snap("v2", "MDR Guidance - Update 2", 10, "a\nb"),
        ];

        let changes = detect_changes(&snapshots, &Classifier::default(), now(), |_, _| true);
        let pairs: Vec<(&str, &str)> = changes
            .iter()
            .map(|c| (c.previous_version.id.as_str(), c.current_version.id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("v1", "v2"), ("v2", "v3")]);
        assert!(changes.iter().all(|c| c.document_id == "MDR Guidance"));
    }

    #[test]
    fn filter_skips_known_pairs() {
        let snapshots = vec![
            snap("v1", "Guidance - 1", 1, "a"),
            snap("v2", "Guidance - 2", 2, "b"),
            snap("v3", "Guidance - 3", 3, "c"),
        ];
        let changes = detect_changes(&snapshots, &Classifier::default(), now(), |older, _| {
            older.id != "v1"
        });
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id, "change_v2_v3");
    }

    #[test]
    fn no_snapshots_no_changes() {
        let changes = detect_changes(&[], &Classifier::default(), now(), |_, _| true);
        assert!(changes.is_empty());
    }
}
