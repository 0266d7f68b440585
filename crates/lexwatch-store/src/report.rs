//! Per-source aggregate report over stored snapshots and ledger entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lexwatch_core::{ChangeDetection, DocumentSnapshot, ImpactLevel};
use serde::Serialize;

/// Inclusive span of `original_date` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Aggregate view of one source's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source_id: String,
    pub total_documents: usize,
    /// `None` when the source has no snapshots.
    pub time_range: Option<TimeRange>,
    pub total_changes: usize,
    pub high_impact_changes: usize,
    pub critical_changes: usize,
    /// category → snapshot count. Snapshots without a category count under "".
    pub categories: BTreeMap<String, usize>,
    /// language → snapshot count.
    pub languages: BTreeMap<String, usize>,
    pub changes: Vec<ChangeDetection>,
}

impl SourceReport {
    /// Build the report for `source_id` from that source's snapshots and the
    /// full ledger. Ledger entries from other sources are ignored.
    pub fn build<'a>(
        source_id: &str,
        snapshots: &[DocumentSnapshot],
        ledger: impl IntoIterator<Item = &'a ChangeDetection>,
    ) -> Self {
        let mut categories = BTreeMap::new();
        let mut languages = BTreeMap::new();
        let mut time_range: Option<TimeRange> = None;

        for snap in snapshots {
            *categories.entry(snap.category.clone()).or_insert(0) += 1;
            *languages
                .entry(snap.effective_language().to_string())
                .or_insert(0) += 1;

            let date = snap.original_date;
            time_range = Some(match time_range {
                None => TimeRange {
                    start: date,
                    end: date,
                },
                Some(r) => TimeRange {
                    start: r.start.min(date),
                    end: r.end.max(date),
                },
            });
        }

        let changes: Vec<ChangeDetection> = ledger
            .into_iter()
            .filter(|c| c.source_id == source_id)
            .cloned()
            .collect();
        let count_at = |level: ImpactLevel| {
            changes
                .iter()
                .filter(|c| c.impact_assessment == level)
                .count()
        };

        Self {
            source_id: source_id.to_string(),
            total_documents: snapshots.len(),
            time_range,
            total_changes: changes.len(),
            high_impact_changes: count_at(ImpactLevel::High),
            critical_changes: count_at(ImpactLevel::Critical),
            categories,
            languages,
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lexwatch_core::{ChangeType, DetailedComparison};

    fn date(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()
    }

    fn snap(id: &str, month: u32, category: &str, language: &str) -> DocumentSnapshot {
        let mut s = DocumentSnapshot::new(id, "fda_us", "Guidance", "", date(month));
        s.category = category.into();
        s.language = language.into();
        s
    }

    fn change(source: &str, impact: ImpactLevel) -> ChangeDetection {
        ChangeDetection {
            id: format!("{source}-{impact}"),
            document_id: "Guidance".into(),
            document_title: "Guidance".into(),
            source_id: source.into(),
            change_type: ChangeType::Modified,
            previous_version: snap("a", 1, "", ""),
            current_version: snap("b", 2, "", ""),
            changes_summary: vec![],
            impact_assessment: impact,
            detected_at: date(3),
            affected_sections: vec![],
            confidence: 0.5,
            affected_stakeholders: vec![],
            detailed_comparison: DetailedComparison::default(),
        }
    }

    #[test]
    fn aggregates_counts_and_range() {
        let snapshots = vec![
            snap("a", 3, "guidance", "en"),
            snap("b", 1, "guidance", "en"),
            snap("c", 6, "recall", "es"),
        ];
        let ledger = vec![
            change("fda_us", ImpactLevel::High),
            change("fda_us", ImpactLevel::Low),
            change("fda_us", ImpactLevel::Critical),
            change("ema_eu", ImpactLevel::High),
        ];

        let report = SourceReport::build("fda_us", &snapshots, &ledger);
        assert_eq!(report.total_documents, 3);
        assert_eq!(
            report.time_range,
            Some(TimeRange {
                start: date(1),
                end: date(6)
            })
        );
        assert_eq!(report.total_changes, 3);
        assert_eq!(report.high_impact_changes, 1);
        assert_eq!(report.critical_changes, 1);
        assert_eq!(report.categories["guidance"], 2);
        assert_eq!(report.categories["recall"], 1);
        assert_eq!(report.languages["en"], 2);
        assert_eq!(report.languages["es"], 1);
        assert!(report.changes.iter().all(|c| c.source_id == "fda_us"));
    }

    #[test]
    fn empty_source_has_no_range() {
        let ledger: Vec<ChangeDetection> = Vec::new();
        let report = SourceReport::build("mhra_uk", &[], &ledger);
        assert_eq!(report.total_documents, 0);
        assert!(report.time_range.is_none());
        assert!(report.categories.is_empty());
        assert!(report.changes.is_empty());
    }
}
