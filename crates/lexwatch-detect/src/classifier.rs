//! Rule-based classification of a comparison into a change record.
//!
//! Derives the change summary, impact tier, affected sections, confidence,
//! and affected stakeholders from a [`DetailedComparison`] and the two
//! snapshots it was computed from. Classification is total: every input
//! produces a complete [`ChangeDetection`].

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use lexwatch_core::{
    ChangeDetection, ChangeType, ChangeTypeMode, DetailedComparison, DocumentSnapshot, ImpactLevel,
    grouping_key,
};
use regex::Regex;

use crate::stakeholders::affected_stakeholders;

/// Summary used when no rule produced a statement.
pub const MINOR_CHANGES: &str = "minor changes, no specific details";

const HIGH_DIFF_THRESHOLD: u8 = 50;
const MEDIUM_DIFF_THRESHOLD: u8 = 25;
const CONFIDENCE_DIFF_THRESHOLD: u8 = 20;
const STRUCTURAL_MEDIUM_THRESHOLD: usize = 3;

const BASE_CONFIDENCE: f32 = 0.5;
const MAX_CONFIDENCE: f32 = 0.95;

static SECTION_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Section\s+\d+(?:\.\d+)*|Appendix\s+[A-Z0-9]+)\b").expect("valid regex")
});

/// Classifies comparisons into [`ChangeDetection`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    mode: ChangeTypeMode,
}

impl Classifier {
    pub fn new(mode: ChangeTypeMode) -> Self {
        Self { mode }
    }

    /// Build the change record for one adjacent pair.
    pub fn classify(
        &self,
        older: &DocumentSnapshot,
        newer: &DocumentSnapshot,
        comparison: DetailedComparison,
        detected_at: DateTime<Utc>,
    ) -> ChangeDetection {
        let change_type = match self.mode {
            ChangeTypeMode::Fixed => ChangeType::Modified,
            ChangeTypeMode::Categorized => categorize_change_type(&comparison, older, newer),
        };

        ChangeDetection {
            id: ChangeDetection::pair_id(&older.id, &newer.id),
            document_id: grouping_key(newer),
            document_title: newer.title.clone(),
            source_id: newer.source_id.clone(),
            change_type,
            changes_summary: changes_summary(&comparison, older, newer),
            impact_assessment: assess_impact(&comparison, older, newer),
            detected_at,
            affected_sections: affected_sections(&comparison),
            confidence: confidence(&comparison),
            affected_stakeholders: affected_stakeholders(
                &newer.source_id,
                &newer.region,
                &comparison,
            ),
            previous_version: older.clone(),
            current_version: newer.clone(),
            detailed_comparison: comparison,
        }
    }
}

fn device_classes_differ(older: &DocumentSnapshot, newer: &DocumentSnapshot) -> bool {
    older.sorted_device_classes() != newer.sorted_device_classes()
}

/// Human-readable change statements in fixed rule order.
pub fn changes_summary(
    comparison: &DetailedComparison,
    older: &DocumentSnapshot,
    newer: &DocumentSnapshot,
) -> Vec<String> {
    let mut summary = Vec::new();

    if comparison.significant_changes {
        summary.push(format!(
            "content revised, {}% of lines changed",
            comparison.content_diff_percentage
        ));
    }
    if !comparison.added_content.is_empty() {
        summary.push(format!(
            "{} new sections/lines added",
            comparison.added_content.len()
        ));
    }
    if !comparison.removed_content.is_empty() {
        summary.push(format!(
            "{} sections/lines removed",
            comparison.removed_content.len()
        ));
    }
    if older.metadata.page_count != newer.metadata.page_count {
        summary.push(format!(
            "scope changed: {} → {} pages",
            older.metadata.page_count, newer.metadata.page_count
        ));
    }
    if older.category != newer.category {
        summary.push(format!(
            "category changed: {} → {}",
            older.category, newer.category
        ));
    }
    if device_classes_differ(older, newer) {
        summary.push(format!(
            "device classes updated: [{}] → [{}]",
            older.sorted_device_classes().join(", "),
            newer.sorted_device_classes().join(", ")
        ));
    }
    if older.status != newer.status {
        summary.push(format!("status changed: {} → {}", older.status, newer.status));
    }
    summary.extend(comparison.structural_changes.iter().cloned());

    if summary.is_empty() {
        summary.push(MINOR_CHANGES.to_string());
    }
    summary
}

/// Impact tier. Rules are grouped by tier and checked from the most to the
/// least severe tier, so a device-class change with a 26–50% diff is high
/// rather than medium. Checking the diff thresholds before the attribute rules
/// would let a larger diff score lower than a smaller one with the same
/// attributes; the tier order keeps impact monotonic in the diff percentage.
///
///
/// 1. status changed to archived → critical
/// 2. diff > 50% → high
/// 3. device classes differ → high
/// 4. diff > 25% → medium
/// 5. category differs → medium
/// 6. more than 3 structural changes → medium
/// 7. otherwise low
pub fn assess_impact(
    comparison: &DetailedComparison,
    older: &DocumentSnapshot,
    newer: &DocumentSnapshot,
) -> ImpactLevel {
    let pct = comparison.content_diff_percentage;

    if older.status != newer.status && newer.is_archived() {
        ImpactLevel::Critical
    } else if pct > HIGH_DIFF_THRESHOLD || device_classes_differ(older, newer) {
        ImpactLevel::High
    } else if pct > MEDIUM_DIFF_THRESHOLD
        || older.category != newer.category
        || comparison.structural_changes.len() > STRUCTURAL_MEDIUM_THRESHOLD
    {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

/// Additive confidence heuristic, clamped to 0.95. Contributions may
/// overlap (a large diff is both significant and above 20%).
pub fn confidence(comparison: &DetailedComparison) -> f32 {
    let mut score = BASE_CONFIDENCE;
    if comparison.significant_changes {
        score += 0.2;
    }
    if !comparison.structural_changes.is_empty() {
        score += 0.15;
    }
    if !comparison.added_content.is_empty() {
        score += 0.1;
    }
    if !comparison.removed_content.is_empty() {
        score += 0.1;
    }
    if comparison.content_diff_percentage > CONFIDENCE_DIFF_THRESHOLD {
        score += 0.1;
    }
    score.min(MAX_CONFIDENCE)
}

/// "Section N[.N...]" and "Appendix X" references in changed lines and
/// modified section labels, deduplicated in first-seen order.
pub fn affected_sections(comparison: &DetailedComparison) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let lines = comparison
        .added_content
        .iter()
        .chain(&comparison.removed_content)
        .chain(&comparison.modified_sections);

    for line in lines {
        for m in SECTION_REF.find_iter(line) {
            if !sections.iter().any(|s| s == m.as_str()) {
                sections.push(m.as_str().to_string());
            }
        }
    }
    sections
}

/// Categorised change type, first match wins:
/// status → structural → significant content → category/device classes →
/// any line change → `modified`.
pub fn categorize_change_type(
    comparison: &DetailedComparison,
    older: &DocumentSnapshot,
    newer: &DocumentSnapshot,
) -> ChangeType {
    if older.status != newer.status {
        ChangeType::StatusChange
    } else if !comparison.structural_changes.is_empty() {
        ChangeType::StructuralChange
    } else if comparison.significant_changes {
        ChangeType::ContentUpdate
    } else if older.category != newer.category || device_classes_differ(older, newer) {
        ChangeType::MetadataChange
    } else if !comparison.added_content.is_empty() || !comparison.removed_content.is_empty() {
        ChangeType::ContentUpdate
    } else {
        ChangeType::Modified
    }
}
