//! Change records produced by comparing adjacent document versions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentSnapshot;

/// Impact tier of a detected change. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// `high` and `critical` findings are forwarded to notification.
    pub fn is_alerting(&self) -> bool {
        *self >= Self::High
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nature of a change between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Modified,
    ContentUpdate,
    MetadataChange,
    StructuralChange,
    StatusChange,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::ContentUpdate => "content_update",
            Self::MetadataChange => "metadata_change",
            Self::StructuralChange => "structural_change",
            Self::StatusChange => "status_change",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-level diff between two adjacent versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedComparison {
    /// Lines in the newer version absent from the older, in newer-line order.
    pub added_content: Vec<String>,
    /// Lines in the older version absent from the newer, in older-line order.
    pub removed_content: Vec<String>,
    /// Heading labels that are new or changed in the newer version (max 5).
    pub modified_sections: Vec<String>,
    /// Metadata deltas: page count, language, file type.
    pub structural_changes: Vec<String>,
    /// 0..=100.
    pub content_diff_percentage: u8,
    pub significant_changes: bool,
}

/// A classified change between two adjacent versions of one logical document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetection {
    pub id: String,
    /// Grouping key of the logical document.
    pub document_id: String,
    pub document_title: String,
    pub source_id: String,
    pub change_type: ChangeType,
    pub previous_version: DocumentSnapshot,
    pub current_version: DocumentSnapshot,
    pub changes_summary: Vec<String>,
    pub impact_assessment: ImpactLevel,
    pub detected_at: DateTime<Utc>,
    pub affected_sections: Vec<String>,
    /// 0.5..=0.95.
    pub confidence: f32,
    pub affected_stakeholders: Vec<String>,
    pub detailed_comparison: DetailedComparison,
}

impl ChangeDetection {
    /// Ledger identifier for the change between two snapshot ids.
    pub fn pair_id(previous_id: &str, current_id: &str) -> String {
        format!("change_{previous_id}_{current_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_levels_are_ordered() {
        assert!(ImpactLevel::Low < ImpactLevel::Medium);
        assert!(ImpactLevel::Medium < ImpactLevel::High);
        assert!(ImpactLevel::High < ImpactLevel::Critical);
    }

    #[test]
    fn only_high_and_critical_alert() {
        assert!(!ImpactLevel::Low.is_alerting());
        assert!(!ImpactLevel::Medium.is_alerting());
        assert!(ImpactLevel::High.is_alerting());
        assert!(ImpactLevel::Critical.is_alerting());
    }

    #[test]
    fn enums_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&ChangeType::StatusChange).unwrap(),
            "\"status_change\""
        );
        assert_eq!(
            serde_json::to_string(&ImpactLevel::Critical).unwrap(),
            "\"critical\""
        );
        let parsed: ChangeType = serde_json::from_str("\"content_update\"").unwrap();
        assert_eq!(parsed, ChangeType::ContentUpdate);
    }
}
