//! Point-in-time captures of regulatory documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::checksum::content_checksum;

/// Status tag marking a document as withdrawn from active use.
pub const STATUS_ARCHIVED: &str = "archived";

/// Structured attributes captured alongside a document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_count: u32,
    /// Language reported by the source document itself, if any.
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    /// Name of the issuing authority.
    #[serde(deserialize_with = "null_as_default")]
    pub authority: String,
}

/// One captured instance of a regulatory document.
///
/// Snapshots are immutable once ingested. A new revision of the same
/// logical document arrives as a new snapshot with a fresh `document_id`;
/// linkage between revisions goes through [`grouping_key`](crate::grouping_key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: String,
    pub source_id: String,
    /// Opaque capture-time identifier. Not stable across versions.
    pub document_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,
    /// Publication or effective date of this revision.
    pub original_date: DateTime<Utc>,
    pub downloaded_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checksum: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_classes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl DocumentSnapshot {
    /// Create a snapshot with the required fields set and everything else
    /// empty. `document_id` defaults to `id` and `downloaded_at` to
    /// `original_date`.
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        original_date: DateTime<Utc>,
    ) -> Self {
        let id = id.into();
        Self {
            document_id: id.clone(),
            id,
            source_id: source_id.into(),
            title: title.into(),
            url: String::new(),
            content: content.into(),
            metadata: DocumentMetadata::default(),
            original_date,
            downloaded_at: original_date,
            version: 0,
            checksum: String::new(),
            language: String::new(),
            region: String::new(),
            category: String::new(),
            device_classes: Vec::new(),
            status: String::new(),
        }
    }

    /// Language tag used for comparison: the snapshot tag, falling back to
    /// the language recorded in the document metadata.
    pub fn effective_language(&self) -> &str {
        if self.language.is_empty() {
            &self.metadata.language
        } else {
            &self.language
        }
    }

    /// Device classes as a sorted, deduplicated list.
    pub fn sorted_device_classes(&self) -> Vec<String> {
        let mut classes = self.device_classes.clone();
        classes.sort();
        classes.dedup();
        classes
    }

    pub fn is_archived(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ARCHIVED)
    }

    /// Return this snapshot with `checksum` filled in from its content when
    /// the capture did not supply one.
    pub fn with_checksum(mut self) -> Self {
        if self.checksum.is_empty() {
            self.checksum = content_checksum(&self.content);
        }
        self
    }
}

/// Deserialize a JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
