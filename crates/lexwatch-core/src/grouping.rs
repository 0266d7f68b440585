//! Grouping key derivation for linking document versions.
//!
//! Source feeds assign a fresh opaque id to every capture, so successive
//! revisions of one document cannot be linked by id. Instead, revisions are
//! linked by the part of the title before the first `" - "` separator.
//!
//! # Title conventions
//!
//! - Revision suffix: "MDR Guidance - Update 1", "MDR Guidance - Update 2"
//! - Dated suffix: "Cybersecurity Notice - 2024-03"
//! - No suffix: "FDA Notice" (the whole title is the key)
//!
//! Unrelated documents sharing a prefix before the separator are merged
//! into one chain. This is a known accuracy limitation of title matching.

use crate::document::DocumentSnapshot;

/// Separator between a document's base title and its revision suffix.
pub const TITLE_SEPARATOR: &str = " - ";

/// Derive the grouping key for a title.
///
/// Input: "MDR Guidance - Update 1"
/// Output: "MDR Guidance"
///
/// Surrounding whitespace is trimmed from the key.
pub fn title_key(title: &str) -> &str {
    let base = match title.find(TITLE_SEPARATOR) {
        Some(idx) => &title[..idx],
        None => title,
    };
    base.trim()
}

/// Grouping key of a snapshot. Snapshots of one source sharing this key form
/// a version chain.
pub fn grouping_key(snapshot: &DocumentSnapshot) -> String {
    title_key(&snapshot.title).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_suffix_is_dropped() {
        assert_eq!(title_key("MDR Guidance - Update 1"), "MDR Guidance");
        assert_eq!(title_key("MDR Guidance - Update 2"), "MDR Guidance");
    }

    #[test]
    fn title_without_separator_is_whole_key() {
        assert_eq!(title_key("FDA Notice"), "FDA Notice");
    }

    #[test]
    fn only_first_separator_splits() {
        assert_eq!(
            title_key("IVDR Transition - Part 2 - Corrigendum"),
            "IVDR Transition"
        );
    }

    #[test]
    fn hyphen_without_spaces_is_not_a_separator() {
        assert_eq!(title_key("Post-Market Surveillance"), "Post-Market Surveillance");
    }

    #[test]
    fn shared_prefix_merges_unrelated_titles() {
        // Known limitation: both land in the same chain.
        assert_eq!(
            title_key("Guidance - Software"),
            title_key("Guidance - Sterilisation")
        );
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(title_key("  MDR Guidance  - Update 3"), "MDR Guidance");
    }

    #[test]
    fn empty_title() {
        assert_eq!(title_key(""), "");
    }
}
