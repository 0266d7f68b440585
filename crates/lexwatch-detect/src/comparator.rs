//! Line-level comparison of two adjacent document versions.
//!
//! The diff is set-based: a line counts as unchanged if the exact string
//! appears anywhere in the other version. There is no notion of movement,
//! so a reordered line that still exists elsewhere is not reported.

use std::collections::HashSet;

use lexwatch_core::{DetailedComparison, DocumentSnapshot};

/// `content_diff_percentage` above this marks the change as significant.
pub const SIGNIFICANCE_THRESHOLD: u8 = 10;

/// Maximum number of entries in `modified_sections`.
pub const MAX_MODIFIED_SECTIONS: usize = 5;

/// Compare `older` against `newer`.
///
/// When both snapshots carry the same non-empty checksum the line diff is
/// skipped and reported as unchanged. Metadata deltas are still computed.
pub fn compare(older: &DocumentSnapshot, newer: &DocumentSnapshot) -> DetailedComparison {
    let structural_changes = structural_changes(older, newer);

    if !older.checksum.is_empty() && older.checksum == newer.checksum {
        return DetailedComparison {
            structural_changes,
            ..DetailedComparison::default()
        };
    }

    let old_lines = content_lines(&older.content);
    let new_lines = content_lines(&newer.content);
    let old_set: HashSet<&str> = old_lines.iter().copied().collect();
    let new_set: HashSet<&str> = new_lines.iter().copied().collect();

    let added_content: Vec<String> = new_lines
        .iter()
        .filter(|line| !old_set.contains(*line))
        .map(|line| line.to_string())
        .collect();
    let removed_content: Vec<String> = old_lines
        .iter()
        .filter(|line| !new_set.contains(*line))
        .map(|line| line.to_string())
        .collect();

    let content_diff_percentage = diff_percentage(
        added_content.len() + removed_content.len(),
        old_lines.len().max(new_lines.len()),
    );

    DetailedComparison {
        modified_sections: modified_sections(&old_lines, &new_lines),
        added_content,
        removed_content,
        structural_changes,
        content_diff_percentage,
        significant_changes: content_diff_percentage > SIGNIFICANCE_THRESHOLD,
    }
}

/// Non-blank lines of a document body.
pub fn content_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// `round(100 * changed / total)`, capped at 100. Zero when `total` is zero.
pub fn diff_percentage(changed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * changed as f64 / total as f64).round();
    pct.min(100.0) as u8
}

/// Parse a markdown heading with 1–3 leading `#`. Returns the title text.
fn heading_title(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

/// Headings of the newer version that are new or changed.
///
/// A heading is new when no older heading line contains its title text,
/// and changed when one does but no older heading line matches it exactly.
fn modified_sections(old_lines: &[&str], new_lines: &[&str]) -> Vec<String> {
    let old_headings: Vec<&str> = old_lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| heading_title(l).is_some())
        .collect();

    let mut sections = Vec::new();
    for line in new_lines {
        if sections.len() == MAX_MODIFIED_SECTIONS {
            break;
        }
        let line = line.trim();
        let Some(title) = heading_title(line) else {
            continue;
        };

        if !old_headings.iter().any(|old| old.contains(title)) {
            sections.push(format!("new section: {title}"));
        } else if !old_headings.contains(&line) {
            sections.push(format!("changed section: {title}"));
        }
    }
    sections
}

/// Metadata deltas in fixed order: page count, language, file type.
fn structural_changes(older: &DocumentSnapshot, newer: &DocumentSnapshot) -> Vec<String> {
    let mut changes = Vec::new();

    let (old_pages, new_pages) = (older.metadata.page_count, newer.metadata.page_count);
    if old_pages != new_pages {
        changes.push(format!("page count changed: {old_pages} → {new_pages}"));
    }

    let (old_lang, new_lang) = (older.effective_language(), newer.effective_language());
    if old_lang != new_lang {
        changes.push(format!("language changed: {old_lang} → {new_lang}"));
    }

    let (old_type, new_type) = (&older.metadata.file_type, &newer.metadata.file_type);
    if old_type != new_type {
        changes.push(format!("file type changed: {old_type} → {new_type}"));
    }

    changes
}
