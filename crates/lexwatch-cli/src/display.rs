//! Terminal rendering for change records, snapshot listings, and source reports.

use lexwatch_core::{ChangeDetection, DocumentSnapshot};
use lexwatch_store::SourceReport;

const MAX_LIST_ITEMS: usize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Print one change record as a vertical card.
pub fn print_change_card(change: &ChangeDetection) {
    println!("=== {} ===", change.id);
    println!("{}", change.document_title);
    println!();

    println!("Assessment");
    field("source", &change.source_id);
    field("change_type", change.change_type);
    field("impact", change.impact_assessment);
    field("confidence", format!("{:.2}", change.confidence));
    field(
        "diff",
        format!("{}%", change.detailed_comparison.content_diff_percentage),
    );

    println!("Versions");
    field("previous", version_line(&change.previous_version));
    field("current", version_line(&change.current_version));

    list_section("Summary", &change.changes_summary);
    list_section("Affected sections", &change.affected_sections);
    list_section("Stakeholders", &change.affected_stakeholders);
    list_section(
        "Modified sections",
        &change.detailed_comparison.modified_sections,
    );
    println!();
}

/// One-line listing of a snapshot.
pub fn print_snapshot_row(snapshot: &DocumentSnapshot) {
    println!(
        "  {}  {:<10} {:<24} {}",
        snapshot.original_date.format(DATE_FORMAT),
        snapshot.source_id,
        truncate(&snapshot.id, 24),
        snapshot.title
    );
}

/// Compact one-line listing of a change record.
pub fn print_change_row(change: &ChangeDetection) {
    println!(
        "  {}  {:<8} {:<10} {}",
        change.current_version.original_date.format(DATE_FORMAT),
        change.impact_assessment,
        change.source_id,
        change.document_title
    );
}

pub fn print_report(report: &SourceReport) {
    println!("=== {} ===", report.source_id);
    println!();

    println!("Snapshots");
    field("total_documents", report.total_documents);
    match &report.time_range {
        Some(range) => field(
            "time_range",
            format!(
                "{} .. {}",
                range.start.format(DATE_FORMAT),
                range.end.format(DATE_FORMAT)
            ),
        ),
        None => field("time_range", "-"),
    }

    println!("Changes");
    field("total_changes", report.total_changes);
    field("high_impact", report.high_impact_changes);
    field("critical", report.critical_changes);

    if !report.categories.is_empty() {
        println!("Categories");
        for (category, count) in &report.categories {
            let label = if category.is_empty() { "(none)" } else { category };
            field(label, count);
        }
    }
    if !report.languages.is_empty() {
        println!("Languages");
        for (language, count) in &report.languages {
            let label = if language.is_empty() { "(none)" } else { language };
            field(label, count);
        }
    }

    if !report.changes.is_empty() {
        println!();
        for change in &report.changes {
            print_change_row(change);
        }
    }
}

fn field(name: &str, value: impl std::fmt::Display) {
    println!("  {:<26} {}", name, value);
}

fn version_line(snapshot: &DocumentSnapshot) -> String {
    format!(
        "{} ({})",
        snapshot.id,
        snapshot.original_date.format(DATE_FORMAT)
    )
}

fn list_section(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{header}");
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("  - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
