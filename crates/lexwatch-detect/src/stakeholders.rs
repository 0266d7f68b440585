//! Stakeholder groups affected by a change.
//!
//! The base set comes from the issuing authority, identified by a token in
//! the source id (e.g. `fda_us` → `fda`). Sources with no known authority
//! token fall back to the snapshot's region tag.

use lexwatch_core::DetailedComparison;

/// Authority token → stakeholder groups.
pub const AUTHORITY_STAKEHOLDERS: &[(&str, &[&str])] = &[
    ("fda", &["US Manufacturers", "FDA"]),
    ("bfarm", &["German Manufacturers", "BfArM"]),
    ("ema", &["EU Manufacturers", "EMA", "Notified Bodies"]),
    ("mhra", &["UK Manufacturers", "MHRA"]),
    ("swissmedic", &["Swiss Manufacturers", "Swissmedic"]),
];

/// Region tag → stakeholder groups.
pub const REGION_STAKEHOLDERS: &[(&str, &[&str])] = &[
    ("US", &["US Manufacturers"]),
    ("DE", &["German Manufacturers"]),
    ("EU", &["EU Manufacturers"]),
    ("UK", &["UK Manufacturers"]),
    ("GB", &["UK Manufacturers"]),
    ("CH", &["Swiss Manufacturers"]),
];

/// Used when neither the source id nor the region is recognised.
pub const DEFAULT_STAKEHOLDERS: &[&str] = &["Manufacturers"];

const SIGNIFICANT_STAKEHOLDERS: &[&str] = &["Regulators", "Quality Assurance Teams"];
const STRUCTURAL_STAKEHOLDERS: &[&str] = &["Compliance Officers", "Regulatory Affairs"];

/// Base stakeholder groups for a source.
pub fn base_stakeholders(source_id: &str, region: &str) -> &'static [&'static str] {
    let lower = source_id.to_ascii_lowercase();
    let by_authority = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find_map(|token| lookup(AUTHORITY_STAKEHOLDERS, token));
    if let Some(groups) = by_authority {
        return groups;
    }

    let region = region.trim().to_ascii_uppercase();
    lookup(REGION_STAKEHOLDERS, &region).unwrap_or(DEFAULT_STAKEHOLDERS)
}

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    key: &str,
) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Stakeholders affected by a comparison, deduplicated in first-seen order.
pub fn affected_stakeholders(
    source_id: &str,
    region: &str,
    comparison: &DetailedComparison,
) -> Vec<String> {
    let mut groups: Vec<&str> = base_stakeholders(source_id, region).to_vec();
    if comparison.significant_changes {
        groups.extend_from_slice(SIGNIFICANT_STAKEHOLDERS);
    }
    if !comparison.structural_changes.is_empty() {
        groups.extend_from_slice(STRUCTURAL_STAKEHOLDERS);
    }

    let mut out: Vec<String> = Vec::with_capacity(groups.len());
    for group in groups {
        if !out.iter().any(|g| g == group) {
            out.push(group.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_from_source_id() {
        assert_eq!(base_stakeholders("fda_us", ""), &["US Manufacturers", "FDA"]);
        assert_eq!(base_stakeholders("BfArM-DE", ""), &["German Manufacturers", "BfArM"]);
        assert_eq!(base_stakeholders("swissmedic", ""), &["Swiss Manufacturers", "Swissmedic"]);
    }

    #[test]
    fn token_match_not_substring() {
        // "schema" contains "ema" but is not the EMA token.
        assert_eq!(base_stakeholders("schema_feed", "CH"), &["Swiss Manufacturers"]);
    }

    #[test]
    fn region_fallback_and_default() {
        assert_eq!(base_stakeholders("national_feed", "uk"), &["UK Manufacturers"]);
        assert_eq!(base_stakeholders("national_feed", ""), DEFAULT_STAKEHOLDERS);
    }

    #[test]
    fn significant_and_structural_groups_added() {
        let comparison = DetailedComparison {
            significant_changes: true,
            structural_changes: vec!["page count changed: 1 → 2".into()],
            ..DetailedComparison::default()
        };
        let groups = affected_stakeholders("mhra_uk", "UK", &comparison);
        assert_eq!(
            groups,
            vec![
                "UK Manufacturers",
                "MHRA",
                "Regulators",
                "Quality Assurance Teams",
                "Compliance Officers",
                "Regulatory Affairs",
            ]
        );
    }

    #[test]
    fn no_flags_only_base() {
        let groups = affected_stakeholders("ema_eu", "EU", &DetailedComparison::default());
        assert_eq!(groups, vec!["EU Manufacturers", "EMA", "Notified Bodies"]);
    }
}
