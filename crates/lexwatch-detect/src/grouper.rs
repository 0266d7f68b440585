//! Version chains: snapshots of one logical document in publication order.

use std::collections::HashMap;

use lexwatch_core::{DocumentSnapshot, grouping_key};

/// Snapshots sharing a source and grouping key, sorted ascending by
/// `original_date`. Equal dates keep input order.
#[derive(Debug)]
pub struct VersionChain<'a> {
    pub source_id: &'a str,
    pub key: String,
    pub versions: Vec<&'a DocumentSnapshot>,
}

impl<'a> VersionChain<'a> {
    /// Consecutive `(older, newer)` pairs. Never skips a version.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&'a DocumentSnapshot, &'a DocumentSnapshot)> + '_ {
        self.versions.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Group snapshots into version chains.
///
/// Chains come back in order of their first snapshot in the input. Chains
/// of length 1 are included and simply yield no pairs.
pub fn group_versions(snapshots: &[DocumentSnapshot]) -> Vec<VersionChain<'_>> {
    let mut index: HashMap<(&str, String), usize> = HashMap::new();
    let mut chains: Vec<VersionChain<'_>> = Vec::new();

    for snap in snapshots {
        let key = grouping_key(snap);
        let slot = *index
            .entry((snap.source_id.as_str(), key.clone()))
            .or_insert_with(|| {
                chains.push(VersionChain {
                    source_id: &snap.source_id,
                    key,
                    versions: Vec::new(),
                });
                chains.len() - 1
            });
        chains[slot].versions.push(snap);
    }

    for chain in &mut chains {
        // Stable sort: ties stay in input order.
        chain.versions.sort_by_key(|s| s.original_date);
    }

    chains
}
