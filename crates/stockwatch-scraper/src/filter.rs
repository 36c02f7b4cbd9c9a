//! Store filter: narrows raw store records to the preferred-store set.

use std::collections::HashSet;

use crate::types::{FilteredStoreEntry, RawStoreEntry};

/// The caller's stores of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferredStores(HashSet<i64>);

impl PreferredStores {
    #[must_use]
    pub fn new(ids: &[i64]) -> Self {
        Self(ids.iter().copied().collect())
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keep the entries whose id is preferred, in their original order.
///
/// Entries without a numeric id never match. A missing name becomes `""` and
/// a missing or non-boolean stock flag becomes `false`.
#[must_use]
pub fn filter_stores(
    entries: &[RawStoreEntry],
    preferred: &PreferredStores,
) -> Vec<FilteredStoreEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let id = entry.id.filter(|id| preferred.contains(*id))?;
            Some(FilteredStoreEntry {
                id,
                name: entry.name.clone().unwrap_or_default(),
                in_stock: entry.in_stock.unwrap_or(false),
            })
        })
        .collect()
}

/// Apply the preferred-store filter to already-normalized entries.
#[must_use]
pub fn refilter(
    entries: &[FilteredStoreEntry],
    preferred: &PreferredStores,
) -> Vec<FilteredStoreEntry> {
    entries
        .iter()
        .filter(|entry| preferred.contains(entry.id))
        .cloned()
        .collect()
}
