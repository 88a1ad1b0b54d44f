// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Option reconciliation
//!
//! Merges the selection lookup and the search lookup into one list keyed by
//! identifier. Selection results are inserted first and are never replaced
//! by search results, so a narrower or older search page cannot mask the
//! label of a selected record.

use evd_api_contract::{RecordId, RelationOption};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledOptions {
    /// Every known option, deduplicated, in insertion order
    pub merged: IndexMap<RecordId, RelationOption>,
    /// Options offered for selection
    pub candidates: Vec<RelationOption>,
}

impl ReconciledOptions {
    pub fn label_of(&self, id: RecordId) -> Option<&str> {
        self.merged.get(&id).map(|option| option.name.as_str())
    }
}

/// Merge both lookups, drop selected ids, and apply the optional local substring filter
pub fn reconcile(
    selection_results: &[RelationOption],
    search_results: &[RelationOption],
    selected: &[RecordId],
    local_filter: Option<&str>,
) -> ReconciledOptions {
    let mut merged: IndexMap<RecordId, RelationOption> = IndexMap::new();
    for option in selection_results.iter().chain(search_results) {
        merged.entry(option.id).or_insert_with(|| option.clone());
    }

    let needle = local_filter.map(str::to_lowercase);
    let candidates = merged
        .values()
        .filter(|option| !selected.contains(&option.id))
        .filter(|option| match &needle {
            Some(needle) => option.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .cloned()
        .collect();

    ReconciledOptions { merged, candidates }
}

/// Everything reconciliation depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileKey {
    pub selection_revision: u64,
    pub search_revision: u64,
    pub selected_revision: u64,
    pub local_filter: Option<String>,
}

/// Recomputes [`ReconciledOptions`] only when its key changes
#[derive(Debug, Default)]
pub struct ReconcileCache {
    key: Option<ReconcileKey>,
    value: ReconciledOptions,
}

impl ReconcileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `compute` ran
    pub fn refresh(
        &mut self,
        key: ReconcileKey,
        compute: impl FnOnce() -> ReconciledOptions,
    ) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.value = compute();
        self.key = Some(key);
        true
    }

    pub fn value(&self) -> &ReconciledOptions {
        &self.value
    }
}
