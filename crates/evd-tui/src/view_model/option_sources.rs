// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote option sources
//!
//! A picker runs two independent lookups against one collection: the
//! selection lookup resolves bound identifiers into labels and the search
//! lookup fetches candidates for the debounced query. Each lookup is tracked
//! by a [`ResolverSlot`] keyed by its dependency snapshot. Calls run on
//! spawned tokio tasks and report back through a channel as [`PickerMsg`];
//! the slot applies a completion only if its generation is still current, so
//! a slow response for an old snapshot can never overwrite newer state.

use evd_api_contract::{RecordId, RelationOption, SearchQuery};
use evd_client_api::{resolve_ids, ClientApiResult, OptionSource};
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Dependency snapshot of the selection lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionKey {
    pub endpoint: String,
    pub ids: Vec<RecordId>,
}

/// Dependency snapshot of the search lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SearchKey {
    pub endpoint: String,
    pub query: SearchQuery,
}

/// Handle for one in-flight call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverTicket<K> {
    pub generation: u64,
    pub key: K,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Stale,
}

/// Completion of a lookup, delivered back to the owning view model
#[derive(Debug)]
pub enum PickerMsg {
    SelectionResolved {
        ticket: ResolverTicket<SelectionKey>,
        result: ClientApiResult<Vec<RelationOption>>,
    },
    SearchResolved {
        ticket: ResolverTicket<SearchKey>,
        result: ClientApiResult<Vec<RelationOption>>,
    },
}

/// State of one remote lookup
#[derive(Debug)]
pub struct ResolverSlot<K> {
    name: &'static str,
    current: Option<K>,
    generation: u64,
    loading: bool,
    data: Vec<RelationOption>,
    revision: u64,
}

impl<K: Clone + PartialEq + Debug> ResolverSlot<K> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            current: None,
            generation: 0,
            loading: false,
            data: Vec::new(),
            revision: 0,
        }
    }

    /// Start a call for `key` unless it is already the current snapshot
    pub fn begin(&mut self, key: K) -> Option<ResolverTicket<K>> {
        if self.current.as_ref() == Some(&key) {
            return None;
        }
        self.generation += 1;
        self.current = Some(key.clone());
        self.loading = true;
        debug!(resolver = self.name, generation = self.generation, ?key, "Dispatching lookup");
        Some(ResolverTicket {
            generation: self.generation,
            key,
        })
    }

    /// Apply a completion; failures degrade to an empty result
    pub fn complete(
        &mut self,
        ticket: ResolverTicket<K>,
        result: ClientApiResult<Vec<RelationOption>>,
    ) -> CompletionOutcome {
        if ticket.generation != self.generation {
            debug!(
                resolver = self.name,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale lookup result"
            );
            return CompletionOutcome::Stale;
        }

        self.loading = false;
        self.data = match result {
            Ok(data) => {
                debug!(resolver = self.name, count = data.len(), "Lookup applied");
                data
            }
            Err(error) => {
                warn!(resolver = self.name, key = ?ticket.key, %error, "Lookup failed");
                Vec::new()
            }
        };
        self.revision += 1;
        CompletionOutcome::Applied
    }

    /// Forget the current snapshot and data; in-flight calls become stale
    pub fn reset(&mut self) {
        self.generation += 1;
        self.current = None;
        self.loading = false;
        if !self.data.is_empty() {
            self.data.clear();
            self.revision += 1;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> &[RelationOption] {
        &self.data
    }

    /// Bumped every time applied data changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref()
    }
}

pub fn spawn_selection_lookup(
    source: Arc<dyn OptionSource>,
    ticket: ResolverTicket<SelectionKey>,
    tx: UnboundedSender<PickerMsg>,
) {
    tokio::spawn(async move {
        let result = resolve_ids(source.as_ref(), &ticket.key.endpoint, &ticket.key.ids).await;
        // The picker may already be gone
        let _ = tx.send(PickerMsg::SelectionResolved { ticket, result });
    });
}

pub fn spawn_search_lookup(
    source: Arc<dyn OptionSource>,
    ticket: ResolverTicket<SearchKey>,
    tx: UnboundedSender<PickerMsg>,
) {
    tokio::spawn(async move {
        let result = source.search_options(&ticket.key.endpoint, &ticket.key.query).await;
        let _ = tx.send(PickerMsg::SearchResolved { ticket, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use evd_client_api::ClientApiError;

    fn key(ids: &[RecordId]) -> SelectionKey {
        SelectionKey {
            endpoint: "tags".to_string(),
            ids: ids.to_vec(),
        }
    }

    #[test]
    fn begin_only_when_snapshot_changes() {
        let mut slot = ResolverSlot::new("selection");
        let first = slot.begin(key(&[1])).expect("first call");
        assert_eq!(first.generation, 1);
        assert!(slot.is_loading());
        assert!(slot.begin(key(&[1])).is_none());
        assert_eq!(slot.begin(key(&[1, 2])).map(|t| t.generation), Some(2));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut slot = ResolverSlot::new("search");
        let old = slot.begin(key(&[1])).unwrap();
        let new = slot.begin(key(&[2])).unwrap();

        let fresh = vec![RelationOption::new(2, "two")];
        assert_eq!(slot.complete(new, Ok(fresh.clone())), CompletionOutcome::Applied);
        assert_eq!(
            slot.complete(old, Ok(vec![RelationOption::new(1, "one")])),
            CompletionOutcome::Stale
        );
        assert_eq!(slot.data(), fresh.as_slice());
        assert!(!slot.is_loading());
    }

    #[test]
    fn failure_applies_empty_result_and_clears_loading() {
        let mut slot = ResolverSlot::new("search");
        let ticket = slot.begin(key(&[1])).unwrap();
        assert_eq!(
            slot.complete(ticket, Err(ClientApiError::Network("down".to_string()))),
            CompletionOutcome::Applied
        );
        assert!(slot.data().is_empty());
        assert!(!slot.is_loading());
        assert_eq!(slot.revision(), 1);
    }

    #[test]
    fn reset_invalidates_in_flight_calls() {
        let mut slot = ResolverSlot::new("selection");
        let ticket = slot.begin(key(&[1])).unwrap();
        slot.reset();
        assert!(!slot.is_loading());
        assert!(slot.current_key().is_none());
        assert_eq!(slot.complete(ticket, Ok(vec![])), CompletionOutcome::Stale);
        // The same snapshot can be requested again after a reset
        assert!(slot.begin(key(&[1])).is_some());
    }
}
