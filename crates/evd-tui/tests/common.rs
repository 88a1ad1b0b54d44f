// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Shared test utilities for relation picker tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use evd_api_contract::{IdFilterQuery, RecordId, RelationOption, SearchQuery};
use evd_client_api::{ClientApiError, ClientApiResult, OptionSource};
use evd_rest_mock_client::MockRestClient;
use evd_tui::{PickerKey, PickerProps, RelationPickerViewModel, SelectionChange};

pub const VENUES: &str = "entities";

pub fn venues() -> Vec<RelationOption> {
    vec![
        RelationOption::new(7, "Venue X"),
        RelationOption::new(9, "Jazz Cellar"),
        RelationOption::new(11, "The Warehouse"),
        RelationOption::new(42, "Blue Note"),
        RelationOption::new(51, "Jazz Standard"),
    ]
}

pub fn mock_with_venues() -> MockRestClient {
    MockRestClient::new().with_collection(VENUES, venues())
}

/// Option source whose searches and id lookups answer from independent lists
///
/// Unlike the mock client, the two lookups may disagree about a record's
/// name, which is what reconciliation has to sort out.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub search_results: Vec<RelationOption>,
    pub resolve_results: Vec<RelationOption>,
    pub fail_search: bool,
    pub fail_resolve: bool,
    pub searches: Mutex<Vec<SearchQuery>>,
    pub resolves: Mutex<Vec<Vec<RecordId>>>,
}

impl ScriptedSource {
    pub fn new(search_results: Vec<RelationOption>, resolve_results: Vec<RelationOption>) -> Self {
        Self {
            search_results,
            resolve_results,
            ..Default::default()
        }
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.lock().unwrap().len()
    }
}

#[async_trait]
impl OptionSource for ScriptedSource {
    async fn search_options(
        &self,
        _endpoint: &str,
        query: &SearchQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.searches.lock().unwrap().push(query.clone());
        if self.fail_search {
            return Err(ClientApiError::Server("503 Service Unavailable".to_string()));
        }
        Ok(self.search_results.clone())
    }

    async fn resolve_options(
        &self,
        _endpoint: &str,
        query: &IdFilterQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.resolves.lock().unwrap().push(query.ids.clone());
        if self.fail_resolve {
            return Err(ClientApiError::Network("connection reset".to_string()));
        }
        Ok(self
            .resolve_results
            .iter()
            .filter(|option| query.ids.contains(&option.id))
            .cloned()
            .collect())
    }
}

pub type ChangeLog = Arc<Mutex<Vec<SelectionChange>>>;

/// Build a picker that records every change callback
pub fn build_picker(
    props: PickerProps,
    source: Arc<dyn OptionSource>,
) -> (RelationPickerViewModel, ChangeLog) {
    let changes: ChangeLog = Arc::new(Mutex::new(Vec::new()));
    let mut view_model = RelationPickerViewModel::new(props, source);
    let log = changes.clone();
    view_model.on_change(move |change| log.lock().unwrap().push(change.clone()));
    (view_model, changes)
}

pub fn type_text(view_model: &mut RelationPickerViewModel, text: &str) {
    for c in text.chars() {
        view_model.handle_key(PickerKey::Char(c));
    }
}

/// Give spawned lookup tasks a chance to run up to their first await
pub async fn let_tasks_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub fn changes_of(log: &ChangeLog) -> Vec<SelectionChange> {
    log.lock().unwrap().clone()
}
