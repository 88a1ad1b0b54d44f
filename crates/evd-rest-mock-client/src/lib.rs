// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock REST client implementing the OptionSource trait for testing
//!
//! This crate provides an in-memory implementation of [`OptionSource`] that
//! answers searches and id lookups without making network calls. Latency is
//! simulated with `tokio::time::sleep`, so tests running on a paused clock
//! control exactly when each response arrives.

use async_trait::async_trait;
use evd_api_contract::{Collection, IdFilterQuery, RecordId, RelationOption, SearchQuery};
use evd_client_api::{ClientApiError, ClientApiResult, OptionSource};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::trace;

/// A request observed by the mock, recorded when the call starts
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Search { endpoint: String, query: SearchQuery },
    Resolve { endpoint: String, ids: Vec<RecordId> },
}

impl MockCall {
    pub fn endpoint(&self) -> &str {
        match self {
            MockCall::Search { endpoint, .. } | MockCall::Resolve { endpoint, .. } => endpoint,
        }
    }

    /// Name filter of a search call, `Some("")` for unfiltered searches
    pub fn search_name(&self) -> Option<&str> {
        match self {
            MockCall::Search { query, .. } => Some(query.name.as_deref().unwrap_or("")),
            MockCall::Resolve { .. } => None,
        }
    }
}

/// Mock option source backed by in-memory collections
#[derive(Debug, Clone)]
pub struct MockRestClient {
    /// Options per endpoint
    collections: Arc<RwLock<HashMap<String, Vec<RelationOption>>>>,
    /// Every call in arrival order
    calls: Arc<Mutex<Vec<MockCall>>>,
    /// Default simulated latency (in milliseconds)
    delay_ms: u64,
    /// Latency overrides keyed by search name filter
    search_delays: HashMap<String, u64>,
    /// Fail every call
    simulate_failures: bool,
    /// Fail calls against these endpoints only
    failing_endpoints: HashSet<String>,
}

impl Default for MockRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRestClient {
    /// Create a new mock client with default settings
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay_ms: 50,
            search_delays: HashMap::new(),
            simulate_failures: false,
            failing_endpoints: HashSet::new(),
        }
    }

    /// Create a mock client with custom delay
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new()
        }
    }

    /// Create a mock client that simulates failures on every call
    pub fn with_failures(simulate_failures: bool) -> Self {
        Self {
            simulate_failures,
            ..Self::new()
        }
    }

    /// Create a mock client seeded with a small directory for demos
    pub fn with_demo_data() -> Self {
        let client = Self::new();
        let mut seeded = HashMap::new();
        for collection in Collection::ALL {
            seeded.insert(collection.endpoint().to_string(), demo_options(collection));
        }
        Self {
            collections: Arc::new(RwLock::new(seeded)),
            ..client
        }
    }

    /// Seed a collection, replacing any previous content
    pub fn with_collection(
        self,
        endpoint: &str,
        options: impl IntoIterator<Item = RelationOption>,
    ) -> Self {
        self.collections
            .try_write()
            .expect("mock collections seeded while a lookup holds them")
            .insert(endpoint.to_string(), options.into_iter().collect());
        self
    }

    /// Delay searches for a specific name filter
    pub fn with_search_delay(mut self, name: &str, delay_ms: u64) -> Self {
        self.search_delays.insert(name.to_string(), delay_ms);
        self
    }

    pub fn with_default_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Fail every call against `endpoint`
    pub fn with_failing_endpoint(mut self, endpoint: &str) -> Self {
        self.failing_endpoints.insert(endpoint.to_string());
        self
    }

    /// Replace a collection while the client is shared
    pub async fn set_collection(
        &self,
        endpoint: &str,
        options: impl IntoIterator<Item = RelationOption>,
    ) {
        self.collections
            .write()
            .await
            .insert(endpoint.to_string(), options.into_iter().collect());
    }

    /// All calls observed so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn search_calls(&self) -> Vec<MockCall> {
        self.calls().into_iter().filter(|c| matches!(c, MockCall::Search { .. })).collect()
    }

    pub fn resolve_calls(&self) -> Vec<MockCall> {
        self.calls().into_iter().filter(|c| matches!(c, MockCall::Resolve { .. })).collect()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: MockCall) {
        trace!(?call, "Mock call");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    async fn simulate_latency(&self, delay_ms: u64) {
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    fn check_failure(&self, endpoint: &str) -> ClientApiResult<()> {
        if self.simulate_failures || self.failing_endpoints.contains(endpoint) {
            return Err(ClientApiError::Server(format!(
                "Simulated failure for {}",
                endpoint
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OptionSource for MockRestClient {
    async fn search_options(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.record(MockCall::Search {
            endpoint: endpoint.to_string(),
            query: query.clone(),
        });

        let name = query.name.clone().unwrap_or_default();
        let delay = self.search_delays.get(&name).copied().unwrap_or(self.delay_ms);
        self.simulate_latency(delay).await;
        self.check_failure(endpoint)?;

        let needle = name.to_lowercase();
        let mut found: Vec<RelationOption> = self
            .collections
            .read()
            .await
            .get(endpoint)
            .map(|options| {
                options
                    .iter()
                    .filter(|o| needle.is_empty() || o.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        found.truncate(query.limit as usize);
        Ok(found)
    }

    async fn resolve_options(
        &self,
        endpoint: &str,
        query: &IdFilterQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.record(MockCall::Resolve {
            endpoint: endpoint.to_string(),
            ids: query.ids.clone(),
        });

        self.simulate_latency(self.delay_ms).await;
        self.check_failure(endpoint)?;

        let collections = self.collections.read().await;
        let Some(options) = collections.get(endpoint) else {
            return Ok(Vec::new());
        };
        Ok(options.iter().filter(|o| query.ids.contains(&o.id)).cloned().collect())
    }
}

fn demo_options(collection: Collection) -> Vec<RelationOption> {
    let names: &[&str] = match collection {
        Collection::Entities => &[
            "Blue Note",
            "Jazz Cellar",
            "Venue X",
            "The Warehouse",
            "Riverside Hall",
            "Pianos Bar",
            "Elsewhere",
            "Union Pool",
        ],
        Collection::Events => &["Friday Night Jazz", "Open Mic", "Techno Marathon", "Poetry Slam"],
        Collection::Series => &["Jazz Brunch Series", "Summer Stage", "Late Night Sessions"],
        Collection::Tags => &[
            "jazz", "techno", "house", "ambient", "free", "all-ages", "outdoor", "dj", "live-band",
        ],
        Collection::EventTypes => &["Concert", "Club Night", "Festival", "Workshop", "Reading"],
        Collection::EntityTypes => &["Venue", "Artist", "Promoter", "Collective"],
        Collection::Roles => &["Venue", "Artist", "Producer", "DJ", "Promoter"],
        Collection::Users => &["admin", "curator", "guest"],
        Collection::Locations => &["Brooklyn", "Manhattan", "Queens"],
    };
    names
        .iter()
        .enumerate()
        .map(|(index, name)| RelationOption::new(index as RecordId + 1, *name))
        .collect()
}
