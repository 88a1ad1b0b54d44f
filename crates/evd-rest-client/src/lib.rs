// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the events directory service
//!
//! This crate provides the HTTP transport behind relation pickers: candidate
//! search and identifier-to-label resolution against any collection endpoint.
//!
//! ## Design Principles
//!
//! The client owns no picker state. It builds the list URLs, decodes the
//! `{ data: [...] }` envelope, and maps transport failures into
//! [`RestClientError`]. Timeouts live here, in the transport layer, so the
//! widgets above it never need their own timer for network calls.

pub mod client;
pub mod error;
pub mod network_config;

pub use client::*;
pub use error::*;
pub use network_config::NetworkConfig;

use async_trait::async_trait;
use evd_api_contract::{IdFilterQuery, RelationOption, SearchQuery};
use evd_client_api::{ClientApiError, ClientApiResult, OptionSource};

#[async_trait]
impl OptionSource for client::RestClient {
    async fn search_options(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.search(endpoint, query).await.map_err(ClientApiError::from)
    }

    async fn resolve_options(
        &self,
        endpoint: &str,
        query: &IdFilterQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        self.resolve(endpoint, query).await.map_err(ClientApiError::from)
    }
}
