// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Transport-neutral client API for the events directory
//!
//! Relation pickers only depend on [`OptionSource`]; the REST client and the
//! in-memory mock both implement it, so view models can be exercised headless.

use async_trait::async_trait;
use evd_api_contract::{IdFilterQuery, RecordId, RelationOption, SearchQuery};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by option sources
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ClientApiError {
    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// The two lookups a relation picker performs against one collection
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Fetch candidates matching the query, as ranked by the server
    async fn search_options(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> ClientApiResult<Vec<RelationOption>>;

    /// Fetch display labels for identifiers already bound to a record
    async fn resolve_options(
        &self,
        endpoint: &str,
        query: &IdFilterQuery,
    ) -> ClientApiResult<Vec<RelationOption>>;
}

#[async_trait]
impl<T: OptionSource + ?Sized> OptionSource for Arc<T> {
    async fn search_options(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        (**self).search_options(endpoint, query).await
    }

    async fn resolve_options(
        &self,
        endpoint: &str,
        query: &IdFilterQuery,
    ) -> ClientApiResult<Vec<RelationOption>> {
        (**self).resolve_options(endpoint, query).await
    }
}

/// Convenience wrapper for resolving a plain id slice
pub async fn resolve_ids(
    source: &dyn OptionSource,
    endpoint: &str,
    ids: &[RecordId],
) -> ClientApiResult<Vec<RelationOption>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    source.resolve_options(endpoint, &IdFilterQuery::new(ids.iter().copied())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl OptionSource for Fixed {
        async fn search_options(
            &self,
            _endpoint: &str,
            _query: &SearchQuery,
        ) -> ClientApiResult<Vec<RelationOption>> {
            Ok(vec![RelationOption::new(1, "A")])
        }

        async fn resolve_options(
            &self,
            _endpoint: &str,
            query: &IdFilterQuery,
        ) -> ClientApiResult<Vec<RelationOption>> {
            Ok(query.ids.iter().map(|id| RelationOption::new(*id, format!("#{}", id))).collect())
        }
    }

    #[tokio::test]
    async fn resolve_ids_skips_empty_lookup() {
        let source = Fixed;
        assert!(resolve_ids(&source, "tags", &[]).await.unwrap().is_empty());
        let resolved = resolve_ids(&source, "tags", &[3]).await.unwrap();
        assert_eq!(resolved, vec![RelationOption::new(3, "#3")]);
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_source() {
        let source: Arc<dyn OptionSource> = Arc::new(Fixed);
        let found = source.search_options("tags", &SearchQuery::new(10)).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}
