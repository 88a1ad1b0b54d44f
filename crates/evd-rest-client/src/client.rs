// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main REST API client implementation

use evd_api_contract::validation::{validate_endpoint, validate_id_filter, validate_search_query};
use evd_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{RestClientError, RestClientResult};
use crate::network_config::NetworkConfig;

/// REST API client for the events directory service
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: &NetworkConfig) -> RestClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(Url::parse(&config.service_base_url)?),
        })
    }

    /// Create a client from a base URL string with default network settings
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(&NetworkConfig::new(base_url))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Search a collection for candidates
    pub async fn search(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> RestClientResult<Vec<RelationOption>> {
        let url = self.search_url(endpoint, query)?;
        debug!(endpoint, name = ?query.name, limit = query.limit, "Searching collection");
        let response: ListResponse<RelationOption> = self.get(url).await?;
        Ok(response.data)
    }

    /// Resolve identifiers into options; an empty id list never hits the network
    pub async fn resolve(
        &self,
        endpoint: &str,
        query: &IdFilterQuery,
    ) -> RestClientResult<Vec<RelationOption>> {
        if query.ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.resolve_url(endpoint, query)?;
        debug!(endpoint, ids = %query.joined_ids(), "Resolving selected ids");
        let response: ListResponse<RelationOption> = self.get(url).await?;
        Ok(response.data)
    }

    /// Build `GET /{endpoint}?limit=..&sort=name&direction=asc[&filters[name]=..][&extra..]`
    pub fn search_url(&self, endpoint: &str, query: &SearchQuery) -> RestClientResult<Url> {
        validate_search_query(query)?;
        self.collection_url(endpoint, query.to_query_pairs())
    }

    /// Build `GET /{endpoint}?filters[id]=1,2,3`
    pub fn resolve_url(&self, endpoint: &str, query: &IdFilterQuery) -> RestClientResult<Url> {
        validate_id_filter(query)?;
        self.collection_url(endpoint, query.to_query_pairs())
    }

    // Private helper methods

    fn collection_url(
        &self,
        endpoint: &str,
        pairs: Vec<(String, String)>,
    ) -> RestClientResult<Url> {
        validate_endpoint(endpoint)?;
        let mut url = self.base_url.join(endpoint.trim_matches('/'))?;
        {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in &pairs {
                serializer.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> RestClientResult<T> {
        self.request(Method::GET, url).await
    }

    async fn request<T: DeserializeOwned>(&self, method: Method, url: Url) -> RestClientResult<T> {
        trace!(%method, %url, "Sending request");
        let response = self.http_client.request(method, url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> RestClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(RestClientError::from)
        } else {
            let text = response.text().await?;
            match serde_json::from_str::<ProblemDetails>(&text) {
                Ok(problem) => Err(RestClientError::ServerError {
                    status,
                    details: problem,
                }),
                Err(_) => Err(RestClientError::UnexpectedResponse(format!(
                    "{}: {}",
                    status, text
                ))),
            }
        }
    }
}

/// Make sure relative joins append to the base path instead of replacing its last segment
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
