// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST client error types

use evd_api_contract::{ApiContractError, ProblemDetails};
use evd_client_api::ClientApiError;
use reqwest::StatusCode;
use thiserror::Error;

pub type RestClientResult<T> = Result<T, RestClientError>;

#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Validation(#[from] ApiContractError),

    #[error("Server returned {status}: {}", .details.title)]
    ServerError {
        status: StatusCode,
        details: ProblemDetails,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl RestClientError {
    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RestClientError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            RestClientError::ServerError { status, .. } => status.is_server_error(),
            RestClientError::UnexpectedResponse(_) => true,
            RestClientError::Url(_) | RestClientError::Json(_) | RestClientError::Validation(_) => {
                false
            }
        }
    }
}

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Http(e) => ClientApiError::Network(e.to_string()),
            RestClientError::Validation(e) => ClientApiError::InvalidRequest(e.to_string()),
            RestClientError::Url(e) => ClientApiError::InvalidRequest(e.to_string()),
            other => ClientApiError::Server(other.to_string()),
        }
    }
}
