// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a candidate search request
pub fn validate_search_query(query: &SearchQuery) -> Result<(), ApiContractError> {
    query.validate()?;
    Ok(())
}

/// Validate an identifier lookup request
pub fn validate_id_filter(query: &IdFilterQuery) -> Result<(), ApiContractError> {
    query.validate()?;
    Ok(())
}

/// Validate an endpoint segment: a non-empty relative path without query or fragment
pub fn validate_endpoint(endpoint: &str) -> Result<(), ApiContractError> {
    let trimmed = endpoint.trim_matches('/');
    if trimmed.is_empty()
        || trimmed.contains(['?', '#', ' '])
        || trimmed.split('/').any(|segment| segment.is_empty() || segment == "..")
    {
        return Err(ApiContractError::InvalidCollection(endpoint.to_string()));
    }
    Ok(())
}
