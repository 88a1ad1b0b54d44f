// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed configuration sections
//!
//! [`SchemaRoot`] describes the canonical shape of every configuration file
//! and is used for schema generation and validation only. Consumers read the
//! merged configuration through the smaller section views.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The root configuration schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct SchemaRoot {
    /// Base URL of the events directory API, e.g. `https://events.example.org/api/`
    pub service_base_url: Option<String>,

    /// Per-request timeout enforced by the HTTP client
    #[schemars(range(min = 1))]
    pub request_timeout_ms: Option<u64>,

    pub picker: Option<PickerSection>,
}

/// Connection settings, read from the root of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ClientSection {
    pub service_base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

/// Relation picker tuning, read from `[picker]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct PickerSection {
    /// Quiet period before a typed query is sent
    pub debounce_ms: Option<u64>,

    /// Page size of name searches
    #[schemars(range(min = 1, max = 100))]
    pub search_limit: Option<u32>,

    /// Page size of the bulk fetch used for client-side filtering
    #[schemars(range(min = 1, max = 100))]
    pub bulk_limit: Option<u32>,
}
