// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! API contract types for the events directory REST service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ApiContractError;

/// Identifier of any record in the directory
pub type RecordId = i64;

/// Upper bound for a single list request, also used for bulk local filtering
pub const MAX_PAGE_SIZE: u32 = 100;

/// A foreign record as offered by a relation picker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationOption {
    pub id: RecordId,
    pub name: String,
}

impl RelationOption {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// List envelope returned by every collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

/// Collections the host forms attach to records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Entities,
    Events,
    Series,
    Tags,
    EventTypes,
    EntityTypes,
    Roles,
    Users,
    Locations,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Entities,
        Collection::Events,
        Collection::Series,
        Collection::Tags,
        Collection::EventTypes,
        Collection::EntityTypes,
        Collection::Roles,
        Collection::Users,
        Collection::Locations,
    ];

    /// Path segment of the collection endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Collection::Entities => "entities",
            Collection::Events => "events",
            Collection::Series => "series",
            Collection::Tags => "tags",
            Collection::EventTypes => "event-types",
            Collection::EntityTypes => "entity-types",
            Collection::Roles => "roles",
            Collection::Users => "users",
            Collection::Locations => "locations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for Collection {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.endpoint() == s)
            .ok_or_else(|| ApiContractError::InvalidCollection(s.to_string()))
    }
}

/// Sort direction for list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ApiContractError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Scalar value of an auxiliary filter parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Interpret a raw command-line or config value.
    ///
    /// A narrower type is chosen only when it prints back as the exact input,
    /// so values such as `02134` or `1.50` reach the server unchanged.
    pub fn parse(raw: &str) -> Self {
        let narrowed = if let Ok(b) = raw.parse::<bool>() {
            Some(ScalarValue::Boolean(b))
        } else if let Ok(i) = raw.parse::<i64>() {
            Some(ScalarValue::Integer(i))
        } else {
            raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(ScalarValue::Float)
        };
        match narrowed {
            Some(value) if value.to_string() == raw => value,
            _ => ScalarValue::String(raw.to_string()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

/// Auxiliary filters passed through unchanged on every search request.
///
/// Ordered so that query strings and dependency snapshots are deterministic.
pub type ExtraParams = BTreeMap<String, ScalarValue>;

/// Parse a `key=value` pair into an extra parameter
pub fn parse_extra_param(pair: &str) -> Result<(String, ScalarValue), ApiContractError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ApiContractError::InvalidExtraParam(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ApiContractError::InvalidExtraParam(pair.to_string()));
    }
    Ok((key.to_string(), ScalarValue::parse(value.trim())))
}

/// Candidate search against a collection, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u32,
    pub sort: String,
    pub direction: SortDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: ExtraParams,
}

impl SearchQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            sort: "name".to_string(),
            direction: SortDirection::Asc,
            name: None,
            extra: ExtraParams::new(),
        }
    }

    /// Restrict to names containing `name`; an empty string means no filter
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    /// Query string pairs in wire order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("sort".to_string(), self.sort.clone()),
            ("direction".to_string(), self.direction.as_str().to_string()),
        ];
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("filters[name]".to_string(), name.to_string()));
        }
        for (key, value) in &self.extra {
            pairs.push((key.clone(), value.to_string()));
        }
        pairs
    }
}

/// Label lookup for identifiers already bound to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IdFilterQuery {
    #[validate(length(min = 1, message = "at least one identifier is required"))]
    pub ids: Vec<RecordId>,
}

impl IdFilterQuery {
    pub fn new(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn joined_ids(&self) -> String {
        self.ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![("filters[id]".to_string(), self.joined_ids())]
    }
}
