// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Selection model for single- and multi-select pickers

use evd_api_contract::RecordId;
use indexmap::IndexSet;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// Payload handed to the host's change callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// `None` is the cleared single value
    Single(Option<RecordId>),
    Multi(Vec<RecordId>),
}

impl SelectionChange {
    /// JSON form used by form payloads: an id, `""` when cleared, or an id array
    pub fn to_json(&self) -> Value {
        match self {
            SelectionChange::Single(Some(id)) => Value::from(*id),
            SelectionChange::Single(None) => Value::String(String::new()),
            SelectionChange::Multi(ids) => Value::from(ids.clone()),
        }
    }
}

/// The identifiers bound to the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<RecordId>),
    /// Insertion order is display order
    Multi(IndexSet<RecordId>),
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Selection::Single(None),
            SelectionMode::Multi => Selection::Multi(IndexSet::new()),
        }
    }

    /// Build from host-supplied ids; single mode keeps the first one
    pub fn from_ids(mode: SelectionMode, ids: impl IntoIterator<Item = RecordId>) -> Self {
        let mut ids = ids.into_iter();
        match mode {
            SelectionMode::Single => Selection::Single(ids.next()),
            SelectionMode::Multi => Selection::Multi(ids.collect()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Single(_) => SelectionMode::Single,
            Selection::Multi(_) => SelectionMode::Multi,
        }
    }

    /// Replace the single value, or append in multi mode. Returns true if anything changed.
    pub fn select(&mut self, id: RecordId) -> bool {
        match self {
            Selection::Single(current) => current.replace(id) != Some(id),
            Selection::Multi(ids) => ids.insert(id),
        }
    }

    pub fn add(&mut self, id: RecordId) -> bool {
        self.select(id)
    }

    pub fn remove(&mut self, id: RecordId) -> bool {
        match self {
            Selection::Single(current) if *current == Some(id) => {
                *current = None;
                true
            }
            Selection::Single(_) => false,
            Selection::Multi(ids) => ids.shift_remove(&id),
        }
    }

    pub fn clear(&mut self) -> bool {
        match self {
            Selection::Single(current) => current.take().is_some(),
            Selection::Multi(ids) => {
                let changed = !ids.is_empty();
                ids.clear();
                changed
            }
        }
    }

    pub fn ids(&self) -> Vec<RecordId> {
        match self {
            Selection::Single(current) => current.iter().copied().collect(),
            Selection::Multi(ids) => ids.iter().copied().collect(),
        }
    }

    pub fn contains(&self, id: RecordId) -> bool {
        match self {
            Selection::Single(current) => *current == Some(id),
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(current) => current.is_none(),
            Selection::Multi(ids) => ids.is_empty(),
        }
    }

    pub fn to_change(&self) -> SelectionChange {
        match self {
            Selection::Single(current) => SelectionChange::Single(*current),
            Selection::Multi(ids) => SelectionChange::Multi(ids.iter().copied().collect()),
        }
    }
}
