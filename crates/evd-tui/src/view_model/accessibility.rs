// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Accessibility attributes derived from picker state
//!
//! [`bind`] is a pure function of its input. Hosts that expose an
//! accessibility tree read the attributes from [`AccessibilityTree`]; the
//! terminal view renders the live-region message as a status line.

use evd_api_contract::RelationOption;

pub const SEARCHING_MESSAGE: &str = "Searching…";
pub const NO_RESULTS_MESSAGE: &str = "No results found";

#[derive(Debug, Clone, Copy)]
pub struct AccessibilityInput<'a> {
    pub instance_id: &'a str,
    pub label: &'a str,
    pub open: bool,
    pub focused_index: Option<usize>,
    pub candidates: &'a [RelationOption],
    pub search_loading: bool,
    pub query: &'a str,
    pub disabled: bool,
    pub multi: bool,
}

/// Attributes of the text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxAttrs {
    pub role: &'static str,
    pub label: String,
    pub expanded: bool,
    pub autocomplete: &'static str,
    pub controls: String,
    pub active_descendant: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListboxAttrs {
    pub id: String,
    pub role: &'static str,
    pub label: String,
    pub multiselectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAttrs {
    pub id: String,
    pub role: &'static str,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegion {
    pub role: &'static str,
    pub politeness: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityTree {
    pub combobox: ComboboxAttrs,
    /// Present while the panel is open
    pub listbox: Option<ListboxAttrs>,
    pub options: Vec<OptionAttrs>,
    pub live_region: LiveRegion,
}

pub fn listbox_id(instance_id: &str) -> String {
    format!("{}-listbox", instance_id)
}

pub fn option_id(instance_id: &str, index: usize) -> String {
    format!("{}-option-{}", instance_id, index)
}

/// Polite announcement for the current search state
pub fn status_message(search_loading: bool, result_count: usize, query: &str) -> String {
    if search_loading {
        SEARCHING_MESSAGE.to_string()
    } else if result_count == 1 {
        "1 result available".to_string()
    } else if result_count > 1 {
        format!("{} results available", result_count)
    } else if !query.is_empty() {
        NO_RESULTS_MESSAGE.to_string()
    } else {
        String::new()
    }
}

pub fn bind(input: &AccessibilityInput<'_>) -> AccessibilityTree {
    let listbox = listbox_id(input.instance_id);
    // The panel shows a loading row instead of options while a search is in flight
    let shown: &[RelationOption] = if input.search_loading { &[] } else { input.candidates };
    let active_descendant = input
        .focused_index
        .filter(|index| input.open && *index < shown.len())
        .map(|index| option_id(input.instance_id, index));

    let options = if input.open {
        shown
            .iter()
            .enumerate()
            .map(|(index, candidate)| OptionAttrs {
                id: option_id(input.instance_id, index),
                role: "option",
                label: candidate.name.clone(),
                selected: input.focused_index == Some(index),
            })
            .collect()
    } else {
        Vec::new()
    };

    AccessibilityTree {
        combobox: ComboboxAttrs {
            role: "combobox",
            label: input.label.to_string(),
            expanded: input.open,
            autocomplete: "list",
            controls: listbox.clone(),
            active_descendant,
            disabled: input.disabled,
        },
        listbox: input.open.then(|| ListboxAttrs {
            id: listbox,
            role: "listbox",
            label: input.label.to_string(),
            multiselectable: input.multi,
        }),
        options,
        live_region: LiveRegion {
            role: "status",
            politeness: "polite",
            message: status_message(input.search_loading, input.candidates.len(), input.query),
        },
    }
}
