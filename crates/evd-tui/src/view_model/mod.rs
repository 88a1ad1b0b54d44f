// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! ViewModel Layer - Picker state and presentation logic
//!
//! This module contains the headless state of the relation picker. It owns
//! input processing, remote lookups, option reconciliation and the
//! accessibility contract, and knows nothing about Ratatui.
//!
//! ## Primary Mission: Headless Testing
//!
//! Every component can be driven without a terminal. Lookups go through the
//! [`evd_client_api::OptionSource`] trait, so tests swap in the in-memory mock
//! client, and all timing uses `tokio::time`, so tests run on Tokio's paused
//! clock at full speed.
//!
//! ## Components, leaves first:
//!
//! - [`debounce`]: coalesces keystrokes into one stable query
//! - [`option_sources`]: the selection and search lookups with stale-result suppression
//! - [`reconcile`]: merges both lookups into one deduplicated candidate list
//! - [`selection`]: single or ordered multi selection
//! - [`interaction`]: panel open state and the focused candidate
//! - [`accessibility`]: roles, states and the live status message
//! - [`relation_picker`]: the view model tying them together

pub mod accessibility;
pub mod debounce;
pub mod input;
pub mod interaction;
pub mod option_sources;
pub mod reconcile;
pub mod relation_picker;
pub mod selection;

pub use accessibility::{AccessibilityTree, LiveRegion};
pub use input::{PickerKey, PickerKeyResult};
pub use interaction::{InteractionState, Transition};
pub use option_sources::{CompletionOutcome, PickerMsg};
pub use reconcile::ReconciledOptions;
pub use relation_picker::{
    PanelView, PickerMouseAction, PickerProps, PointerRegion, RelationPickerViewModel,
    SelectedChip,
};
pub use selection::{Selection, SelectionChange, SelectionMode};
