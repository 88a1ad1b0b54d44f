// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal relation picker for the events directory
//!
//! The picker core lives in [`view_model`] and runs headless; [`view`]
//! renders it with Ratatui and [`picker_loop`] hosts it in a terminal.

pub mod picker_loop;
pub mod terminal;
pub mod view;
pub mod view_model;

pub use view::{HitTestRegistry, Theme};
pub use view_model::{
    PanelView, PickerKey, PickerKeyResult, PickerMouseAction, PickerProps, PointerRegion,
    RelationPickerViewModel, SelectedChip, Selection, SelectionChange, SelectionMode,
};

use ratatui::{backend::TestBackend, Terminal};

/// Helpers for tests/runners to render with a deterministic backend
pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("test terminal")
}
