// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! View Layer - Ratatui rendering of picker view models
//!
//! Views read view model state and draw it. They never mutate the view
//! model; the only output besides the frame is the set of hit zones
//! registered for the next pointer event.

pub mod hit_test;
pub mod relation_picker;

pub use hit_test::{HitMatch, HitTestRegistry, HitZone};
pub use relation_picker::render_relation_picker;

use ratatui::style::Color;

/// Color palette shared by all views
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub error: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Dark theme inspired by Catppuccin Mocha
            bg: Color::Rgb(17, 17, 27),
            surface: Color::Rgb(24, 24, 37),
            text: Color::Rgb(205, 214, 244),
            muted: Color::Rgb(127, 132, 156),
            primary: Color::Rgb(137, 180, 250),
            accent: Color::Rgb(166, 218, 149),
            error: Color::Rgb(243, 139, 168),
            border: Color::Rgb(69, 71, 90),
            border_focused: Color::Rgb(137, 180, 250),
        }
    }
}
