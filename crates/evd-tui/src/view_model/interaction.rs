// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Open/closed state of the candidate panel and the focused candidate
//!
//! `focused_index` is `None` or a valid index into the candidate list the
//! caller passes in. The owner must call [`InteractionState::reset_focus`]
//! whenever that list is rebuilt.

/// What the owner must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    /// Select the candidate at this index
    Commit(usize),
    /// Let the host move keyboard focus elsewhere
    ReleaseFocus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    open: bool,
    focused_index: Option<usize>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    /// Typing or focusing the input. Returns true if the panel was closed.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.focused_index = None;
        true
    }

    pub fn close(&mut self) -> bool {
        let changed = self.open || self.focused_index.is_some();
        self.open = false;
        self.focused_index = None;
        changed
    }

    /// Move focus down, clamped at the last candidate; opens a closed panel without moving focus
    pub fn arrow_down(&mut self, candidate_count: usize) -> bool {
        if !self.open {
            return self.open();
        }
        if candidate_count == 0 {
            return false;
        }
        let next = match self.focused_index {
            None => 0,
            Some(index) => (index + 1).min(candidate_count - 1),
        };
        self.set_focus(next)
    }

    /// Move focus up, clamped at the first candidate; opens a closed panel without moving focus
    pub fn arrow_up(&mut self, candidate_count: usize) -> bool {
        if !self.open {
            return self.open();
        }
        if candidate_count == 0 {
            return false;
        }
        let next = match self.focused_index {
            None => 0,
            Some(index) => index.saturating_sub(1).min(candidate_count - 1),
        };
        self.set_focus(next)
    }

    pub fn enter(&mut self, candidate_count: usize) -> Transition {
        if !self.open {
            self.open();
            return Transition::None;
        }
        match self.focused_index {
            Some(index) if index < candidate_count => Transition::Commit(index),
            _ => Transition::None,
        }
    }

    pub fn escape(&mut self) -> bool {
        self.close()
    }

    pub fn tab(&mut self) -> Transition {
        self.close();
        Transition::ReleaseFocus
    }

    /// Pointer activity outside the widget
    pub fn pointer_outside(&mut self) -> bool {
        self.open && self.close()
    }

    /// Hover or click on a candidate row
    pub fn focus(&mut self, index: usize, candidate_count: usize) -> bool {
        self.open && index < candidate_count && self.set_focus(index)
    }

    /// The candidate list was rebuilt
    pub fn reset_focus(&mut self) -> bool {
        self.focused_index.take().is_some()
    }

    fn set_focus(&mut self, index: usize) -> bool {
        let changed = self.focused_index != Some(index);
        self.focused_index = Some(index);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state() -> InteractionState {
        let mut state = InteractionState::new();
        state.open();
        state
    }

    #[test]
    fn starts_closed_without_focus() {
        let state = InteractionState::new();
        assert!(!state.is_open());
        assert_eq!(state.focused_index(), None);
    }

    #[test]
    fn arrows_on_closed_panel_only_open_it() {
        let mut state = InteractionState::new();
        assert!(state.arrow_down(3));
        assert!(state.is_open());
        assert_eq!(state.focused_index(), None);

        let mut state = InteractionState::new();
        assert!(state.arrow_up(3));
        assert!(state.is_open());
        assert_eq!(state.focused_index(), None);
    }

    #[test]
    fn arrow_down_clamps_at_last_index() {
        let mut state = open_state();
        state.arrow_down(3);
        state.arrow_down(3);
        state.arrow_down(3);
        assert_eq!(state.focused_index(), Some(2));
        assert!(!state.arrow_down(3));
        assert_eq!(state.focused_index(), Some(2));
    }

    #[test]
    fn arrow_up_clamps_at_zero_and_stays_none_when_empty() {
        let mut state = open_state();
        assert!(!state.arrow_up(0));
        assert_eq!(state.focused_index(), None);

        assert!(state.arrow_up(2));
        assert_eq!(state.focused_index(), Some(0));
        assert!(!state.arrow_up(2));
        assert_eq!(state.focused_index(), Some(0));
    }

    #[test]
    fn enter_commits_only_a_valid_focus() {
        let mut state = InteractionState::new();
        assert_eq!(state.enter(3), Transition::None);
        assert!(state.is_open());

        assert_eq!(state.enter(3), Transition::None);
        state.arrow_down(3);
        assert_eq!(state.enter(3), Transition::Commit(0));
        assert_eq!(state.enter(0), Transition::None);
    }

    #[test]
    fn escape_tab_and_outside_click_close() {
        let mut state = open_state();
        state.arrow_down(2);
        assert!(state.escape());
        assert_eq!(state, InteractionState::new());

        let mut state = open_state();
        assert_eq!(state.tab(), Transition::ReleaseFocus);
        assert!(!state.is_open());

        let mut state = open_state();
        assert!(state.pointer_outside());
        assert!(!state.pointer_outside());
    }

    #[test]
    fn reset_focus_clears_index() {
        let mut state = open_state();
        state.arrow_down(4);
        assert!(state.reset_focus());
        assert_eq!(state.focused_index(), None);
        assert!(state.is_open());
    }
}
