// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Platform-neutral picker keys

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    Char(char),
    Backspace,
    Up,
    Down,
    Enter,
    Escape,
    Tab,
    BackTab,
}

impl PickerKey {
    /// Map a terminal key event; shortcuts with Ctrl/Alt are left to the host
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => Some(PickerKey::Char(c)),
            KeyCode::Backspace => Some(PickerKey::Backspace),
            KeyCode::Up => Some(PickerKey::Up),
            KeyCode::Down => Some(PickerKey::Down),
            KeyCode::Enter => Some(PickerKey::Enter),
            KeyCode::Esc => Some(PickerKey::Escape),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(PickerKey::BackTab),
            KeyCode::Tab => Some(PickerKey::Tab),
            KeyCode::BackTab => Some(PickerKey::BackTab),
            _ => None,
        }
    }
}

/// Result of offering a key to the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKeyResult {
    Consumed { changed: bool },
    /// The host should handle the key (focus traversal, closing the form)
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_navigation_and_text_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::empty());
        assert_eq!(PickerKey::from_key_event(&key(KeyCode::Char('j'))), Some(PickerKey::Char('j')));
        assert_eq!(PickerKey::from_key_event(&key(KeyCode::Down)), Some(PickerKey::Down));
        assert_eq!(PickerKey::from_key_event(&key(KeyCode::Esc)), Some(PickerKey::Escape));
        assert_eq!(PickerKey::from_key_event(&key(KeyCode::BackTab)), Some(PickerKey::BackTab));
        assert_eq!(PickerKey::from_key_event(&key(KeyCode::F(2))), None);
    }

    #[test]
    fn shifted_chars_are_text_but_ctrl_chars_are_not() {
        let shifted = KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT);
        assert_eq!(PickerKey::from_key_event(&shifted), Some(PickerKey::Char('J')));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(PickerKey::from_key_event(&ctrl_c), None);

        let shift_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(PickerKey::from_key_event(&shift_tab), Some(PickerKey::BackTab));
    }
}
