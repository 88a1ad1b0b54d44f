// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal Management - Shared terminal setup and cleanup procedures
//!
//! Raw mode, alternate screen, keyboard enhancements, mouse capture and
//! signal handlers are enabled together and undone exactly once, whether the
//! picker exits normally, on Ctrl-C, or on panic.

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::{
    io, panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

// Global flag to ensure cleanup only happens once
static CLEANUP_DONE: AtomicBool = AtomicBool::new(false);

// Track what we modified so we can restore properly
static RAW_MODE_ENABLED: AtomicBool = AtomicBool::new(false);
static ALTERNATE_SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);
static KB_FLAGS_PUSHED: AtomicBool = AtomicBool::new(false);
static MOUSE_CAPTURE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Terminal setup configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub raw_mode: bool,
    pub alternate_screen: bool,
    /// Report key releases and disambiguate Esc sequences where supported
    pub keyboard_enhancement: bool,
    /// Needed for click-to-select and close-on-outside-click
    pub mouse_capture: bool,
    pub install_signal_handlers: bool,
    /// Cleared by the Ctrl-C handler
    pub running_flag: Option<Arc<AtomicBool>>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            raw_mode: true,
            alternate_screen: true,
            keyboard_enhancement: true,
            mouse_capture: true,
            install_signal_handlers: true,
            running_flag: None,
        }
    }
}

impl TerminalConfig {
    pub fn with_running_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.running_flag = Some(flag);
        self
    }
}

/// Setup terminal for TUI with the specified configuration
pub fn setup_terminal(config: TerminalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();

    if config.raw_mode {
        crossterm::terminal::enable_raw_mode()?;
        RAW_MODE_ENABLED.store(true, Ordering::SeqCst);
    }

    if config.alternate_screen {
        stdout.execute(EnterAlternateScreen)?;
        ALTERNATE_SCREEN_ACTIVE.store(true, Ordering::SeqCst);
    }

    stdout.execute(crossterm::cursor::SetCursorStyle::SteadyBar)?;

    if config.keyboard_enhancement {
        // Not every terminal supports the kitty protocol; fall back silently
        if stdout
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok()
        {
            KB_FLAGS_PUSHED.store(true, Ordering::SeqCst);
        }
    }

    if config.mouse_capture {
        stdout.execute(EnableMouseCapture)?;
        MOUSE_CAPTURE_ENABLED.store(true, Ordering::SeqCst);
    }

    if config.install_signal_handlers {
        let running_flag = config.running_flag.clone();
        ctrlc::set_handler(move || {
            cleanup_terminal();
            if let Some(flag) = &running_flag {
                flag.store(false, Ordering::SeqCst);
            }
        })?;

        let default_panic = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            cleanup_terminal();
            default_panic(panic_info);
        }));
    }

    Ok(())
}

/// Cleanup terminal after TUI
pub fn cleanup_terminal() {
    if CLEANUP_DONE.swap(true, Ordering::SeqCst) {
        return;
    }

    let mut stdout = io::stdout();

    // Keyboard flags must be popped while still in raw mode/alternate screen
    if KB_FLAGS_PUSHED.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(PopKeyboardEnhancementFlags);
    }

    if MOUSE_CAPTURE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(DisableMouseCapture);
    }

    if RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = crossterm::terminal::disable_raw_mode();
    }

    // Leave alternate screen last
    if ALTERNATE_SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
