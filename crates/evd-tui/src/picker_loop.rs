// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Picker Loop - Terminal host for a single relation picker
//!
//! Input events arrive from a reader thread, a coalescing tick drives the
//! debouncer and applies lookup completions, and the frame is redrawn only
//! when the view model reports a change. The loop ends on Ctrl-C, on Esc or
//! Tab while the panel is closed, or when the terminal input closes.

use crossbeam_channel as chan;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    sync::Arc,
    thread,
    time::Duration,
};
use tracing::{debug, info, trace};

use crate::{
    terminal::{self, TerminalConfig},
    view::{render_relation_picker, HitTestRegistry, Theme},
    view_model::{PickerKeyResult, PickerMouseAction, RelationPickerViewModel, SelectionChange},
};

const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Run the picker until the user leaves it and return the final selection
///
/// The view model must already be started. Must be called from within a
/// multi-threaded tokio runtime because lookups run on spawned tasks while
/// this loop blocks.
pub async fn run_picker(
    mut view_model: RelationPickerViewModel,
) -> Result<SelectionChange, Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));

    terminal::setup_terminal(TerminalConfig::default().with_running_flag(running.clone()))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let theme = Theme::default();
    let mut hit_registry: HitTestRegistry<PickerMouseAction> = HitTestRegistry::new();

    let (tx_ev, rx_ev) = chan::unbounded::<Event>();
    // Coalescing tick channel that never builds a backlog
    let rx_tick = chan::tick(TICK_INTERVAL);

    thread::spawn(move || {
        while let Ok(ev) = crossterm::event::read() {
            if tx_ev.send(ev).is_err() {
                break;
            }
        }
    });

    view_model.focus_input();
    view_model.needs_redraw = true;

    let result = 'event_loop: loop {
        if !running.load(Ordering::SeqCst) {
            break 'event_loop Ok(());
        }

        chan::select_biased! {
            recv(rx_ev) -> msg => {
                let Ok(event) = msg else {
                    break 'event_loop Ok(());
                };
                let is_resize = matches!(event, Event::Resize(..));
                if handle_event(&mut view_model, &hit_registry, event) == LoopControl::Exit {
                    break 'event_loop Ok(());
                }
                if is_resize {
                    if let Err(error) = terminal.autoresize() {
                        break 'event_loop Err(error);
                    }
                    view_model.needs_redraw = true;
                }
            }
            recv(rx_tick) -> _ => {
                view_model.tick();
            }
        }

        if view_model.needs_redraw {
            let drawn = terminal.draw(|frame| {
                hit_registry.clear();
                let area = picker_area(frame.area());
                render_relation_picker(frame, area, &view_model, &theme, &mut hit_registry);
            });
            if let Err(error) = drawn {
                break 'event_loop Err(error);
            }
            view_model.needs_redraw = false;
        }
    };

    terminal::cleanup_terminal();
    result?;

    let selection = view_model.selection().to_change();
    info!(?selection, "Picker closed");
    Ok(selection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

fn handle_event(
    view_model: &mut RelationPickerViewModel,
    hit_registry: &HitTestRegistry<PickerMouseAction>,
    event: Event,
) -> LoopControl {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            debug!(key_code = ?key.code, modifiers = ?key.modifiers, "Key event received in picker");

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return LoopControl::Exit;
            }
            match view_model.handle_key_event(&key) {
                PickerKeyResult::Ignored if matches!(key.code, KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab) => {
                    LoopControl::Exit
                }
                _ => LoopControl::Continue,
            }
        }
        Event::Mouse(mouse_event) => {
            if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
                trace!(column = mouse_event.column, row = mouse_event.row, "Mouse down");
                view_model.handle_pointer_down(mouse_event.column, mouse_event.row, hit_registry);
            }
            LoopControl::Continue
        }
        _ => LoopControl::Continue,
    }
}

/// Leave a margin around the picker and cap its width for readability
fn picker_area(screen: Rect) -> Rect {
    let width = screen.width.saturating_sub(4).min(72);
    let height = screen.height.saturating_sub(2);
    Rect::new(screen.x + 2, screen.y + 1, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_area_keeps_margin_and_caps_width() {
        let area = picker_area(Rect::new(0, 0, 200, 40));
        assert_eq!(area, Rect::new(2, 1, 72, 38));

        let tiny = picker_area(Rect::new(0, 0, 3, 1));
        assert_eq!(tiny.width, 0);
        assert_eq!(tiny.height, 0);
    }
}
