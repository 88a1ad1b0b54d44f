// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::view::{HitTestRegistry, Theme};
use crate::view_model::relation_picker::{PanelView, PickerMouseAction, RelationPickerViewModel};

pub const MAX_PANEL_ROWS: u16 = 8;

const LOADING_TEXT: &str = "Loading…";
const NO_RESULTS_TEXT: &str = "No results found";
const CHIP_REMOVE: &str = " ×";

/// Draw a picker into `area`: label, selection, input, candidate panel and status line
pub fn render_relation_picker(
    frame: &mut Frame<'_>,
    area: Rect,
    view_model: &RelationPickerViewModel,
    theme: &Theme,
    hit_registry: &mut HitTestRegistry<PickerMouseAction>,
) {
    let [label_area, chips_area, input_area, panel_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Registered first so every nested zone takes precedence
    hit_registry.register(area, PickerMouseAction::Surface);

    render_label(frame, label_area, view_model, theme);
    render_chips(frame, chips_area, view_model, theme, hit_registry);
    render_input(frame, input_area, view_model, theme, hit_registry);
    render_panel(frame, panel_area, view_model, theme, hit_registry);

    let status = view_model.status_message();
    if !status.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(theme.muted))),
            status_area,
        );
    }
}

fn render_label(frame: &mut Frame<'_>, area: Rect, view_model: &RelationPickerViewModel, theme: &Theme) {
    let mut spans = vec![Span::styled(
        view_model.props().label.clone(),
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )];
    if view_model.props().disabled {
        spans.push(Span::styled(" (disabled)", Style::default().fg(theme.muted)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chips(
    frame: &mut Frame<'_>,
    area: Rect,
    view_model: &RelationPickerViewModel,
    theme: &Theme,
    hit_registry: &mut HitTestRegistry<PickerMouseAction>,
) {
    let chips = view_model.selected_chips();
    if chips.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No selection", Style::default().fg(theme.muted))),
            area,
        );
        return;
    }

    let chip_style = Style::default().fg(theme.text).bg(theme.surface);
    let mut spans = Vec::new();
    let mut x = area.x;
    let right = area.x.saturating_add(area.width);
    for chip in chips {
        let text = format!("[{}{}]", chip.label, CHIP_REMOVE);
        let width = text.width() as u16;
        if x.saturating_add(width) > right {
            spans.push(Span::styled("…", Style::default().fg(theme.muted)));
            break;
        }
        hit_registry.register(
            Rect::new(x, area.y, width, 1),
            PickerMouseAction::RemoveChip(chip.id),
        );
        spans.push(Span::styled(text, chip_style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    view_model: &RelationPickerViewModel,
    theme: &Theme,
    hit_registry: &mut HitTestRegistry<PickerMouseAction>,
) {
    let focused = view_model.is_input_focused();
    let border_color = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);

    let query = view_model.query();
    let line = if query.is_empty() {
        let placeholder = view_model.props().placeholder.clone().unwrap_or_default();
        Line::from(Span::styled(placeholder, Style::default().fg(theme.muted)))
    } else {
        Line::from(Span::styled(query.to_string(), Style::default().fg(theme.text)))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
    hit_registry.register(area, PickerMouseAction::Input);

    if focused && inner.width > 0 && inner.height > 0 {
        let offset = (query.width() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + offset, inner.y));
    }
}

fn render_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    view_model: &RelationPickerViewModel,
    theme: &Theme,
    hit_registry: &mut HitTestRegistry<PickerMouseAction>,
) {
    let panel = view_model.panel();
    let content_rows = match panel {
        PanelView::Hidden => return,
        PanelView::Loading | PanelView::NoResults => 1,
        PanelView::Candidates { options, .. } => (options.len() as u16).min(MAX_PANEL_ROWS),
    };
    let height = (content_rows + 2).min(area.height);
    if height < 3 || area.width < 3 {
        return;
    }
    let popup = Rect::new(area.x, area.y, area.width, height);
    frame.render_widget(Clear, popup);
    hit_registry.register(popup, PickerMouseAction::Panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg));
    let inner = block.inner(popup);

    let (options, focused) = match panel {
        PanelView::Candidates { options, focused } => (options, focused),
        PanelView::Loading => {
            let text = Span::styled(LOADING_TEXT, Style::default().fg(theme.muted));
            frame.render_widget(Paragraph::new(text).block(block), popup);
            return;
        }
        _ => {
            let text = Span::styled(NO_RESULTS_TEXT, Style::default().fg(theme.muted));
            frame.render_widget(Paragraph::new(text).block(block), popup);
            return;
        }
    };

    let capacity = inner.height as usize;
    let selected = focused.unwrap_or(0).min(options.len().saturating_sub(1));
    let start = if options.len() <= capacity {
        0
    } else {
        let max_start = options.len() - capacity;
        selected.saturating_sub(capacity / 2).min(max_start)
    };
    let end = (start + capacity).min(options.len());

    for offset in 0..(end - start) {
        hit_registry.register(
            Rect::new(inner.x, inner.y + offset as u16, inner.width, 1),
            PickerMouseAction::Candidate(start + offset),
        );
    }

    let items: Vec<ListItem> = options[start..end]
        .iter()
        .map(|option| ListItem::new(Span::styled(option.name.clone(), Style::default().fg(theme.text))))
        .collect();

    let mut state = ListState::default();
    state.select(focused.map(|index| index - start));

    let list = List::new(items)
        .block(block)
        .highlight_symbol("› ")
        .highlight_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, popup, &mut state);
}
