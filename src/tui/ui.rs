// UI rendering logic
//
// Draws the visible slice of the laid-out document, the copy controls on top
// of it, a one-line status bar and the toast overlay. Control labels are
// redrawn every frame from the live ClipboardAction state, so a revert timer
// firing between frames shows up on the next draw.

use super::app::App;
use crate::render::control_label;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Split the terminal into document body and status bar
pub fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Document - takes remaining space
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let (body, status) = split(f.area());

    render_document(f, body, app);
    render_status(f, status, app);

    if let Some(toast) = &app.toast {
        toast.render(f, body, Style::default().fg(Color::Yellow));
    }
}

fn render_document(f: &mut Frame, area: Rect, app: &App) {
    let layout = app.layout();
    let (start, end) = app.scroll.visible_range();
    let end = end.min(layout.lines.len());
    let start = start.min(end);

    f.render_widget(Paragraph::new(layout.lines[start..end].to_vec()), area);

    let base = app.theme().inline.copy_control;
    for (index, slot) in layout.controls.iter().enumerate() {
        if slot.line < start || slot.line >= end {
            continue;
        }
        let x = area.x.saturating_add(slot.column as u16);
        if x >= area.right() {
            continue;
        }
        let y = area.y + (slot.line - start) as u16;

        let indicator = slot.action.indicator();
        let mut style = base;
        if indicator.is_animating() {
            style = style.add_modifier(Modifier::DIM);
        }
        if app.focused() == Some(index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let label = control_label(indicator.icon);
        let max_width = usize::from(area.right() - x);
        f.buffer_mut().set_stringn(x, y, &label, max_width, style);
    }
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let bar = Style::default().bg(Color::DarkGray).fg(Color::White);
    let layout = app.layout();

    let mode = if app.capabilities().supports_advanced_layout() {
        "advanced"
    } else {
        "basic"
    };
    let mut left = format!(
        " {} │ {}% │ {} layout",
        app.title,
        app.scroll.percent(),
        mode
    );
    if let Some(index) = app.focused() {
        let copied = app
            .focused_control()
            .is_some_and(|slot| slot.action.is_copied());
        left.push_str(&format!(
            " │ code {}/{}{}",
            index + 1,
            layout.controls.len(),
            if copied { " copied" } else { "" }
        ));
    }
    left.push(' ');

    let mut spans = vec![Span::styled(left.clone(), bar.add_modifier(Modifier::BOLD))];

    // Latest warning, right-aligned in whatever room is left
    let room = usize::from(area.width).saturating_sub(left.width());
    if let Some(entry) = app.latest_warning().filter(|_| room > 4) {
        let mut warning = format!("{}: {} ", entry.level.as_str(), entry.message);
        while warning.width() > room {
            warning.pop();
        }
        let pad = room - warning.width();
        spans.push(Span::styled(" ".repeat(pad), bar));
        spans.push(Span::styled(warning, bar.fg(Color::Yellow)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
}
