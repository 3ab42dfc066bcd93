//! Shell pane grid.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::shell::{LineKind, Pane};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::utils::{prefix_width, spinner_char};

use super::helpers::{render_scrollbar_bordered, wrap};

pub fn render_panes(frame: &mut Frame, area: Rect, state: &AppState) {
    let active = state.workspace.active_id();
    for (id, pane_area) in state.workspace.areas(area) {
        if let Some(pane) = state.workspace.pane(id) {
            let focused = id == active && !state.peek_open();
            render_pane(frame, pane_area, pane, id == active, focused, state);
        }
    }
}

fn render_pane(
    frame: &mut Frame,
    area: Rect,
    pane: &Pane,
    active: bool,
    focused: bool,
    state: &AppState,
) {
    let t = &state.theme;
    let border = if active {
        t.border_highlight_style()
    } else {
        t.border_style()
    };
    let block = Block::default()
        .title(Span::styled(format!(" #{} ", pane.id()), border))
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for line in pane.lines() {
        let style = match line.kind {
            LineKind::Command => Style::default().fg(t.text_primary),
            LineKind::Output => Style::default().fg(t.text_dim),
            LineKind::Error => Style::default().fg(t.danger),
        };
        for row in wrap(&line.text, width) {
            lines.push(Line::from(Span::styled(row, style)));
        }
    }

    // Input line: prompt + input while editable, a spinner while busy.
    let input_top = lines.len();
    if pane.is_pending() && pane.line_count() > 0 {
        lines.push(Line::from(Span::styled(
            spinner_char(state.tick_count),
            Style::default().fg(t.text_muted),
        )));
    } else {
        let input_style = if pane.is_pending() {
            Style::default().fg(t.text_muted)
        } else {
            Style::default().fg(t.text_primary)
        };
        lines.extend(input_rows(pane, t, input_style, width));
    }

    let total = lines.len();
    let end = total.saturating_sub(pane.scroll());
    let start = end.saturating_sub(height);
    let visible: Vec<Line> = lines.drain(start..end).collect();
    frame.render_widget(Paragraph::new(visible), inner);

    if total > height {
        render_scrollbar_bordered(frame, area, total, start);
    }

    if focused && !pane.is_pending() && pane.scroll() == 0 {
        let offset = prefix_width(pane.prompt(), usize::MAX) + prefix_width(pane.input(), pane.cursor());
        let row = input_top + offset / width;
        if row >= start && row < end {
            frame.set_cursor_position(Position::new(
                inner.x + (offset % width) as u16,
                inner.y + (row - start) as u16,
            ));
        }
    }
}

/// The prompt and input hard-wrapped at `width` columns so the cursor can
/// be placed by column arithmetic.
fn input_rows<'a>(pane: &Pane, t: &Theme, input_style: Style, width: usize) -> Vec<Line<'a>> {
    let prompt_style = t.prompt_style().add_modifier(Modifier::BOLD);
    let cells = pane
        .prompt()
        .chars()
        .map(|c| (c, prompt_style))
        .chain(pane.input().chars().map(|c| (c, input_style)));

    let mut rows: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut run = String::new();
    let mut run_style = prompt_style;
    let mut col = 0;
    for (c, style) in cells {
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
            rows.push(Line::from(std::mem::take(&mut spans)));
            col = 0;
        }
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(c);
        col += w;
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    rows.push(Line::from(spans));
    rows
}
