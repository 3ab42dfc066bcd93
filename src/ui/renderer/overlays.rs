//! Popup overlays: cancellation report, help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::*;
use crate::peek::PeekOverlay;
use crate::ui::state::AppState;

use super::helpers::{centered_rect, wrap};

/// "Process Cancellation Report": one entry per pid the backend could not
/// cancel. Entries scroll; the header and the footer hint are always drawn.
pub fn render_cancel_report(frame: &mut Frame, area: Rect, overlay: &PeekOverlay, state: &AppState) {
    if overlay.report().is_none() {
        return;
    }
    let t = &state.theme;
    let entries = overlay.report_lines();

    let popup_width = REPORT_POPUP_WIDTH.min(area.width.saturating_sub(4));
    let text_width = popup_width.saturating_sub(6) as usize;
    let wrapped: Vec<Vec<String>> = entries.iter().map(|e| wrap(e, text_width)).collect();
    let total_lines: usize = wrapped.iter().map(Vec::len).sum();

    // borders (2) + header (2) + footer (2)
    let chrome = 6;
    let popup_height = (total_lines as u16 + chrome)
        .min(REPORT_POPUP_HEIGHT)
        .min(area.height);
    let body_rows = popup_height.saturating_sub(chrome).max(1) as usize;

    let start = overlay.report_scroll().min(last_page_start(&wrapped, body_rows));
    let mut body: Vec<Line> = Vec::new();
    let mut end = start;
    for entry in &wrapped[start..] {
        if body.len() + entry.len() > body_rows && !body.is_empty() {
            break;
        }
        for (i, row) in entry.iter().enumerate() {
            let bullet = if i == 0 { "  • " } else { "    " };
            body.push(Line::from(vec![
                Span::styled(bullet, Style::default().fg(t.danger)),
                Span::styled(row.clone(), Style::default().fg(t.text_primary)),
            ]));
        }
        end += 1;
    }
    body.truncate(body_rows);
    while body.len() < body_rows {
        body.push(Line::raw(""));
    }

    let position = if start == 0 && end == entries.len() {
        String::new()
    } else {
        format!("{}-{} of {}  ↑/↓ scroll  ", start + 1, end, entries.len())
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "  Some processes could not be canceled:",
            Style::default().fg(t.warning),
        )),
        Line::raw(""),
    ];
    lines.extend(body);
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {}Enter / Esc to close", position),
        Style::default().fg(t.text_muted),
    )));

    let popup_area = centered_rect(popup_width, popup_height, area);
    frame.render_widget(Clear, popup_area);

    let report = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                " Process Cancellation Report ",
                Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.danger))
            .style(Style::default().bg(t.bg_panel)),
    );
    frame.render_widget(report, popup_area);
}

/// First entry index from which the remaining entries fill `rows` lines.
fn last_page_start(wrapped: &[Vec<String>], rows: usize) -> usize {
    let mut used = 0;
    for (i, entry) in wrapped.iter().enumerate().rev() {
        used += entry.len();
        if used > rows {
            return (i + 1).min(wrapped.len().saturating_sub(1));
        }
    }
    0
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_area = centered_rect(HELP_POPUP_WIDTH, HELP_POPUP_HEIGHT, area);

    frame.render_widget(Clear, popup_area);

    let help_entry = |key: &str, desc: &str, color: ratatui::style::Color| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<18}", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc.to_string(), Style::default().fg(t.text_primary)),
        ])
    };
    let section = |title: &str| -> Line {
        Line::from(Span::styled(
            format!("  {}", title),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        section("Shell panes"),
        help_entry("Enter", "Run command", t.accent),
        help_entry("clear", "Wipe the pane (local)", t.accent),
        help_entry("Ctrl+E / Ctrl+O", "Split side by side / stacked", t.accent),
        help_entry("Ctrl+W", "Close pane", t.accent),
        help_entry("Ctrl+N / click", "Focus next / clicked pane", t.accent),
        help_entry("PgUp / PgDn", "Scroll pane", t.accent),
        Line::raw(""),
        section("Processes (Ctrl+P)"),
        help_entry("type", "Search all columns", t.accent),
        help_entry("Esc", "Clear search, then close", t.accent),
        help_entry("Ctrl+U", "Clear search", t.accent),
        help_entry("Up/Down Home/End", "Move cursor", t.accent),
        help_entry("Enter / click", "Select / unselect row", t.accent),
        help_entry("Ctrl+A", "Select all visible", t.accent),
        help_entry("Ctrl+K", "Cancel selected", t.warning),
        help_entry("Up/Down in report", "Scroll failures", t.accent),
        Line::raw(""),
        help_entry("F1", "Toggle this help", t.accent),
        help_entry("Ctrl+Q", "Quit", t.accent),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Keyboard Shortcuts ", t.header_style()))
                .borders(Borders::ALL)
                .border_style(t.border_highlight_style()),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}
