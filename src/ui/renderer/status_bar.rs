//! Status bar at the bottom of the screen.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::peek::NoticeLevel;
use crate::ui::state::AppState;

use super::helpers::key_badge;

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let dim =
        |text: &str| -> Span { Span::styled(text.to_string(), Style::default().fg(t.text_dim)) };

    let mut spans = vec![Span::styled(" ", Style::default())];
    if let Some(overlay) = &state.peek {
        spans.extend([
            key_badge("Esc", t.accent, t),
            dim(" Clear/Close "),
            key_badge("Enter", t.accent, t),
            dim(" Toggle "),
            key_badge("^A", t.accent, t),
            dim(" All "),
            key_badge("^K", t.warning, t),
            dim(" Cancel "),
        ]);
        let selected = overlay.selection().len();
        if selected > 0 {
            spans.push(Span::styled(
                format!("{} selected ", selected),
                Style::default().fg(t.selected_mark),
            ));
        }
        if overlay.search() != overlay.applied_query() {
            spans.push(dim("filtering… "));
        }
    } else {
        spans.extend([
            key_badge("^E", t.accent, t),
            dim(" Split │ "),
            key_badge("^O", t.accent, t),
            dim(" Split ─ "),
            key_badge("^W", t.accent, t),
            dim(" Close "),
            key_badge("^N", t.accent, t),
            dim(" Next "),
            key_badge("^P", t.info, t),
            dim(" Processes "),
        ]);
        if state.workspace.len() > 1 {
            spans.push(Span::styled(
                format!("{} panes ", state.workspace.len()),
                Style::default().fg(t.text_dim),
            ));
        }
    }
    spans.extend([
        key_badge("F1", t.accent, t),
        dim(" Help "),
        key_badge("^Q", t.accent, t),
        dim(" Quit "),
    ]);

    if let Some(notice) = state.active_notice(Instant::now()) {
        let color = match notice.level {
            NoticeLevel::Success => t.success,
            NoticeLevel::Warning => t.warning,
            NoticeLevel::Error => t.danger,
        };
        spans.push(Span::styled(
            format!("  {} ", notice.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
