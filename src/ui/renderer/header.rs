//! Header bar: name, backend address, clock.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::state::AppState;
use crate::utils::{spinner_char, truncate_str};

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // Name + server
            Constraint::Length(30), // Clock
        ])
        .split(area);

    let busy = state
        .workspace
        .active()
        .is_some_and(|pane| pane.is_pending());
    let pulse = if busy {
        spinner_char(state.tick_count)
    } else {
        "●"
    };

    let left = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::styled(" webshell ", t.header_style()),
        Span::styled(
            format!(
                "→ {}",
                truncate_str(&state.server_url, chunks[0].width.saturating_sub(16) as usize)
            ),
            Style::default().fg(t.text_muted),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(left, chunks[0]);

    let clock = Paragraph::new(Line::from(Span::styled(
        state.clock_text.as_str(),
        Style::default().fg(t.text_dim),
    )))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(clock, chunks[1]);
}
