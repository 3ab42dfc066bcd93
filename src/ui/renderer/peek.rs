//! Process overlay: search box, controls and the process table.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::ProcessColumn;
use crate::peek::{CancelState, PeekOverlay, Segment, TableRow};
use crate::ui::regions::{self, PeekRegions};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::utils::{prefix_width, spinner_char};

use super::helpers::render_scrollbar_bordered;

pub fn render_peek(frame: &mut Frame, body: Rect, overlay: &PeekOverlay, state: &AppState) {
    let t = &state.theme;
    let r = regions::peek(body);

    frame.render_widget(Clear, r.popup);
    let title = if overlay.cancel_state() == CancelState::Sending {
        format!(" Processes {} canceling ", spinner_char(state.tick_count))
    } else if overlay.has_snapshot() {
        format!(
            " Processes ({}/{}) ",
            overlay.visible_records().len(),
            overlay.snapshot_len()
        )
    } else {
        format!(" Processes {} ", spinner_char(state.tick_count))
    };
    let frame_block = Block::default()
        .title(Span::styled(title, t.header_style()))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style())
        .style(Style::default().bg(t.bg_panel));
    frame.render_widget(frame_block, r.popup);

    render_search(frame, &r, overlay, t);
    render_controls(frame, &r, overlay, t);
    render_table(frame, &r, overlay, t);
}

fn render_search(frame: &mut Frame, r: &PeekRegions, overlay: &PeekOverlay, t: &Theme) {
    let text = if overlay.search().is_empty() {
        Span::styled("Search processes...", Style::default().fg(t.text_muted))
    } else {
        Span::styled(overlay.search(), Style::default().fg(t.text_primary))
    };
    let search = Paragraph::new(Line::from(vec![Span::raw(" "), text])).block(
        Block::default()
            .title(Span::styled(" Search ", Style::default().fg(t.text_dim)))
            .title_bottom(Span::styled(" ^U clear ", Style::default().fg(t.text_muted)))
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(search, r.search);

    if overlay.report().is_none() {
        let x = r.search.x + 2 + prefix_width(overlay.search(), usize::MAX) as u16;
        if x < r.search.x + r.search.width.saturating_sub(1) {
            frame.set_cursor_position((x, r.search.y + 1));
        }
    }
}

fn render_controls(frame: &mut Frame, r: &PeekRegions, overlay: &PeekOverlay, t: &Theme) {
    let checkbox = if overlay.select_all_checked() {
        "[x]"
    } else {
        "[ ]"
    };
    let button_style = if overlay.cancel_enabled() {
        Style::default()
            .fg(t.bg_dark)
            .bg(t.danger)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.text_muted).bg(t.bg_dark)
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", checkbox), Style::default().fg(t.selected_mark)),
        Span::styled("Select all visible", Style::default().fg(t.text_dim)),
        Span::raw("   "),
        Span::styled(format!(" {} ", overlay.cancel_label()), button_style),
    ]);
    frame.render_widget(Paragraph::new(line), r.controls);
}

fn render_table(frame: &mut Frame, r: &PeekRegions, overlay: &PeekOverlay, t: &Theme) {
    let mut header_cells = vec![Cell::from("").style(t.table_header_style())];
    header_cells.extend(
        ProcessColumn::ALL
            .iter()
            .map(|col| Cell::from(col.header()).style(t.table_header_style())),
    );
    let header = Row::new(header_cells).height(1);

    let table_rows = overlay.rows();
    let mut total = 0;
    let mut placeholder = None;
    let rows: Vec<Row> = table_rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match row {
            TableRow::Placeholder(text) => {
                placeholder = Some(text);
                None
            }
            TableRow::Process(p) => {
                total += 1;
                let mark = if p.selected { "[x]" } else { "[ ]" };
                let mut cells = vec![Cell::from(Span::styled(
                    mark,
                    Style::default().fg(t.selected_mark),
                ))];
                cells.extend(p.cells.into_iter().map(|cell| {
                    let base = if cell.flagged {
                        t.hot_style()
                    } else {
                        Style::default()
                    };
                    let line = segments_line(cell.segments, base, t);
                    Cell::from(if is_numeric(cell.column) {
                        line.right_aligned()
                    } else {
                        line
                    })
                }));
                let style = if i == overlay.cursor() {
                    t.table_row_cursor()
                } else {
                    t.table_row_normal()
                };
                Some(Row::new(cells).style(style))
            }
        })
        .collect();

    let widths = [
        Constraint::Length(3),  // mark
        Constraint::Length(7),  // PID
        Constraint::Length(9),  // USER
        Constraint::Length(4),  // PR
        Constraint::Length(4),  // NI
        Constraint::Length(8),  // VIRT
        Constraint::Length(8),  // RES
        Constraint::Length(7),  // SHR
        Constraint::Length(2),  // S
        Constraint::Length(6),  // %CPU
        Constraint::Length(6),  // %MEM
        Constraint::Length(10), // TIME+
        Constraint::Min(12),    // COMMAND
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(t.border_style()),
        )
        .row_highlight_style(t.table_row_cursor());

    let body_height = regions::table_body_height(r.table);
    let offset = regions::table_offset(overlay.cursor(), body_height);
    let mut table_state = TableState::default().with_offset(offset);
    if total > 0 {
        table_state.select(Some(overlay.cursor()));
    }
    frame.render_stateful_widget(table, r.table, &mut table_state);

    if let Some(text) = placeholder {
        let body = Rect {
            x: r.table.x + 1,
            y: r.table.y + 2,
            width: r.table.width.saturating_sub(2),
            height: body_height.min(1) as u16,
        };
        let line = Paragraph::new(Span::styled(text, Style::default().fg(t.text_muted)))
            .alignment(Alignment::Center);
        frame.render_widget(line, body);
    }

    render_scrollbar_bordered(frame, r.table, total, overlay.cursor());
}

fn is_numeric(column: ProcessColumn) -> bool {
    matches!(
        column,
        ProcessColumn::Pid
            | ProcessColumn::Virt
            | ProcessColumn::Res
            | ProcessColumn::Shr
            | ProcessColumn::Cpu
            | ProcessColumn::Mem
    )
}

/// Cell text with search matches highlighted, over a base style.
fn segments_line<'a>(segments: Vec<Segment>, base: Style, t: &Theme) -> Line<'a> {
    Line::from(
        segments
            .into_iter()
            .map(|s| {
                let style = if s.highlighted {
                    base.patch(t.match_style())
                } else {
                    base
                };
                Span::styled(s.text, style)
            })
            .collect::<Vec<_>>(),
    )
}
