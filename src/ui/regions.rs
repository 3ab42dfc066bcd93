//! Screen geometry shared by the renderer and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Top-level screen split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> Screen {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header / clock
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    Screen {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Areas of the peek overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekRegions {
    /// Whole bordered popup.
    pub popup: Rect,
    pub search: Rect,
    /// Select-all checkbox and cancel button line.
    pub controls: Rect,
    /// Bordered process table, header row included.
    pub table: Rect,
}

pub fn peek(body: Rect) -> PeekRegions {
    let popup = body.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    let inner = popup.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Length(1), // Controls
            Constraint::Min(3),    // Table
        ])
        .split(inner);
    PeekRegions {
        popup,
        search: chunks[0],
        controls: chunks[1],
        table: chunks[2],
    }
}

/// Number of data rows that fit in a bordered table with a header row.
pub fn table_body_height(table: Rect) -> usize {
    table.height.saturating_sub(3) as usize
}

/// First visible row index so that `cursor` stays on screen.
pub fn table_offset(cursor: usize, body_height: usize) -> usize {
    if body_height == 0 {
        return cursor;
    }
    cursor.saturating_sub(body_height - 1)
}

/// Visible-row index under screen row `y`, if `y` is inside the table body.
pub fn row_at(table: Rect, cursor: usize, x: u16, y: u16) -> Option<usize> {
    let body_top = table.y + 2; // border + header row
    let body_height = table_body_height(table);
    let inside_x = x > table.x && x + 1 < table.x + table.width;
    if !inside_x || y < body_top || (y - body_top) as usize >= body_height {
        return None;
    }
    Some(table_offset(cursor, body_height) + (y - body_top) as usize)
}

/// Width of the select-all checkbox and its label on the controls line.
pub const SELECT_ALL_WIDTH: u16 = 23;
/// Column of the cancel button on the controls line.
pub const CANCEL_BUTTON_X: u16 = SELECT_ALL_WIDTH + 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHit {
    SelectAll,
    Cancel,
}

/// Which control on the controls line is under (`x`, `y`). `button_width`
/// is the rendered width of the cancel button.
pub fn control_at(controls: Rect, button_width: u16, x: u16, y: u16) -> Option<ControlHit> {
    if y != controls.y || x < controls.x {
        return None;
    }
    let col = x - controls.x;
    if col < SELECT_ALL_WIDTH {
        Some(ControlHit::SelectAll)
    } else if col >= CANCEL_BUTTON_X && col < CANCEL_BUTTON_X + button_width {
        Some(ControlHit::Cancel)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_reserves_header_and_status() {
        let s = screen(Rect::new(0, 0, 100, 30));
        assert_eq!(s.header.height, 3);
        assert_eq!(s.status.height, 1);
        assert_eq!(s.status.y, 29);
        assert_eq!(s.body.height, 26);
    }

    #[test]
    fn peek_regions_nest_inside_body() {
        let body = Rect::new(0, 3, 100, 26);
        let p = peek(body);
        assert!(p.popup.width < body.width);
        assert_eq!(p.search.height, 3);
        assert_eq!(p.controls.height, 1);
        assert_eq!(p.controls.y, p.search.y + 3);
        assert_eq!(p.table.y, p.controls.y + 1);
    }

    #[test]
    fn offset_keeps_cursor_visible() {
        assert_eq!(table_offset(0, 10), 0);
        assert_eq!(table_offset(9, 10), 0);
        assert_eq!(table_offset(10, 10), 1);
        assert_eq!(table_offset(25, 10), 16);
    }

    #[test]
    fn row_at_maps_clicks_to_rows() {
        let table = Rect::new(0, 10, 50, 13); // 10 body rows
        assert_eq!(row_at(table, 0, 5, 12), Some(0));
        assert_eq!(row_at(table, 0, 5, 21), Some(9));
        // header and bottom border are not rows
        assert_eq!(row_at(table, 0, 5, 11), None);
        assert_eq!(row_at(table, 0, 5, 22), None);
        // scrolled: cursor on the 16th row
        assert_eq!(row_at(table, 15, 5, 12), Some(6));
    }

    #[test]
    fn control_at_finds_checkbox_and_button() {
        let controls = Rect::new(3, 8, 90, 1);
        assert_eq!(control_at(controls, 19, 4, 8), Some(ControlHit::SelectAll));
        assert_eq!(control_at(controls, 19, 3 + 24, 8), None);
        assert_eq!(
            control_at(controls, 19, 3 + CANCEL_BUTTON_X, 8),
            Some(ControlHit::Cancel)
        );
        assert_eq!(control_at(controls, 19, 3 + CANCEL_BUTTON_X + 19, 8), None);
        assert_eq!(control_at(controls, 19, 4, 9), None);
    }
}
