//! Renderer module: split into focused submodules.
//!
//! - `header`: Name, backend address, clock
//! - `status_bar`: Keybinds and the transient notice
//! - `panes`: Shell pane grid
//! - `peek`: Process overlay (search, controls, table)
//! - `overlays`: Cancellation report and help popups
//! - `helpers`: Shared rendering utilities

mod header;
pub mod helpers;
mod overlays;
mod panes;
mod peek;
mod status_bar;

use ratatui::Frame;

use super::regions;
use super::state::AppState;

/// Top-level render function.
pub fn render(frame: &mut Frame, state: &AppState) {
    let size = frame.area();
    let screen = regions::screen(size);

    header::render_header(frame, screen.header, state);
    panes::render_panes(frame, screen.body, state);
    status_bar::render_status_bar(frame, screen.status, state);

    if let Some(overlay) = &state.peek {
        peek::render_peek(frame, screen.body, overlay, state);
        overlays::render_cancel_report(frame, size, overlay, state);
    }

    if state.show_help {
        overlays::render_help_overlay(frame, size, state);
    }
}
