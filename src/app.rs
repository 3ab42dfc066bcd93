//! Application struct and event loop.
//!
//! Owns the terminal, state, backend client and the result channel.
//! Network calls run on spawned tasks; the loop never awaits them.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{BackendClient, ClientError};
use crate::config::Config;
use crate::constants::*;
use crate::models::{CancelReply, CommandReply, ProcessRecord};
use crate::peek::{CursorMove, Effect, PeekMsg, PeekOverlay, Thresholds};
use crate::peek::schedule::Interval;
use crate::shell::{PaneId, SplitDirection};
use crate::ui::regions::{self, ControlHit};
use crate::ui::{self, AppState};

/// Completion of a backend request, delivered back to the loop.
#[derive(Debug)]
pub enum BackendEvent {
    /// Process snapshot for the overlay opened as `session`.
    Snapshot {
        session: u64,
        result: Result<Vec<ProcessRecord>, ClientError>,
    },
    /// Cancellation reply for the overlay opened as `session`.
    Cancel {
        session: u64,
        result: Result<CancelReply, ClientError>,
    },
    /// Reply to a command typed into `pane`.
    Command {
        pane: PaneId,
        result: Result<CommandReply, ClientError>,
    },
    /// Fresh prompt for a new (or starting) `pane`.
    Prompt {
        pane: PaneId,
        result: Result<CommandReply, ClientError>,
    },
}

/// Main application struct.
pub struct App {
    state: AppState,
    client: BackendClient,

    backend_tx: mpsc::UnboundedSender<BackendEvent>,
    backend_rx: mpsc::UnboundedReceiver<BackendEvent>,

    clock: Interval,
    /// Incremented on every overlay opening.
    next_session: u64,
    poll_interval: Duration,
    search_debounce: Duration,
    thresholds: Thresholds,

    /// Terminal area of the last frame, for mouse hit-testing.
    screen_area: Rect,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let theme = ui::Theme::resolve(&config.theme);
        debug!(theme = %theme.name, "theme loaded");
        let client = BackendClient::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
        );
        let state = AppState::new(theme, client.base_url());
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();

        Self {
            state,
            client,
            backend_tx,
            backend_rx,
            clock: Interval::new(Duration::from_millis(CLOCK_INTERVAL_MS)),
            next_session: 1,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            thresholds: Thresholds {
                cpu_percent: config.cpu_highlight_percent,
                mem_percent: config.mem_highlight_percent,
            },
            screen_area: Rect::default(),
        }
    }

    /// Run the TUI until the user quits. The terminal is restored even when
    /// the loop fails.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("webshell stopped");
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        info!(server = %self.client.base_url(), "webshell started");
        let now = Instant::now();
        self.clock.start(now);
        self.refresh_clock();
        let first = self.state.workspace.active_id();
        self.fetch_prompt(first, STARTUP_COMMAND);

        loop {
            terminal.draw(|frame| {
                self.screen_area = frame.area();
                ui::render(frame, &self.state);
            })?;

            self.drain_backend_events();

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                match event::read()? {
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break; // quit requested
                        }
                    }
                    _ => {}
                }
            }

            self.tick(Instant::now());
        }
        Ok(())
    }

    // ── Timers ───────────────────────────────────────────────────

    fn tick(&mut self, now: Instant) {
        if self.clock.fire(now) {
            self.state.tick_count += 1;
            self.refresh_clock();
        }
        let effects = match self.state.peek.as_mut() {
            Some(overlay) => overlay.tick(now),
            None => Vec::new(),
        };
        self.apply_effects(effects);
    }

    fn refresh_clock(&mut self) {
        self.state.clock_text = crate::utils::clock_text(&chrono::Local::now());
    }

    // ── Channel draining ─────────────────────────────────────────

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.backend_rx.try_recv() {
            match event {
                BackendEvent::Snapshot { session, result } => match self.overlay_for(session) {
                    Some(overlay) => overlay.on_snapshot(result),
                    None => debug!(session, "dropping stale process snapshot"),
                },
                BackendEvent::Cancel { session, result } => {
                    let effects = match self.overlay_for(session) {
                        Some(overlay) => overlay.on_cancel_result(result),
                        None => {
                            debug!(session, ?result, "dropping stale cancellation reply");
                            Vec::new()
                        }
                    };
                    self.apply_effects(effects);
                }
                BackendEvent::Command { pane, result } => {
                    let Some(target) = self.state.workspace.pane_mut(pane) else {
                        debug!(pane, "dropping reply for closed pane");
                        continue;
                    };
                    match result {
                        Ok(reply) => target.on_reply(reply),
                        Err(e) => {
                            warn!(pane, error = %e, "command execution failed");
                            target.on_error(&e.to_string());
                        }
                    }
                }
                BackendEvent::Prompt { pane, result } => {
                    let Some(target) = self.state.workspace.pane_mut(pane) else {
                        debug!(pane, "dropping prompt for closed pane");
                        continue;
                    };
                    match result {
                        Ok(reply) => target.on_prompt(reply.prompt),
                        Err(e) => {
                            warn!(pane, error = %e, "prompt fetch failed");
                            target.on_error(&e.to_string());
                        }
                    }
                }
            }
        }
    }

    fn overlay_for(&mut self, session: u64) -> Option<&mut PeekOverlay> {
        self.state
            .peek
            .as_mut()
            .filter(|overlay| overlay.session() == session)
    }

    // ── Backend requests ─────────────────────────────────────────

    fn fetch_prompt(&self, pane: PaneId, command: &'static str) {
        let client = self.client.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = client.execute(command).await;
            let _ = tx.send(BackendEvent::Prompt { pane, result });
        });
    }

    fn run_command(&self, pane: PaneId, command: String) {
        let client = self.client.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = client.execute(&command).await;
            let _ = tx.send(BackendEvent::Command { pane, result });
        });
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSnapshot => {
                    let Some(session) = self.state.peek.as_ref().map(|o| o.session()) else {
                        continue;
                    };
                    let client = self.client.clone();
                    let tx = self.backend_tx.clone();
                    tokio::spawn(async move {
                        let result = client.list_processes().await;
                        let _ = tx.send(BackendEvent::Snapshot { session, result });
                    });
                }
                Effect::SubmitCancel(pids) => {
                    let Some(session) = self.state.peek.as_ref().map(|o| o.session()) else {
                        continue;
                    };
                    let client = self.client.clone();
                    let tx = self.backend_tx.clone();
                    tokio::spawn(async move {
                        let result = client.cancel_processes(&pids).await;
                        let _ = tx.send(BackendEvent::Cancel { session, result });
                    });
                }
                Effect::Notify(notice) => self.state.set_notice(notice),
                Effect::Close => self.close_peek(),
            }
        }
    }

    // ── Overlay lifecycle ────────────────────────────────────────

    fn open_peek(&mut self) {
        let session = self.next_session;
        self.next_session += 1;
        let (overlay, effects) = PeekOverlay::open(
            session,
            self.poll_interval,
            self.search_debounce,
            self.thresholds,
            Instant::now(),
        );
        self.state.peek = Some(overlay);
        self.apply_effects(effects);
    }

    fn close_peek(&mut self) {
        if let Some(mut overlay) = self.state.peek.take() {
            overlay.close();
        }
    }

    fn send_peek(&mut self, msg: PeekMsg) {
        let effects = match self.state.peek.as_mut() {
            Some(overlay) => overlay.handle(msg, Instant::now()),
            None => return,
        };
        self.apply_effects(effects);
    }

    // ── Key handling ─────────────────────────────────────────────

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return true;
        }
        if key.code == KeyCode::F(1) {
            self.state.show_help = !self.state.show_help;
            return false;
        }
        if self.state.show_help {
            if key.code == KeyCode::Esc {
                self.state.show_help = false;
            }
            return false;
        }
        if self.state.peek.is_some() {
            self.handle_key_peek(key, ctrl);
        } else {
            self.handle_key_pane(key, ctrl);
        }
        false
    }

    fn handle_key_peek(&mut self, key: KeyEvent, ctrl: bool) {
        let report_open = self
            .state
            .peek
            .as_ref()
            .is_some_and(|o| o.report().is_some());
        if report_open {
            let msg = match key.code {
                KeyCode::Enter | KeyCode::Esc => PeekMsg::DismissReport,
                KeyCode::Up => PeekMsg::ReportScroll(CursorMove::Up),
                KeyCode::Down => PeekMsg::ReportScroll(CursorMove::Down),
                KeyCode::PageUp => PeekMsg::ReportScroll(CursorMove::PageUp),
                KeyCode::PageDown => PeekMsg::ReportScroll(CursorMove::PageDown),
                KeyCode::Home => PeekMsg::ReportScroll(CursorMove::Home),
                KeyCode::End => PeekMsg::ReportScroll(CursorMove::End),
                _ => return,
            };
            self.send_peek(msg);
            return;
        }

        let msg = match key.code {
            KeyCode::Char('p') if ctrl => {
                self.close_peek();
                return;
            }
            KeyCode::Char('a') if ctrl => PeekMsg::ToggleSelectAll,
            KeyCode::Char('k') if ctrl => PeekMsg::CancelSelected,
            KeyCode::Char('u') if ctrl => PeekMsg::SearchClear,
            KeyCode::Char(_) if ctrl => return,
            KeyCode::Char(c) => PeekMsg::SearchInput(c),
            KeyCode::Backspace => PeekMsg::SearchBackspace,
            KeyCode::Esc => PeekMsg::Escape,
            KeyCode::Enter => PeekMsg::ToggleRowAtCursor,
            KeyCode::Up => PeekMsg::Cursor(CursorMove::Up),
            KeyCode::Down => PeekMsg::Cursor(CursorMove::Down),
            KeyCode::PageUp => PeekMsg::Cursor(CursorMove::PageUp),
            KeyCode::PageDown => PeekMsg::Cursor(CursorMove::PageDown),
            KeyCode::Home => PeekMsg::Cursor(CursorMove::Home),
            KeyCode::End => PeekMsg::Cursor(CursorMove::End),
            _ => return,
        };
        self.send_peek(msg);
    }

    fn handle_key_pane(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl {
            match key.code {
                KeyCode::Char('p') => self.open_peek(),
                KeyCode::Char('e') => self.split(SplitDirection::Vertical),
                KeyCode::Char('o') => self.split(SplitDirection::Horizontal),
                KeyCode::Char('w') => {
                    if !self.state.workspace.close_active() {
                        debug!("refusing to close the last pane");
                    }
                }
                KeyCode::Char('n') => self.state.workspace.focus_next(),
                _ => {}
            }
            return;
        }

        let active = self.state.workspace.active_id();
        let Some(pane) = self.state.workspace.active_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                if let Some(command) = pane.submit() {
                    debug!(pane = active, %command, "submitting command");
                    self.run_command(active, command);
                }
            }
            KeyCode::Char(c) => pane.insert_char(c),
            KeyCode::Backspace => pane.backspace(),
            KeyCode::Delete => pane.delete(),
            KeyCode::Left => pane.cursor_left(),
            KeyCode::Right => pane.cursor_right(),
            KeyCode::Home => pane.cursor_home(),
            KeyCode::End => pane.cursor_end(),
            KeyCode::PageUp => pane.scroll_up(PANE_SCROLL_STEP),
            KeyCode::PageDown => pane.scroll_down(PANE_SCROLL_STEP),
            _ => {}
        }
    }

    fn split(&mut self, direction: SplitDirection) {
        let id = self.state.workspace.split(direction);
        debug!(pane = id, ?direction, "split pane");
        self.fetch_prompt(id, "");
    }

    // ── Mouse handling ───────────────────────────────────────────

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let screen = regions::screen(self.screen_area);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                if let Some(overlay) = self.state.peek.as_ref() {
                    let msg = peek_scroll(overlay, CursorMove::Up);
                    self.send_peek(msg);
                } else if let Some(pane) = self.state.workspace.active_mut() {
                    pane.scroll_up(3);
                }
            }
            MouseEventKind::ScrollDown => {
                if let Some(overlay) = self.state.peek.as_ref() {
                    let msg = peek_scroll(overlay, CursorMove::Down);
                    self.send_peek(msg);
                } else if let Some(pane) = self.state.workspace.active_mut() {
                    pane.scroll_down(3);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (x, y) = (mouse.column, mouse.row);
                if self.state.show_help {
                    self.state.show_help = false;
                    return;
                }
                let Some(overlay) = self.state.peek.as_ref() else {
                    if let Some(id) = self.state.workspace.pane_at(screen.body, x, y) {
                        self.state.workspace.focus(id);
                    }
                    return;
                };
                if overlay.report().is_some() {
                    self.send_peek(PeekMsg::DismissReport);
                    return;
                }
                let r = regions::peek(screen.body);
                let button_width = overlay.cancel_label().chars().count() as u16 + 2;
                let select_all = !overlay.select_all_checked();
                if let Some(index) = regions::row_at(r.table, overlay.cursor(), x, y) {
                    self.send_peek(PeekMsg::ClickRow(index));
                } else {
                    match regions::control_at(r.controls, button_width, x, y) {
                        Some(ControlHit::SelectAll) => self.send_peek(PeekMsg::SelectAll(select_all)),
                        Some(ControlHit::Cancel) => self.send_peek(PeekMsg::CancelSelected),
                        None => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// The wheel scrolls the cancellation report while it is open, else the table cursor.
fn peek_scroll(overlay: &PeekOverlay, m: CursorMove) -> PeekMsg {
    if overlay.report().is_some() {
        PeekMsg::ReportScroll(m)
    } else {
        PeekMsg::Cursor(m)
    }
}
