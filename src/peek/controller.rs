//! The peek overlay's state and message handling.
//!
//! `PeekOverlay` never performs I/O. Controls arrive as [`PeekMsg`], timers
//! advance through [`PeekOverlay::tick`], and backend work is requested by
//! returning [`Effect`]s that the app loop executes. Completions come back
//! through `on_snapshot` / `on_cancel_result`.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::client::ClientError;
use crate::constants::*;
use crate::models::{CancelFailure, CancelReply, ProcessRecord};

use super::filter;
use super::schedule::{Debounce, Interval};
use super::selection::SelectionSet;
use super::table::{self, TableRow, Thresholds};

/// Cancellation request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: &str) -> Self {
        Self {
            level,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Input from the overlay's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeekMsg {
    /// A character typed into the search box.
    SearchInput(char),
    SearchBackspace,
    /// The clear button.
    SearchClear,
    /// Escape: clears the search, or closes the overlay when already clear.
    Escape,
    Cursor(CursorMove),
    /// Flip the selection of the row under the cursor.
    ToggleRowAtCursor,
    /// Move the cursor to a visible row and flip its selection (mouse click).
    ClickRow(usize),
    /// The select-all checkbox set to a value.
    SelectAll(bool),
    /// The select-all checkbox flipped.
    ToggleSelectAll,
    CancelSelected,
    /// Scroll the cancellation report by whole entries.
    ReportScroll(CursorMove),
    DismissReport,
}

/// Work the app loop must perform on the overlay's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Request a fresh process snapshot.
    FetchSnapshot,
    /// Send one cancellation request for these pids.
    SubmitCancel(Vec<u32>),
    Notify(Notice),
    /// The overlay asked to be closed.
    Close,
}

/// Live, filterable process table with selection and batch cancellation.
#[derive(Debug)]
pub struct PeekOverlay {
    session: u64,
    thresholds: Thresholds,

    snapshot: Vec<ProcessRecord>,
    has_snapshot: bool,

    /// Text in the search box.
    search: String,
    /// Query the current `visible` list was computed with.
    applied_query: String,
    /// Indices into `snapshot` that survive `applied_query`.
    visible: Vec<usize>,
    filter_passes: u64,

    selection: SelectionSet,
    select_all: bool,
    cursor: usize,

    cancel: CancelState,
    report: Option<Vec<CancelFailure>>,
    /// First report entry shown.
    report_scroll: usize,

    poller: Interval,
    debounce: Debounce,
}

impl PeekOverlay {
    /// Open the overlay. The poller starts and an immediate fetch is requested.
    ///
    /// `session` tags backend completions so replies that belong to an
    /// earlier opening can be discarded.
    pub fn open(
        session: u64,
        poll_interval: Duration,
        search_debounce: Duration,
        thresholds: Thresholds,
        now: Instant,
    ) -> (Self, Vec<Effect>) {
        let mut poller = Interval::new(poll_interval);
        poller.start(now);
        let overlay = Self {
            session,
            thresholds,
            snapshot: Vec::new(),
            has_snapshot: false,
            search: String::new(),
            applied_query: String::new(),
            visible: Vec::new(),
            filter_passes: 0,
            selection: SelectionSet::new(),
            select_all: false,
            cursor: 0,
            cancel: CancelState::Idle,
            report: None,
            report_scroll: 0,
            poller,
            debounce: Debounce::new(search_debounce),
        };
        info!(session, "process overlay opened");
        (overlay, vec![Effect::FetchSnapshot])
    }

    /// Stop polling and reset the search and selection. Completions that
    /// arrive afterwards are ignored.
    pub fn close(&mut self) {
        self.poller.stop();
        self.debounce.cancel();
        self.search.clear();
        self.applied_query.clear();
        self.selection.clear();
        self.select_all = false;
        self.report = None;
        self.report_scroll = 0;
        self.cursor = 0;
        info!(session = self.session, "process overlay closed");
    }

    pub fn is_open(&self) -> bool {
        self.poller.is_running()
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Advance the poll and debounce timers.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.debounce.fire(now) {
            self.apply_filter();
        }
        if self.poller.fire(now) {
            effects.push(Effect::FetchSnapshot);
        }
        effects
    }

    pub fn handle(&mut self, msg: PeekMsg, now: Instant) -> Vec<Effect> {
        match msg {
            PeekMsg::SearchInput(c) => {
                self.search.push(c);
                self.debounce.trigger(now);
            }
            PeekMsg::SearchBackspace => {
                if self.search.pop().is_some() {
                    self.debounce.trigger(now);
                }
            }
            PeekMsg::SearchClear => self.clear_search(),
            PeekMsg::Escape => {
                if self.search.is_empty() && self.applied_query.is_empty() {
                    return vec![Effect::Close];
                }
                self.clear_search();
            }
            PeekMsg::Cursor(m) => self.move_cursor(m),
            PeekMsg::ToggleRowAtCursor => {
                if let Some(pid) = self.pid_at(self.cursor) {
                    self.selection.toggle(pid);
                }
            }
            PeekMsg::ClickRow(index) => {
                if let Some(pid) = self.pid_at(index) {
                    self.cursor = index;
                    self.selection.toggle(pid);
                }
            }
            PeekMsg::SelectAll(checked) => self.set_select_all(checked),
            PeekMsg::ToggleSelectAll => self.set_select_all(!self.select_all),
            PeekMsg::CancelSelected => return self.submit_cancel(),
            PeekMsg::ReportScroll(m) => self.scroll_report(m),
            PeekMsg::DismissReport => {
                self.report = None;
                self.report_scroll = 0;
            }
        }
        Vec::new()
    }

    /// Apply the result of a snapshot fetch.
    pub fn on_snapshot(&mut self, result: Result<Vec<ProcessRecord>, ClientError>) {
        if !self.is_open() {
            debug!(session = self.session, "dropping snapshot for closed overlay");
            return;
        }
        match result {
            Ok(records) => {
                self.snapshot = records;
                self.has_snapshot = true;
                self.apply_filter();
            }
            // Keep showing the previous snapshot; the next tick retries.
            Err(e) => warn!(error = %e, "process snapshot fetch failed"),
        }
    }

    /// Apply the result of a cancellation request.
    pub fn on_cancel_result(&mut self, result: Result<CancelReply, ClientError>) -> Vec<Effect> {
        self.cancel = CancelState::Idle;
        match result {
            Ok(reply) if reply.success => {
                self.selection.clear();
                self.select_all = false;
                let mut effects = Vec::new();
                if reply.errors.is_empty() {
                    info!("cancellation succeeded");
                    effects.push(Effect::Notify(Notice::new(
                        NoticeLevel::Success,
                        NOTICE_CANCEL_OK,
                    )));
                } else {
                    for failure in &reply.errors {
                        warn!(pid = failure.pid, error = %failure.error, "process not cancelled");
                    }
                    self.report = Some(reply.errors);
                    self.report_scroll = 0;
                }
                if self.is_open() {
                    effects.push(Effect::FetchSnapshot);
                }
                effects
            }
            Ok(_) => {
                warn!("backend rejected cancellation request");
                vec![Effect::Notify(Notice::new(
                    NoticeLevel::Error,
                    NOTICE_CANCEL_REJECTED,
                ))]
            }
            Err(e) => {
                warn!(error = %e, "cancellation request failed");
                vec![Effect::Notify(Notice::new(
                    NoticeLevel::Error,
                    NOTICE_CANCEL_TRANSPORT,
                ))]
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    #[cfg(test)]
    pub fn filter_passes(&self) -> u64 {
        self.filter_passes
    }

    pub fn has_snapshot(&self) -> bool {
        self.has_snapshot
    }

    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn select_all_checked(&self) -> bool {
        self.select_all
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cancel_state(&self) -> CancelState {
        self.cancel
    }

    pub fn visible_records(&self) -> Vec<&ProcessRecord> {
        self.visible.iter().map(|&i| &self.snapshot[i]).collect()
    }

    /// Rows for the current snapshot, filter and selection.
    pub fn rows(&self) -> Vec<TableRow> {
        table::project(
            &self.visible_records(),
            &self.selection,
            &self.applied_query,
            self.thresholds,
        )
    }

    pub fn cancel_label(&self) -> String {
        match self.cancel {
            CancelState::Sending => CANCEL_SENDING_LABEL.to_string(),
            CancelState::Idle if self.selection.is_empty() => CANCEL_LABEL.to_string(),
            CancelState::Idle => format!("{} ({})", CANCEL_LABEL, self.selection.len()),
        }
    }

    pub fn cancel_enabled(&self) -> bool {
        self.cancel == CancelState::Idle && !self.selection.is_empty()
    }

    pub fn report(&self) -> Option<&[CancelFailure]> {
        self.report.as_deref()
    }

    pub fn report_scroll(&self) -> usize {
        self.report_scroll
    }

    /// One line per failed pid, e.g. `PID 100: Permission denied`.
    pub fn report_lines(&self) -> Vec<String> {
        self.report
            .iter()
            .flatten()
            .map(|f| format!("PID {}: {}", f.pid, f.error))
            .collect()
    }

    // ── Internals ─────────────────────────────────────────────────

    fn apply_filter(&mut self) {
        self.applied_query = self.search.clone();
        self.visible = filter::filter(&self.snapshot, &self.applied_query);
        self.filter_passes += 1;
        debug!(
            passes = self.filter_passes,
            visible = self.visible.len(),
            "filter applied"
        );
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    fn clear_search(&mut self) {
        self.debounce.cancel();
        self.search.clear();
        self.apply_filter();
    }

    fn pid_at(&self, index: usize) -> Option<u32> {
        self.visible.get(index).map(|&i| self.snapshot[i].pid)
    }

    fn set_select_all(&mut self, checked: bool) {
        self.select_all = checked;
        let pids: Vec<u32> = self.visible.iter().map(|&i| self.snapshot[i].pid).collect();
        self.selection.set_visible(pids, checked);
    }

    fn move_cursor(&mut self, m: CursorMove) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = match m {
            CursorMove::Up => self.cursor.saturating_sub(1),
            CursorMove::Down => (self.cursor + 1).min(last),
            CursorMove::PageUp => self.cursor.saturating_sub(PAGE_SIZE),
            CursorMove::PageDown => (self.cursor + PAGE_SIZE).min(last),
            CursorMove::Home => 0,
            CursorMove::End => last,
        };
    }

    fn scroll_report(&mut self, m: CursorMove) {
        let last = self.report.as_ref().map_or(0, |r| r.len().saturating_sub(1));
        self.report_scroll = match m {
            CursorMove::Up => self.report_scroll.saturating_sub(1),
            CursorMove::Down => (self.report_scroll + 1).min(last),
            CursorMove::PageUp => self.report_scroll.saturating_sub(PAGE_SIZE),
            CursorMove::PageDown => (self.report_scroll + PAGE_SIZE).min(last),
            CursorMove::Home => 0,
            CursorMove::End => last,
        };
    }

    fn submit_cancel(&mut self) -> Vec<Effect> {
        if self.cancel == CancelState::Sending {
            return Vec::new();
        }
        if self.selection.is_empty() {
            return vec![Effect::Notify(Notice::new(
                NoticeLevel::Warning,
                NOTICE_NOTHING_SELECTED,
            ))];
        }
        let pids = self.selection.ids();
        info!(count = pids.len(), "submitting cancellation");
        self.cancel = CancelState::Sending;
        vec![Effect::SubmitCancel(pids)]
    }
}
