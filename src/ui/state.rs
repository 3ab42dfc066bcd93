use std::time::{Duration, Instant};

use crate::constants::NOTICE_TIMEOUT_MS;
use crate::peek::{Notice, PeekOverlay};
use crate::shell::Workspace;

use super::theme::Theme;

/// Central application state - the single source of truth.
pub struct AppState {
    pub workspace: Workspace,
    /// Present while the process overlay is open.
    pub peek: Option<PeekOverlay>,

    pub show_help: bool,
    pub tick_count: u64,
    pub clock_text: String,
    /// Backend base URL, shown in the header.
    pub server_url: String,

    // ── Transient notice (shown in status bar) ───────────────
    pub notice: Option<(Notice, Instant)>,

    pub theme: Theme,
}

impl AppState {
    pub fn new(theme: Theme, server_url: &str) -> Self {
        Self {
            workspace: Workspace::new(),
            peek: None,
            show_help: false,
            tick_count: 0,
            clock_text: String::new(),
            server_url: server_url.to_string(),
            notice: None,
            theme,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// The notice to show, if it has not expired at `now`.
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().and_then(|(notice, at)| {
            (now.saturating_duration_since(*at) < Duration::from_millis(NOTICE_TIMEOUT_MS))
                .then_some(notice)
        })
    }

    pub fn peek_open(&self) -> bool {
        self.peek.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peek::NoticeLevel;

    fn make_state() -> AppState {
        AppState::new(Theme::default(), "http://127.0.0.1:5000")
    }

    #[test]
    fn new_state_has_one_pane_and_no_overlay() {
        let s = make_state();
        assert_eq!(s.workspace.len(), 1);
        assert!(!s.peek_open());
        assert!(s.notice.is_none());
    }

    #[test]
    fn notice_expires() {
        let mut s = make_state();
        s.set_notice(Notice {
            level: NoticeLevel::Warning,
            text: "No processes selected".into(),
        });
        let (_, at) = s.notice.clone().unwrap();
        assert_eq!(
            s.active_notice(at + Duration::from_millis(100)).map(|n| n.text.as_str()),
            Some("No processes selected")
        );
        assert!(s
            .active_notice(at + Duration::from_millis(NOTICE_TIMEOUT_MS))
            .is_none());
    }
}
