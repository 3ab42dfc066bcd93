//! A single shell pane: scrollback, prompt and the editable input line.

use std::collections::VecDeque;

use crate::constants::{LOADING_PROMPT, SCROLLBACK_LIMIT};
use crate::models::CommandReply;

pub type PaneId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A submitted input line, prompt included.
    Command,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    lines: VecDeque<PaneLine>,
    prompt: String,
    input: String,
    /// Cursor position in chars within `input`.
    cursor: usize,
    /// A request for this pane is outstanding; input is frozen.
    pending: bool,
    /// Lines scrolled up from the bottom.
    scroll: usize,
}

impl Pane {
    /// A pane waiting for its first prompt from the backend.
    pub fn loading(id: PaneId) -> Self {
        Self {
            id,
            lines: VecDeque::new(),
            prompt: LOADING_PROMPT.to_string(),
            input: String::new(),
            cursor: 0,
            pending: true,
            scroll: 0,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn lines(&self) -> impl Iterator<Item = &PaneLine> {
        self.lines.iter()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    // ── Input editing ─────────────────────────────────────────────

    pub fn insert_char(&mut self, c: char) {
        if self.pending {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.scroll = 0;
    }

    pub fn backspace(&mut self) {
        if self.pending || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
    }

    pub fn delete(&mut self) {
        if self.pending || self.cursor >= self.input.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    // ── Command flow ──────────────────────────────────────────────

    /// Freeze the input line into the scrollback.
    ///
    /// Returns the command to send to the backend, or `None` when the pane
    /// is busy or the command was handled locally (`clear`).
    pub fn submit(&mut self) -> Option<String> {
        if self.pending {
            return None;
        }
        let command = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.scroll = 0;

        if command.trim().eq_ignore_ascii_case("clear") {
            self.lines.clear();
            return None;
        }

        let echo = format!("{}{}", self.prompt, command);
        self.push(LineKind::Command, echo);
        self.pending = true;
        Some(command)
    }

    /// Apply the backend's answer to a submitted command.
    pub fn on_reply(&mut self, reply: CommandReply) {
        if let Some(output) = reply.output.filter(|o| !o.is_empty()) {
            for line in output.lines() {
                self.push(LineKind::Output, line.to_string());
            }
        }
        self.prompt = reply.prompt;
        self.pending = false;
        self.scroll = 0;
    }

    /// Replace the pane's contents with a fresh prompt (startup and new splits).
    pub fn on_prompt(&mut self, prompt: String) {
        self.lines.clear();
        self.prompt = prompt;
        self.pending = false;
        self.scroll = 0;
    }

    /// Record a failed request and make the pane editable again.
    pub fn on_error(&mut self, message: &str) {
        self.push(LineKind::Error, format!("Error: {}", message));
        self.pending = false;
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.lines.push_back(PaneLine { kind, text });
        while self.lines.len() > SCROLLBACK_LIMIT {
            self.lines.pop_front();
        }
    }

    // ── Scrolling ─────────────────────────────────────────────────

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = (self.scroll + n).min(self.lines.len());
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(prompt: &str) -> Pane {
        let mut pane = Pane::loading(1);
        pane.on_prompt(prompt.to_string());
        pane
    }

    fn type_str(pane: &mut Pane, s: &str) {
        for c in s.chars() {
            pane.insert_char(c);
        }
    }

    fn texts(pane: &Pane) -> Vec<&str> {
        pane.lines().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn loading_pane_ignores_input() {
        let mut pane = Pane::loading(1);
        assert_eq!(pane.prompt(), LOADING_PROMPT);
        pane.insert_char('x');
        assert_eq!(pane.input(), "");
        assert_eq!(pane.submit(), None);
    }

    #[test]
    fn submit_echoes_and_freezes_until_reply() {
        let mut pane = ready("me@box:~$ ");
        type_str(&mut pane, "ls");
        assert_eq!(pane.submit(), Some("ls".to_string()));
        assert!(pane.is_pending());
        assert_eq!(texts(&pane), vec!["me@box:~$ ls"]);

        // busy: a second submission is refused
        type_str(&mut pane, "pwd");
        assert_eq!(pane.input(), "");
        assert_eq!(pane.submit(), None);

        pane.on_reply(CommandReply {
            output: Some("a.txt\nb.txt".into()),
            prompt: "me@box:~/x$ ".into(),
        });
        assert!(!pane.is_pending());
        assert_eq!(pane.prompt(), "me@box:~/x$ ");
        assert_eq!(texts(&pane), vec!["me@box:~$ ls", "a.txt", "b.txt"]);
    }

    #[test]
    fn empty_output_appends_nothing() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "cd /");
        pane.submit();
        pane.on_reply(CommandReply {
            output: Some(String::new()),
            prompt: "/ $ ".into(),
        });
        assert_eq!(pane.line_count(), 1);
    }

    #[test]
    fn clear_is_handled_locally() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "echo hi");
        pane.submit();
        pane.on_reply(CommandReply {
            output: Some("hi".into()),
            prompt: "$ ".into(),
        });
        type_str(&mut pane, "  CLEAR ");
        assert_eq!(pane.submit(), None);
        assert_eq!(pane.line_count(), 0);
        assert!(!pane.is_pending());
        assert_eq!(pane.prompt(), "$ ");
    }

    #[test]
    fn error_unfreezes_with_previous_prompt() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "sleep 1");
        pane.submit();
        pane.on_error("connection refused");
        assert!(!pane.is_pending());
        assert_eq!(pane.prompt(), "$ ");
        let last = pane.lines().last().unwrap();
        assert_eq!(last.kind, LineKind::Error);
        assert!(last.text.contains("connection refused"));
    }

    #[test]
    fn on_prompt_clears_pane() {
        let mut pane = Pane::loading(3);
        pane.on_error("timeout");
        pane.on_prompt("root@host:/# ".into());
        assert_eq!(pane.line_count(), 0);
        assert_eq!(pane.prompt(), "root@host:/# ");
    }

    #[test]
    fn editing_respects_cursor_and_multibyte() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "echo é");
        pane.cursor_left();
        pane.insert_char('x');
        assert_eq!(pane.input(), "echo xé");
        pane.cursor_end();
        pane.backspace();
        assert_eq!(pane.input(), "echo x");
        pane.cursor_home();
        pane.delete();
        assert_eq!(pane.input(), "cho x");
        pane.cursor_right();
        assert_eq!(pane.cursor(), 1);
    }

    #[test]
    fn scrollback_is_capped() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "yes");
        pane.submit();
        let output = vec!["y"; SCROLLBACK_LIMIT + 10].join("\n");
        pane.on_reply(CommandReply {
            output: Some(output),
            prompt: "$ ".into(),
        });
        assert_eq!(pane.line_count(), SCROLLBACK_LIMIT);
        assert!(texts(&pane).iter().all(|t| *t == "y"));
    }

    #[test]
    fn scroll_is_bounded() {
        let mut pane = ready("$ ");
        type_str(&mut pane, "ls");
        pane.submit();
        pane.on_reply(CommandReply {
            output: Some("a\nb\nc".into()),
            prompt: "$ ".into(),
        });
        pane.scroll_up(100);
        assert_eq!(pane.scroll(), 4);
        pane.scroll_down(1);
        assert_eq!(pane.scroll(), 3);
        pane.scroll_down(100);
        assert_eq!(pane.scroll(), 0);
    }
}
