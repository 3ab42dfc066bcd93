//! Application-wide constants.
//!
//! Centralizes timings, thresholds, endpoint paths, labels and
//! configuration defaults.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const EVENT_POLL_MS: u64 = 50;
/// Clock bar refresh interval (ms).
pub const CLOCK_INTERVAL_MS: u64 = 1000;
/// Default process snapshot polling interval while the peek overlay is open (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
/// Minimum allowed polling interval (ms) to avoid hammering the backend.
pub const MIN_POLL_INTERVAL_MS: u64 = 500;
/// Default search box debounce (ms).
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;
/// Maximum configurable search debounce (ms).
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 2000;
/// Default HTTP request timeout (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Maximum HTTP request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
/// How long a transient notice stays in the status bar (ms).
pub const NOTICE_TIMEOUT_MS: u64 = 2500;

// ── Backend ───────────────────────────────────────────────────────
/// Default backend base URL (Flask development server).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
/// Command execution endpoint.
pub const EXECUTE_PATH: &str = "/execute";
/// Process listing endpoint.
pub const PROCESSES_PATH: &str = "/get_processes";
/// Process cancellation endpoint.
pub const CANCEL_PATH: &str = "/cancel_processes";
/// Command used to obtain the first prompt at startup.
pub const STARTUP_COMMAND: &str = "pwd";

// ── Process Table ─────────────────────────────────────────────────
/// CPU percentage above which a row's CPU cell is emphasized.
pub const DEFAULT_CPU_HIGHLIGHT_PCT: f64 = 10.0;
/// Memory percentage above which a row's MEM cell is emphasized.
pub const DEFAULT_MEM_HIGHLIGHT_PCT: f64 = 10.0;
/// Placeholder row text when the filtered snapshot is empty.
pub const NO_MATCHES_TEXT: &str = "No matching processes found";
/// Page up/down step size in the process table.
pub const PAGE_SIZE: usize = 20;

// ── Shell Panes ───────────────────────────────────────────────────
/// Prompt shown while the first prompt is being fetched.
pub const LOADING_PROMPT: &str = "Loading...";
/// Scrollback lines kept per pane.
pub const SCROLLBACK_LIMIT: usize = 5000;
/// Lines scrolled by PageUp/PageDown in a pane.
pub const PANE_SCROLL_STEP: usize = 10;

// ── Cancel Control Labels ─────────────────────────────────────────
pub const CANCEL_LABEL: &str = "Cancel Selected";
pub const CANCEL_SENDING_LABEL: &str = "Canceling...";

// ── Notices ───────────────────────────────────────────────────────
pub const NOTICE_NOTHING_SELECTED: &str = "No processes selected";
pub const NOTICE_CANCEL_OK: &str = "All selected processes canceled successfully";
pub const NOTICE_CANCEL_REJECTED: &str = "Failed to cancel processes";
pub const NOTICE_CANCEL_TRANSPORT: &str = "Error: Could not communicate with server";

// ── Popup Dimensions ──────────────────────────────────────────────
/// Cancellation report popup max width.
pub const REPORT_POPUP_WIDTH: u16 = 70;
/// Cancellation report popup max height.
pub const REPORT_POPUP_HEIGHT: u16 = 20;
/// Help overlay width.
pub const HELP_POPUP_WIDTH: u16 = 58;
/// Help overlay height.
pub const HELP_POPUP_HEIGHT: u16 = 30;

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for loading indicators.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/webshell/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("webshell")
}

/// Returns `~/.config/webshell/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/webshell/themes/<name>.toml`.
pub fn custom_theme_path(name: &str) -> PathBuf {
    config_dir().join("themes").join(format!("{}.toml", name))
}

/// Returns `~/.local/share/webshell/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("webshell")
}

/// Returns `~/.local/share/webshell/webshell.log`.
pub fn default_log_path() -> PathBuf {
    data_dir().join("webshell.log")
}
