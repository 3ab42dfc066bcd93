//! Shared utility functions used across modules.

use chrono::{DateTime, TimeZone};
use unicode_width::UnicodeWidthStr;

use crate::constants::SPINNER_CHARS;

/// Truncate a string to `max_width` display columns, appending "..." if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if max_width >= 3 {
        out.push_str("...");
    }
    out
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

/// Clock bar text: `Time: HH:MM:SS MM/YYYY`.
pub fn clock_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("Time: %H:%M:%S %m/%Y").to_string()
}

/// Display width of the first `chars` characters of `s`.
pub fn prefix_width(s: &str, chars: usize) -> usize {
    s.chars()
        .take(chars)
        .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}
