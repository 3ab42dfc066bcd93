use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord", "dracula"];

/// Every color the UI draws with. Built-in presets or a TOML file.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ── Chrome ───────────────────────────────────────────────
    pub accent: Color,
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub border: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic ─────────────────────────────────────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // ── Shell ────────────────────────────────────────────────
    pub prompt: Color,

    // ── Process table ────────────────────────────────────────
    /// Background of search matches inside cells.
    pub match_bg: Color,
    /// Cursor row background.
    pub row_cursor_bg: Color,
    /// Checkbox mark of selected rows.
    pub selected_mark: Color,
    /// CPU / MEM above threshold.
    pub hot: Color,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────

    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            bg_dark: Color::Rgb(22, 22, 30),
            bg_panel: Color::Rgb(30, 30, 42),
            border: Color::Rgb(55, 55, 75),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(99, 179, 237),
            prompt: Color::Rgb(0, 255, 0),
            match_bg: Color::Rgb(51, 85, 51),
            row_cursor_bg: Color::Rgb(40, 40, 60),
            selected_mark: Color::Rgb(129, 230, 217),
            hot: Color::Rgb(255, 107, 107),
        }
    }

    /// Gruvbox dark palette.
    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),        // yellow
            bg_dark: Color::Rgb(40, 40, 40),         // bg0
            bg_panel: Color::Rgb(50, 48, 47),        // bg0_s
            border: Color::Rgb(80, 73, 69),          // bg2
            text_primary: Color::Rgb(235, 219, 178), // fg
            text_dim: Color::Rgb(168, 153, 132),     // fg4
            text_muted: Color::Rgb(102, 92, 84),     // bg4
            success: Color::Rgb(142, 192, 124),      // green
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            info: Color::Rgb(131, 165, 152),
            prompt: Color::Rgb(184, 187, 38),
            match_bg: Color::Rgb(79, 83, 28),
            row_cursor_bg: Color::Rgb(60, 56, 54),
            selected_mark: Color::Rgb(142, 192, 124),
            hot: Color::Rgb(254, 128, 25), // orange
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),       // nord8
            bg_dark: Color::Rgb(46, 52, 64),         // nord0
            bg_panel: Color::Rgb(59, 66, 82),        // nord1
            border: Color::Rgb(76, 86, 106),         // nord3
            text_primary: Color::Rgb(229, 233, 240), // nord5
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140), // nord14
            warning: Color::Rgb(235, 203, 139), // nord13
            danger: Color::Rgb(191, 97, 106),   // nord11
            info: Color::Rgb(129, 161, 193),    // nord9
            prompt: Color::Rgb(163, 190, 140),
            match_bg: Color::Rgb(67, 94, 76),
            row_cursor_bg: Color::Rgb(67, 76, 94), // nord2
            selected_mark: Color::Rgb(143, 188, 187),
            hot: Color::Rgb(208, 135, 112), // nord12
        }
    }

    /// Dracula palette.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            accent: Color::Rgb(139, 233, 253),       // cyan
            bg_dark: Color::Rgb(40, 42, 54),         // background
            bg_panel: Color::Rgb(48, 51, 65),        // current line
            border: Color::Rgb(98, 114, 164),        // comment
            text_primary: Color::Rgb(248, 248, 242), // foreground
            text_dim: Color::Rgb(188, 188, 172),
            text_muted: Color::Rgb(98, 114, 164),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(241, 250, 140),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(139, 233, 253),
            prompt: Color::Rgb(80, 250, 123),
            match_bg: Color::Rgb(68, 90, 70),
            row_cursor_bg: Color::Rgb(68, 71, 90), // selection
            selected_mark: Color::Rgb(189, 147, 249),
            hot: Color::Rgb(255, 184, 108),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Load a custom theme from a TOML file; missing keys come from the default theme.
    pub fn from_toml_file(path: &std::path::Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let file: ThemeFile = toml::from_str(&content).ok()?;
        Some(
            file.into_theme(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("custom"),
            ),
        )
    }

    /// Built-in name, then a TOML file under the themes dir, then the default.
    pub fn resolve(name: &str) -> Self {
        Self::by_name(name)
            .or_else(|| Self::from_toml_file(&crate::constants::custom_theme_path(name)))
            .unwrap_or_else(|| {
                warn!(
                    theme = name,
                    builtin = ?BUILTIN_THEME_NAMES,
                    "unknown theme, using default"
                );
                Self::default()
            })
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_row_normal(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn table_row_cursor(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.row_cursor_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn match_style(&self) -> Style {
        Style::default()
            .bg(self.match_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hot_style(&self) -> Style {
        Style::default().fg(self.hot).add_modifier(Modifier::BOLD)
    }

    pub fn prompt_style(&self) -> Style {
        Style::default().fg(self.prompt)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// ── TOML deserialization for custom themes ──────────────────

/// All fields optional; missing ones inherit from the default theme.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeFile {
    accent: Option<String>,
    bg_dark: Option<String>,
    bg_panel: Option<String>,
    border: Option<String>,
    text_primary: Option<String>,
    text_dim: Option<String>,
    text_muted: Option<String>,
    success: Option<String>,
    warning: Option<String>,
    danger: Option<String>,
    info: Option<String>,
    prompt: Option<String>,
    match_bg: Option<String>,
    row_cursor_bg: Option<String>,
    selected_mark: Option<String>,
    hot: Option<String>,
}

impl ThemeFile {
    fn into_theme(self, name: &str) -> Theme {
        let base = Theme::default_dark();
        Theme {
            name: name.to_string(),
            accent: parse_color(&self.accent).unwrap_or(base.accent),
            bg_dark: parse_color(&self.bg_dark).unwrap_or(base.bg_dark),
            bg_panel: parse_color(&self.bg_panel).unwrap_or(base.bg_panel),
            border: parse_color(&self.border).unwrap_or(base.border),
            text_primary: parse_color(&self.text_primary).unwrap_or(base.text_primary),
            text_dim: parse_color(&self.text_dim).unwrap_or(base.text_dim),
            text_muted: parse_color(&self.text_muted).unwrap_or(base.text_muted),
            success: parse_color(&self.success).unwrap_or(base.success),
            warning: parse_color(&self.warning).unwrap_or(base.warning),
            danger: parse_color(&self.danger).unwrap_or(base.danger),
            info: parse_color(&self.info).unwrap_or(base.info),
            prompt: parse_color(&self.prompt).unwrap_or(base.prompt),
            match_bg: parse_color(&self.match_bg).unwrap_or(base.match_bg),
            row_cursor_bg: parse_color(&self.row_cursor_bg).unwrap_or(base.row_cursor_bg),
            selected_mark: parse_color(&self.selected_mark).unwrap_or(base.selected_mark),
            hot: parse_color(&self.hot).unwrap_or(base.hot),
        }
    }
}

/// Parse "#RRGGBB" or "RRGGBB".
fn parse_color(opt: &Option<String>) -> Option<Color> {
    let s = opt.as_ref()?;
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_color_with_and_without_hash() {
        assert_eq!(
            parse_color(&Some("#335533".to_string())),
            Some(Color::Rgb(51, 85, 51))
        );
        assert_eq!(
            parse_color(&Some("ff8800".to_string())),
            Some(Color::Rgb(255, 136, 0))
        );
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert_eq!(parse_color(&None), None);
        assert_eq!(parse_color(&Some("#FFF".to_string())), None);
        assert_eq!(parse_color(&Some("#GGHHII".to_string())), None);
        // six bytes but not six ASCII digits
        assert_eq!(parse_color(&Some("ééé".to_string())), None);
    }

    #[test]
    fn by_name_all_builtins() {
        for &name in BUILTIN_THEME_NAMES {
            let theme = Theme::by_name(name);
            assert!(theme.is_some(), "Theme '{}' should exist", name);
            assert_eq!(theme.unwrap().name, name);
        }
    }

    #[test]
    fn by_name_case_insensitive_and_unknown() {
        assert!(Theme::by_name("Gruvbox").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
        assert!(Theme::by_name("").is_none());
    }

    #[test]
    fn toml_theme_overrides_some_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "match_bg = \"#112233\"\nprompt = \"00FF00\"").unwrap();

        let theme = Theme::from_toml_file(&path).unwrap();
        let base = Theme::default_dark();
        assert_eq!(theme.name, "mine");
        assert_eq!(theme.match_bg, Color::Rgb(17, 34, 51));
        assert_eq!(theme.prompt, Color::Rgb(0, 255, 0));
        assert_eq!(theme.hot, base.hot);
    }

    #[test]
    fn unknown_theme_resolves_to_default() {
        assert_eq!(Theme::resolve("no-such-theme-anywhere").name, "default");
        assert_eq!(Theme::resolve("nord").name, "nord");
    }
}
