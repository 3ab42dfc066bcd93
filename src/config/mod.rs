use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::*;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/webshell/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, including any blueprint prefix (no trailing slash)
    pub server_url: String,
    /// Process snapshot polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Search box debounce in milliseconds
    pub search_debounce_ms: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// CPU percent above which the CPU cell is emphasized
    pub cpu_highlight_percent: f64,
    /// Memory percent above which the MEM cell is emphasized
    pub mem_highlight_percent: f64,
    /// Theme name (built-in or custom)
    pub theme: String,
    /// Log level used when WEBSHELL_LOG is unset
    pub log_level: String,
    /// Log file location
    pub log_file: PathBuf,
    /// Why the config file was ignored, if it was. Logged once logging is up.
    pub load_warning: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cpu_highlight_percent: DEFAULT_CPU_HIGHLIGHT_PCT,
            mem_highlight_percent: DEFAULT_MEM_HIGHLIGHT_PCT,
            theme: "default".to_string(),
            log_level: "info".to_string(),
            log_file: default_log_path(),
            load_warning: None,
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional — missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    server_url: Option<String>,
    poll_interval_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    cpu_highlight_percent: Option<f64>,
    mem_highlight_percent: Option<f64>,
    theme: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.config/webshell/config.toml, falling back to defaults
    /// for any missing fields. If the file doesn't exist, returns pure defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        let mut config = Config::default();

        let content = match std::fs::read_to_string(config_path) {
            Ok(c) => c,
            Err(_) => return config, // No config file — use defaults
        };

        let file_config: FileConfig = match toml::from_str(&content) {
            Ok(fc) => fc,
            Err(e) => {
                let warning = format!(
                    "failed to parse {}: {}; using defaults",
                    config_path.display(),
                    e
                );
                eprintln!("Warning: {}", warning);
                config.load_warning = Some(warning);
                return config;
            }
        };

        if let Some(v) = file_config.server_url {
            config.set_server_url(&v);
        }
        if let Some(v) = file_config.poll_interval_ms {
            config.poll_interval_ms = v.max(MIN_POLL_INTERVAL_MS);
        }
        if let Some(v) = file_config.search_debounce_ms {
            config.search_debounce_ms = v.min(MAX_SEARCH_DEBOUNCE_MS);
        }
        if let Some(v) = file_config.request_timeout_secs {
            config.request_timeout_secs = v.clamp(1, MAX_REQUEST_TIMEOUT_SECS);
        }
        if let Some(v) = file_config.cpu_highlight_percent {
            config.cpu_highlight_percent = v.clamp(0.0, 100.0);
        }
        if let Some(v) = file_config.mem_highlight_percent {
            config.mem_highlight_percent = v.clamp(0.0, 100.0);
        }
        if let Some(v) = file_config.theme {
            if !v.is_empty() {
                config.theme = v;
            }
        }
        if let Some(v) = file_config.log_level {
            if !v.is_empty() {
                config.log_level = v;
            }
        }
        if let Some(v) = file_config.log_file {
            config.log_file = v;
        }

        config
    }

    /// Set the backend URL, ignoring empty input and trimming trailing slashes.
    pub fn set_server_url(&mut self, url: &str) {
        let trimmed = url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.server_url = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.poll_interval_ms, 3000);
        assert_eq!(config.search_debounce_ms, 150);
        assert!(config.load_warning.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
            server_url = "http://box:8080/shell/"
            poll_interval_ms = 5000
            theme = "nord"
            cpu_highlight_percent = 25.0
            "#,
        );
        let config = Config::load_from(&path);
        assert_eq!(config.server_url, "http://box:8080/shell");
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.theme, "nord");
        assert_eq!(config.cpu_highlight_percent, 25.0);
        // untouched keys keep defaults
        assert_eq!(config.mem_highlight_percent, DEFAULT_MEM_HIGHLIGHT_PCT);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let (_dir, path) = write_config(
            r#"
            poll_interval_ms = 10
            search_debounce_ms = 99999
            request_timeout_secs = 0
            mem_highlight_percent = 250.0
            "#,
        );
        let config = Config::load_from(&path);
        assert_eq!(config.poll_interval_ms, MIN_POLL_INTERVAL_MS);
        assert_eq!(config.search_debounce_ms, MAX_SEARCH_DEBOUNCE_MS);
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.mem_highlight_percent, 100.0);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let (_dir, path) = write_config("server_url = [not valid");
        let config = Config::load_from(&path);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        let warning = config.load_warning.expect("parse failure is kept for logging");
        assert!(warning.contains("config.toml"));
    }

    #[test]
    fn empty_server_url_is_ignored() {
        let mut config = Config::default();
        config.set_server_url("   ");
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        config.set_server_url("http://x:1///");
        assert_eq!(config.server_url, "http://x:1");
    }
}
