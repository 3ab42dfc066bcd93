//! File-backed tracing subscriber.
//!
//! The terminal belongs to the UI, so log events go to a file instead of
//! stdout/stderr.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "WEBSHELL_LOG";

/// Build the filter: `WEBSHELL_LOG` if set and valid, else `fallback_level`.
pub fn env_filter(fallback_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to `path`. Returns `false` when
/// the file cannot be opened; the app runs without logging then.
pub fn init(path: &Path, level: &str) -> bool {
    let Ok(file) = open_log_file(path) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_and_parent_dirs_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("webshell.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unopenable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        assert!(open_log_file(dir.path()).is_err());
    }

    #[test]
    fn bad_level_falls_back() {
        // must not panic on garbage
        let _ = env_filter("not a [valid filter");
    }
}
