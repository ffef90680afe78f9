//! File logging for GeoProfile
//!
//! The terminal belongs to the TUI, so log lines go to a file instead of stderr.
//! One global logger is installed by [`init`]; until then every call is a no-op.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global logger instance
static LOGGER: OnceLock<Mutex<ProfileLogger>> = OnceLock::new();

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name (case-insensitive). Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Main logger struct
pub struct ProfileLogger {
    file: Option<File>,
    min_level: LogLevel,
}

impl ProfileLogger {
    fn open(path: &Path, min_level: LogLevel) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true) // Start fresh each run
            .open(path)
            .ok();

        Self { file, min_level }
    }

    /// Default log file location
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("geoprofile.log")
    }

    fn log(&mut self, level: LogLevel, module: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(level, module, message);

        if let Some(ref mut file) = self.file {
            let _ = file.write_all(entry.as_bytes());
            let _ = file.flush();
        }
    }
}

fn format_entry(level: LogLevel, module: &str, message: &str) -> String {
    format!(
        "[{}] [{:5}] [{}] {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        module,
        message
    )
}

/// Initialize the global logger.
///
/// Returns the path being written to. A second call keeps the first logger.
pub fn init(path: Option<&Path>, min_level: LogLevel) -> PathBuf {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(ProfileLogger::default_path);
    let _ = LOGGER.set(Mutex::new(ProfileLogger::open(&path, min_level)));
    path
}

fn log(level: LogLevel, module: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.lock().log(level, module, message);
    }
}

/// Log debug message
pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

/// Log info message
pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

/// Log warning message
pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

/// Log error message
pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

// ============================================================================
// Specialized logging functions for different components
// ============================================================================

/// Log an outgoing search request
pub fn log_search_request(seq: u64, query: &str) {
    debug("SEARCH", &format!("Request #{}: q='{}'", seq, query));
}

/// Log a search response and whether it was applied to the widget
pub fn log_search_response(seq: u64, latest: u64, count: usize, applied: bool) {
    if applied {
        debug("SEARCH", &format!("Response #{}: {} results", seq, count));
    } else {
        info(
            "SEARCH",
            &format!("Dropped stale response #{} (latest is #{})", seq, latest),
        );
    }
}

/// Log a failed search request
pub fn log_search_failure(seq: u64, message: &str) {
    warn("SEARCH", &format!("Request #{} failed: {}", seq, message));
}

/// Log the outcome of one section data dependency
pub fn log_data_need(key: &str, geo: &str, outcome: std::result::Result<usize, &str>) {
    match outcome {
        Ok(rows) => debug("DATA", &format!("{} for {}: {} rows", key, geo, rows)),
        Err(e) => warn("DATA", &format!("{} for {} failed: {}", key, geo, e)),
    }
}

/// Log a route change
pub fn log_navigation(path: &str) {
    info("NAV", &format!("Navigate to {}", path));
}

/// Flush the log file
pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        if let Some(ref mut file) = logger.lock().file {
            let _ = file.flush();
        }
    }
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    let msg = format!("========== {} ==========", label);
    info("---", &msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse(" debug "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn logger_respects_min_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.log");

        let mut logger = ProfileLogger::open(&path, LogLevel::Info);
        logger.log(LogLevel::Debug, "SEARCH", "hidden");
        logger.log(LogLevel::Warn, "DATA", "visible");
        drop(logger);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("hidden"));
        assert!(text.contains("[WARN ] [DATA] visible"));
    }
}
