//! Application configuration
//!
//! Resolution order: built-in defaults, then `GEOPROFILE_*` environment
//! variables, then command-line flags (applied by the binary).

use crate::error::{ProfileError, Result};
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

pub const API_ENV: &str = "GEOPROFILE_API";
pub const SEARCH_LIMIT_ENV: &str = "GEOPROFILE_SEARCH_LIMIT";
pub const NAV_DELAY_ENV: &str = "GEOPROFILE_NAV_DELAY_MS";
pub const TIMEOUT_ENV: &str = "GEOPROFILE_TIMEOUT_MS";
pub const FOCUS_ENV: &str = "GEOPROFILE_FOCUS";
pub const LOG_PATH_ENV: &str = "GEOPROFILE_LOG";
pub const LOG_LEVEL_ENV: &str = "GEOPROFILE_LOG_LEVEL";

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/";
pub const DEFAULT_NAV_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the statistics API, always ending in `/`
    pub api_base: String,
    /// Maximum number of search results shown (None = all)
    pub search_limit: Option<usize>,
    /// Pause between selecting a result and navigating to it
    pub navigation_delay: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Peer entities highlighted on the header map
    pub focus: Vec<String>,
    /// Attribute kinds loaded into the store
    pub attr_kinds: Vec<String>,
    /// Log file location (None = temp dir)
    pub log_path: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            search_limit: Some(10),
            navigation_delay: Duration::from_millis(DEFAULT_NAV_DELAY_MS),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            focus: Vec::new(),
            attr_kinds: vec!["geo".to_string(), "crop".to_string()],
            log_path: None,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by any `GEOPROFILE_*` variables that are set
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = read_non_empty_env(API_ENV) {
            config.api_base = normalize_base_url(&base)?;
        }
        if let Some(raw) = read_non_empty_env(SEARCH_LIMIT_ENV) {
            config.search_limit = parse_limit(&raw)?;
        }
        if let Some(ms) = read_env_u64(NAV_DELAY_ENV) {
            config.navigation_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env_u64(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(raw) = read_non_empty_env(FOCUS_ENV) {
            config.focus = parse_list(&raw);
        }
        if let Some(path) = read_non_empty_env(LOG_PATH_ENV) {
            config.log_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = read_non_empty_env(LOG_LEVEL_ENV) {
            config.log_level = LogLevel::parse(&raw)
                .ok_or_else(|| ProfileError::InvalidConfig(format!("unknown log level '{}'", raw)))?;
        }

        Ok(config)
    }
}

/// Ensure the base URL parses and ends with exactly one `/`
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let normalized = format!("{}/", trimmed);
    reqwest::Url::parse(&normalized)
        .map_err(|e| ProfileError::InvalidConfig(format!("invalid API base '{}': {}", raw, e)))?;
    Ok(normalized)
}

/// `0`, `none` and `off` disable the limit
pub fn parse_limit(raw: &str) -> Result<Option<usize>> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "0" | "none" | "off" => Ok(None),
        other => other
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ProfileError::InvalidConfig(format!("invalid search limit '{}'", raw))),
    }
}

/// Comma-separated list, blanks dropped
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[must_use]
fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.org/v1//").unwrap(),
            "https://api.example.org/v1/"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000/api").unwrap(),
            "http://localhost:5000/api/"
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit("5").unwrap(), Some(5));
        assert_eq!(parse_limit("none").unwrap(), None);
        assert_eq!(parse_limit("0").unwrap(), None);
        assert!(parse_limit("many").is_err());
    }

    #[test]
    fn list_parsing_drops_blanks() {
        assert_eq!(parse_list("GHA, ,NGA,"), vec!["GHA", "NGA"]);
    }

    #[test]
    fn defaults_keep_half_second_delay() {
        let config = AppConfig::default();
        assert_eq!(config.navigation_delay, Duration::from_millis(500));
        assert!(config.api_base.ends_with('/'));
    }
}
