//! Error types for GeoProfile
//!
//! Every fallible operation in the crate returns [`Result`]. Request failures are
//! kept distinguishable so the UI can show them inline instead of bailing out.

use thiserror::Error;

/// Main error type for GeoProfile operations
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data '{key}' unavailable: {message}")]
    DataUnavailable { key: String, message: String },

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid route '{0}'")]
    InvalidRoute(String),

    #[error("Background worker disconnected")]
    Disconnected,
}

/// Result type alias for GeoProfile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// Whether this error came from talking to the statistics API.
    ///
    /// These are the failures surfaced as an inline "request failed" message.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ProfileError::Http(_)
                | ProfileError::Status { .. }
                | ProfileError::Payload(_)
                | ProfileError::DataUnavailable { .. }
        )
    }

    /// Short single-line text suitable for a status bar or inline panel
    pub fn inline_message(&self) -> String {
        match self {
            ProfileError::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            ProfileError::Http(_) => "Request failed: the statistics API is unreachable".to_string(),
            ProfileError::Status { status, .. } => format!("Request failed (HTTP {})", status),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_request_failures() {
        let err = ProfileError::Status {
            url: "http://localhost/api/join/".to_string(),
            status: 502,
        };
        assert!(err.is_request_failure());
        assert_eq!(err.inline_message(), "Request failed (HTTP 502)");
    }

    #[test]
    fn lookup_errors_are_not_request_failures() {
        let err = ProfileError::UnknownEntity("GH9999".to_string());
        assert!(!err.is_request_failure());
        assert_eq!(err.inline_message(), "Unknown entity 'GH9999'");
    }
}
