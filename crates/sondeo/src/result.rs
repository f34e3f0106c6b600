//! Result and error types for Sondeo.

use std::time::Duration;
use thiserror::Error;

/// Result type for Sondeo operations
pub type SondeoResult<T> = Result<T, SondeoError>;

/// Errors that can occur in Sondeo
#[derive(Debug, Error)]
pub enum SondeoError {
    /// A polling assertion never saw its predicate hold within the budget
    #[error(
        "Timed out after {}ms ({attempts} attempt(s)) waiting for {selector} to {predicate}; last observed: {last_observed}",
        .elapsed.as_millis()
    )]
    TimeoutExceeded {
        /// Human-readable predicate, e.g. "be visible"
        predicate: String,
        /// Human-readable selector
        selector: String,
        /// Summary of the last query result or transient error
        last_observed: String,
        /// Number of query attempts made
        attempts: usize,
        /// Time spent before giving up
        elapsed: Duration,
    },

    /// Neither the ISBN label nor the numeric fallback showed up on a detail page
    #[error("No ISBN found for '{title}': label absent and numeric fallback failed ({source})")]
    AmbiguousFallback {
        /// Book title whose detail page was checked
        title: String,
        /// The fallback assertion's timeout
        #[source]
        source: Box<SondeoError>,
    },

    /// An action (click, clear, type) could not be performed
    #[error("Action '{action}' on {selector} failed: {message}")]
    Action {
        /// Action name
        action: &'static str,
        /// Human-readable selector
        selector: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SondeoError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a polling timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutExceeded { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_mentions_predicate_and_state() {
        let err = SondeoError::TimeoutExceeded {
            predicate: "be visible".into(),
            selector: "text \"Book Store\"".into(),
            last_observed: "0 element(s)".into(),
            attempts: 41,
            elapsed: Duration::from_millis(2000),
        };
        let display = err.to_string();
        assert!(display.contains("2000ms"));
        assert!(display.contains("41 attempt(s)"));
        assert!(display.contains("be visible"));
        assert!(display.contains("Book Store"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_ambiguous_fallback_wraps_timeout() {
        let inner = SondeoError::TimeoutExceeded {
            predicate: "be visible".into(),
            selector: "pattern /\\d{10,13}/".into(),
            last_observed: "0 element(s)".into(),
            attempts: 3,
            elapsed: Duration::from_millis(100),
        };
        let err = SondeoError::AmbiguousFallback {
            title: "Git Pocket Guide".into(),
            source: Box::new(inner),
        };
        assert!(err.to_string().contains("Git Pocket Guide"));
        assert!(!err.is_timeout());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_helper() {
        let err = SondeoError::config("bad value");
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }
}
