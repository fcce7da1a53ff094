//! Result and error types for Comprobar.

use thiserror::Error;

/// Result type for Comprobar operations
pub type ComprobarResult<T> = Result<T, ComprobarError>;

/// Errors that can occur while driving the app under test
#[derive(Debug, Error)]
pub enum ComprobarError {
    /// No element matched a locator within its wait budget
    #[error("No element matching {locator} within {timeout_ms}ms")]
    NotFound {
        /// Rendered form of the locator that failed to resolve
        locator: String,
        /// Wait budget that elapsed
        timeout_ms: u64,
    },

    /// Element was found but never became clickable within its wait budget
    #[error("Element {locator} not interactable within {timeout_ms}ms")]
    NotInteractable {
        /// Rendered form of the locator
        locator: String,
        /// Wait budget that elapsed
        timeout_ms: u64,
    },

    /// A domain expectation was violated; never retried automatically
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// What was expected and what was observed
        message: String,
    },

    /// Positional resolution could not find a product among visible items
    #[error("Could not find product '{product}' in visible items")]
    LookupFailed {
        /// Product name that was requested
        product: String,
    },

    /// Driver/session-level fault (stale handle, closed session, wire error)
    #[error("Session error: {message}")]
    SessionError {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Configuration surface fault (malformed environment value)
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComprobarError {
    /// Build an assertion failure from a formatted message
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Build a session fault from a formatted message
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::SessionError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ComprobarError::NotFound {
            locator: "~test-LOGIN".to_string(),
            timeout_ms: 20_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("~test-LOGIN"));
        assert!(msg.contains("20000ms"));
    }

    #[test]
    fn test_lookup_failed_names_product() {
        let err = ComprobarError::LookupFailed {
            product: "Sauce Labs Onesie".to_string(),
        };
        assert!(err.to_string().contains("Sauce Labs Onesie"));
    }

    #[test]
    fn test_assertion_helper() {
        let err = ComprobarError::assertion("expected 'standard_user', got 'EMPTY'");
        assert!(matches!(err, ComprobarError::AssertionFailed { .. }));
        assert!(err.to_string().contains("standard_user"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ComprobarError = io.into();
        assert!(matches!(err, ComprobarError::Io(_)));
    }
}
