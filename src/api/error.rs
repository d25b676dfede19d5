//! Error types for backend requests.

use thiserror::Error;

/// Errors that can occur when fetching from the dashboard backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Any other HTTP-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The configured base URL could not be used.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl FetchError {
    /// Whether a failed logs request may be skipped for the cycle.
    ///
    /// Only an error status or a timeout counts; transport and body
    /// failures abort the cycle.
    pub fn is_skippable(&self) -> bool {
        matches!(self, FetchError::Status(_) | FetchError::Timeout)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skippable_errors() {
        assert!(FetchError::Status(503).is_skippable());
        assert!(FetchError::Timeout.is_skippable());
        assert!(!FetchError::Parse("eof".to_string()).is_skippable());
        assert!(!FetchError::Connection("refused".to_string()).is_skippable());
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchError::Status(500).to_string(), "API returned status 500");
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
    }
}
