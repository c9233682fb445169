//! Errors raised while opening a request, before any event is streamed.

use thiserror::Error;

/// Error type for studio client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request could not be sent or its body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status before streaming began
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A local file referenced by the request could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Check if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            ClientError::ServerError { status, .. } => *status >= 500 || *status == 429,
            ClientError::InvalidConfig(_) | ClientError::Io { .. } => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServerError { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ClientError::ServerError {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("500"));
        assert!(display.contains("Internal Server Error"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_retryable_statuses() {
        let err = ClientError::ServerError {
            status: 503,
            message: String::new(),
        };
        assert!(err.is_retryable());

        let err = ClientError::ServerError {
            status: 422,
            message: String::new(),
        };
        assert!(!err.is_retryable());

        assert!(!ClientError::InvalidConfig("empty base url".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let err = ClientError::Io {
            path: "/tmp/ref.wav".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/tmp/ref.wav"));
    }
}
