//! Terminal stream failures.
//!
//! These are the ways a subscription can end without a `done` event,
//! other than cancellation.

use thiserror::Error;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// Reading the response body failed mid-stream.
    #[error("Stream transport failed: {message}")]
    Transport { message: String },

    /// The server reported an error via an `error` event.
    #[error("Server reported an error: {message}")]
    Remote { message: String },

    /// The connection closed cleanly before a `done` or `error` event.
    #[error("Stream ended before the operation finished{}", last_event_suffix(.last_event_kind))]
    UnexpectedEof { last_event_kind: Option<String> },
}

fn last_event_suffix(kind: &Option<String>) -> String {
    match kind {
        Some(k) => format!(" (last event: {})", k),
        None => String::new(),
    }
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::Transport { .. } | StreamError::UnexpectedEof { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport { .. } => {
                "Connection to the server was lost. Please try again.".to_string()
            }
            StreamError::Remote { message } => message.clone(),
            StreamError::UnexpectedEof { .. } => {
                "The server closed the connection before the operation finished.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::Remote { .. } => "E_STREAM_REMOTE",
            StreamError::UnexpectedEof { .. } => "E_STREAM_EOF",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StreamError::Remote {
            message: "oom".to_string(),
        };
        assert_eq!(err.to_string(), "Server reported an error: oom");

        let err = StreamError::UnexpectedEof {
            last_event_kind: Some("progress".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Stream ended before the operation finished (last event: progress)"
        );

        let err = StreamError::UnexpectedEof {
            last_event_kind: None,
        };
        assert_eq!(err.to_string(), "Stream ended before the operation finished");
    }

    #[test]
    fn test_retryable() {
        assert!(StreamError::Transport {
            message: "reset".to_string()
        }
        .is_retryable());
        assert!(StreamError::UnexpectedEof {
            last_event_kind: None
        }
        .is_retryable());
        assert!(!StreamError::Remote {
            message: "bad lyrics".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_user_message_passes_remote_message_through() {
        let err = StreamError::Remote {
            message: "No model selected. Please download and select a model first.".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "No model selected. Please download and select a model first."
        );
        assert_eq!(err.error_code(), "E_STREAM_REMOTE");
    }
}
