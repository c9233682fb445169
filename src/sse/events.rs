//! SSE event types and definitions
//!
//! Contains the `StreamEvent` delivered to subscribers, the classified
//! `SseLine` shapes, and the record-level parse error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Event name the server sends when an operation finished successfully
pub const EVENT_DONE: &str = "done";
/// Event name the server sends when an operation failed
pub const EVENT_ERROR: &str = "error";
/// Event name for intermediate progress messages
pub const EVENT_PROGRESS: &str = "progress";
/// Event name for stage changes (preparing, generating, ...)
pub const EVENT_STATUS: &str = "status";

/// Represents a classified SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: progress")
    Event(String),
    /// Data payload (e.g., "data: {\"message\": \"50%\"}")
    Data(String),
    /// Empty line - signals end of a record
    Empty,
    /// Anything else: comments, keep-alives, unknown directives
    Ignored,
}

/// One decoded record from the event stream.
///
/// `kind` is the event name exactly as declared on the wire and is never
/// empty. `payload` is the parsed JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    pub kind: String,
    pub payload: serde_json::Value,
}

impl StreamEvent {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// `done` and `error` end the stream
    pub fn is_terminal(&self) -> bool {
        self.is_done() || self.is_error()
    }

    pub fn is_done(&self) -> bool {
        self.kind == EVENT_DONE
    }

    pub fn is_error(&self) -> bool {
        self.kind == EVENT_ERROR
    }

    /// Optional human-readable `message` field carried by most payloads
    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(|v| v.as_str())
    }

    /// Read a string field from the payload
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(|v| v.as_str())
    }

    /// Deserialize the payload into a caller-supplied schema.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, SseParseError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| SseParseError::InvalidPayload {
            event_type: self.kind.clone(),
            detail: e.to_string(),
        })
    }
}

/// SSE parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    /// The record was well-framed but its data line is not valid JSON
    #[error("Invalid JSON for event '{event_type}': {detail}")]
    InvalidJson { event_type: String, detail: String },
    /// The JSON payload does not match the schema the caller asked for
    #[error("Unexpected payload for event '{event_type}': {detail}")]
    InvalidPayload { event_type: String, detail: String },
}

impl SseParseError {
    /// Event name of the record that failed
    pub fn event_type(&self) -> &str {
        match self {
            SseParseError::InvalidJson { event_type, .. }
            | SseParseError::InvalidPayload { event_type, .. } => event_type,
        }
    }
}
