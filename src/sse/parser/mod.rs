//! SSE record parsing logic
//!
//! Contains the stateful `EventAssembler` that groups decoded lines into
//! records and emits one `StreamEvent` per completed record.
//!
//! The framing is the simple single-line-payload variant the studio
//! server emits:
//!
//! ```text
//! event: <name>
//! data: <json>
//! <blank line>
//! ```
//!
//! A later `data:` line replaces an earlier one within the same record;
//! multi-line `data:` concatenation is not implemented.

use crate::sse::events::{SseLine, SseParseError, StreamEvent};

const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

/// Classify a single line.
///
/// Prefixes must match exactly, including the single space. A single
/// trailing `\r` is tolerated and removed before classification.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
        return SseLine::Event(name.to_string());
    }

    if let Some(data) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(data.to_string());
    }

    SseLine::Ignored
}

/// Stateful assembler that accumulates lines and emits complete events
#[derive(Debug, Default)]
pub struct EventAssembler {
    /// Declared name of the record being built (empty = unset)
    event_type: String,
    /// Most recent data text of the record being built (empty = unset)
    data: String,
}

impl EventAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the assembler, potentially returning a complete event
    ///
    /// Returns:
    /// - `Ok(Some(event))` - A record was completed
    /// - `Ok(None)` - Line was consumed but no record is complete
    /// - `Err(error)` - A record was completed but its payload is not JSON;
    ///   the record is dropped and the assembler is ready for the next one
    pub fn feed_line(&mut self, line: &str) -> Result<Option<StreamEvent>, SseParseError> {
        match parse_sse_line(line) {
            SseLine::Event(name) => {
                self.event_type = name;
                Ok(None)
            }
            SseLine::Data(data) => {
                self.data = data;
                Ok(None)
            }
            SseLine::Empty => self.try_emit_event(),
            SseLine::Ignored => Ok(None),
        }
    }

    /// Whether a partially built record is pending
    pub fn has_partial_record(&self) -> bool {
        !self.event_type.is_empty() || !self.data.is_empty()
    }

    /// Reset the assembler state
    pub fn reset(&mut self) {
        self.event_type.clear();
        self.data.clear();
    }

    fn try_emit_event(&mut self) -> Result<Option<StreamEvent>, SseParseError> {
        // Stray blank lines (keep-alive separators) leave the record untouched
        if self.event_type.is_empty() || self.data.is_empty() {
            return Ok(None);
        }

        let event_type = std::mem::take(&mut self.event_type);
        let data = std::mem::take(&mut self.data);

        match serde_json::from_str::<serde_json::Value>(&data) {
            Ok(payload) => Ok(Some(StreamEvent::new(event_type, payload))),
            Err(e) => Err(SseParseError::InvalidJson {
                event_type,
                detail: e.to_string(),
            }),
        }
    }
}
