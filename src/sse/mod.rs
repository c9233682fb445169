//! SSE (Server-Sent Events) stream consumption
//!
//! Turns the chunked byte body of a long-running request into an ordered
//! sequence of [`StreamEvent`]s and a single terminal [`StreamOutcome`].
//!
//! # Module structure
//! - `decoder` - Byte chunks to UTF-8 lines (LineDecoder)
//! - `parser` - Lines to events (EventAssembler, parse_sse_line)
//! - `events` - Event and line types (StreamEvent, SseLine, SseParseError)
//! - `payloads` - Typed payload schemas for the studio's streams
//! - `subscription` - Read loop, cancellation and terminal outcomes

mod decoder;
mod events;
mod parser;
pub mod payloads;
mod subscription;

// Re-export public types
pub use decoder::LineDecoder;
pub use events::{
    SseLine, SseParseError, StreamEvent, EVENT_DONE, EVENT_ERROR, EVENT_PROGRESS, EVENT_STATUS,
};
pub use parser::{parse_sse_line, EventAssembler};
pub use subscription::{
    drive, CancelHandle, StreamFailure, StreamOutcome, StreamReport, Subscription,
    SubscriptionStats,
};
