//! Trait abstractions at the seams of the stream machinery.
//!
//! - [`EventSink`] - where a subscription delivers its events

pub mod sse;

pub use sse::{CallbackSink, EventSink};
