//! Error types for the studio client.
//!
//! - [`ClientError`]: opening a request failed (connection, HTTP status,
//!   configuration). Returned directly from the call that issues the request.
//! - [`StreamError`]: a subscription ended without a `done` event. Produced
//!   from a [`StreamOutcome`](crate::sse::StreamOutcome).
//! - [`SseParseError`](crate::sse::SseParseError): a single record was
//!   malformed. Recovered locally and never fatal to the stream.

mod network;
mod stream;

pub use network::ClientError;
pub use stream::StreamError;

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
