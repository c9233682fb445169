//! Event delivery trait abstraction.
//!
//! The subscription loop hands every decoded event to an [`EventSink`].
//! Two sinks are provided: a bounded tokio channel (used by
//! [`Subscription`](crate::sse::Subscription)) and a plain callback.
//!
//! # Example
//!
//! ```ignore
//! use songstudio::sse::{drive, CancelHandle};
//! use songstudio::traits::CallbackSink;
//!
//! let cancel = CancelHandle::new();
//! let report = drive(chunks, &cancel, CallbackSink::new(|event| {
//!     println!("{}: {:?}", event.kind, event.message());
//! }))
//! .await;
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::sse::StreamEvent;

/// Receiver of decoded stream events.
///
/// Implementations see events strictly in wire order, one at a time; the
/// next chunk is not read until `deliver` returns.
#[async_trait]
pub trait EventSink: Send {
    /// Hand one event to the consumer.
    ///
    /// # Returns
    /// - `true` if the consumer accepted the event
    /// - `false` if the consumer has gone away; the subscription then ends
    ///   as cancelled
    async fn deliver(&mut self, event: StreamEvent) -> bool;
}

#[async_trait]
impl EventSink for mpsc::Sender<StreamEvent> {
    async fn deliver(&mut self, event: StreamEvent) -> bool {
        self.send(event).await.is_ok()
    }
}

/// Sink adapter for a synchronous callback.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(StreamEvent) + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> EventSink for CallbackSink<F>
where
    F: FnMut(StreamEvent) + Send,
{
    async fn deliver(&mut self, event: StreamEvent) -> bool {
        (self.callback)(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (mut tx, mut rx) = mpsc::channel(4);
        assert!(tx.deliver(StreamEvent::new("progress", json!({}))).await);
        assert_eq!(rx.recv().await.unwrap().kind, "progress");
    }

    #[tokio::test]
    async fn test_channel_sink_reports_closed_receiver() {
        let (mut tx, rx) = mpsc::channel(4);
        drop(rx);
        assert!(!tx.deliver(StreamEvent::new("progress", json!({}))).await);
    }

    #[tokio::test]
    async fn test_callback_sink_invokes_callback() {
        let mut seen = Vec::new();
        {
            let mut sink = CallbackSink::new(|event: StreamEvent| seen.push(event.kind));
            assert!(sink.deliver(StreamEvent::new("status", json!({}))).await);
            assert!(sink.deliver(StreamEvent::new("done", json!({}))).await);
        }
        assert_eq!(seen, vec!["status", "done"]);
    }
}
