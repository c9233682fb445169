//! Stream subscription: the read loop tying decoder, assembler and consumer
//! together.
//!
//! One subscription owns one response body. Exactly one read is outstanding
//! at a time and every chunk is fully decoded and delivered before the next
//! read is issued. The loop ends in exactly one [`StreamOutcome`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::StreamError;
use crate::sse::decoder::LineDecoder;
use crate::sse::events::StreamEvent;
use crate::sse::parser::EventAssembler;
use crate::traits::EventSink;

/// Message reported when an `error` event carries no `message` field
const DEFAULT_REMOTE_ERROR: &str = "Operation failed";

/// Cloneable cancellation signal shared between a consumer and its
/// subscription loop.
///
/// Cancelling is synchronous and idempotent, so it is safe to call from
/// inside an event callback.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a subscription failed
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFailure {
    /// The server delivered an `error` event
    Remote { message: String, event: StreamEvent },
    /// Reading the body failed mid-stream
    Transport(String),
}

/// Terminal state of a subscription. Reached exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// A `done` event was delivered
    Completed(StreamEvent),
    /// An `error` event was delivered, or the transport failed
    Failed(StreamFailure),
    /// The body ended cleanly but no `done`/`error` event was ever seen
    UnexpectedEof { last_event: Option<StreamEvent> },
    /// The consumer withdrew interest
    Cancelled,
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamOutcome::Cancelled)
    }

    /// Short name for logging
    pub fn label(&self) -> &'static str {
        match self {
            StreamOutcome::Completed(_) => "completed",
            StreamOutcome::Failed(StreamFailure::Remote { .. }) => "failed(remote)",
            StreamOutcome::Failed(StreamFailure::Transport(_)) => "failed(transport)",
            StreamOutcome::UnexpectedEof { .. } => "unexpected_eof",
            StreamOutcome::Cancelled => "cancelled",
        }
    }

    /// Collapse into a `Result` for call sites.
    ///
    /// - `Completed` gives `Ok(Some(done_event))`
    /// - `Cancelled` gives `Ok(None)`
    /// - everything else is a [`StreamError`]
    pub fn into_result(self) -> Result<Option<StreamEvent>, StreamError> {
        match self {
            StreamOutcome::Completed(event) => Ok(Some(event)),
            StreamOutcome::Cancelled => Ok(None),
            StreamOutcome::Failed(StreamFailure::Remote { message, .. }) => {
                Err(StreamError::Remote { message })
            }
            StreamOutcome::Failed(StreamFailure::Transport(message)) => {
                Err(StreamError::Transport { message })
            }
            StreamOutcome::UnexpectedEof { last_event } => Err(StreamError::UnexpectedEof {
                last_event_kind: last_event.map(|e| e.kind),
            }),
        }
    }
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOutcome::Completed(event) => match event.message() {
                Some(msg) => write!(f, "completed: {}", msg),
                None => write!(f, "completed"),
            },
            StreamOutcome::Failed(StreamFailure::Remote { message, .. }) => {
                write!(f, "failed: {}", message)
            }
            StreamOutcome::Failed(StreamFailure::Transport(message)) => {
                write!(f, "transport failed: {}", message)
            }
            StreamOutcome::UnexpectedEof { .. } => write!(f, "stream ended unexpectedly"),
            StreamOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Counters collected while a subscription ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionStats {
    pub chunks_read: u64,
    pub bytes_read: u64,
    pub events_delivered: u64,
    /// Well-framed records dropped because their payload was not JSON
    pub malformed_records: u64,
}

/// Outcome plus counters, returned when a subscription ends
#[derive(Debug, Clone, PartialEq)]
pub struct StreamReport {
    pub outcome: StreamOutcome,
    pub stats: SubscriptionStats,
}

/// Outcome of delivering one event
enum Delivery {
    Continue(StreamEvent),
    Finished(StreamOutcome),
}

/// Run a subscription to its terminal state.
///
/// Reads `chunks` one at a time, decodes them into lines, assembles lines
/// into events and hands every event to `sink` in wire order. Returns when
/// a `done`/`error` event was delivered, the body ended, a read failed, or
/// `cancel` fired. After a terminal event no further chunks are read.
pub async fn drive<S, E, K>(chunks: S, cancel: &CancelHandle, mut sink: K) -> StreamReport
where
    S: Stream<Item = Result<Bytes, E>>,
    E: fmt::Display,
    K: EventSink,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut decoder = LineDecoder::new();
    let mut assembler = EventAssembler::new();
    let mut stats = SubscriptionStats::default();
    let mut last_event: Option<StreamEvent> = None;

    let outcome = 'read: loop {
        if cancel.is_cancelled() {
            break 'read StreamOutcome::Cancelled;
        }

        // An in-flight read is dropped (its result discarded) on cancel
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            next = chunks.next() => Some(next),
        };
        let Some(next) = next else {
            break 'read StreamOutcome::Cancelled;
        };

        let (lines, at_eof) = match next {
            Some(Ok(chunk)) => {
                stats.chunks_read += 1;
                stats.bytes_read += chunk.len() as u64;
                debug!("Read chunk of {} bytes", chunk.len());
                (decoder.feed(&chunk), false)
            }
            Some(Err(e)) => {
                warn!("Stream read failed: {}", e);
                break 'read StreamOutcome::Failed(StreamFailure::Transport(e.to_string()));
            }
            None => (decoder.flush().into_iter().collect::<Vec<_>>(), true),
        };

        for line in lines {
            let event = match assembler.feed_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    stats.malformed_records += 1;
                    warn!("Dropping malformed record: {}", e);
                    continue;
                }
            };

            match deliver(event, cancel, &mut sink, &mut stats).await {
                Delivery::Continue(event) => last_event = Some(event),
                Delivery::Finished(outcome) => break 'read outcome,
            }
        }

        if at_eof {
            if assembler.has_partial_record() {
                debug!("Discarding unterminated record at end of stream");
            }
            warn!(
                "Stream ended without a terminal event (last event: {:?})",
                last_event.as_ref().map(|e| e.kind.as_str())
            );
            break 'read StreamOutcome::UnexpectedEof { last_event };
        }
    };

    info!(
        "Subscription finished: {} ({} events, {} malformed, {} bytes)",
        outcome.label(),
        stats.events_delivered,
        stats.malformed_records,
        stats.bytes_read
    );

    StreamReport { outcome, stats }
}

/// Hand one event to the sink unless cancellation was observed first.
async fn deliver<K: EventSink>(
    event: StreamEvent,
    cancel: &CancelHandle,
    sink: &mut K,
    stats: &mut SubscriptionStats,
) -> Delivery {
    if cancel.is_cancelled() {
        return Delivery::Finished(StreamOutcome::Cancelled);
    }

    debug!("Delivering '{}' event", event.kind);

    let accepted = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        accepted = sink.deliver(event.clone()) => Some(accepted),
    };

    match accepted {
        None => return Delivery::Finished(StreamOutcome::Cancelled),
        Some(false) => {
            debug!("Event consumer went away, treating as cancellation");
            return Delivery::Finished(StreamOutcome::Cancelled);
        }
        Some(true) => stats.events_delivered += 1,
    }

    if event.is_done() {
        Delivery::Finished(StreamOutcome::Completed(event))
    } else if event.is_error() {
        let message = event
            .message()
            .unwrap_or(DEFAULT_REMOTE_ERROR)
            .to_string();
        Delivery::Finished(StreamOutcome::Failed(StreamFailure::Remote { message, event }))
    } else {
        Delivery::Continue(event)
    }
}

/// Handle to a subscription running on its own tokio task.
///
/// Events arrive through [`recv`](Self::recv); the bounded channel gives
/// consumer-side back-pressure, since the loop does not read the next chunk
/// while the channel is full. Dropping the handle cancels the subscription.
pub struct Subscription {
    events: mpsc::Receiver<StreamEvent>,
    cancel: CancelHandle,
    task: Option<JoinHandle<StreamReport>>,
}

impl Subscription {
    /// Spawn the read loop for `chunks` on the current tokio runtime.
    ///
    /// `buffer` is the event channel capacity (at least 1).
    pub fn spawn<S, E>(chunks: S, buffer: usize) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let (tx, events) = mpsc::channel(buffer.max(1));
        let cancel = CancelHandle::new();
        let loop_cancel = cancel.clone();

        let task = tokio::spawn(async move { drive(chunks, &loop_cancel, tx).await });

        Self {
            events,
            cancel,
            task: Some(task),
        }
    }

    /// Receive the next event, or `None` once the subscription has ended.
    ///
    /// After [`cancel`](Self::cancel) this always returns `None`, even for
    /// events already sitting in the channel.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        if self.cancel.is_cancelled() {
            self.discard_buffered();
            return None;
        }

        let event = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = self.events.recv() => event,
        };

        if self.cancel.is_cancelled() {
            self.discard_buffered();
            return None;
        }
        event
    }

    /// Close the channel so the loop's next send fails, and drop what is queued
    fn discard_buffered(&mut self) {
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }

    /// Stop reading and delivering. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A cloneable handle that cancels this subscription
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the terminal state.
    ///
    /// Events not yet received are discarded.
    pub async fn finish(mut self) -> StreamReport {
        let Some(task) = self.task.take() else {
            return StreamReport {
                outcome: StreamOutcome::Cancelled,
                stats: SubscriptionStats::default(),
            };
        };

        // Keep draining so a full channel cannot stall the loop
        while self.events.recv().await.is_some() {}

        match task.await {
            Ok(report) => report,
            Err(e) => {
                warn!("Subscription task ended abnormally: {}", e);
                let outcome = if e.is_cancelled() {
                    StreamOutcome::Cancelled
                } else {
                    StreamOutcome::Failed(StreamFailure::Transport(format!(
                        "subscription task panicked: {}",
                        e
                    )))
                };
                StreamReport {
                    outcome,
                    stats: SubscriptionStats::default(),
                }
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("running", &self.task.is_some())
            .finish()
    }
}
