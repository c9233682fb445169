//! songstudio - client for a music studio's long-running operations
//!
//! Model downloads and song generations report progress as an event stream.
//! The [`sse`] module turns the raw response bytes into typed events and
//! a terminal outcome; [`client`] issues the requests.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod traits;

pub use client::StudioClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, StreamError};
pub use sse::{CancelHandle, StreamEvent, StreamOutcome, StreamReport, Subscription};
