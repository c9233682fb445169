//! Request types for the studio's long-running operations.

mod request;

pub use request::{GenerationRequest, ModelDownloadRequest, ReferenceAudio, StemType};
