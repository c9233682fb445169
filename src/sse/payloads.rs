//! Payload schemas for the studio's event streams
//!
//! Every field is optional or defaulted: the server adds fields over time
//! and call sites only read what they need. Use them through
//! [`StreamEvent::payload_as`](crate::sse::StreamEvent::payload_as).

use serde::Deserialize;

/// Body of `progress` and `status` events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressPayload {
    #[serde(default)]
    pub message: Option<String>,
    /// Generation job identifier (generation stream only)
    #[serde(default)]
    pub job_id: Option<String>,
    /// Download stage, e.g. "runtime" or "model"
    #[serde(default)]
    pub stage: Option<String>,
    /// Generation stage, e.g. "preparing", "generating", "converting"
    #[serde(default)]
    pub status: Option<String>,
    /// Fractional progress when the server knows it
    #[serde(default)]
    pub progress: Option<f64>,
}

/// Body of `error` events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Body of the `done` event closing a model download
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DownloadDone {
    #[serde(default)]
    pub message: Option<String>,
    /// Name of the model that is now installed and selected
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of the `done` event closing a song generation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerationDone {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Library identifier of the produced song
    #[serde(default)]
    pub song_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::StreamEvent;
    use serde_json::json;

    #[test]
    fn test_generation_done_payload() {
        let event = StreamEvent::new(
            "done",
            json!({
                "job_id": "1a2b3c4d",
                "status": "done",
                "message": "Generation complete!",
                "song_id": "song_20240101_120000_1a2b3c4d"
            }),
        );
        let done: GenerationDone = event.payload_as().unwrap();
        assert_eq!(done.song_id.as_deref(), Some("song_20240101_120000_1a2b3c4d"));
        assert_eq!(done.job_id.as_deref(), Some("1a2b3c4d"));
    }

    #[test]
    fn test_download_done_payload() {
        let event = StreamEvent::new(
            "done",
            json!({"message": "SongGeneration-base downloaded successfully", "model": "SongGeneration-base"}),
        );
        let done: DownloadDone = event.payload_as().unwrap();
        assert_eq!(done.model.as_deref(), Some("SongGeneration-base"));
    }

    #[test]
    fn test_progress_payload_tolerates_extra_fields() {
        let event = StreamEvent::new(
            "status",
            json!({"message": "Downloading runtime files...", "stage": "runtime", "eta": 12}),
        );
        let progress: ProgressPayload = event.payload_as().unwrap();
        assert_eq!(progress.stage.as_deref(), Some("runtime"));
        assert_eq!(progress.progress, None);
    }

    #[test]
    fn test_error_payload_without_message() {
        let event = StreamEvent::new("error", json!({}));
        let err: ErrorPayload = event.payload_as().unwrap();
        assert_eq!(err, ErrorPayload::default());
    }
}
