//! CLI module for songstudio.
//!
//! This module provides the two long-running call sites (model download and
//! song generation) as terminal commands, plus a health check.
//!
//! # Usage
//!
//! ```ignore
//! use songstudio::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! let code = run_cli_command(command).await?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, GenerateArgs, LyricsSource, USAGE};
pub use version::{version_string, VERSION};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use crate::client::StudioClient;
use crate::models::{GenerationRequest, ReferenceAudio};
use crate::sse::{StreamOutcome, StreamReport, Subscription};

/// Exit code for a completed operation
pub const EXIT_OK: i32 = 0;
/// Exit code for a failed operation or a dropped stream
pub const EXIT_FAILED: i32 = 1;
/// Exit code when the user interrupted the operation
pub const EXIT_CANCELLED: i32 = 130;

/// Run a parsed command, returning the process exit code.
pub async fn run_cli_command(command: CliCommand) -> Result<i32> {
    match command {
        CliCommand::Version => {
            println!("{}", version_string());
            Ok(EXIT_OK)
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(EXIT_OK)
        }
        CliCommand::Health => {
            let client = StudioClient::from_env()?;
            if client.health_check().await? {
                println!("{} is healthy", client.base_url());
                Ok(EXIT_OK)
            } else {
                println!("{} responded but is not healthy", client.base_url());
                Ok(EXIT_FAILED)
            }
        }
        CliCommand::Download { model } => {
            let client = StudioClient::from_env()?;
            let subscription = client.download_model(&model).await?;
            let report = follow_subscription(subscription).await;
            Ok(report_exit_code(&report, "model", &["model"]))
        }
        CliCommand::Generate(args) => {
            let client = StudioClient::from_env()?;
            let request = build_generation_request(args).await?;
            let subscription = client.generate_song(&request).await?;
            let report = follow_subscription(subscription).await;
            Ok(report_exit_code(&report, "song", &["song_id", "job_id"]))
        }
    }
}

/// Turn parsed `generate` arguments into a request, reading any files.
pub async fn build_generation_request(args: GenerateArgs) -> Result<GenerationRequest> {
    let lyrics = match args.lyrics {
        LyricsSource::Inline(text) => text,
        LyricsSource::File(path) => tokio::fs::read_to_string(&path)
            .await
            .wrap_err_with(|| format!("Failed to read lyrics from {}", path.display()))?,
    };

    let mut request = GenerationRequest::new(lyrics, args.description).with_stem_type(args.stem_type);
    if let Some(title) = args.title {
        request = request.with_title(title);
    }
    if let Some(style) = args.auto_style {
        request = request.with_auto_style(style);
    }
    if let Some(path) = args.reference {
        request = request.with_reference_audio(ReferenceAudio::from_path(path).await?);
    }
    Ok(request)
}

/// Print progress messages until the subscription ends.
///
/// Ctrl-C cancels the subscription instead of killing the process.
pub async fn follow_subscription(mut subscription: Subscription) -> StreamReport {
    loop {
        tokio::select! {
            event = subscription.recv() => match event {
                Some(event) => {
                    if let Some(message) = event.message() {
                        println!("[{}] {}", event.kind, message);
                    } else {
                        tracing::debug!("{} event without message", event.kind);
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Interrupted, cancelling...");
                subscription.cancel();
            }
        }
    }

    subscription.finish().await
}

/// Print the terminal outcome and map it to an exit code.
///
/// `fields` are the `done` payload fields worth echoing to the user.
pub fn report_exit_code(report: &StreamReport, what: &str, fields: &[&str]) -> i32 {
    match &report.outcome {
        StreamOutcome::Completed(event) => {
            for field in fields {
                if let Some(value) = event.str_field(field) {
                    println!("{}: {}", field, value);
                }
            }
            EXIT_OK
        }
        StreamOutcome::Cancelled => {
            eprintln!("Cancelled; the {} may still be processing on the server", what);
            EXIT_CANCELLED
        }
        other => {
            let message = other
                .clone()
                .into_result()
                .err()
                .map(|e| e.user_message())
                .unwrap_or_else(|| other.to_string());
            eprintln!("Error: {}", message);
            EXIT_FAILED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StemType;
    use crate::sse::{StreamEvent, StreamFailure, SubscriptionStats};
    use serde_json::json;

    fn report(outcome: StreamOutcome) -> StreamReport {
        StreamReport {
            outcome,
            stats: SubscriptionStats::default(),
        }
    }

    #[test]
    fn test_exit_codes() {
        let done = report(StreamOutcome::Completed(StreamEvent::new(
            "done",
            json!({"song_id": "abc"}),
        )));
        assert_eq!(report_exit_code(&done, "song", &["song_id"]), EXIT_OK);

        let failed = report(StreamOutcome::Failed(StreamFailure::Remote {
            message: "oom".to_string(),
            event: StreamEvent::new("error", json!({"message": "oom"})),
        }));
        assert_eq!(report_exit_code(&failed, "song", &[]), EXIT_FAILED);

        let eof = report(StreamOutcome::UnexpectedEof { last_event: None });
        assert_eq!(report_exit_code(&eof, "song", &[]), EXIT_FAILED);

        let cancelled = report(StreamOutcome::Cancelled);
        assert_eq!(report_exit_code(&cancelled, "model", &[]), EXIT_CANCELLED);
    }

    #[tokio::test]
    async fn test_build_generation_request_reads_lyrics_file() {
        let dir = tempfile::tempdir().unwrap();
        let lyrics_path = dir.path().join("lyrics.txt");
        std::fs::write(&lyrics_path, "[verse]\nline one\n").unwrap();

        let request = build_generation_request(GenerateArgs {
            lyrics: LyricsSource::File(lyrics_path),
            description: "ambient".to_string(),
            title: Some("Drift".to_string()),
            stem_type: StemType::Bgm,
            auto_style: None,
            reference: None,
        })
        .await
        .unwrap();

        assert_eq!(request.lyrics, "[verse]\nline one\n");
        assert_eq!(request.stem_type, StemType::Bgm);
        assert_eq!(request.title.as_deref(), Some("Drift"));
        assert!(request.reference_audio.is_none());
    }

    #[tokio::test]
    async fn test_build_generation_request_missing_reference() {
        let result = build_generation_request(GenerateArgs {
            lyrics: LyricsSource::Inline("x".to_string()),
            description: "y".to_string(),
            title: None,
            stem_type: StemType::Full,
            auto_style: None,
            reference: Some("/nonexistent/ref.wav".into()),
        })
        .await;
        assert!(result.is_err());
    }
}
