//! Command-line argument parsing for the songstudio CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

use crate::models::StemType;

/// Where the lyrics for a generation come from
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsSource {
    Inline(String),
    File(PathBuf),
}

/// Arguments of the `generate` command
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    pub lyrics: LyricsSource,
    pub description: String,
    pub title: Option<String>,
    pub stem_type: StemType,
    pub auto_style: Option<String>,
    pub reference: Option<PathBuf>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Check the studio API is reachable
    Health,
    /// Download a model with streamed progress
    Download { model: String },
    /// Generate a song with streamed progress
    Generate(GenerateArgs),
}

pub const USAGE: &str = "\
Usage:
  songstudio download <model>
  songstudio generate (--lyrics <text> | --lyrics-file <path>) --description <text>
                      [--title <text>] [--stem-type full|vocal|bgm|separate]
                      [--auto-style <name>] [--reference <audio file>]
  songstudio health
  songstudio --version

Environment:
  SONGSTUDIO_API_URL               API root (default http://localhost:8000/api)
  SONGSTUDIO_CONNECT_TIMEOUT_SECS  connect timeout in seconds (default 10)
  RUST_LOG                         log filter (default songstudio=info)";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use songstudio::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["songstudio".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);

    let Some(first) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match first.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "health" => Ok(CliCommand::Health),
        "download" => {
            let model = args
                .next()
                .ok_or_else(|| "download: missing <model>".to_string())?;
            if let Some(extra) = args.next() {
                return Err(format!("download: unexpected argument '{}'", extra));
            }
            Ok(CliCommand::Download { model })
        }
        "generate" => parse_generate(args).map(CliCommand::Generate),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn parse_generate<I>(mut args: I) -> Result<GenerateArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut lyrics = None;
    let mut description = None;
    let mut title = None;
    let mut stem_type = StemType::default();
    let mut auto_style = None;
    let mut reference = None;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("generate: {} needs a value", flag))
        };
        match flag.as_str() {
            "--lyrics" => lyrics = Some(LyricsSource::Inline(value()?)),
            "--lyrics-file" => lyrics = Some(LyricsSource::File(PathBuf::from(value()?))),
            "--description" => description = Some(value()?),
            "--title" => title = Some(value()?),
            "--stem-type" => stem_type = value()?.parse()?,
            "--auto-style" => auto_style = Some(value()?),
            "--reference" => reference = Some(PathBuf::from(value()?)),
            _ => return Err(format!("generate: unknown option '{}'", flag)),
        }
    }

    Ok(GenerateArgs {
        lyrics: lyrics.ok_or("generate: --lyrics or --lyrics-file is required")?,
        description: description.ok_or("generate: --description is required")?,
        title,
        stem_type,
        auto_style,
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, String> {
        let mut all = vec!["songstudio".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_no_args_shows_help() {
        assert_eq!(parse(&[]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_health() {
        assert_eq!(parse(&["health"]), Ok(CliCommand::Health));
    }

    #[test]
    fn test_parse_download() {
        assert_eq!(
            parse(&["download", "SongGeneration-base"]),
            Ok(CliCommand::Download {
                model: "SongGeneration-base".to_string()
            })
        );
        assert!(parse(&["download"]).is_err());
        assert!(parse(&["download", "a", "b"]).is_err());
    }

    #[test]
    fn test_parse_generate_full() {
        let command = parse(&[
            "generate",
            "--lyrics",
            "[verse] hello",
            "--description",
            "lofi",
            "--title",
            "Hello",
            "--stem-type",
            "separate",
            "--reference",
            "ref.wav",
        ])
        .unwrap();

        assert_eq!(
            command,
            CliCommand::Generate(GenerateArgs {
                lyrics: LyricsSource::Inline("[verse] hello".to_string()),
                description: "lofi".to_string(),
                title: Some("Hello".to_string()),
                stem_type: StemType::Separate,
                auto_style: None,
                reference: Some(PathBuf::from("ref.wav")),
            })
        );
    }

    #[test]
    fn test_parse_generate_requires_lyrics_and_description() {
        assert!(parse(&["generate", "--description", "lofi"]).is_err());
        assert!(parse(&["generate", "--lyrics", "x"]).is_err());
    }

    #[test]
    fn test_parse_generate_rejects_bad_values() {
        let err = parse(&[
            "generate",
            "--lyrics",
            "x",
            "--description",
            "y",
            "--stem-type",
            "drums",
        ])
        .unwrap_err();
        assert!(err.contains("drums"));

        assert!(parse(&["generate", "--title"]).is_err());
        assert!(parse(&["generate", "--bogus", "1"]).is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(parse(&["play"]).is_err());
    }
}
