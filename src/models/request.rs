use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ClientError;

/// Which stems the generator should render
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StemType {
    /// Mixed song (vocals and accompaniment)
    #[default]
    Full,
    /// Vocals only
    Vocal,
    /// Background music only
    Bgm,
    /// Vocals and background music as separate files
    Separate,
}

impl StemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StemType::Full => "full",
            StemType::Vocal => "vocal",
            StemType::Bgm => "bgm",
            StemType::Separate => "separate",
        }
    }
}

impl fmt::Display for StemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(StemType::Full),
            "vocal" => Ok(StemType::Vocal),
            "bgm" => Ok(StemType::Bgm),
            "separate" => Ok(StemType::Separate),
            other => Err(format!(
                "unknown stem type '{}' (expected full, vocal, bgm or separate)",
                other
            )),
        }
    }
}

/// Body of a model download request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDownloadRequest {
    pub model: String,
}

impl ModelDownloadRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

/// Reference audio clip uploaded alongside a generation request
#[derive(Clone, PartialEq)]
pub struct ReferenceAudio {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ReferenceAudio {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a reference clip from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reference_audio".to_string());
        Ok(Self { file_name, bytes })
    }
}

impl fmt::Debug for ReferenceAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceAudio")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Parameters of a song generation, sent as a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Formatted lyrics with section markers
    pub lyrics: String,
    /// Style description
    pub description: String,
    pub stem_type: StemType,
    pub title: Option<String>,
    /// Named style preset, an alternative to reference audio
    pub auto_style: Option<String>,
    pub reference_audio: Option<ReferenceAudio>,
}

impl GenerationRequest {
    pub fn new(lyrics: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
            description: description.into(),
            stem_type: StemType::default(),
            title: None,
            auto_style: None,
            reference_audio: None,
        }
    }

    pub fn with_stem_type(mut self, stem_type: StemType) -> Self {
        self.stem_type = stem_type;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_auto_style(mut self, style: impl Into<String>) -> Self {
        self.auto_style = Some(style.into());
        self
    }

    pub fn with_reference_audio(mut self, audio: ReferenceAudio) -> Self {
        self.reference_audio = Some(audio);
        self
    }

    /// Text fields of the form, in the order they are sent.
    ///
    /// Empty optional values are left out, as the server treats them as unset.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("lyrics", self.lyrics.clone()),
            ("description", self.description.clone()),
            ("stem_type", self.stem_type.as_str().to_string()),
        ];
        if let Some(title) = self.title.as_ref().filter(|t| !t.is_empty()) {
            fields.push(("title", title.clone()));
        }
        if let Some(style) = self.auto_style.as_ref().filter(|s| !s.is_empty()) {
            fields.push(("auto_style", style.clone()));
        }
        fields
    }
}
