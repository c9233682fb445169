//! Studio API client for long-running operations.
//!
//! Model downloads and song generations both answer with an event stream.
//! Each call site only builds its request; the response body is handed to
//! the shared [`Subscription`] machinery through [`StudioClient::open_stream`].

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{GenerationRequest, ModelDownloadRequest};
use crate::sse::Subscription;

const EVENT_STREAM: &str = "text/event-stream";

/// Client for the studio backend API.
#[derive(Debug, Clone)]
pub struct StudioClient {
    config: ClientConfig,
    /// Reusable HTTP client
    client: Client,
}

impl StudioClient {
    /// Create a client for the given configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a client from `SONGSTUDIO_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create a client with a custom base URL and otherwise default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(ClientConfig::default().with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Download a model, streaming progress.
    ///
    /// Sends `POST /setup/download` with `{"model": ...}`. The stream ends
    /// with a `done` event carrying the installed `model`, or an `error`.
    pub async fn download_model(&self, model: &str) -> ClientResult<Subscription> {
        let url = self.config.endpoint("setup/download");
        info!("Starting download of model {}", model);

        let request = self
            .client
            .post(&url)
            .json(&ModelDownloadRequest::new(model));

        self.open_stream(request).await
    }

    /// Generate a song, streaming progress.
    ///
    /// Sends `POST /generate` as a multipart form. The stream ends with a
    /// `done` event carrying the new `song_id`, or an `error`.
    pub async fn generate_song(&self, request: &GenerationRequest) -> ClientResult<Subscription> {
        let url = self.config.endpoint("generate");
        info!(
            "Starting generation (stem_type={}, title={:?})",
            request.stem_type, request.title
        );

        let mut form = Form::new();
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }
        if let Some(audio) = &request.reference_audio {
            debug!(
                "Attaching reference audio {} ({} bytes)",
                audio.file_name,
                audio.bytes.len()
            );
            let part = Part::bytes(audio.bytes.clone()).file_name(audio.file_name.clone());
            form = form.part("reference_audio", part);
        }

        let builder = self.client.post(&url).multipart(form);
        self.open_stream(builder).await
    }

    /// Check if the studio API is reachable and healthy.
    ///
    /// # Returns
    /// `true` if the health endpoint returns 2xx, `false` for other statuses
    pub async fn health_check(&self) -> ClientResult<bool> {
        let url = self.config.endpoint("health");
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Send a prepared request and subscribe to its event stream.
    ///
    /// A non-success status is returned as [`ClientError::ServerError`]
    /// before any event is read.
    pub async fn open_stream(&self, request: RequestBuilder) -> ClientResult<Subscription> {
        let response = request.header(ACCEPT, EVENT_STREAM).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::ServerError { status, message });
        }

        debug!("Event stream opened from {}", response.url());
        Ok(Subscription::spawn(
            response.bytes_stream(),
            self.config.event_buffer,
        ))
    }
}
