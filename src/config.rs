//! Client configuration.
//!
//! Built with `with_*` setters on top of [`ClientConfig::default`], or read
//! from the environment with [`ClientConfig::from_env`].

use std::time::Duration;

use crate::error::ClientError;

/// Default API root of a locally running studio server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the API root
pub const ENV_API_URL: &str = "SONGSTUDIO_API_URL";

/// Environment variable overriding the connect timeout, in seconds
pub const ENV_CONNECT_TIMEOUT: &str = "SONGSTUDIO_CONNECT_TIMEOUT_SECS";

/// Configuration for [`StudioClient`](crate::client::StudioClient).
///
/// No read timeout is applied; downloads and generations run for minutes.
/// Wrap a subscription in `tokio::time::timeout` to bound it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api` (no trailing slash needed)
    pub base_url: String,
    /// Timeout for establishing the TCP/TLS connection
    pub connect_timeout: Duration,
    /// Capacity of the event channel between the read loop and the consumer
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            event_buffer: 32,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the event channel capacity.
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Create config from `SONGSTUDIO_API_URL` and
    /// `SONGSTUDIO_CONNECT_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// An unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_CONNECT_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_CONNECT_TIMEOUT, raw),
            }
        }

        config
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {}",
                url
            )));
        }
        if self.event_buffer == 0 {
            return Err(ClientError::InvalidConfig(
                "event buffer must hold at least one event".to_string(),
            ));
        }
        Ok(())
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
