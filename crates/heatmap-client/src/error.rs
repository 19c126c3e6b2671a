//! Error types for the heatmap API client.

use thiserror::Error;

/// Errors returned by [`HeatmapClient`](crate::HeatmapClient).
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// A required environment variable is not set.
    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(&'static str),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token endpoint refused the credentials or answered nonsense.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response from the API.
    #[error("{url} returned HTTP {status}")]
    Http { status: u16, url: String },

    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not the expected JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// More tile ids than one request accepts.
    #[error("{count} tiles requested, at most {max} per request")]
    TooManyTiles { count: usize, max: usize },
}

/// Result type for heatmap API operations.
pub type HeatmapResult<T> = std::result::Result<T, HeatmapError>;
