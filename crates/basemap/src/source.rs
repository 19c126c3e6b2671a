//! Remote tile sources.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::trace;

use tile_common::TileCoord;

use crate::{BasemapError, BasemapResult, TileServerConfig};

/// Why a remote tile could not be obtained.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl SourceError {
    pub fn url(&self) -> &str {
        match self {
            SourceError::Status { url, .. } | SourceError::Transport { url, .. } => url,
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            SourceError::Transport { .. } => None,
        }
    }
}

/// Where tile images come from.
///
/// The fetcher only talks to this trait, so tests can count or fail
/// requests without a network.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// URL (or other locator) of a tile, for logging.
    fn tile_url(&self, coord: &TileCoord) -> String;

    /// Download one tile. Exactly one attempt, no retry.
    async fn download(&self, coord: &TileCoord) -> Result<Bytes, SourceError>;
}

/// Tile source backed by an HTTP tile server.
#[derive(Debug, Clone)]
pub struct HttpTileSource {
    client: Client,
    config: TileServerConfig,
}

impl HttpTileSource {
    pub fn new(config: TileServerConfig) -> BasemapResult<Self> {
        config.validate().map_err(BasemapError::Config)?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(BasemapError::HttpClient)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TileServerConfig {
        &self.config
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    fn tile_url(&self, coord: &TileCoord) -> String {
        self.config.tile_url(coord)
    }

    async fn download(&self, coord: &TileCoord) -> Result<Bytes, SourceError> {
        let url = self.tile_url(coord);
        trace!(url = %url, "Requesting tile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| SourceError::Transport {
            url,
            message: e.to_string(),
        })
    }
}
