//! Cached-or-download tile fetching.

use tracing::{debug, instrument, warn};

use storage::{DiskTileStore, TileStore};
use tile_common::TileCoord;

use crate::{BasemapResult, HttpTileSource, TileServerConfig, TileSource, TileStatus};

/// Fetches tiles into a [`TileStore`], downloading only what is missing.
///
/// Calls must be sequential for any given key: two concurrent fetches of the
/// same missing tile both download it and the last write wins.
pub struct TileFetcher<S, R = HttpTileSource> {
    store: S,
    source: R,
}

impl TileFetcher<DiskTileStore, HttpTileSource> {
    /// Disk cache plus HTTP tile server, both taken from `config`.
    pub fn from_config(config: &TileServerConfig) -> BasemapResult<Self> {
        let store = DiskTileStore::new(&config.cache_dir);
        let source = HttpTileSource::new(config.clone())?;
        Ok(Self::new(store, source))
    }
}

impl<S: TileStore, R: TileSource> TileFetcher<S, R> {
    pub fn new(store: S, source: R) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Make sure a tile is stored.
    ///
    /// - Already stored: `Cached`, no network access.
    /// - Downloaded now: body persisted verbatim, `Fresh`.
    /// - Remote failure: logged, nothing written, `Failed`.
    ///
    /// Only storage failures are returned as errors.
    #[instrument(skip(self, coord), fields(tile = %coord))]
    pub async fn fetch_tile(&self, coord: &TileCoord) -> BasemapResult<TileStatus> {
        if self.store.contains(coord).await? {
            debug!(location = %self.store.describe(coord), "Using cached tile");
            return Ok(record(TileStatus::Cached));
        }

        match self.source.download(coord).await {
            Ok(body) => {
                self.store.put(coord, &body).await?;
                debug!(bytes = body.len(), "Downloaded tile");
                Ok(record(TileStatus::Fresh))
            }
            Err(e) => {
                warn!(
                    url = %e.url(),
                    status = ?e.status(),
                    error = %e,
                    "Could not get tile"
                );
                Ok(record(TileStatus::Failed))
            }
        }
    }
}

fn record(status: TileStatus) -> TileStatus {
    metrics::counter!("basemap_tiles_total", "status" => status.as_str()).increment(1);
    status
}
