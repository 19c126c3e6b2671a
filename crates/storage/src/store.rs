//! The tile store abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use tile_common::TileCoord;

use crate::StoreResult;

/// Key → optional stored tile image.
///
/// Stored tiles are never invalidated: once `put` succeeds, `get` returns the
/// same bytes for the lifetime of the store. Implementations do no locking
/// across callers; concurrent writers of one key race and the last one wins.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Stored bytes for `coord`, or `None` when the tile was never stored.
    async fn get(&self, coord: &TileCoord) -> StoreResult<Option<Bytes>>;

    /// Persist `data` verbatim under `coord`.
    async fn put(&self, coord: &TileCoord, data: &[u8]) -> StoreResult<()>;

    /// Whether `coord` is stored, without reading it.
    async fn contains(&self, coord: &TileCoord) -> StoreResult<bool>;

    /// Human-readable location of a tile, for log messages.
    fn describe(&self, coord: &TileCoord) -> String {
        coord.cache_key()
    }
}
