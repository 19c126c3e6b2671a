//! In-memory tile store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use tile_common::TileCoord;

use crate::{StoreResult, TileStore};

/// Access counters for a [`MemoryTileStore`].
///
/// All fields are atomic so tests can read them while the store is shared.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// `get` calls that found the tile
    pub hits: AtomicU64,
    /// `get` calls that did not
    pub misses: AtomicU64,
    /// Successful `put` calls
    pub writes: AtomicU64,
}

impl StoreStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

/// Tile store holding everything in a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTileStore {
    tiles: Arc<RwLock<HashMap<TileCoord, Bytes>>>,
    stats: Arc<StoreStats>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with tiles.
    pub fn with_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (TileCoord, Bytes)>,
    {
        Self {
            tiles: Arc::new(RwLock::new(tiles.into_iter().collect())),
            stats: Arc::default(),
        }
    }

    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    pub async fn len(&self) -> usize {
        self.tiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tiles.read().await.is_empty()
    }
}

#[async_trait]
impl TileStore for MemoryTileStore {
    async fn get(&self, coord: &TileCoord) -> StoreResult<Option<Bytes>> {
        let tile = self.tiles.read().await.get(coord).cloned();
        let counter = if tile.is_some() {
            &self.stats.hits
        } else {
            &self.stats.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(tile)
    }

    async fn put(&self, coord: &TileCoord, data: &[u8]) -> StoreResult<()> {
        self.tiles
            .write()
            .await
            .insert(*coord, Bytes::copy_from_slice(data));
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn contains(&self, coord: &TileCoord) -> StoreResult<bool> {
        Ok(self.tiles.read().await.contains_key(coord))
    }

    fn describe(&self, coord: &TileCoord) -> String {
        format!("memory:{}", coord.cache_key())
    }
}
