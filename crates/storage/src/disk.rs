//! On-disk tile store.
//!
//! Layout: one file per tile, `{root}/{z}-{x}-{y}.png`. The root directory is
//! created on the first write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use tile_common::TileCoord;

use crate::{StoreError, StoreResult, TileStore};

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "maps";

/// Tile store backed by a directory of image files.
#[derive(Debug, Clone)]
pub struct DiskTileStore {
    root: PathBuf,
}

impl DiskTileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a tile.
    pub fn path_for(&self, coord: &TileCoord) -> PathBuf {
        self.root
            .join(format!("{}-{}-{}.png", coord.z, coord.x, coord.y))
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))
    }
}

impl Default for DiskTileStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

#[async_trait]
impl TileStore for DiskTileStore {
    async fn get(&self, coord: &TileCoord) -> StoreResult<Option<Bytes>> {
        let path = self.path_for(coord);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn put(&self, coord: &TileCoord, data: &[u8]) -> StoreResult<()> {
        self.ensure_dir().await?;
        let path = self.path_for(coord);
        fs::write(&path, data)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        debug!(path = %path.display(), bytes = data.len(), "Stored tile");
        Ok(())
    }

    async fn contains(&self, coord: &TileCoord) -> StoreResult<bool> {
        let path = self.path_for(coord);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn describe(&self, coord: &TileCoord) -> String {
        self.path_for(coord).display().to_string()
    }
}
