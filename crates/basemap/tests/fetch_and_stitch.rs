//! Fetcher and stitcher behaviour against in-process tile sources.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use basemap::{
    build_map, build_map_for_table, BasemapError, SourceError, TileFetcher, TileSource, TileStatus,
};
use storage::{DiskTileStore, MemoryTileStore, TileStore};
use test_utils::{bbox, count_files, sample_table, solid_png, temp_cache_dir, tile_color, TILE_PX};
use tile_common::{TileCoord, TileRange};

/// Serves a solid tile per coordinate and counts requests. Tiles listed in
/// `failing` answer 404, tiles in `small` come back at half size.
#[derive(Default)]
struct MockSource {
    requests: AtomicUsize,
    failing: HashSet<TileCoord>,
    small: HashSet<TileCoord>,
}

impl MockSource {
    fn failing(coords: impl IntoIterator<Item = TileCoord>) -> Self {
        Self {
            failing: coords.into_iter().collect(),
            ..Default::default()
        }
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TileSource for MockSource {
    fn tile_url(&self, coord: &TileCoord) -> String {
        format!("mock://{}", coord)
    }

    async fn download(&self, coord: &TileCoord) -> Result<Bytes, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(coord) {
            return Err(SourceError::Status {
                url: self.tile_url(coord),
                status: 404,
            });
        }
        let size = if self.small.contains(coord) {
            TILE_PX / 2
        } else {
            TILE_PX
        };
        Ok(Bytes::from(solid_png(size, size, tile_color(coord.x, coord.y))))
    }
}

#[tokio::test]
async fn test_fetch_twice_downloads_once() {
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::default());
    let coord = TileCoord::new(13, 4290, 2868);

    assert_eq!(fetcher.fetch_tile(&coord).await.unwrap(), TileStatus::Fresh);
    assert_eq!(fetcher.fetch_tile(&coord).await.unwrap(), TileStatus::Cached);
    assert_eq!(fetcher.source().requests(), 1);
    assert_eq!(fetcher.store().stats().writes(), 1);
}

#[tokio::test]
async fn test_failed_fetch_writes_nothing() {
    let coord = TileCoord::new(13, 4290, 2868);
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::failing([coord]));

    assert_eq!(fetcher.fetch_tile(&coord).await.unwrap(), TileStatus::Failed);
    assert!(fetcher.store().is_empty().await);

    // A failure is not remembered: the next call tries again.
    assert_eq!(fetcher.fetch_tile(&coord).await.unwrap(), TileStatus::Failed);
    assert_eq!(fetcher.source().requests(), 2);
}

#[tokio::test]
async fn test_disk_fetch_persists_verbatim() {
    let dir = temp_cache_dir();
    let store = DiskTileStore::new(dir.path().join("maps"));
    let fetcher = TileFetcher::new(store, MockSource::default());
    let coord = TileCoord::new(10, 536, 358);

    fetcher.fetch_tile(&coord).await.unwrap();

    let on_disk = std::fs::read(dir.path().join("maps").join("10-536-358.png")).unwrap();
    assert_eq!(on_disk, solid_png(TILE_PX, TILE_PX, tile_color(536, 358)));
}

#[tokio::test]
async fn test_store_failure_is_an_error() {
    // A regular file where the cache directory should be
    let dir = temp_cache_dir();
    let blocker = dir.path().join("maps");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let fetcher = TileFetcher::new(DiskTileStore::new(&blocker), MockSource::default());

    let err = fetcher
        .fetch_tile(&TileCoord::new(10, 536, 358))
        .await
        .unwrap_err();
    assert!(matches!(err, BasemapError::Store(_)), "{err}");

    let err = build_map(&fetcher, &bbox::ZURICH_SMALL, 10).await.unwrap_err();
    assert!(matches!(err, BasemapError::Store(_)), "{err}");
}

#[tokio::test]
async fn test_build_map_grid_and_cache() {
    let dir = temp_cache_dir();
    let fetcher = TileFetcher::new(DiskTileStore::new(dir.path()), MockSource::default());

    let map = build_map(&fetcher, &bbox::ZURICH, 13).await.unwrap();
    let range = TileRange::covering(&bbox::ZURICH, 13).unwrap();

    assert_eq!(map.range, range);
    assert_eq!(map.grid.cols, range.x_max - range.x_min + 1);
    assert_eq!(map.grid.rows, range.y_max - range.y_min + 1);
    assert_eq!(map.image.width(), map.grid.cols * TILE_PX);
    assert_eq!(map.image.height(), map.grid.rows * TILE_PX);
    assert_eq!(map.tile_size(), (TILE_PX, TILE_PX));

    let tiles = map.grid.tile_count();
    assert_eq!(fetcher.source().requests(), tiles);
    assert_eq!(count_files(dir.path()), tiles);
    assert_eq!(map.statuses.counts().fresh, tiles);
    assert!(map.bbox.contains(&bbox::ZURICH));

    // Second build is served from disk.
    let again = build_map(&fetcher, &bbox::ZURICH, 13).await.unwrap();
    assert_eq!(fetcher.source().requests(), tiles);
    assert_eq!(again.statuses.counts().cached, tiles);
    assert_eq!(again.image, map.image);
}

#[tokio::test]
async fn test_build_map_places_tiles() {
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::default());
    let map = build_map(&fetcher, &bbox::ZURICH, 13).await.unwrap();

    for coord in map.range.tiles() {
        let col = coord.x - map.range.x_min;
        let row = coord.y - map.range.y_min;
        let px = map.image.get_pixel(col * TILE_PX + 10, row * TILE_PX + 10);
        assert_eq!(px.0, tile_color(coord.x, coord.y), "tile {coord}");
    }
}

#[tokio::test]
async fn test_build_map_missing_tile_is_fatal() {
    let range = TileRange::covering(&bbox::ZURICH, 13).unwrap();
    let broken = TileCoord::new(13, range.x_min, range.y_max);
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::failing([broken]));

    let err = build_map(&fetcher, &bbox::ZURICH, 13).await.unwrap_err();
    match err {
        BasemapError::MissingTile { coord, .. } => assert_eq!(coord, broken),
        other => panic!("expected MissingTile, got {other:?}"),
    }
    // Every other tile was still fetched and kept.
    assert_eq!(fetcher.store().len().await, range.tile_count() - 1);
}

#[tokio::test]
async fn test_build_map_size_mismatch() {
    let range = TileRange::covering(&bbox::ZURICH, 13).unwrap();
    let odd = TileCoord::new(13, range.x_max, range.y_max);
    let source = MockSource {
        small: [odd].into_iter().collect(),
        ..Default::default()
    };
    let fetcher = TileFetcher::new(MemoryTileStore::new(), source);

    let err = build_map(&fetcher, &bbox::ZURICH, 13).await.unwrap_err();
    assert!(matches!(
        err,
        BasemapError::TileSizeMismatch { coord, actual: (128, 128), .. } if coord == odd
    ));
}

#[tokio::test]
async fn test_build_map_undecodable_tile() {
    let coord = TileCoord::from_degrees(47.375, 8.54, 10).unwrap();
    let store = MemoryTileStore::new();
    store.put(&coord, b"not a png").await.unwrap();
    let fetcher = TileFetcher::new(store, MockSource::default());

    let err = build_map(&fetcher, &bbox::ZURICH_SMALL, 10).await.unwrap_err();
    assert!(matches!(err, BasemapError::Decode { .. }));
    assert_eq!(fetcher.source().requests(), 0);
}

#[tokio::test]
async fn test_build_map_rejects_polar_box() {
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::default());
    let polar = tile_common::BoundingBox::new(0.0, 1.0, 86.0, 87.0);

    let err = build_map(&fetcher, &polar, 5).await.unwrap_err();
    assert!(matches!(err, BasemapError::Tile(_)));
    assert_eq!(fetcher.source().requests(), 0);
}

#[tokio::test]
async fn test_build_map_for_table() {
    let fetcher = TileFetcher::new(MemoryTileStore::new(), MockSource::default());
    let table = sample_table(3, 2);

    let map = build_map_for_table(&fetcher, &table, 14).await.unwrap();
    assert!(map.bbox.contains(&table.bounding_box().unwrap()));

    let empty = tile_common::TileTable::new();
    assert!(build_map_for_table(&fetcher, &empty, 14).await.is_err());
}
