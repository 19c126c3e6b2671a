//! Tile storage for dwell-maps.
//!
//! Provides a key → bytes cache abstraction keyed by tile coordinate:
//! - Disk store (one file per tile, trusted forever once written)
//! - In-memory store for tests and short-lived runs

pub mod disk;
pub mod error;
pub mod memory;
pub mod store;

pub use disk::DiskTileStore;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryTileStore, StoreStats};
pub use store::TileStore;
