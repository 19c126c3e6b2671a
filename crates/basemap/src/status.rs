//! Per-tile fetch outcomes.

use std::fmt;

use tile_common::GridSize;

/// Outcome of fetching one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStatus {
    /// Downloaded and stored by this call.
    Fresh,
    /// Already in the store; no request was made.
    Cached,
    /// The tile server returned an error or could not be reached.
    Failed,
}

impl TileStatus {
    /// Numeric code used by the status plot: 1 fresh, 0 cached, -1 failed.
    pub fn code(&self) -> i8 {
        match self {
            TileStatus::Fresh => 1,
            TileStatus::Cached => 0,
            TileStatus::Failed => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileStatus::Fresh => "fresh",
            TileStatus::Cached => "cached",
            TileStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub fresh: usize,
    pub cached: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.fresh + self.cached + self.failed
    }
}

/// Row-major grid of fetch outcomes, one cell per tile of a stitched map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGrid {
    size: GridSize,
    cells: Vec<Option<TileStatus>>,
}

impl StatusGrid {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![None; size.tile_count()],
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size.rows as usize && col < self.size.cols as usize {
            Some(row * self.size.cols as usize + col)
        } else {
            None
        }
    }

    /// Record a status. Out-of-grid cells are ignored.
    pub fn set(&mut self, row: usize, col: usize, status: TileStatus) {
        if let Some(idx) = self.index(row, col) {
            self.cells[idx] = Some(status);
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TileStatus> {
        self.index(row, col).and_then(|idx| self.cells[idx])
    }

    /// `(row, col, status)` for every recorded cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileStatus)> + '_ {
        let cols = self.size.cols as usize;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.map(|s| (idx / cols, idx % cols, s)))
    }

    pub fn counts(&self) -> StatusCounts {
        self.iter()
            .fold(StatusCounts::default(), |mut counts, (_, _, status)| {
                match status {
                    TileStatus::Fresh => counts.fresh += 1,
                    TileStatus::Cached => counts.cached += 1,
                    TileStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }
}
