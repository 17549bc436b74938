//! Layout module - where the tiles of a level are
//!
//! Level layouts are authored as a matrix of 0/1 values, one inner vector per row,
//! listed top row first. The grid counts rows from the bottom, so authored row `r`
//! lands in grid row `rows - 1 - r`.

use thiserror::Error;

use crate::grid::Grid;
use crate::types::Tile;

/// Why an authored layout was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("layout row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("layout cell at row {row}, column {column} is {value}, expected 0 or 1")]
    InvalidCell { row: usize, column: usize, value: u8 },
}

/// The tile grid of a level, write-once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    tiles: Grid<Tile>,
}

impl TileLayout {
    /// A layout without tiles, the result of a failed load
    pub fn empty(columns: usize, rows: usize) -> Self {
        Self {
            tiles: Grid::new(columns, rows),
        }
    }

    /// Every cell tiled
    pub fn full(columns: usize, rows: usize) -> Self {
        let mut tiles = Grid::new(columns, rows);
        for row in 0..rows {
            for column in 0..columns {
                tiles.set(column, row, Some(Tile));
            }
        }
        Self { tiles }
    }

    /// Parse an authored matrix that must be exactly `columns x rows`
    ///
    /// Row indices in errors refer to the authored (top-first) order.
    pub fn parse(columns: usize, rows: usize, authored: &[Vec<u8>]) -> Result<Self, LayoutError> {
        if authored.is_empty() {
            return Err(LayoutError::Empty);
        }
        if authored.len() != rows {
            return Err(LayoutError::RowCount {
                expected: rows,
                found: authored.len(),
            });
        }

        let mut tiles = Grid::new(columns, rows);
        for (authored_row, values) in authored.iter().enumerate() {
            if values.len() != columns {
                return Err(LayoutError::ColumnCount {
                    row: authored_row,
                    expected: columns,
                    found: values.len(),
                });
            }

            // Authored top-down, stored bottom-up
            let row = rows - authored_row - 1;
            for (column, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => tiles.set(column, row, Some(Tile)),
                    _ => {
                        return Err(LayoutError::InvalidCell {
                            row: authored_row,
                            column,
                            value,
                        })
                    }
                }
            }
        }

        Ok(Self { tiles })
    }

    /// Parse an authored matrix, taking its size from the first row
    pub fn infer(authored: &[Vec<u8>]) -> Result<Self, LayoutError> {
        let columns = authored.first().map(Vec::len).ok_or(LayoutError::Empty)?;
        if columns == 0 {
            return Err(LayoutError::ColumnCount {
                row: 0,
                expected: 1,
                found: 0,
            });
        }
        Self::parse(columns, authored.len(), authored)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.tiles.dimensions()
    }

    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn into_tiles(self) -> Grid<Tile> {
        self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.count()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }
}
