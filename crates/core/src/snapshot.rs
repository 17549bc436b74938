use rand::Rng;

use crate::level::Level;
use crate::types::CookieType;

/// A copy of the visible board state, detached from the level
///
/// Cells are stored row-major from the bottom row, like the level grids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BoardSnapshot {
    pub columns: usize,
    pub rows: usize,
    pub tiles: Vec<bool>,
    pub cookies: Vec<Option<CookieType>>,
    pub possible_swaps: usize,
    /// FNV-1a over the tile and cookie cells.
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.columns = 0;
        self.rows = 0;
        self.tiles.clear();
        self.cookies.clear();
        self.possible_swaps = 0;
        self.board_hash = 0;
    }

    fn index(&self, column: usize, row: usize) -> usize {
        assert!(
            column < self.columns && row < self.rows,
            "cell ({}, {}) is outside the {}x{} snapshot",
            column,
            row,
            self.columns,
            self.rows
        );
        row * self.columns + column
    }

    pub fn tile_at(&self, column: usize, row: usize) -> bool {
        self.tiles[self.index(column, row)]
    }

    pub fn cookie_at(&self, column: usize, row: usize) -> Option<CookieType> {
        self.cookies[self.index(column, row)]
    }

    /// One string per row, top row first
    ///
    /// A cell without a tile is a space, an empty tile is `.` and a cookie is its
    /// [`CookieType::symbol`].
    pub fn rows_top_down(&self) -> Vec<String> {
        (0..self.rows)
            .rev()
            .map(|row| {
                (0..self.columns)
                    .map(|column| match (self.tile_at(column, row), self.cookie_at(column, row)) {
                        (false, _) => ' ',
                        (true, None) => '.',
                        (true, Some(kind)) => kind.symbol(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Hash of the cells alone, as stored in `board_hash`
    pub fn compute_board_hash(&self) -> u64 {
        fnv1a64(self.tiles.iter().zip(&self.cookies).map(|(&tile, cookie)| cell_byte(tile, *cookie)))
    }
}

/// 0 for no tile, 1 for an empty tile, 2 + kind index for a cookie
fn cell_byte(tile: bool, cookie: Option<CookieType>) -> u8 {
    match (tile, cookie) {
        (false, _) => 0,
        (true, None) => 1,
        (true, Some(kind)) => 2 + kind.index() as u8,
    }
}

fn fnv1a64(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

impl<R: Rng> Level<R> {
    /// Take a snapshot of the board
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Overwrite `snapshot` with the current board, reusing its buffers
    pub fn snapshot_into(&self, snapshot: &mut BoardSnapshot) {
        snapshot.clear();
        snapshot.columns = self.columns();
        snapshot.rows = self.rows();
        for row in 0..self.rows() {
            for column in 0..self.columns() {
                snapshot.tiles.push(self.tiles.is_occupied(column, row));
                snapshot.cookies.push(self.cookies.get(column, row).map(|cookie| cookie.kind));
            }
        }
        snapshot.possible_swaps = self.possible_swaps.len();
        snapshot.board_hash = snapshot.compute_board_hash();
    }
}
