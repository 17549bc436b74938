//! Grid module - fixed-size two-dimensional cell storage
//!
//! A grid is a dense `columns x rows` store backed by a flat vector for cache
//! locality. Coordinates are `(column, row)` with row 0 at the bottom.
//!
//! Indexing outside the grid is a caller bug, not a recoverable condition: `get`,
//! `set` and `take` panic on out-of-range coordinates. Callers that deal with
//! untrusted coordinates check [`Grid::in_bounds`] (or use [`Grid::neighbour`]) first.

/// Dense 2D storage where every cell is either empty or holds one `T`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    columns: usize,
    rows: usize,
    /// Flat array of cells, row-major order (row * columns + column)
    cells: Vec<Option<T>>,
}

impl<T: Copy> Grid<T> {
    /// Create an empty grid
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    /// Calculate flat index from (column, row) coordinates
    #[inline(always)]
    fn index(&self, column: usize, row: usize) -> usize {
        assert!(
            self.in_bounds(column, row),
            "cell ({}, {}) is outside the {}x{} grid",
            column,
            row,
            self.columns,
            self.rows
        );
        row * self.columns + column
    }

    /// `(columns, rows)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Check whether (column, row) addresses a cell of this grid
    #[inline]
    pub fn in_bounds(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows
    }

    /// The cell one step of `(dc, dr)` away, or None past the edge
    pub fn neighbour(&self, column: usize, row: usize, (dc, dr): (isize, isize)) -> Option<(usize, usize)> {
        let column = column.checked_add_signed(dc)?;
        let row = row.checked_add_signed(dr)?;
        self.in_bounds(column, row).then_some((column, row))
    }

    /// Value at (column, row), None if the cell is empty
    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Option<T> {
        self.cells[self.index(column, row)]
    }

    /// Overwrite the cell at (column, row)
    #[inline]
    pub fn set(&mut self, column: usize, row: usize, value: Option<T>) {
        let idx = self.index(column, row);
        self.cells[idx] = value;
    }

    /// Empty the cell at (column, row) and return what it held
    #[inline]
    pub fn take(&mut self, column: usize, row: usize) -> Option<T> {
        let idx = self.index(column, row);
        self.cells[idx].take()
    }

    /// Check if the cell at (column, row) holds a value
    #[inline]
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.get(column, row).is_some()
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Occupied cells as `(column, row, value)`, bottom row first
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|value| (idx % self.columns, idx / self.columns, value))
        })
    }
}
