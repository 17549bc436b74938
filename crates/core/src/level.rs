//! Level module - owns the tile and cookie grids
//!
//! The level is the only writer of its two grids. Tiles are set once from the
//! layout; cookies are created by [`Level::shuffle`] and
//! [`Level::top_up_cookies`](crate::Level::top_up_cookies), moved by swaps and
//! gravity, and destroyed by [`Level::remove_matches`](crate::Level::remove_matches).
//!
//! Whenever a cookie changes cell, its `column`/`row` are rewritten in the same call
//! that moves it between slots, so a cookie read from the grid always reports the
//! cell it was read from.
//!
//! Matching lives in `matches.rs` and falling/refilling in `gravity.rs`; both are
//! further `impl Level` blocks over the same state.

use std::collections::{BTreeSet, HashSet};

use arrayvec::ArrayVec;
use log::{debug, warn};
use rand::Rng;

use crate::config::LevelConfig;
use crate::grid::Grid;
use crate::layout::TileLayout;
use crate::rng::{self, DefaultRng};
use crate::types::{Cookie, CookieType, Swap, Tile};

/// A playable board: layout, cookies, and the moves currently allowed
#[derive(Debug, Clone)]
pub struct Level<R = DefaultRng> {
    config: LevelConfig,
    pub(crate) tiles: Grid<Tile>,
    pub(crate) cookies: Grid<Cookie>,
    /// Swaps that produce at least one chain; recomputed after every settle
    pub(crate) possible_swaps: HashSet<Swap>,
    pub(crate) rng: R,
}

impl Level<DefaultRng> {
    /// Create a level whose randomness is fully determined by `seed`
    pub fn seeded(config: LevelConfig, layout: TileLayout, seed: u64) -> Self {
        Self::new(config, layout, rng::seeded(seed))
    }
}

impl<R: Rng> Level<R> {
    /// Create a level from an already-parsed layout
    ///
    /// A layout whose size differs from the configuration is treated like any other
    /// malformed input: the level is created without tiles.
    pub fn new(config: LevelConfig, layout: TileLayout, rng: R) -> Self {
        let (columns, rows) = (config.columns(), config.rows());
        let tiles = if layout.dimensions() == (columns, rows) {
            layout.into_tiles()
        } else {
            let (found_columns, found_rows) = layout.dimensions();
            warn!(
                "layout is {}x{} but level is configured as {}x{}; level has no tiles",
                found_columns, found_rows, columns, rows
            );
            Grid::new(columns, rows)
        };

        Self {
            config,
            tiles,
            cookies: Grid::new(columns, rows),
            possible_swaps: HashSet::new(),
            rng,
        }
    }

    /// Create a level from an authored 0/1 matrix (top row first)
    ///
    /// A malformed matrix yields a level without tiles; check [`Level::has_tiles`].
    pub fn from_rows(config: LevelConfig, authored: &[Vec<u8>], rng: R) -> Self {
        let layout = TileLayout::parse(config.columns(), config.rows(), authored).unwrap_or_else(|err| {
            warn!("rejected level layout: {}", err);
            TileLayout::empty(config.columns(), config.rows())
        });
        Self::new(config, layout, rng)
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn columns(&self) -> usize {
        self.config.columns()
    }

    pub fn rows(&self) -> usize {
        self.config.rows()
    }

    /// False when the layout failed to load
    pub fn has_tiles(&self) -> bool {
        self.tiles.count() > 0
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.count()
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.count()
    }

    /// Tile at (column, row); panics outside the grid
    pub fn tile_at(&self, column: usize, row: usize) -> Option<Tile> {
        self.tiles.get(column, row)
    }

    /// Cookie at (column, row); panics outside the grid
    pub fn cookie_at(&self, column: usize, row: usize) -> Option<Cookie> {
        self.cookies.get(column, row)
    }

    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn cookies(&self) -> &Grid<Cookie> {
        &self.cookies
    }

    /// Put a cookie of `kind` on a tiled cell, replacing whatever was there
    ///
    /// Used to set up specific boards. Does not recompute the legal swaps.
    pub fn place_cookie(&mut self, column: usize, row: usize, kind: CookieType) -> Cookie {
        assert!(
            self.tiles.is_occupied(column, row),
            "cannot place a cookie at ({}, {}): no tile",
            column,
            row
        );
        let cookie = Cookie::new(column, row, kind);
        self.cookies.set(column, row, Some(cookie));
        cookie
    }

    /// Remove every cookie and forget the legal swaps
    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
        self.possible_swaps.clear();
    }

    // ============== Setup ==============

    /// Fill the level with new cookies until at least one swap is legal
    ///
    /// Returns the cookies of the final fill. Gives up after
    /// `max_shuffle_attempts` rounds (or at once for a level without tiles) and
    /// returns a board without legal swaps, which callers see through
    /// [`Level::possible_swaps`].
    pub fn shuffle(&mut self) -> BTreeSet<Cookie> {
        if !self.has_tiles() {
            warn!("shuffle requested on a level without tiles");
            self.clear_cookies();
            return BTreeSet::new();
        }

        let max_attempts = self.config.max_shuffle_attempts();
        let mut attempts = 0;
        loop {
            attempts += 1;
            let created = self.create_initial_cookies();
            self.detect_possible_swaps();

            if !self.possible_swaps.is_empty() {
                debug!(
                    "shuffle: {} cookies, {} legal swaps after {} attempt(s)",
                    created.len(),
                    self.possible_swaps.len(),
                    attempts
                );
                return created;
            }
            if attempts >= max_attempts {
                warn!(
                    "shuffle: no legal swap after {} attempts; leaving a board without moves",
                    attempts
                );
                return created;
            }
        }
    }

    /// Replace every cookie with a fresh, match-free fill
    ///
    /// Cells are filled row by row from the bottom-left, so the two left and two
    /// lower neighbours of a cell are always placed before it. A kind is never drawn
    /// if it would complete a run of three with either pair. Does not recompute the
    /// legal swaps.
    pub fn create_initial_cookies(&mut self) -> BTreeSet<Cookie> {
        self.cookies.clear();
        let kinds = self.config.kinds();
        let mut created = BTreeSet::new();

        for row in 0..self.rows() {
            for column in 0..self.columns() {
                if !self.tiles.is_occupied(column, row) {
                    continue;
                }

                let mut excluded = ArrayVec::<CookieType, 2>::new();
                if column >= 2 {
                    if let Some(kind) = self.pair_kind((column - 1, row), (column - 2, row)) {
                        excluded.push(kind);
                    }
                }
                if row >= 2 {
                    if let Some(kind) = self.pair_kind((column, row - 1), (column, row - 2)) {
                        if !excluded.contains(&kind) {
                            excluded.push(kind);
                        }
                    }
                }

                let kind = rng::draw_kind_except(&mut self.rng, kinds, &excluded);
                let cookie = Cookie::new(column, row, kind);
                self.cookies.set(column, row, Some(cookie));
                created.insert(cookie);
            }
        }

        created
    }

    /// Shared kind of two cells, if both hold cookies of the same kind
    fn pair_kind(&self, (c1, r1): (usize, usize), (c2, r2): (usize, usize)) -> Option<CookieType> {
        let first = self.cookies.get(c1, r1)?;
        let second = self.cookies.get(c2, r2)?;
        (first.kind == second.kind).then_some(first.kind)
    }

    // ============== Swapping ==============

    /// The swaps that currently produce at least one chain
    pub fn possible_swaps(&self) -> &HashSet<Swap> {
        &self.possible_swaps
    }

    /// Check whether `swap` is one of the currently legal swaps
    pub fn is_possible_swap(&self, swap: &Swap) -> bool {
        self.possible_swaps.contains(swap)
    }

    /// A legal swap to suggest to the player, lowest on the board first
    pub fn hint(&self) -> Option<Swap> {
        self.possible_swaps.iter().min().copied()
    }

    /// Exchange the two cookies of `swap`
    ///
    /// Both slots and both cookies' coordinates are updated together. No chain
    /// detection happens here.
    pub fn perform_swap(&mut self, swap: &Swap) {
        self.exchange(swap.a().position(), swap.b().position());
    }

    /// Exchange the contents of two cells, rewriting cookie coordinates
    pub(crate) fn exchange(&mut self, (c1, r1): (usize, usize), (c2, r2): (usize, usize)) {
        let first = self.cookies.take(c1, r1);
        let second = self.cookies.take(c2, r2);
        self.put(c1, r1, second);
        self.put(c2, r2, first);
    }

    /// Move the cookie at `from` into the empty cell `to`
    pub(crate) fn relocate(&mut self, (fc, fr): (usize, usize), (tc, tr): (usize, usize)) -> Option<Cookie> {
        debug_assert!(!self.cookies.is_occupied(tc, tr), "relocating onto an occupied cell");
        let cookie = self.cookies.take(fc, fr)?;
        self.put(tc, tr, Some(cookie));
        self.cookies.get(tc, tr)
    }

    /// Store `cookie` at (column, row) with its coordinates set to that cell
    fn put(&mut self, column: usize, row: usize, cookie: Option<Cookie>) {
        let cookie = cookie.map(|mut cookie| {
            cookie.column = column;
            cookie.row = row;
            cookie
        });
        self.cookies.set(column, row, cookie);
    }
}
