//! Gravity module - falling cookies and refilling the board
//!
//! After a removal the board settles in two steps. [`Level::fill_holes`] drops the
//! cookies that are still on the board into the holes below them, and
//! [`Level::top_up_cookies`] creates new cookies for the holes left at the top of each
//! column. Tiles without a cookie are holes; cells without a tile are skipped, so a
//! cookie can fall past a gap in the layout.

use log::debug;
use rand::Rng;

use crate::level::Level;
use crate::rng;
use crate::types::{Cookie, CookieType};

impl<R: Rng> Level<R> {
    /// Move cookies down into the holes below them
    ///
    /// Returns one list per column that changed, each ordered from the lowest moved
    /// cookie to the highest. Columns where nothing fell are left out.
    pub fn fill_holes(&mut self) -> Vec<Vec<Cookie>> {
        let mut columns = Vec::new();

        for column in 0..self.columns() {
            let mut fallen = Vec::new();
            for row in 0..self.rows() {
                if !self.tiles.is_occupied(column, row) || self.cookies.is_occupied(column, row) {
                    continue;
                }

                // Nearest cookie above the hole drops into it
                let source = (row + 1..self.rows()).find(|&lookup| self.cookies.is_occupied(column, lookup));
                if let Some(lookup) = source {
                    if let Some(cookie) = self.relocate((column, lookup), (column, row)) {
                        fallen.push(cookie);
                    }
                }
            }
            if !fallen.is_empty() {
                columns.push(fallen);
            }
        }

        if !columns.is_empty() {
            debug!(
                "fill_holes: {} cookies fell in {} columns",
                columns.iter().map(Vec::len).sum::<usize>(),
                columns.len()
            );
        }
        columns
    }

    /// Create cookies for the empty tiles at the top of every column
    ///
    /// Each column is filled from the top down until its first cookie. A new cookie
    /// never has the kind of the cookie created just before it in this pass, which
    /// keeps the refill from handing out free pairs. Returns one list per column that
    /// received cookies, ordered top to bottom.
    pub fn top_up_cookies(&mut self) -> Vec<Vec<Cookie>> {
        let kinds = self.config().kinds();
        let mut columns = Vec::new();
        let mut previous: Option<CookieType> = None;

        for column in 0..self.columns() {
            let mut created = Vec::new();
            for row in (0..self.rows()).rev() {
                if self.cookies.is_occupied(column, row) {
                    break;
                }
                if !self.tiles.is_occupied(column, row) {
                    continue;
                }

                let kind = rng::draw_kind_except(&mut self.rng, kinds, previous.as_slice());
                previous = Some(kind);

                let cookie = Cookie::new(column, row, kind);
                self.cookies.set(column, row, Some(cookie));
                created.push(cookie);
            }
            if !created.is_empty() {
                columns.push(created);
            }
        }

        if !columns.is_empty() {
            debug!(
                "top_up_cookies: created {} cookies in {} columns",
                columns.iter().map(Vec::len).sum::<usize>(),
                columns.len()
            );
        }
        columns
    }
}
