//! Matching module - chain detection, removal and the legal-swap oracle
//!
//! Legal swaps are found by brute force: every cookie is tentatively swapped with its
//! right and upper neighbour, both cells are tested for a run, and the swap is
//! reverted. Only right/up are tried since left/down are the same pairs seen from the
//! other cell.
//!
//! A cookie sitting where a horizontal and a vertical run cross is reported in both
//! chains. Removal deletes it once.

use std::collections::BTreeSet;

use log::debug;
use rand::Rng;

use crate::level::Level;
use crate::types::{Chain, ChainKind, CookieType, Swap, MIN_CHAIN_LENGTH};

impl<R: Rng> Level<R> {
    /// Kind of the cookie at (column, row), None for empty cells
    fn kind_at(&self, column: usize, row: usize) -> Option<CookieType> {
        self.cookies.get(column, row).map(|cookie| cookie.kind)
    }

    /// Length of the same-kind run through (column, row) along `step` and its opposite
    fn run_length(&self, column: usize, row: usize, kind: CookieType, (dc, dr): (isize, isize)) -> usize {
        let mut length = 1;
        for step in [(dc, dr), (-dc, -dr)] {
            let mut cell = (column, row);
            while let Some(next) = self.cookies.neighbour(cell.0, cell.1, step) {
                if self.kind_at(next.0, next.1) != Some(kind) {
                    break;
                }
                length += 1;
                cell = next;
            }
        }
        length
    }

    /// Check if the cookie at (column, row) is part of a horizontal or vertical run of three
    ///
    /// Panics if the cell holds no cookie.
    pub fn has_chain_at(&self, column: usize, row: usize) -> bool {
        let Some(kind) = self.kind_at(column, row) else {
            panic!("no cookie at ({}, {}) to test for a chain", column, row);
        };
        self.run_length(column, row, kind, (1, 0)) >= MIN_CHAIN_LENGTH
            || self.run_length(column, row, kind, (0, 1)) >= MIN_CHAIN_LENGTH
    }

    /// Recompute the set of legal swaps from scratch
    ///
    /// The cookie grid is left exactly as it was found.
    pub fn detect_possible_swaps(&mut self) {
        self.possible_swaps.clear();

        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let Some(cookie) = self.cookies.get(column, row) else {
                    continue;
                };

                for step in [(1, 0), (0, 1)] {
                    let Some((other_column, other_row)) = self.cookies.neighbour(column, row, step) else {
                        continue;
                    };
                    let Some(other) = self.cookies.get(other_column, other_row) else {
                        continue;
                    };
                    self.exchange((column, row), (other_column, other_row));
                    let creates_chain =
                        self.has_chain_at(column, row) || self.has_chain_at(other_column, other_row);
                    self.exchange((column, row), (other_column, other_row));

                    if creates_chain {
                        self.possible_swaps.insert(Swap::new(cookie, other));
                    }
                }
            }
        }

        debug!("{} legal swaps", self.possible_swaps.len());
    }

    /// Runs of three or more along every row, scanned left to right
    pub fn detect_horizontal_matches(&self) -> BTreeSet<Chain> {
        self.detect_matches(ChainKind::Horizontal)
    }

    /// Runs of three or more along every column, scanned bottom to top
    pub fn detect_vertical_matches(&self) -> BTreeSet<Chain> {
        self.detect_matches(ChainKind::Vertical)
    }

    fn detect_matches(&self, kind: ChainKind) -> BTreeSet<Chain> {
        // Lines are rows for horizontal chains and columns for vertical ones
        let (lines, length) = match kind {
            ChainKind::Horizontal => (self.rows(), self.columns()),
            ChainKind::Vertical => (self.columns(), self.rows()),
        };
        let cell = |line: usize, offset: usize| match kind {
            ChainKind::Horizontal => (offset, line),
            ChainKind::Vertical => (line, offset),
        };

        let mut chains = BTreeSet::new();
        for line in 0..lines {
            let mut offset = 0;
            while offset < length {
                let (column, row) = cell(line, offset);
                let Some(matched) = self.kind_at(column, row) else {
                    offset += 1;
                    continue;
                };

                let mut end = offset + 1;
                while end < length {
                    let (column, row) = cell(line, end);
                    if self.kind_at(column, row) != Some(matched) {
                        break;
                    }
                    end += 1;
                }

                if end - offset >= MIN_CHAIN_LENGTH {
                    let mut chain = Chain::new(kind);
                    for (column, row) in (offset..end).map(|o| cell(line, o)) {
                        if let Some(cookie) = self.cookies.get(column, row) {
                            chain.add(cookie);
                        }
                    }
                    chains.insert(chain);
                }
                // Continue past the run so a long run is one chain
                offset = end;
            }
        }
        chains
    }

    /// Detect every chain, delete its cookies and return the chains
    pub fn remove_matches(&mut self) -> BTreeSet<Chain> {
        let mut chains = self.detect_horizontal_matches();
        chains.append(&mut self.detect_vertical_matches());

        for chain in &chains {
            for cookie in chain.cookies() {
                self.cookies.take(cookie.column, cookie.row);
            }
        }

        if !chains.is_empty() {
            debug!("removed {} chains, {} cookies left", chains.len(), self.cookie_count());
        }
        chains
    }
}
