//! Shared helpers for building boards from text

#![allow(dead_code)]

use cookie_crunch::core::{Level, LevelConfig, TileLayout};
use cookie_crunch::types::CookieType;

/// Build a level from text rows, top row first
///
/// ' ' is a cell without a tile, '.' an empty tile, and a letter a cookie of the
/// kind with that symbol (B, R, Y, W, G, P).
pub fn level_from_text(rows: &[&str], seed: u64) -> Level {
    let height = rows.len();
    let width = rows[0].chars().count();
    let authored: Vec<Vec<u8>> = rows
        .iter()
        .map(|row| row.chars().map(|c| u8::from(c != ' ')).collect())
        .collect();

    let config = LevelConfig::new(width, height).unwrap();
    let layout = TileLayout::parse(width, height, &authored).unwrap();
    let mut level = Level::seeded(config, layout, seed);

    for (i, row) in rows.iter().enumerate() {
        for (column, c) in row.chars().enumerate() {
            if let Some(kind) = CookieType::from_symbol(c) {
                level.place_cookie(column, height - 1 - i, kind);
            }
        }
    }
    level
}

/// Text rows of a level, top row first, in the same notation
pub fn level_to_text(level: &Level) -> Vec<String> {
    level.snapshot().rows_top_down()
}

/// True if any row or column has three same-kind cookies in a row
pub fn has_run(level: &Level) -> bool {
    !level.detect_horizontal_matches().is_empty() || !level.detect_vertical_matches().is_empty()
}
