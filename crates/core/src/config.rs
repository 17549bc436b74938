//! Level configuration - grid size, cookie kinds and shuffle bound
//!
//! A `LevelConfig` is validated when it is built, so a level never sees a zero-sized
//! grid or a kind count that would make the match-free fill impossible.

use thiserror::Error;

use crate::types::{
    CookieType, DEFAULT_COLUMNS, DEFAULT_COOKIE_KINDS, DEFAULT_MAX_SHUFFLE_ATTEMPTS, DEFAULT_ROWS,
    MAX_COOKIE_KINDS, MIN_COOKIE_KINDS,
};

/// Rejected configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("cookie kinds must be between {min} and {max}, got {got}")]
    CookieKinds { got: u8, min: u8, max: u8 },
}

/// Construction parameters of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    columns: usize,
    rows: usize,
    cookie_kinds: u8,
    max_shuffle_attempts: u32,
}

impl LevelConfig {
    /// A `columns x rows` level drawing from the default number of kinds
    pub fn new(columns: usize, rows: usize) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        Ok(Self {
            columns,
            rows,
            cookie_kinds: DEFAULT_COOKIE_KINDS,
            max_shuffle_attempts: DEFAULT_MAX_SHUFFLE_ATTEMPTS,
        })
    }

    /// Draw from the first `kinds` variants of [`CookieType::ALL`]
    pub fn with_cookie_kinds(mut self, kinds: u8) -> Result<Self, ConfigError> {
        if !(MIN_COOKIE_KINDS..=MAX_COOKIE_KINDS).contains(&kinds) {
            return Err(ConfigError::CookieKinds {
                got: kinds,
                min: MIN_COOKIE_KINDS,
                max: MAX_COOKIE_KINDS,
            });
        }
        self.cookie_kinds = kinds;
        Ok(self)
    }

    /// Bound the regenerate-and-check loop of a shuffle (at least one round)
    pub fn with_max_shuffle_attempts(mut self, attempts: u32) -> Self {
        self.max_shuffle_attempts = attempts.max(1);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cookie_kinds(&self) -> u8 {
        self.cookie_kinds
    }

    pub fn max_shuffle_attempts(&self) -> u32 {
        self.max_shuffle_attempts
    }

    /// Re-check the invariants the builders enforce
    ///
    /// Useful for configurations assembled from untrusted numbers before they reach
    /// the builders, e.g. a level file with its own size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.columns, self.rows)?.with_cookie_kinds(self.cookie_kinds)?;
        Ok(())
    }

    /// The kinds this level draws from
    pub fn kinds(&self) -> &'static [CookieType] {
        &CookieType::ALL[..self.cookie_kinds as usize]
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cookie_kinds: DEFAULT_COOKIE_KINDS,
            max_shuffle_attempts: DEFAULT_MAX_SHUFFLE_ATTEMPTS,
        }
    }
}
