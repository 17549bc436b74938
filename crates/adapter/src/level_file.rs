//! Level files - JSON tile layouts on disk
//!
//! A level file is a JSON object whose `tiles` field is the authored 0/1 matrix, top
//! row first:
//!
//! ```json
//! { "tiles": [[0, 1, 1, 0], [1, 1, 1, 1], [1, 1, 1, 1]] }
//! ```
//!
//! The grid size is taken from the matrix. `cookie_kinds` and
//! `max_shuffle_attempts` are optional and fall back to the level defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{LevelConfig, TileLayout};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    pub tiles: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_kinds: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_shuffle_attempts: Option<u32>,
}

impl LevelFile {
    /// Parse a level from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse level JSON")
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid level file {}", path.display()))
    }

    /// The tile layout, sized by the matrix
    pub fn layout(&self) -> Result<TileLayout> {
        TileLayout::infer(&self.tiles).context("invalid tile layout")
    }

    /// A configuration matching the layout's size and the file's overrides
    pub fn config(&self) -> Result<LevelConfig> {
        let (columns, rows) = self.layout()?.dimensions();
        let mut config = LevelConfig::new(columns, rows).context("invalid level size")?;
        if let Some(kinds) = self.cookie_kinds {
            config = config.with_cookie_kinds(kinds).context("invalid cookie_kinds")?;
        }
        if let Some(attempts) = self.max_shuffle_attempts {
            config = config.with_max_shuffle_attempts(attempts);
        }
        Ok(config)
    }
}
