//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules: the level grids, the match-free generator,
//! the legal-swap oracle, chain detection, gravity and the turn machine. It has
//! **no dependencies** on rendering, input, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Every rule is reachable through plain method calls
//! - **Portable**: Any presentation layer can animate the returned data
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size `columns x rows` cell storage
//! - [`layout`]: authored 0/1 tile matrices
//! - [`config`]: grid size, cookie kinds and shuffle bound
//! - [`rng`]: seeded randomness and constrained kind draws
//! - [`level`]: the level grids, initial fill, shuffle and swapping
//! - [`matches`]: legal-swap enumeration, chain detection and removal
//! - [`gravity`]: falling cookies and top-up refill
//! - [`game_state`]: the turn machine
//! - [`snapshot`]: detached board copies for observers
//!
//! # Board Rules
//!
//! - **No free matches**: a new board never contains a run of three
//! - **Always playable**: a board without legal swaps is reshuffled
//! - **Straight chains only**: an L or T shape is reported as two chains
//!
//! # Example
//!
//! ```
//! use cookie_crunch_core::{GameState, LevelConfig, SwapOutcome, TileLayout};
//!
//! let mut game = GameState::new(LevelConfig::default(), TileLayout::full(9, 9), 12345);
//! let created = game.start();
//! assert_eq!(created.len(), 81);
//!
//! let swap = game.level().hint().expect("a fresh board has a legal swap");
//! match game.play_swap(swap) {
//!     SwapOutcome::Resolved(report) => assert!(!report.cascades.is_empty()),
//!     SwapOutcome::Rejected(_) => unreachable!(),
//! }
//! ```

pub mod config;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod layout;
pub mod level;
pub mod matches;
pub mod rng;
pub mod snapshot;

pub use cookie_crunch_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, LevelConfig};
pub use game_state::{CascadeStep, GameState, ResolveStep, SwapOutcome, TurnPhase, TurnReport};
pub use grid::Grid;
pub use layout::{LayoutError, TileLayout};
pub use level::Level;
pub use rng::{draw_kind, draw_kind_except, seeded, DefaultRng};
pub use snapshot::BoardSnapshot;
