//! Adapter module - level files and a JSON protocol for presentation layers
//!
//! The core crate only deals in grids and value types. This crate connects it to the
//! outside: it loads level layouts from JSON files and runs a line-delimited JSON
//! protocol so that a renderer (or a test harness, or a bot) can play the board
//! without linking against the core types.
//!
//! # Protocol Overview
//!
//! 1. **Start**: the session fills the board and sends `shuffle` plus `observation`
//! 2. **Commanding**: the client sends `swap`, `shuffle` or `observe`
//! 3. **Results**: every command is answered with one or more messages, in order
//!
//! # Message Types
//!
//! ## Client → Game
//!
//! - **swap**: a cell and a `direction` (or the adjacent `to` cell)
//! - **shuffle**: replace the board
//! - **observe**: ask for the current board
//!
//! ## Game → Client
//!
//! - **observation**: board rows, legal-swap count, a hint and the board hash
//! - **shuffle**: every cookie of a new board
//! - **turn**: an accepted swap with its cascades (chains, falls, top-ups)
//! - **invalid_swap**: the swap makes no chain; nothing changed
//! - **error**: error response with code and message
//!
//! # Environment Variables
//!
//! - `COOKIE_CRUNCH_SEED`: RNG seed (default: 1)
//! - `COOKIE_CRUNCH_LEVEL`: level file to load (default: full 9x9 board)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Game -> Client: {"type":"shuffle","seq":1,"ts":1234567890,"cookies":[{"column":0,"row":0,"kind":"red"},...]}
//! Game -> Client: {"type":"observation","seq":2,"ts":1234567890,"turn_id":0,"columns":9,"rows":9,"board":["RBYW..."],...}
//! Client -> Game: {"type":"swap","seq":1,"from":{"column":3,"row":2},"direction":"right"}
//! Game -> Client: {"type":"turn","seq":3,"ts":1234567891,"turn_id":1,"swap":{...},"cascades":[...]}
//! ```

pub mod level_file;
pub mod protocol;
pub mod session;

pub use cookie_crunch_core as core;
pub use cookie_crunch_types as types;

// Re-export protocol types for convenience
pub use level_file::LevelFile;
pub use protocol::*;
pub use session::{encode, Session, SessionConfig};
