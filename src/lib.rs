//! Cookie Crunch (workspace facade crate).
//!
//! This package exposes `cookie_crunch::{core,adapter,types}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use cookie_crunch_adapter as adapter;
pub use cookie_crunch_core as core;
pub use cookie_crunch_types as types;
