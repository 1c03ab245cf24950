//! scrollmap (workspace facade crate).
//!
//! Re-exports the workspace crates under one name:
//! `scrollmap::{core, term, types}`.

pub use scrollmap_core as core;
pub use scrollmap_term as term;
pub use scrollmap_types as types;
