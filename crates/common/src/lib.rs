//! Shared types for pushbox: cell states, level definitions, grid coordinates.
//!
//! # Invariants
//! - A `Level` is immutable once built; its grid is never empty.
//! - Every byte code decodes to some `Cell`; decoding never fails.

mod level;
mod types;

pub use level::{Level, LevelError};
pub use types::{Cell, GridPos, LevelId};

pub fn crate_info() -> &'static str {
    "pushbox-common v0.1.0"
}
