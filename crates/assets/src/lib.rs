//! Level assets: the pack loader seam, the JSON pack format, bundled packs,
//! and the level catalog.
//!
//! # Invariants
//! - Catalog order is play order: external packs, then the bundled pack.
//! - The splash level is held apart from the play sequence.
//! - A failed load adds nothing to the catalog.

mod catalog;
mod pack;

pub use catalog::{LevelCatalog, NextLevel};
pub use pack::{
    BUNDLED_LEVELS, BUNDLED_MENU, JsonPackLoader, LevelRows, LoadError, PackFile, PackLoader,
    level_from_rows,
};

pub fn crate_info() -> &'static str {
    "pushbox-assets v0.1.0"
}
