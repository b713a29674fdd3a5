//! Game kernel: the `Logic` seam and a rule-free reference board.
//!
//! # Invariants
//! - Rendering and session code observe game state only through `Logic`.
//! - Every mutation records the cells it touched until they are drained.
//!
//! Move legality is not decided here. `Board` exposes explicit mutation
//! operations; a rules engine drives them and the renderer follows along via
//! the changed-cells list.

mod board;
mod logic;

pub use board::Board;
pub use logic::Logic;

pub fn crate_info() -> &'static str {
    "pushbox-kernel v0.1.0"
}
