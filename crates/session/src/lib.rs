//! Game session lifecycle.
//!
//! A [`Session`] owns the level catalog and at most one active game: the
//! level, the logic built from it, the renderer bound to that logic, and the
//! time the level started. Hosts hold the session explicitly and pass it
//! where it is needed.
//!
//! # Invariants
//! - Starting a level tears down the previous game before building the next.
//! - The renderer and the logic always belong to the same level.
//! - The splash flag is set only by `start_splash_level`.
//! - Advancing past the last level, or from a level the catalog does not
//!   hold, starts the splash level.

mod clock;
mod session;

pub use clock::format_elapsed;
pub use session::{ActiveGame, Session, SessionError};

pub fn crate_info() -> &'static str {
    "pushbox-session v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("session"));
    }
}
