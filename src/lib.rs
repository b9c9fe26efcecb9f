//! Hand-sign driven Rock-Paper-Scissors.
//!
//! An upstream detector/tracker (not part of this crate) looks at camera frames and reports,
//! once per frame, which tracked hands it currently sees and which sign each of them shows. This
//! crate consumes that stream and runs a two-player match on top of it: unassigned hands register
//! as players by holding the confirm sign, registered players throw rounds by holding a playable
//! sign simultaneously, and a match ends when both players hold the stop sign (or leave the
//! frame for long enough).
//!
//! The entry point is [`game::Match`]: create one per session and feed it one
//! [`detection::SignsById`] per frame via [`game::Match::advance`]. All timers inside the engine
//! are wall-clock timestamps compared against the `now` passed in each frame, so the caller owns
//! the clock and nothing ever blocks.

use log::LevelFilter;

pub mod detection;
pub mod game;
pub mod sign;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level; everything else stays at the
/// `env_logger` default unless overridden via `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
