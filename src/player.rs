//! Playback control.
//!
//! The player runs on its own thread. It times the current song, tells the
//! playlist when a song has played out and publishes a [`PlaybackInfo`]
//! snapshot for status queries. Commands reach it over a channel; between
//! commands it wakes up on a fixed tick.

mod clock;
mod handle;
mod thread;
mod types;

pub use handle::Player;
pub use types::*;
