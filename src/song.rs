//! Song snapshots held by the queue.
//!
//! The queue never points into the music catalog; it keeps its own copy of
//! each song (`Song`) taken when the song was added. The catalog may later
//! drift away from that copy, see `playlist::reconcile`.

mod display;
mod model;

pub use display::display_from_fields;
pub use model::*;
