//! Playlist module: the playback session built on top of the queue.
//!
//! `Playlist` lives in `playlist::model`; `playlist::reconcile` keeps the
//! queued song snapshots in step with the music catalog.

mod model;
mod reconcile;

pub use model::*;
pub use reconcile::{Catalog, reconcile};
