//! A playback queue engine for a networked music daemon.
//!
//! The core is [`queue::Queue`]: positions, shuffled play order, stable ids,
//! priorities and version stamps for incremental client sync.
//! [`playlist::Playlist`] wraps it into a playback session, [`resolver`]
//! decides what plays next, [`player`] times songs on a worker thread and
//! [`command`] speaks a line-based text protocol on top of it all.

#[macro_use]
extern crate log;

pub mod command;
pub mod config;
pub mod error;
pub mod player;
pub mod playlist;
pub mod queue;
pub mod resolver;
pub mod runtime;
pub mod song;

pub use error::{Error, Result};
