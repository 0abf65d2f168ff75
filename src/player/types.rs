//! Player-related small types and handles.
//!
//! This module defines the commands accepted by the player thread and the
//! playback snapshot it publishes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCmd {
    /// Re-read the playlist now instead of waiting for the next tick. Sent
    /// after a command changed what is playing.
    Refresh,
    /// Stop the player thread.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Runtime playback information shared with the command front end.
pub struct PlaybackInfo {
    /// Id of the song the player is timing, if any.
    pub song_id: Option<u32>,
    /// Elapsed playback time for that song.
    pub elapsed: Duration,
    /// Whether time is currently running.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            song_id: None,
            elapsed: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
