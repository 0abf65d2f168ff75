//! Elapsed-time bookkeeping for the current song.
//!
//! Nothing is decoded: a song "plays" for its tagged duration (or a
//! configured fallback) and then the playlist is told it finished.

use std::time::Duration;

use crate::playlist::{PlaybackState, Playlist};

use super::types::PlaybackInfo;

#[derive(Debug)]
pub(super) struct SongClock {
    generation: u64,
    song_id: Option<u32>,
    elapsed: Duration,
    fallback_length: Option<Duration>,
}

impl SongClock {
    pub(super) fn new(fallback_length: Option<Duration>) -> Self {
        Self {
            generation: 0,
            song_id: None,
            elapsed: Duration::ZERO,
            fallback_length,
        }
    }

    /// Account for `dt` of wall time and let the playlist advance when the
    /// current song has run out. Returns the snapshot to publish.
    pub(super) fn step(&mut self, playlist: &mut Playlist, dt: Duration) -> PlaybackInfo {
        // A song that started since the last step starts at zero.
        let restarted = self.sync(playlist);
        if !restarted && playlist.state() == PlaybackState::Playing {
            self.elapsed += dt;
        }

        if playlist.state() == PlaybackState::Playing {
            let length = playlist
                .current_song()
                .and_then(|item| item.song.duration())
                .or(self.fallback_length);
            if length.is_some_and(|length| self.elapsed >= length) {
                debug!("song {:?} ran out after {:?}", self.song_id, self.elapsed);
                playlist.song_finished();
                self.sync(playlist);
            }
        }

        PlaybackInfo {
            song_id: self.song_id,
            elapsed: self.elapsed,
            playing: playlist.state() == PlaybackState::Playing,
        }
    }

    /// Pick up a song change made by anyone. Returns whether one happened.
    fn sync(&mut self, playlist: &Playlist) -> bool {
        let generation = playlist.song_generation();
        let song_id = playlist.current_id();
        if generation == self.generation && song_id == self.song_id {
            return false;
        }
        self.generation = generation;
        self.song_id = song_id;
        self.elapsed = Duration::ZERO;
        true
    }
}
