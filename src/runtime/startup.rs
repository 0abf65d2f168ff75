use crate::config::{PlaybackSettings, Settings};
use crate::playlist::Playlist;
use crate::queue::Queue;
use crate::resolver::Modes;

pub fn playback_modes(settings: &PlaybackSettings) -> Modes {
    Modes {
        random: settings.random,
        repeat: settings.repeat,
        single: settings.single,
        consume: settings.consume,
    }
}

/// An empty playlist with the configured capacity and startup modes.
pub fn build_playlist(settings: &Settings) -> Playlist {
    let mut playlist = Playlist::new(Queue::new(settings.queue.max_length));
    playlist.apply_modes(playback_modes(&settings.playback));
    playlist
}
