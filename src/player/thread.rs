use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::{DisplaySettings, PlaybackSettings};
use crate::playlist::{self, SharedPlaylist};
use crate::song::display_from_fields;

use super::clock::SongClock;
use super::types::{PlaybackHandle, PlayerCmd};

pub(super) fn spawn_player_thread(
    playlist: SharedPlaylist,
    rx: Receiver<PlayerCmd>,
    playback_info: PlaybackHandle,
    settings: PlaybackSettings,
    display: DisplaySettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let fallback =
            (settings.default_song_seconds > 0).then(|| Duration::from_secs(settings.default_song_seconds));
        let mut clock = SongClock::new(fallback);
        let mut last = Instant::now();
        let mut announced = 0;

        loop {
            match rx.recv_timeout(tick) {
                Ok(PlayerCmd::Refresh) | Err(RecvTimeoutError::Timeout) => {}
                Ok(PlayerCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let dt = now - last;
            last = now;

            // One lock per tick; the playlist is never held across the wait.
            let (snapshot, now_playing) = {
                let mut guard = playlist::lock(&playlist);
                let snapshot = clock.step(&mut guard, dt);
                let mut now_playing = None;
                if snapshot.playing && guard.song_generation() != announced {
                    announced = guard.song_generation();
                    now_playing = guard.current_song().map(|item| {
                        display_from_fields(&item.song, &display.fields, &display.separator)
                    });
                }
                (snapshot, now_playing)
            };
            if let Some(text) = now_playing {
                info!("now playing: {text}");
            }
            if let Ok(mut info) = playback_info.lock() {
                *info = snapshot;
            }
        }

        // Update shared state so readers don't keep showing a running clock.
        if let Ok(mut info) = playback_info.lock() {
            info.playing = false;
        }
        debug!("player thread finished");
    })
}
