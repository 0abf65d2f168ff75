use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::{DisplaySettings, PlaybackSettings};
use crate::playlist::SharedPlaylist;

use super::thread::spawn_player_thread;
use super::types::{PlaybackHandle, PlaybackInfo, PlayerCmd};

pub struct Player {
    tx: Sender<PlayerCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the player thread for `playlist`.
    pub fn spawn(
        playlist: SharedPlaylist,
        settings: PlaybackSettings,
        display: DisplaySettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let handle = spawn_player_thread(playlist, rx, playback_info.clone(), settings, display);

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Latest published snapshot.
    pub fn playback(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the thread to re-read the playlist right away.
    pub fn refresh(&self) {
        if self.send(PlayerCmd::Refresh).is_err() {
            warn!("player thread is gone");
        }
    }

    /// Stop the thread and wait for it.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
