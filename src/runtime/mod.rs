use std::error::Error;
use std::io;

use crate::config::Settings;
use crate::player::Player;

mod console;
mod settings;
mod startup;

pub use console::serve;
pub use settings::{settings_or_defaults, try_load_settings};
pub use startup::{build_playlist, playback_modes};

/// Run the daemon on stdin/stdout until the input ends.
pub fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let playlist = build_playlist(settings).shared();
    let player = Player::spawn(
        playlist.clone(),
        settings.playback.clone(),
        settings.display.clone(),
    );
    info!(
        "queue ready (max {} songs), reading commands from stdin",
        settings.queue.max_length
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = serve(stdin.lock(), stdout.lock(), &playlist, &player);

    player.quit();
    result?;
    Ok(())
}

#[cfg(test)]
mod tests;
