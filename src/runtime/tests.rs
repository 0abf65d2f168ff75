use super::*;
use crate::config::{PlaybackSettings, Settings};
use crate::playlist::{self, PlaybackState};

use std::io::Cursor;

fn session(settings: &Settings) -> (crate::playlist::SharedPlaylist, Player) {
    let shared = build_playlist(settings).shared();
    let player = Player::spawn(
        shared.clone(),
        settings.playback.clone(),
        settings.display.clone(),
    );
    (shared, player)
}

fn transcript(settings: &Settings, input: &str) -> (String, crate::playlist::SharedPlaylist) {
    let (shared, player) = session(settings);
    let mut out = Vec::new();
    serve(Cursor::new(input.to_string()), &mut out, &shared, &player).unwrap();
    player.quit();
    (String::from_utf8(out).unwrap(), shared)
}

#[test]
fn console_greets_and_answers_each_line() {
    let (out, shared) = transcript(
        &Settings::default(),
        "add a.ogg\n\naddid b.ogg\nbogus\nplaylistid 1\n",
    );
    let greeting = format!("OK ostinato {}", env!("CARGO_PKG_VERSION"));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            greeting.as_str(),
            "OK",
            "Id: 1",
            "OK",
            r#"ACK [5@0] {} unknown command "bogus""#,
            "file: b.ogg",
            "Pos: 1",
            "Id: 1",
            "OK",
        ]
    );
    assert_eq!(playlist::lock(&shared).queue().len(), 2);
}

#[test]
fn console_stops_at_close() {
    let (out, shared) = transcript(&Settings::default(), "add a.ogg\nclose\nadd b.ogg\n");
    assert_eq!(out.lines().count(), 2);
    assert_eq!(playlist::lock(&shared).queue().len(), 1);
}

#[test]
fn console_playback_commands_reach_the_playlist() {
    let (_, shared) = transcript(&Settings::default(), "add a.ogg\nadd b.ogg\nplay 1\n");
    let pl = playlist::lock(&shared);
    assert_eq!(pl.state(), PlaybackState::Playing);
    assert_eq!(pl.current_position(), Some(1));
}

#[test]
fn startup_applies_configured_modes() {
    let mut settings = Settings::default();
    settings.queue.max_length = 3;
    settings.playback = PlaybackSettings {
        repeat: true,
        consume: true,
        ..PlaybackSettings::default()
    };

    let pl = build_playlist(&settings);
    let modes = pl.modes();
    assert!(modes.repeat && modes.consume);
    assert!(!modes.random && !modes.single);
    assert_eq!(pl.queue().max_length(), 3);
    assert_eq!(playback_modes(&settings.playback), modes);
}

#[test]
fn broken_settings_fall_back_to_defaults() {
    let settings = settings_or_defaults(Err("invalid config: nope".to_string()));
    assert_eq!(settings.queue.max_length, 16384);
}

#[test]
fn try_load_settings_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[playback]\ntick_ms = 0\n").unwrap();

    let err = try_load_settings(Some(path.as_path())).unwrap_err();
    assert!(err.contains("tick_ms"));
}
