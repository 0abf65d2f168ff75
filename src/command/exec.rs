//! Command execution against a [`Playlist`].

use std::time::Duration;

use crate::error::Error;
use crate::player::PlaybackInfo;
use crate::playlist::{PlaybackState, Playlist};
use crate::song::{Song, TagType};

use super::parse::{self, Command, Filter, ParseError, Range};
use super::print::{self, Response};

/// What the front end knows besides the playlist itself.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub playback: &'a PlaybackInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print the lines, then `OK`.
    Ok(Response),
    /// One `ACK` line.
    Ack(String),
    /// The client asked to end the session.
    Close,
}

/// Parse and run one command line.
pub fn respond(line: &str, playlist: &mut Playlist, ctx: &Context<'_>) -> Reply {
    let command = match parse::parse_line(line) {
        Ok(command) => command,
        Err(e) => {
            debug!("rejected {line:?}: {e}");
            let name = match &e {
                ParseError::Unknown(_) | ParseError::Empty => String::new(),
                _ => command_name(line),
            };
            return Reply::Ack(print::ack(e.ack_code(), &name, e));
        }
    };

    if command == Command::Close {
        return Reply::Close;
    }

    match execute(command, playlist, ctx) {
        Ok(response) => Reply::Ok(response),
        Err(e) => {
            debug!("{line:?} failed: {e}");
            Reply::Ack(print::ack(e.ack_code(), &command_name(line), e))
        }
    }
}

fn command_name(line: &str) -> String {
    line.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn execute(command: Command, playlist: &mut Playlist, ctx: &Context<'_>) -> Result<Response, Error> {
    let mut response = Response::new();
    let len = playlist.queue().len();

    match command {
        Command::Add(uri) => {
            playlist.add(Song::new(uri))?;
        }
        Command::AddId { uri, position } => {
            let id = match position {
                Some(position) => playlist.add_at(Song::new(uri), position)?,
                None => playlist.add(Song::new(uri))?,
            };
            response.pair("Id", id);
        }
        Command::Delete(range) if range.is_single() => playlist.delete_position(range.start)?,
        Command::Delete(range) => {
            let (start, end) = range.bounds(len);
            playlist.delete_range(start, end)?;
        }
        Command::DeleteId(id) => playlist.delete_id(id)?,
        Command::Move { from, to } => {
            let (start, end) = from.bounds(len);
            playlist.move_range(start, end, to)?;
        }
        Command::MoveId { id, to } => playlist.move_id(id, to)?,
        Command::Swap(a, b) => playlist.swap_positions(a, b)?,
        Command::SwapId(a, b) => playlist.swap_ids(a, b)?,
        Command::Shuffle(range) => playlist.shuffle(range.map(|r| r.bounds(len)))?,
        Command::Prio { priority, ranges } => {
            let ranges: Vec<(usize, usize)> = ranges.iter().map(|r| r.bounds(len)).collect();
            playlist.set_priority(priority, &ranges)?;
        }
        Command::PrioId { priority, ids } => playlist.set_priority_ids(priority, &ids)?,
        Command::PlChanges(version) => {
            for change in playlist.changes_since(version).into_entries(playlist.queue()) {
                response.item(change.position, change.item);
            }
        }
        Command::PlChangesPosId(version) => {
            for change in playlist.changes_since(version).into_entries(playlist.queue()) {
                response.pair("cpos", change.position);
                response.pair("Id", change.id);
            }
        }
        Command::Clear => playlist.clear(),
        Command::PlaylistInfo(range) => {
            let (start, end) = match range {
                Some(range) => checked_window(range, len)?,
                None => (0, len),
            };
            let queue = playlist.queue();
            for position in start..end {
                if let Some(item) = queue.get(position) {
                    response.item(position, item);
                }
            }
        }
        Command::PlaylistId(None) => {
            for (position, item) in playlist.queue().iter().enumerate() {
                response.item(position, item);
            }
        }
        Command::PlaylistId(Some(id)) => {
            let queue = playlist.queue();
            let position = queue.id_to_position(id).ok_or(Error::InvalidId(id))?;
            if let Some(item) = queue.get(position) {
                response.item(position, item);
            }
        }
        Command::PlaylistFind { filter, value } => {
            list_matching(&mut response, playlist, |song| matches_exact(song, filter, &value));
        }
        Command::PlaylistSearch { filter, value } => {
            let needle = value.to_lowercase();
            list_matching(&mut response, playlist, |song| {
                matches_substring(song, filter, &needle)
            });
        }
        Command::AddTagId { id, tag, value } => playlist.add_tag(id, tag, &value)?,
        Command::Random(on) => playlist.set_random(on),
        Command::Repeat(on) => playlist.set_repeat(on),
        Command::Single(on) => playlist.set_single(on),
        Command::Consume(on) => playlist.set_consume(on),
        Command::Play(position) => playlist.play(position)?,
        Command::PlayId(Some(id)) => playlist.play_id(id)?,
        Command::PlayId(None) => playlist.play(None)?,
        Command::Pause(pause) => playlist.pause(pause),
        Command::Stop => playlist.stop(),
        Command::Next => playlist.next(),
        Command::Previous => playlist.previous(),
        Command::Status => status(&mut response, playlist, ctx.playback),
        Command::CurrentSong => {
            if let (Some(position), Some(item)) =
                (playlist.current_position(), playlist.current_song())
            {
                response.item(position, item);
            }
        }
        Command::Ping | Command::Close => {}
    }

    Ok(response)
}

/// Clamp a listing window; only the start has to exist.
fn checked_window(range: Range, len: usize) -> Result<(usize, usize), Error> {
    let (start, end) = range.bounds(len);
    if start >= len {
        return Err(Error::InvalidPosition(start));
    }
    if end < start {
        return Err(Error::InvalidRange { start, end });
    }
    Ok((start, end.min(len)))
}

fn list_matching(response: &mut Response, playlist: &Playlist, keep: impl Fn(&Song) -> bool) {
    for (position, item) in playlist.queue().iter().enumerate() {
        if keep(&item.song) {
            response.item(position, item);
        }
    }
}

fn matches_exact(song: &Song, filter: Filter, value: &str) -> bool {
    match filter {
        Filter::Tag(tag) => song.tag_equals(tag, value),
        Filter::File => song.uri == value,
        Filter::Any => song.uri == value || TagType::ALL.iter().any(|&t| song.tag_equals(t, value)),
    }
}

fn matches_substring(song: &Song, filter: Filter, needle: &str) -> bool {
    let in_uri = || song.uri.to_lowercase().contains(needle);
    match filter {
        Filter::Tag(tag) => song.tag_contains(tag, needle),
        Filter::File => in_uri(),
        Filter::Any => in_uri() || TagType::ALL.iter().any(|&t| song.tag_contains(t, needle)),
    }
}

fn status(response: &mut Response, playlist: &Playlist, playback: &PlaybackInfo) {
    let modes = playlist.modes();
    let flag = |on: bool| u8::from(on);

    response.pair("repeat", flag(modes.repeat));
    response.pair("random", flag(modes.random));
    response.pair("single", flag(modes.single));
    response.pair("consume", flag(modes.consume));
    response.pair("playlist", playlist.queue().version());
    response.pair("playlistlength", playlist.queue().len());
    response.pair("state", playlist.state().as_str());

    let (Some(position), Some(item)) = (playlist.current_position(), playlist.current_song())
    else {
        return;
    };
    response.pair("song", position);
    response.pair("songid", item.id);

    if playlist.state() != PlaybackState::Stopped {
        let elapsed = if playback.song_id == Some(item.id) {
            playback.elapsed
        } else {
            Duration::ZERO
        };
        response.pair("elapsed", format!("{:.3}", elapsed.as_secs_f64()));
        if let Some(duration) = item.song.duration() {
            response.pair("duration", format!("{:.3}", duration.as_secs_f64()));
        }
    }

    if let Some(next) = playlist.upcoming_position() {
        if let Some(next_id) = playlist.queue().position_to_id(next) {
            response.pair("nextsong", next);
            response.pair("nextsongid", next_id);
        }
    }
}
