//! Response formatting.
//!
//! Every reply is a list of `Key: value` lines followed by `OK`, or a single
//! `ACK [code@0] {command} message` line.

use std::borrow::Cow;
use std::fmt::Display;

use chrono::{DateTime, SecondsFormat};
use url::Url;

use crate::queue::Item;
use crate::song::Song;

/// The `Key: value` lines of a successful reply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    lines: Vec<String>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(&mut self, key: &str, value: impl Display) {
        self.lines.push(format!("{key}: {value}"));
    }

    /// Print one queue entry the way `playlistinfo` lists it.
    pub fn item(&mut self, position: usize, item: &Item) {
        self.song(&item.song);
        self.pair("Pos", position);
        self.pair("Id", item.id);
        if item.priority != 0 {
            self.pair("Prio", item.priority);
        }
    }

    pub fn song(&mut self, song: &Song) {
        self.pair("file", strip_credentials(&song.uri));
        if let Some(modified) = song.mtime.and_then(iso8601) {
            self.pair("Last-Modified", modified);
        }
        if let Some(duration) = song.duration() {
            self.pair("Time", duration.as_secs());
            self.pair("duration", format!("{:.3}", duration.as_secs_f64()));
        }
        for (tag, value) in &song.tag.items {
            self.pair(tag.as_str(), value);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Format an `ACK` line.
pub fn ack(code: u32, command: &str, message: impl Display) -> String {
    format!("ACK [{code}@0] {{{command}}} {message}")
}

/// Drop `user:password@` from remote uris before printing them.
pub fn strip_credentials(uri: &str) -> Cow<'_, str> {
    let Ok(mut url) = Url::parse(uri) else {
        return Cow::Borrowed(uri);
    };
    if url.username().is_empty() && url.password().is_none() {
        return Cow::Borrowed(uri);
    }
    if url.set_username("").is_err() || url.set_password(None).is_err() {
        return Cow::Borrowed(uri);
    }
    Cow::Owned(url.into())
}

/// Seconds since the epoch as `YYYY-MM-DDTHH:MM:SSZ`, or `None` when chrono
/// cannot represent the instant.
pub fn iso8601(epoch: i64) -> Option<String> {
    DateTime::from_timestamp(epoch, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}
