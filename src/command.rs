//! Line-oriented command front end.
//!
//! `parse` turns a line into a [`Command`], `exec` runs it against a
//! [`Playlist`](crate::playlist::Playlist) and `print` renders the reply in
//! `key: value` form.

mod exec;
mod parse;
mod print;

pub use exec::{Context, Reply, respond};
pub use parse::{Command, Filter, ParseError, Range, parse_line, tokenize};
pub use print::{Response, ack, iso8601, strip_credentials};
