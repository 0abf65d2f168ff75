//! Command line parsing.
//!
//! A line is a command name followed by whitespace-separated arguments.
//! Arguments containing spaces are written in double quotes; inside quotes
//! a backslash escapes the next character.

use std::str::FromStr;

use thiserror::Error;

use crate::error::ack;
use crate::song::TagType;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No command given")]
    Empty,
    #[error("unknown command \"{0}\"")]
    Unknown(String),
    #[error("wrong number of arguments for \"{0}\"")]
    Arity(String),
    #[error("Integer expected: {0}")]
    Integer(String),
    #[error("Boolean (0/1) expected: {0}")]
    Boolean(String),
    #[error("Priority out of range: {0}")]
    Priority(String),
    #[error("Integer or range expected: {0}")]
    Range(String),
    #[error("Unknown tag type: {0}")]
    Tag(String),
    #[error("Invalid unquoted character")]
    Quote,
}

impl ParseError {
    /// The `ACK` code this error is reported with.
    pub fn ack_code(&self) -> u32 {
        match self {
            Self::Unknown(_) | Self::Empty => ack::UNKNOWN,
            _ => ack::ARG,
        }
    }
}

/// A position range `start..end`; an open end means "to the end of the
/// queue".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: Option<usize>,
}

impl Range {
    /// The one-entry range at `position`, if it has an end.
    pub fn single(position: usize) -> Option<Self> {
        Some(Self {
            start: position,
            end: Some(position.checked_add(1)?),
        })
    }

    pub fn is_single(self) -> bool {
        self.end.is_some() && self.end == self.start.checked_add(1)
    }

    /// Close an open range against a queue of `len` entries.
    pub fn bounds(self, len: usize) -> (usize, usize) {
        (self.start, self.end.unwrap_or(len))
    }
}

impl FromStr for Range {
    type Err = ParseError;

    /// `N`, `START:END` or `START:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::Range(s.to_string());
        match s.split_once(':') {
            None => s.parse().ok().and_then(Self::single).ok_or_else(bad),
            Some((start, "")) => Ok(Self {
                start: start.parse().map_err(|_| bad())?,
                end: None,
            }),
            Some((start, end)) => Ok(Self {
                start: start.parse().map_err(|_| bad())?,
                end: Some(end.parse().map_err(|_| bad())?),
            }),
        }
    }
}

/// What a find/search command compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Tag(TagType),
    /// The song uri.
    File,
    /// Any tag, or the uri.
    Any,
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("file") {
            Ok(Self::File)
        } else if s.eq_ignore_ascii_case("any") {
            Ok(Self::Any)
        } else {
            s.parse()
                .map(Self::Tag)
                .map_err(|_| ParseError::Tag(s.to_string()))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Add(String),
    AddId { uri: String, position: Option<usize> },
    Delete(Range),
    DeleteId(u32),
    Move { from: Range, to: usize },
    MoveId { id: u32, to: usize },
    Swap(usize, usize),
    SwapId(u32, u32),
    Shuffle(Option<Range>),
    Prio { priority: u8, ranges: Vec<Range> },
    PrioId { priority: u8, ids: Vec<u32> },
    PlChanges(u32),
    PlChangesPosId(u32),
    Clear,
    PlaylistInfo(Option<Range>),
    PlaylistId(Option<u32>),
    PlaylistFind { filter: Filter, value: String },
    PlaylistSearch { filter: Filter, value: String },
    AddTagId { id: u32, tag: TagType, value: String },
    Random(bool),
    Repeat(bool),
    Single(bool),
    Consume(bool),
    Play(Option<usize>),
    PlayId(Option<u32>),
    Pause(Option<bool>),
    Stop,
    Next,
    Previous,
    Status,
    CurrentSong,
    Ping,
    Close,
}

/// Split `line` into the command name and its arguments.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => token.push(chars.next().ok_or(ParseError::Quote)?),
                    Some(c) => token.push(c),
                    None => return Err(ParseError::Quote),
                }
            }
            // A closing quote must end the argument.
            if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                return Err(ParseError::Quote);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Parse one command line.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Err(ParseError::Empty);
    };
    let name = name.to_ascii_lowercase();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    parse_command(&name, &args)
}

fn parse_command(name: &str, args: &[&str]) -> Result<Command, ParseError> {
    let arity = |min: usize, max: usize| {
        if (min..=max).contains(&args.len()) {
            Ok(())
        } else {
            Err(ParseError::Arity(name.to_string()))
        }
    };

    let command = match name {
        "add" => {
            arity(1, 1)?;
            Command::Add(args[0].to_string())
        }
        "addid" => {
            arity(1, 2)?;
            Command::AddId {
                uri: args[0].to_string(),
                position: args.get(1).map(|s| integer(s)).transpose()?,
            }
        }
        "delete" => {
            arity(1, 1)?;
            Command::Delete(args[0].parse()?)
        }
        "deleteid" => {
            arity(1, 1)?;
            Command::DeleteId(integer(args[0])?)
        }
        "move" => {
            arity(2, 2)?;
            Command::Move {
                from: args[0].parse()?,
                to: integer(args[1])?,
            }
        }
        "moveid" => {
            arity(2, 2)?;
            Command::MoveId {
                id: integer(args[0])?,
                to: integer(args[1])?,
            }
        }
        "swap" => {
            arity(2, 2)?;
            Command::Swap(integer(args[0])?, integer(args[1])?)
        }
        "swapid" => {
            arity(2, 2)?;
            Command::SwapId(integer(args[0])?, integer(args[1])?)
        }
        "shuffle" => {
            arity(0, 1)?;
            Command::Shuffle(args.first().map(|s| s.parse()).transpose()?)
        }
        "prio" => {
            if args.len() < 2 {
                return Err(ParseError::Arity(name.to_string()));
            }
            Command::Prio {
                priority: priority(args[0])?,
                ranges: args[1..]
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<Vec<Range>, ParseError>>()?,
            }
        }
        "prioid" => {
            if args.len() < 2 {
                return Err(ParseError::Arity(name.to_string()));
            }
            Command::PrioId {
                priority: priority(args[0])?,
                ids: args[1..]
                    .iter()
                    .map(|s| integer(s))
                    .collect::<Result<Vec<u32>, ParseError>>()?,
            }
        }
        "plchanges" => {
            arity(1, 1)?;
            Command::PlChanges(integer(args[0])?)
        }
        "plchangesposid" => {
            arity(1, 1)?;
            Command::PlChangesPosId(integer(args[0])?)
        }
        "clear" => {
            arity(0, 0)?;
            Command::Clear
        }
        "playlistinfo" => {
            arity(0, 1)?;
            Command::PlaylistInfo(args.first().map(|s| s.parse()).transpose()?)
        }
        "playlistid" => {
            arity(0, 1)?;
            Command::PlaylistId(args.first().map(|s| integer(s)).transpose()?)
        }
        "playlistfind" | "playlistsearch" => {
            arity(2, 2)?;
            let filter = args[0].parse()?;
            let value = args[1].to_string();
            if name == "playlistfind" {
                Command::PlaylistFind { filter, value }
            } else {
                Command::PlaylistSearch { filter, value }
            }
        }
        "addtagid" => {
            arity(3, 3)?;
            Command::AddTagId {
                id: integer(args[0])?,
                tag: args[1]
                    .parse()
                    .map_err(|_| ParseError::Tag(args[1].to_string()))?,
                value: args[2].to_string(),
            }
        }
        "random" | "repeat" | "single" | "consume" => {
            arity(1, 1)?;
            let on = boolean(args[0])?;
            match name {
                "random" => Command::Random(on),
                "repeat" => Command::Repeat(on),
                "single" => Command::Single(on),
                _ => Command::Consume(on),
            }
        }
        "play" => {
            arity(0, 1)?;
            Command::Play(args.first().map(|s| integer(s)).transpose()?)
        }
        "playid" => {
            arity(0, 1)?;
            Command::PlayId(args.first().map(|s| integer(s)).transpose()?)
        }
        "pause" => {
            arity(0, 1)?;
            Command::Pause(args.first().map(|s| boolean(s)).transpose()?)
        }
        "stop" | "next" | "previous" | "status" | "currentsong" | "ping" | "close" => {
            arity(0, 0)?;
            match name {
                "stop" => Command::Stop,
                "next" => Command::Next,
                "previous" => Command::Previous,
                "status" => Command::Status,
                "currentsong" => Command::CurrentSong,
                "ping" => Command::Ping,
                _ => Command::Close,
            }
        }
        _ => return Err(ParseError::Unknown(name.to_string())),
    };
    Ok(command)
}

fn integer<T: FromStr>(s: &str) -> Result<T, ParseError> {
    s.parse().map_err(|_| ParseError::Integer(s.to_string()))
}

fn boolean(s: &str) -> Result<bool, ParseError> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParseError::Boolean(s.to_string())),
    }
}

fn priority(s: &str) -> Result<u8, ParseError> {
    let value: u32 = integer(s)?;
    u8::try_from(value).map_err(|_| ParseError::Priority(s.to_string()))
}
