//! Queue error taxonomy.
//!
//! Every queue operation validates its arguments up front and reports
//! failures through [`Error`]. None of these are fatal: the command layer
//! turns them into `ACK` replies and carries on.

use thiserror::Error;

/// Result type for queue and playlist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol `ACK` codes used when reporting an [`Error`] to a client.
pub mod ack {
    pub const ARG: u32 = 2;
    pub const UNKNOWN: u32 = 5;
    pub const NO_EXIST: u32 = 50;
    pub const PLAYLIST_MAX: u32 = 51;
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A position outside `0..length`.
    #[error("bad song index: {0}")]
    InvalidPosition(usize),

    /// An id that does not belong to a live entry.
    #[error("no such song: {0}")]
    InvalidId(u32),

    /// The queue already holds `max_length` entries.
    #[error("playlist is at the max size ({0})")]
    CapacityExceeded(usize),

    /// A priority range that is empty or exceeds the queue.
    #[error("bad priority range: {start}:{end}")]
    InvalidPriorityRange { start: usize, end: usize },

    /// A move/shuffle/delete range that is out of bounds.
    #[error("bad range: {start}:{end}")]
    InvalidRange { start: usize, end: usize },
}

impl Error {
    /// The `ACK` code this error is reported with.
    #[must_use]
    pub fn ack_code(&self) -> u32 {
        match self {
            Self::InvalidPosition(_)
            | Self::InvalidPriorityRange { .. }
            | Self::InvalidRange { .. } => ack::ARG,
            Self::InvalidId(_) => ack::NO_EXIST,
            Self::CapacityExceeded(_) => ack::PLAYLIST_MAX,
        }
    }
}
