//! What plays after the current song.
//!
//! [`resolve`] is a pure decision over the playback modes and the current
//! order index. It never touches the queue; the playlist applies the
//! returned [`Decision`] (removing a consumed entry, reshuffling on wrap).

/// Playback mode flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modes {
    pub random: bool,
    pub repeat: bool,
    pub single: bool,
    pub consume: bool,
}

/// Why the next song is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The current song ended on its own.
    Finished,
    /// The user asked for the next song. Single mode does not hold playback
    /// back in this case.
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    /// Continue with this order index.
    Advance(usize),
    /// Reshuffle the whole order, then continue at order index 0.
    WrapAndReshuffle,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub next: Next,
    /// Order index of the entry to remove once the decision is applied.
    ///
    /// `next` is computed against the order before the removal; when it
    /// points past the removed slot the caller shifts it down by one.
    pub consume: Option<usize>,
}

impl Decision {
    fn new(next: Next) -> Self {
        Self {
            next,
            consume: None,
        }
    }
}

/// Resolve the song that follows `current` in a queue of `len` entries.
#[must_use]
pub fn resolve(current: Option<usize>, len: usize, modes: Modes, trigger: Trigger) -> Decision {
    let Some(current) = current.filter(|&c| c < len) else {
        let next = if len > 0 { Next::Advance(0) } else { Next::Stop };
        return Decision::new(next);
    };

    let next = next_order(current, len, modes, trigger);
    Decision {
        next,
        consume: modes.consume.then_some(current),
    }
}

fn next_order(current: usize, len: usize, modes: Modes, trigger: Trigger) -> Next {
    if modes.single && trigger == Trigger::Finished {
        if modes.repeat && !modes.consume {
            return Next::Advance(current);
        }
        if !modes.repeat {
            return Next::Stop;
        }
    }

    if current + 1 < len {
        Next::Advance(current + 1)
    } else if modes.repeat && (current > 0 || !modes.consume) {
        // Wrapping a one-entry consume queue would replay a song that is
        // about to be removed.
        if modes.random {
            Next::WrapAndReshuffle
        } else {
            Next::Advance(0)
        }
    } else {
        Next::Stop
    }
}
