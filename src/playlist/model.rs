//! Playlist model types: `Playlist`, `PlaybackState` and the shared handle.
//!
//! The `Playlist` owns the queue and knows which entry is current. The
//! current entry is remembered by id, so it stays put while the queue is
//! reordered around it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::queue::{Changes, Item, Queue};
use crate::resolver::{self, Decision, Modes, Next, Trigger};
use crate::song::{Song, TagType};

/// The playback state of the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

impl PlaybackState {
    /// Name used in `state:` status lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stop",
            Self::Playing => "play",
            Self::Paused => "pause",
        }
    }
}

/// Handle shared by the player thread and the command front end.
pub type SharedPlaylist = Arc<Mutex<Playlist>>;

/// Lock the shared playlist for one logical operation. A poisoned lock is
/// taken over as is.
pub fn lock(playlist: &SharedPlaylist) -> MutexGuard<'_, Playlist> {
    playlist.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct Playlist {
    queue: Queue,
    current: Option<u32>,
    state: PlaybackState,
    /// Bumped whenever a (possibly identical) song starts from the top.
    generation: u64,
}

impl Playlist {
    pub fn new(queue: Queue) -> Self {
        Self {
            queue,
            current: None,
            state: PlaybackState::Stopped,
            generation: 0,
        }
    }

    /// Wrap into a [`SharedPlaylist`].
    pub fn shared(self) -> SharedPlaylist {
        Arc::new(Mutex::new(self))
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current
    }

    pub fn current_position(&self) -> Option<usize> {
        self.current.and_then(|id| self.queue.id_to_position(id))
    }

    pub fn current_order(&self) -> Option<usize> {
        self.current_position()
            .and_then(|p| self.queue.position_to_order(p))
    }

    pub fn current_song(&self) -> Option<&Item> {
        self.current.and_then(|id| self.queue.get_by_id(id))
    }

    /// Changes every time a song starts playing from the beginning.
    pub fn song_generation(&self) -> u64 {
        self.generation
    }

    pub fn modes(&self) -> Modes {
        Modes {
            random: self.queue.random,
            repeat: self.queue.repeat,
            single: self.queue.single,
            consume: self.queue.consume,
        }
    }

    /// Order index that counts as "now" for priority changes and appends.
    /// Nothing is history while playback is stopped.
    fn after_order(&self) -> Option<usize> {
        if self.state == PlaybackState::Stopped {
            None
        } else {
            self.current_order()
        }
    }

    /// Append `song`; in random mode it lands somewhere among the songs not
    /// played yet.
    pub fn add(&mut self, song: Song) -> Result<u32> {
        let id = self.queue.append(song, 0)?;
        if self.queue.random {
            let start = self.after_order().map_or(0, |o| o + 1);
            self.queue.shuffle_last_into(start);
        }
        Ok(id)
    }

    /// Append `song` and move it to `position`, all in one version.
    pub fn add_at(&mut self, song: Song, position: usize) -> Result<u32> {
        if position > self.queue.len() {
            return Err(Error::InvalidPosition(position));
        }
        let id = self.add(song)?;
        self.queue.place_id(id, position)?;
        Ok(id)
    }

    pub fn delete_position(&mut self, position: usize) -> Result<()> {
        if position >= self.queue.len() {
            return Err(Error::InvalidPosition(position));
        }
        self.remove_span(position, position + 1)
    }

    pub fn delete_id(&mut self, id: u32) -> Result<()> {
        let position = self.queue.id_to_position(id).ok_or(Error::InvalidId(id))?;
        self.remove_span(position, position + 1)
    }

    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<()> {
        if start >= end || end > self.queue.len() {
            return Err(Error::InvalidRange { start, end });
        }
        self.remove_span(start, end)
    }

    fn remove_span(&mut self, start: usize, end: usize) -> Result<()> {
        let removed_current = self
            .current_position()
            .filter(|p| (start..end).contains(p))
            .and_then(|p| self.queue.position_to_order(p));
        // Where the song after the current one will sit once the span is gone.
        let successor = removed_current.map(|current| {
            let earlier = (start..end)
                .filter_map(|p| self.queue.position_to_order(p))
                .filter(|&o| o < current)
                .count();
            current - earlier
        });

        self.queue.delete_range(start, end)?;

        if let Some(order) = successor {
            if self.state != PlaybackState::Stopped && order < self.queue.len() {
                self.start_order(order);
            } else {
                self.halt();
                self.current = None;
            }
        }
        Ok(())
    }

    pub fn move_range(&mut self, start: usize, end: usize, to: usize) -> Result<()> {
        self.queue.move_range(start, end, to)
    }

    pub fn move_id(&mut self, id: u32, to: usize) -> Result<()> {
        self.queue.move_id(id, to)
    }

    pub fn swap_positions(&mut self, a: usize, b: usize) -> Result<()> {
        self.queue.swap_positions(a, b)
    }

    pub fn swap_ids(&mut self, a: u32, b: u32) -> Result<()> {
        self.queue.swap_ids(a, b)
    }

    /// Shuffle positions `start..end` (everything when `None`). A playing
    /// song inside the range is moved to its start first.
    pub fn shuffle(&mut self, range: Option<(usize, usize)>) -> Result<()> {
        let (start, end) = range.unwrap_or((0, self.queue.len()));
        let pinned = self.after_order().and(self.current_position());
        self.queue.shuffle_range(start, end, pinned)
    }

    /// Set `priority` on every position range.
    pub fn set_priority(&mut self, priority: u8, ranges: &[(usize, usize)]) -> Result<()> {
        let after = self.after_order();
        self.queue.set_priority_ranges(ranges, priority, after)?;
        Ok(())
    }

    pub fn set_priority_ids(&mut self, priority: u8, ids: &[u32]) -> Result<()> {
        let after = self.after_order();
        self.queue.set_priority_ids(ids, priority, after)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.halt();
        self.current = None;
    }

    /// Attach an extra tag value to the entry with `id`.
    pub fn add_tag(&mut self, id: u32, tag: TagType, value: &str) -> Result<()> {
        let position = self.queue.id_to_position(id).ok_or(Error::InvalidId(id))?;
        self.queue
            .modify_song(position, |song| song.tag.add(tag, value))
    }

    pub fn changes_since(&self, version: u32) -> Changes<'_> {
        self.queue.changes_since(version)
    }

    /// Write fresh catalog data into the snapshots of the given ids.
    ///
    /// Entries whose id is gone or whose uri no longer matches are skipped.
    /// Returns how many entries were refreshed; the version is bumped once
    /// when that is non-zero.
    pub fn refresh_songs(&mut self, updates: Vec<(u32, Song)>) -> usize {
        let targets: Vec<(usize, Song)> = updates
            .into_iter()
            .filter_map(|(id, song)| {
                let position = self.queue.id_to_position(id)?;
                let stored = self.queue.get(position)?;
                (stored.song.uri == song.uri).then_some((position, song))
            })
            .collect();
        if targets.is_empty() {
            return 0;
        }

        self.queue.increment_version();
        let mut refreshed = 0;
        for (position, fresh) in targets {
            let Some(song) = self.queue.song_mut(position) else {
                continue;
            };
            song.mtime = fresh.mtime;
            song.tag = fresh.tag;
            if self.queue.modify_at_position(position).is_ok() {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Apply every mode flag at once, e.g. from settings at startup.
    pub fn apply_modes(&mut self, modes: Modes) {
        self.set_random(modes.random);
        self.queue.repeat = modes.repeat;
        self.queue.single = modes.single;
        self.queue.consume = modes.consume;
    }

    /// Switch random mode. Turning it on keeps the current song first and
    /// shuffles everything else; turning it off restores position order.
    pub fn set_random(&mut self, random: bool) {
        if self.queue.random == random {
            return;
        }
        self.queue.random = random;
        if random {
            let start = match self.current_position() {
                Some(position) => {
                    self.queue.move_to_order(position, 0);
                    1
                }
                None => 0,
            };
            self.queue.reshuffle_order_from(start);
        } else {
            self.queue.restore_order();
        }
        debug!("random: {random}");
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.queue.repeat = repeat;
    }

    pub fn set_single(&mut self, single: bool) {
        self.queue.single = single;
    }

    pub fn set_consume(&mut self, consume: bool) {
        self.queue.consume = consume;
    }

    /// Start playing `position`, or resume/restart the current song when
    /// `None`.
    pub fn play(&mut self, position: Option<usize>) -> Result<()> {
        let Some(position) = position else {
            match (self.state, self.current_order()) {
                (PlaybackState::Paused, Some(_)) => self.state = PlaybackState::Playing,
                (PlaybackState::Playing, Some(_)) => {}
                (_, Some(order)) => self.start_order(order),
                (_, None) if !self.queue.is_empty() => self.start_order(0),
                (_, None) => {}
            }
            return Ok(());
        };

        if position >= self.queue.len() {
            return Err(Error::InvalidPosition(position));
        }
        let order = self.bring_forward(position);
        self.start_order(order);
        Ok(())
    }

    pub fn play_id(&mut self, id: u32) -> Result<()> {
        let position = self.queue.id_to_position(id).ok_or(Error::InvalidId(id))?;
        self.play(Some(position))
    }

    /// In random mode an explicitly chosen song is moved next to the current
    /// one so the rest of the shuffled order still plays afterwards. Returns
    /// the order index to start.
    fn bring_forward(&mut self, position: usize) -> usize {
        let order = self.queue.position_to_order(position).unwrap_or(position);
        if !self.queue.random {
            return order;
        }
        let slot = match self.after_order() {
            Some(current) if order > current => current + 1,
            Some(current) => current,
            None => 0,
        };
        self.queue.move_to_order(position, slot);
        slot
    }

    /// Toggle pause, or force it with `Some(..)`. Has no effect while
    /// stopped.
    pub fn pause(&mut self, pause: Option<bool>) {
        self.state = match (self.state, pause) {
            (PlaybackState::Playing, None | Some(true)) => PlaybackState::Paused,
            (PlaybackState::Paused, None | Some(false)) => PlaybackState::Playing,
            (state, _) => state,
        };
    }

    /// Stop playback. The current song is kept so `play` restarts it.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Stopped {
            info!("playback stopped");
        }
        self.halt();
    }

    fn halt(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Skip to the next song. Ignored while stopped.
    pub fn next(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.advance(Trigger::Skip);
    }

    /// The current song played to its end.
    pub fn song_finished(&mut self) {
        self.advance(Trigger::Finished);
    }

    pub fn previous(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        let Some(order) = self.current_order() else {
            return;
        };
        let target = if order > 0 {
            order - 1
        } else if self.queue.repeat {
            self.queue.len() - 1
        } else {
            order
        };
        self.start_order(target);
    }

    /// Position that plays after the current song, if it is known yet.
    pub fn upcoming_position(&self) -> Option<usize> {
        let decision = resolver::resolve(
            self.current_order(),
            self.queue.len(),
            self.modes(),
            Trigger::Finished,
        );
        match decision.next {
            Next::Advance(order) => self.queue.order_to_position(order),
            Next::WrapAndReshuffle | Next::Stop => None,
        }
    }

    fn advance(&mut self, trigger: Trigger) {
        let decision = resolver::resolve(
            self.current_order(),
            self.queue.len(),
            self.modes(),
            trigger,
        );
        trace!("resolved {decision:?}");
        self.apply(decision);
    }

    fn apply(&mut self, decision: Decision) {
        let mut next = decision.next;
        if let Some(order) = decision.consume {
            if let Some(position) = self.queue.order_to_position(order) {
                if let Ok(item) = self.queue.delete_position(position) {
                    debug!("consumed {}", item.song.uri);
                }
            }
            self.current = None;
            if let Next::Advance(n) = next {
                if n > order {
                    next = Next::Advance(n - 1);
                }
            }
        }

        match next {
            Next::Advance(order) => self.start_order(order),
            Next::WrapAndReshuffle => {
                self.queue.reshuffle_order_from(0);
                self.start_order(0);
            }
            Next::Stop => {
                info!("end of queue");
                self.halt();
            }
        }
    }

    fn start_order(&mut self, order: usize) {
        let Some(item) = self
            .queue
            .order_to_position(order)
            .and_then(|p| self.queue.get(p))
        else {
            self.halt();
            return;
        };
        debug!("starting {} (id {})", item.song.uri, item.id);
        self.current = Some(item.id);
        self.state = PlaybackState::Playing;
        self.generation += 1;
    }
}
