//! Structural edits: append, delete, move, swap, clear.
//!
//! Each public method is one logical change: it bumps the queue version once
//! and stamps every entry whose position or content changed with the new
//! version. In random mode the order keeps pointing at the same entries; in
//! sequential mode it stays the identity.

use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::song::Song;

use super::{Item, Queue};

impl Queue {
    /// Append `song` at the end of the queue and return its new id.
    pub fn append(&mut self, song: Song, priority: u8) -> Result<u32> {
        if self.is_full() {
            return Err(Error::CapacityExceeded(self.max_length));
        }

        let position = self.items.len();
        let id = self
            .ids
            .insert(position)
            .ok_or(Error::CapacityExceeded(self.max_length))?;
        let version = self.increment_version();

        trace!("append {} as id {id} at {position}", song.uri);
        self.items.push(Item {
            song,
            id,
            version,
            priority,
        });
        self.order.push();
        Ok(id)
    }

    pub fn delete_position(&mut self, position: usize) -> Result<Item> {
        if position >= self.len() {
            return Err(Error::InvalidPosition(position));
        }

        self.increment_version();
        let item = self.items.remove(position);
        self.ids.erase(item.id);
        for (p, moved) in self.items.iter().enumerate().skip(position) {
            self.ids.relocate(moved.id, p);
        }
        self.order.remove_position(position);
        trace!("deleted id {} from {position}", item.id);
        Ok(item)
    }

    pub fn delete_id(&mut self, id: u32) -> Result<Item> {
        let position = self.id_to_position(id).ok_or(Error::InvalidId(id))?;
        self.delete_position(position)
    }

    /// Delete positions `start..end` in one change.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<Vec<Item>> {
        if start >= end || end > self.len() {
            return Err(Error::InvalidRange { start, end });
        }

        self.increment_version();
        let removed: Vec<Item> = self.items.drain(start..end).collect();
        for item in &removed {
            self.ids.erase(item.id);
        }
        for (p, moved) in self.items.iter().enumerate().skip(start) {
            self.ids.relocate(moved.id, p);
        }
        // Highest first so the lower positions are still valid when reached.
        for position in (start..end).rev() {
            self.order.remove_position(position);
        }
        Ok(removed)
    }

    /// Move positions `start..end` so the block begins at `to`.
    ///
    /// `to` is the destination of the block's first entry in the resulting
    /// queue, so `to + (end - start)` must not exceed the length.
    pub fn move_range(&mut self, start: usize, end: usize, to: usize) -> Result<()> {
        let len = self.len();
        if start >= end || end > len || to > len - (end - start) {
            return Err(Error::InvalidRange { start, end });
        }
        if start == to {
            return Ok(());
        }

        let version = self.increment_version();
        self.relocate(start, end, to, version);
        Ok(())
    }

    /// Move the entry with `id` to `to` as part of the change that is
    /// already in progress, stamping it with the current version.
    pub(crate) fn place_id(&mut self, id: u32, to: usize) -> Result<()> {
        let position = self.id_to_position(id).ok_or(Error::InvalidId(id))?;
        if to >= self.len() {
            return Err(Error::InvalidPosition(to));
        }
        if position != to {
            self.relocate(position, position + 1, to, self.version);
        }
        Ok(())
    }

    /// Move a validated block and stamp everything that moved with `version`.
    fn relocate(&mut self, start: usize, end: usize, to: usize, version: u32) {
        let len = self.len();
        let count = end - start;

        // New position of the entry that used to live at `p`.
        let new_position = |p: usize| -> usize {
            if (start..end).contains(&p) {
                p - start + to
            } else if to > start && p >= end && p < to + count {
                p - count
            } else if to < start && p >= to && p < start {
                p + count
            } else {
                p
            }
        };

        let mut slots: Vec<Option<Item>> = self.items.drain(..).map(Some).collect();
        let mut moved: Vec<Option<Item>> = (0..len).map(|_| None).collect();
        for (p, slot) in slots.iter_mut().enumerate() {
            moved[new_position(p)] = slot.take();
        }
        self.items = moved.into_iter().flatten().collect();

        let lo = start.min(to);
        let hi = end.max(to + count);
        for p in lo..hi {
            let item = &mut self.items[p];
            item.version = version;
            self.ids.relocate(item.id, p);
        }

        if self.random {
            self.order.remap_positions(new_position);
        }
        debug!("moved {start}:{end} to {to}");
    }

    /// Move the entry with `id` to position `to`.
    pub fn move_id(&mut self, id: u32, to: usize) -> Result<()> {
        let position = self.id_to_position(id).ok_or(Error::InvalidId(id))?;
        self.move_range(position, position + 1, to)
    }

    pub fn swap_positions(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.len();
        for p in [a, b] {
            if p >= len {
                return Err(Error::InvalidPosition(p));
            }
        }

        let version = self.increment_version();
        self.swap_items(a, b, version);
        Ok(())
    }

    pub fn swap_ids(&mut self, a: u32, b: u32) -> Result<()> {
        let pa = self.id_to_position(a).ok_or(Error::InvalidId(a))?;
        let pb = self.id_to_position(b).ok_or(Error::InvalidId(b))?;
        self.swap_positions(pa, pb)
    }

    fn swap_items(&mut self, a: usize, b: usize, version: u32) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        for p in [a, b] {
            let item = &mut self.items[p];
            item.version = version;
            self.ids.relocate(item.id, p);
        }
        if self.random {
            self.order.swap_positions(a, b);
        }
    }

    /// Physically shuffle positions `start..end`.
    ///
    /// With `pinned` inside the range, that entry is first moved to `start`
    /// and stays there; only the rest is shuffled. This keeps the playing
    /// song in front of the songs shuffled after it.
    pub fn shuffle_range(&mut self, start: usize, end: usize, pinned: Option<usize>) -> Result<()> {
        if start > end || end > self.len() {
            return Err(Error::InvalidRange { start, end });
        }
        if end - start < 2 {
            return Ok(());
        }

        let version = self.increment_version();
        let mut start = start;
        if let Some(p) = pinned.filter(|p| (start..end).contains(p)) {
            self.swap_items(start, p, version);
            start += 1;
        }

        // `shuffled[i]` is the old position that ends up at `i`.
        let mut shuffled: Vec<usize> = (start..end).collect();
        shuffled.shuffle(&mut self.rng);
        let mut new_position: Vec<usize> = (0..self.len()).collect();
        for (offset, &old) in shuffled.iter().enumerate() {
            new_position[old] = start + offset;
        }

        let mut slots: Vec<Option<Item>> = self.items.drain(start..end).map(Some).collect();
        let tail = self.items.split_off(start);
        for &old in &shuffled {
            if let Some(mut item) = slots[old - start].take() {
                item.version = version;
                self.items.push(item);
            }
        }
        self.items.extend(tail);
        for p in start..end {
            let id = self.items[p].id;
            self.ids.relocate(id, p);
        }

        if self.random {
            self.order.remap_positions(|p| new_position[p]);
        }
        Ok(())
    }

    /// Remove every entry and free all ids.
    pub fn clear(&mut self) {
        self.increment_version();
        self.items.clear();
        self.order.clear();
        self.ids.clear();
    }

    /// Edit the song snapshot at `position` in place, keeping id, place and
    /// priority.
    pub fn modify_song(&mut self, position: usize, edit: impl FnOnce(&mut Song)) -> Result<()> {
        if position >= self.len() {
            return Err(Error::InvalidPosition(position));
        }
        let version = self.increment_version();
        let item = &mut self.items[position];
        edit(&mut item.song);
        item.version = version;
        Ok(())
    }

    /// Mutable access for in-place snapshot updates. Call
    /// `modify_at_position` afterwards so clients see the change.
    pub(crate) fn song_mut(&mut self, position: usize) -> Option<&mut Song> {
        self.items.get_mut(position).map(|item| &mut item.song)
    }
}
