//! Random-mode ordering and priorities.
//!
//! In random mode the part of the order that has not been played yet is kept
//! sorted by descending priority. Within one priority the order is whatever
//! the last shuffle or explicit move produced; nothing here reorders entries
//! of equal priority.
//!
//! `after_order` is the order index of the song playing right now. Slots at
//! or before it are history and are never rearranged by a priority change.

use rand::Rng;

use crate::error::{Error, Result};

use super::Queue;

impl Queue {
    /// Shuffle `order[start_order..]` and regroup it by descending priority.
    ///
    /// `start_order = 0` shuffles everything; `current + 1` reshuffles only
    /// what is left to play. Does nothing in sequential mode, where the
    /// order is always the identity.
    pub fn shuffle_order(&mut self, start_order: usize) {
        if !self.random {
            return;
        }
        self.increment_version();
        self.reshuffle_order_from(start_order);
    }

    /// [`Queue::shuffle_order`] without a version bump, for callers that
    /// already bumped as part of a larger change.
    pub(crate) fn reshuffle_order_from(&mut self, start_order: usize) {
        let len = self.len();
        if start_order >= len {
            return;
        }
        self.order.shuffle_range(start_order, len, &mut self.rng);
        self.sort_order_by_priority(start_order, len);
    }

    /// Move the last entry in the order to a random slot within its priority
    /// group somewhere in `order[start_order..]`.
    ///
    /// Used when a song is appended in random mode, so it does not always
    /// play last.
    pub(crate) fn shuffle_last_into(&mut self, start_order: usize) {
        let len = self.len();
        if start_order + 1 >= len {
            return;
        }
        let last = len - 1;
        let priority = self.priority_at_order(last);

        let group_start = (start_order..last)
            .find(|&i| self.priority_at_order(i) <= priority)
            .unwrap_or(last);
        let group_end = group_start
            + (group_start..last)
                .take_while(|&i| self.priority_at_order(i) == priority)
                .count();
        let slot = self.rng.gen_range(group_start..=group_end);
        self.order.move_order(last, slot);
    }

    /// Put `position` at order index `order`, shifting the slots in between.
    pub(crate) fn move_to_order(&mut self, position: usize, order: usize) {
        let from = self.order.order_of(position);
        self.order.move_order(from, order);
    }

    /// Back to sequential play: order index equals position.
    pub(crate) fn restore_order(&mut self) {
        self.order.restore();
    }

    /// Set the priority of one entry and restore the ordering invariant.
    ///
    /// Returns whether the priority actually changed. Setting the current
    /// value is a no-op and does not bump the version.
    pub fn set_priority(
        &mut self,
        position: usize,
        priority: u8,
        after_order: Option<usize>,
    ) -> Result<bool> {
        if position >= self.len() {
            return Err(Error::InvalidPosition(position));
        }
        self.set_priority_range(position, position + 1, priority, after_order)
    }

    /// Set the priority of every entry in positions `start..end`.
    pub fn set_priority_range(
        &mut self,
        start: usize,
        end: usize,
        priority: u8,
        after_order: Option<usize>,
    ) -> Result<bool> {
        self.set_priority_ranges(&[(start, end)], priority, after_order)
    }

    /// Set the priority of several position ranges in one change. Every
    /// range is validated before anything is written.
    pub fn set_priority_ranges(
        &mut self,
        ranges: &[(usize, usize)],
        priority: u8,
        after_order: Option<usize>,
    ) -> Result<bool> {
        let len = self.len();
        if let Some(&(start, end)) = ranges.iter().find(|&&(s, e)| s >= e || e > len) {
            return Err(Error::InvalidPriorityRange { start, end });
        }
        let unchanged = ranges
            .iter()
            .all(|&(s, e)| self.items[s..e].iter().all(|i| i.priority == priority));
        if unchanged {
            return Ok(false);
        }

        let version = self.increment_version();
        for &(start, end) in ranges {
            for position in start..end {
                self.apply_priority(position, priority, after_order, version);
            }
            debug!("priority {priority} for {start}:{end}");
        }
        Ok(true)
    }

    /// Set the priority of every listed id. All ids are validated before
    /// anything changes.
    pub fn set_priority_ids(
        &mut self,
        ids: &[u32],
        priority: u8,
        after_order: Option<usize>,
    ) -> Result<bool> {
        let positions = ids
            .iter()
            .map(|&id| self.id_to_position(id).ok_or(Error::InvalidId(id)))
            .collect::<Result<Vec<_>>>()?;
        if positions.iter().all(|&p| self.items[p].priority == priority) {
            return Ok(false);
        }

        let version = self.increment_version();
        for position in positions {
            self.apply_priority(position, priority, after_order, version);
        }
        Ok(true)
    }

    fn apply_priority(
        &mut self,
        position: usize,
        priority: u8,
        after_order: Option<usize>,
        version: u32,
    ) {
        let item = &mut self.items[position];
        if item.priority == priority {
            return;
        }
        item.priority = priority;
        item.version = version;

        if !self.random {
            return;
        }

        let current_order = self.order.order_of(position);
        if after_order.is_some_and(|after| current_order <= after) {
            // Already played, or playing right now.
            return;
        }

        // Front of the group with this priority (or where that group would
        // start), searched only among the songs still to be played.
        let search_from = after_order.map_or(0, |after| after + 1);
        let before = self.find_priority_order(search_from, priority, Some(current_order));
        let new_order = if before > current_order {
            before - 1
        } else {
            before
        };
        self.order.move_order(current_order, new_order);
        trace!("priority {priority}: order {current_order} -> {new_order}");
    }

    /// First order index at or after `start_order` whose priority is not
    /// above `priority`, ignoring `exclude`. Returns the length when there is
    /// none.
    fn find_priority_order(&self, start_order: usize, priority: u8, exclude: Option<usize>) -> usize {
        (start_order..self.len())
            .find(|&i| Some(i) != exclude && self.priority_at_order(i) <= priority)
            .unwrap_or(self.len())
    }

    fn sort_order_by_priority(&mut self, start: usize, end: usize) {
        let items = &self.items;
        self.order.sort_range_by_key(start, end, |&p| {
            std::cmp::Reverse(items[p].priority)
        });
    }
}
