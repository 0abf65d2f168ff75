//! The playback order of a queue.
//!
//! `order[i]` is the position played at step `i`; `inverse[p]` is the step at
//! which position `p` plays. Both arrays are rewritten together by every
//! method here so they stay mutual inverses.

use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderMapping {
    order: Vec<usize>,
    inverse: Vec<usize>,
}

impl OrderMapping {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Position played at order index `order`.
    pub fn position(&self, order: usize) -> usize {
        self.order[order]
    }

    /// Order index at which `position` is played.
    pub fn order_of(&self, position: usize) -> usize {
        self.inverse[position]
    }

    /// Append a new position (which must equal the current length) at the
    /// end of the order.
    pub fn push(&mut self) {
        let position = self.order.len();
        self.order.push(position);
        self.inverse.push(position);
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.inverse.clear();
    }

    /// Reset to the identity permutation.
    pub fn restore(&mut self) {
        for (i, o) in self.order.iter_mut().enumerate() {
            *o = i;
        }
        self.rebuild_inverse();
    }

    /// Drop `position` from the mapping: its order slot disappears and every
    /// position above it shifts down by one.
    pub fn remove_position(&mut self, position: usize) {
        let slot = self.inverse[position];
        self.order.remove(slot);
        for o in &mut self.order {
            if *o > position {
                *o -= 1;
            }
        }
        self.inverse.pop();
        self.rebuild_inverse();
    }

    /// Rename positions after the storage has been permuted.
    ///
    /// `new_position(old)` gives the position an entry moved to. Every order
    /// slot keeps pointing at the same entry.
    pub fn remap_positions(&mut self, new_position: impl Fn(usize) -> usize) {
        for o in &mut self.order {
            *o = new_position(*o);
        }
        self.rebuild_inverse();
    }

    /// Two positions traded storage slots; keep both order slots pointing at
    /// the entries they played before.
    pub fn swap_positions(&mut self, a: usize, b: usize) {
        let (oa, ob) = (self.inverse[a], self.inverse[b]);
        self.order[oa] = b;
        self.order[ob] = a;
        self.inverse[a] = ob;
        self.inverse[b] = oa;
    }

    pub fn swap_orders(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        self.inverse[self.order[a]] = a;
        self.inverse[self.order[b]] = b;
    }

    /// Move the slot at `from` to `to`, shifting the slots in between by one.
    pub fn move_order(&mut self, from: usize, to: usize) {
        if from < to {
            self.order[from..=to].rotate_left(1);
        } else if from > to {
            self.order[to..=from].rotate_right(1);
        } else {
            return;
        }
        self.rebuild_range(from.min(to), from.max(to) + 1);
    }

    /// Randomly permute `order[start..end)`.
    pub fn shuffle_range<R: Rng + ?Sized>(&mut self, start: usize, end: usize, rng: &mut R) {
        if end <= start + 1 {
            return;
        }
        self.order[start..end].shuffle(rng);
        self.rebuild_range(start, end);
    }

    /// Stable-sort `order[start..end)` by the key computed for each position.
    pub fn sort_range_by_key<K: Ord>(
        &mut self,
        start: usize,
        end: usize,
        key: impl FnMut(&usize) -> K,
    ) {
        if end <= start + 1 {
            return;
        }
        self.order[start..end].sort_by_key(key);
        self.rebuild_range(start, end);
    }

    fn rebuild_range(&mut self, start: usize, end: usize) {
        for i in start..end {
            self.inverse[self.order[i]] = i;
        }
    }

    fn rebuild_inverse(&mut self) {
        self.inverse.resize(self.order.len(), 0);
        self.rebuild_range(0, self.order.len());
    }

    /// Check that `order` and `inverse` are mutual inverses.
    pub fn is_consistent(&self) -> bool {
        self.order.len() == self.inverse.len()
            && self
                .order
                .iter()
                .enumerate()
                .all(|(i, &p)| p < self.inverse.len() && self.inverse[p] == i)
    }
}
