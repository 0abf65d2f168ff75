//! The playback queue.
//!
//! Entries are stored by *position* (`0..len`, contiguous) and played in
//! *order* (a permutation of positions kept in [`OrderMapping`]). Each entry
//! also carries a client-visible id that survives reordering, a priority that
//! drives random-mode ordering and the version at which it last changed.
//!
//! Structural edits live in `store`, order shuffling and priorities in
//! `priority`, change stamps and diffs in `version`.

mod ids;
mod order;
mod priority;
mod store;
mod version;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::song::Song;

use ids::IdTable;
pub use order::OrderMapping;
pub use version::{Change, Changes, VERSION_LIMIT};

/// One queue entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub song: Song,
    pub id: u32,
    /// Version at which this entry was last added, moved or modified.
    pub version: u32,
    pub priority: u8,
}

#[derive(Debug)]
pub struct Queue {
    max_length: usize,
    items: Vec<Item>,
    order: OrderMapping,
    ids: IdTable,
    version: u32,

    /// Play in `order` instead of position order. Changing this flag alone
    /// does not touch the order; see `Playlist::set_random`.
    pub random: bool,
    pub repeat: bool,
    pub single: bool,
    pub consume: bool,

    rng: StdRng,
}

impl Queue {
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        Self::with_rng(max_length, StdRng::from_entropy())
    }

    /// A queue whose shuffles are reproducible.
    #[must_use]
    pub fn with_seed(max_length: usize, seed: u64) -> Self {
        Self::with_rng(max_length, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_length: usize, rng: StdRng) -> Self {
        Self {
            max_length,
            items: Vec::new(),
            order: OrderMapping::default(),
            ids: IdTable::new(max_length),
            version: 1,
            random: false,
            repeat: false,
            single: false,
            consume: false,
            rng,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_length
    }

    /// Entry at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Entry with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: u32) -> Option<&Item> {
        self.id_to_position(id).map(|p| &self.items[p])
    }

    #[must_use]
    pub fn id_to_position(&self, id: u32) -> Option<usize> {
        self.ids.get(id).filter(|&p| p < self.items.len())
    }

    #[must_use]
    pub fn position_to_id(&self, position: usize) -> Option<u32> {
        self.items.get(position).map(|item| item.id)
    }

    /// Position played at order index `order`.
    #[must_use]
    pub fn order_to_position(&self, order: usize) -> Option<usize> {
        (order < self.len()).then(|| self.order.position(order))
    }

    /// Order index at which `position` is played.
    #[must_use]
    pub fn position_to_order(&self, position: usize) -> Option<usize> {
        (position < self.len()).then(|| self.order.order_of(position))
    }

    #[must_use]
    pub fn order(&self) -> &OrderMapping {
        &self.order
    }

    /// Priority of the entry played at order index `order`.
    #[must_use]
    pub fn priority_at_order(&self, order: usize) -> u8 {
        self.items[self.order.position(order)].priority
    }

    /// All entries in position order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Item> {
        self.items.iter()
    }

    /// `(position, entry)` pairs in playback order.
    ///
    /// This is the primitive playlist persistence consumes.
    pub fn iter_in_order(&self) -> impl ExactSizeIterator<Item = (usize, &Item)> {
        self.order
            .as_slice()
            .iter()
            .map(move |&p| (p, &self.items[p]))
    }

    /// Check every structural invariant: contiguous positions, a consistent
    /// order bijection, one position per live id and no future stamps.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.items.len() <= self.max_length
            && self.order.len() == self.items.len()
            && self.order.is_consistent()
            && self
                .items
                .iter()
                .enumerate()
                .all(|(p, item)| self.ids.get(item.id) == Some(p) && item.version <= self.version)
            && (self.random
                || self
                    .order
                    .as_slice()
                    .iter()
                    .enumerate()
                    .all(|(i, &p)| i == p))
    }
}

#[cfg(test)]
mod tests;
