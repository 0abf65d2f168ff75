//! Mapping from client-visible song ids to queue positions.
//!
//! Ids are handed out from a counter that walks the whole id space before
//! wrapping, skipping ids that are still alive. A freed id is therefore not
//! handed out again until every other id has been tried, which keeps ids
//! stable from a client's point of view for as long as possible.

/// Number of ids available per queue slot.
const ID_SPACE_FACTOR: usize = 4;

#[derive(Clone, Debug)]
pub struct IdTable {
    /// `slots[id]` is the position of the entry with that id. Grows on
    /// demand; ids past the end are free.
    slots: Vec<Option<usize>>,
    /// Number of ids available in total.
    space: usize,
    next: usize,
}

impl IdTable {
    pub fn new(max_length: usize) -> Self {
        Self {
            slots: Vec::new(),
            space: max_length.saturating_mul(ID_SPACE_FACTOR).max(1),
            next: 0,
        }
    }

    pub fn get(&self, id: u32) -> Option<usize> {
        self.slots.get(id as usize).copied().flatten()
    }

    /// Allocate an id for `position`.
    ///
    /// Returns `None` only when every id is in use, which cannot happen while
    /// the queue respects its capacity.
    pub fn insert(&mut self, position: usize) -> Option<u32> {
        for step in 0..self.space {
            let id = (self.next + step) % self.space;
            if self.slots.get(id).copied().flatten().is_some() {
                continue;
            }
            let id_u32 = u32::try_from(id).ok()?;
            if id >= self.slots.len() {
                self.slots.resize(id + 1, None);
            }
            self.slots[id] = Some(position);
            self.next = (id + 1) % self.space;
            return Some(id_u32);
        }
        None
    }

    /// Point a live id at a new position.
    pub fn relocate(&mut self, id: u32, position: usize) {
        if let Some(slot) = self.slots.get_mut(id as usize) {
            debug_assert!(slot.is_some(), "relocating dead id {id}");
            *slot = Some(position);
        }
    }

    pub fn erase(&mut self, id: u32) {
        if let Some(slot) = self.slots.get_mut(id as usize) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}
