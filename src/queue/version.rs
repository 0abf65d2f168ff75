//! Version stamps and incremental change lists.
//!
//! The queue version starts at 1 and goes up by one per logical change.
//! Entries touched by a change carry that change's version, so a client that
//! last saw version `v` only needs the entries stamped above `v`.

use crate::error::{Error, Result};

use super::{Item, Queue};

/// Versions wrap before reaching this value so they stay positive as signed
/// 32-bit integers on the wire.
pub const VERSION_LIMIT: u32 = (1 << 31) - 1;

/// One changed entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change<'a> {
    pub position: usize,
    pub id: u32,
    pub item: &'a Item,
}

/// Answer to a "what changed since version `v`" request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Changes<'a> {
    /// Entries changed after the requested version, in position order.
    Diff(Vec<Change<'a>>),
    /// The requested version predates a counter wrap (or was never issued);
    /// the client must fetch the whole queue instead.
    FullResync,
}

impl<'a> Changes<'a> {
    /// The changed entries, or every entry when a full resync is required.
    #[must_use]
    pub fn into_entries(self, queue: &'a Queue) -> Vec<Change<'a>> {
        match self {
            Self::Diff(changes) => changes,
            Self::FullResync => queue.all_changes(),
        }
    }
}

impl Queue {
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Bump the version and return the new value.
    ///
    /// When the counter reaches [`VERSION_LIMIT`] every stamp is reset and
    /// counting restarts at 1; clients holding an older version are then
    /// answered with [`Changes::FullResync`].
    pub fn increment_version(&mut self) -> u32 {
        self.version += 1;
        if self.version >= VERSION_LIMIT {
            warn!("queue version wrapped around, clients will resync");
            for item in &mut self.items {
                item.version = 0;
            }
            self.version = 1;
        }
        self.version
    }

    /// Stamp the entry at `position` with the current version without
    /// moving it. Use after [`Queue::increment_version`] within the same
    /// change, e.g. when its song snapshot was refreshed.
    pub fn modify_at_position(&mut self, position: usize) -> Result<()> {
        let version = self.version;
        let item = self
            .items
            .get_mut(position)
            .ok_or(Error::InvalidPosition(position))?;
        item.version = version;
        Ok(())
    }

    /// Like [`Queue::modify_at_position`], addressed by order index.
    pub fn modify_at_order(&mut self, order: usize) -> Result<()> {
        let position = self
            .order_to_position(order)
            .ok_or(Error::InvalidPosition(order))?;
        self.modify_at_position(position)
    }

    /// Entries changed since the client saw version `since`.
    #[must_use]
    pub fn changes_since(&self, since: u32) -> Changes<'_> {
        if since > self.version {
            return Changes::FullResync;
        }
        Changes::Diff(
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.version > since)
                .map(|(position, item)| Change {
                    position,
                    id: item.id,
                    item,
                })
                .collect(),
        )
    }

    fn all_changes(&self) -> Vec<Change<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(position, item)| Change {
                position,
                id: item.id,
                item,
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn force_version(&mut self, version: u32) {
        self.version = version;
    }
}
