//! Catalog reconciliation.
//!
//! Queue entries own a snapshot of their song taken when it was added. When
//! the catalog is rescanned, [`reconcile`] compares each snapshot's
//! modification time with the catalog and writes newer data back.
//!
//! Catalog lookups may be slow, so they run without the playlist lock; only
//! the final write-back holds it.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::song::Song;

use super::{SharedPlaylist, lock};

/// Lookup-by-uri access to the music catalog.
pub trait Catalog {
    /// Current catalog data for `uri`, or `None` when it is not known.
    fn lookup(&self, uri: &str) -> Option<Song>;
}

impl<S: BuildHasher> Catalog for HashMap<String, Song, S> {
    fn lookup(&self, uri: &str) -> Option<Song> {
        self.get(uri).cloned()
    }
}

/// Refresh stale snapshots in `playlist` from `catalog`.
///
/// Remote songs and songs the catalog does not know are left alone. Returns
/// the number of refreshed entries.
pub fn reconcile(playlist: &SharedPlaylist, catalog: &impl Catalog) -> usize {
    let snapshot: Vec<(u32, String, Option<i64>)> = lock(playlist)
        .queue()
        .iter()
        .filter(|item| !item.song.is_remote())
        .map(|item| (item.id, item.song.uri.clone(), item.song.mtime))
        .collect();

    let stale: Vec<(u32, Song)> = snapshot
        .into_iter()
        .filter_map(|(id, uri, mtime)| {
            let fresh = catalog.lookup(&uri)?;
            (fresh.mtime != mtime).then_some((id, fresh))
        })
        .collect();
    if stale.is_empty() {
        return 0;
    }

    let refreshed = lock(playlist).refresh_songs(stale);
    if refreshed > 0 {
        info!("refreshed {refreshed} queued songs from the catalog");
    }
    refreshed
}
