use super::*;
use crate::error::Error;

use std::collections::{HashMap, HashSet};

fn song(n: usize) -> Song {
    Song::new(format!("music/{n:02}.flac"))
}

fn queue(n: usize) -> Queue {
    let mut q = Queue::with_seed(32, 7);
    for i in 0..n {
        q.append(song(i), 0).unwrap();
    }
    q
}

fn random_queue(n: usize) -> Queue {
    let mut q = queue(n);
    q.random = true;
    q.shuffle_order(0);
    q
}

fn uris(q: &Queue) -> Vec<&str> {
    q.iter().map(|item| item.song.uri.as_str()).collect()
}

fn ids_in_order(q: &Queue) -> Vec<u32> {
    q.iter_in_order().map(|(_, item)| item.id).collect()
}

fn assert_priority_sorted(q: &Queue, from: usize) {
    for i in from + 1..q.len() {
        assert!(
            q.priority_at_order(i - 1) >= q.priority_at_order(i),
            "order {} (prio {}) before order {i} (prio {})",
            i - 1,
            q.priority_at_order(i - 1),
            q.priority_at_order(i)
        );
    }
}

fn assert_bijection(q: &Queue) {
    assert!(q.is_consistent());
    for k in 0..q.len() {
        let position = q.order_to_position(k).unwrap();
        assert_eq!(q.position_to_order(position), Some(k));
    }
}

#[test]
fn order_mapping_move_order_rotates_and_keeps_inverse() {
    let mut order = OrderMapping::default();
    for _ in 0..5 {
        order.push();
    }
    order.move_order(4, 1);
    assert_eq!(order.as_slice(), &[0, 4, 1, 2, 3]);
    order.move_order(1, 3);
    assert_eq!(order.as_slice(), &[0, 1, 2, 4, 3]);
    assert!(order.is_consistent());
    assert_eq!(order.order_of(4), 3);
}

#[test]
fn order_mapping_remove_position_renumbers() {
    let mut order = OrderMapping::default();
    for _ in 0..4 {
        order.push();
    }
    order.swap_orders(0, 3);
    assert_eq!(order.as_slice(), &[3, 1, 2, 0]);
    order.remove_position(1);
    assert_eq!(order.as_slice(), &[2, 1, 0]);
    assert!(order.is_consistent());
}

#[test]
fn append_assigns_ids_and_bumps_version() {
    let mut q = Queue::with_seed(4, 1);
    assert_eq!(q.version(), 1);
    let a = q.append(song(0), 0).unwrap();
    let b = q.append(song(1), 3).unwrap();
    assert_ne!(a, b);
    assert_eq!(q.version(), 3);
    assert_eq!(q.get(1).map(|i| (i.id, i.priority, i.version)), Some((b, 3, 3)));
    assert_eq!(q.id_to_position(a), Some(0));
    assert_eq!(ids_in_order(&q), vec![a, b]);
}

#[test]
fn append_rejects_when_full() {
    let mut q = Queue::with_seed(2, 1);
    q.append(song(0), 0).unwrap();
    q.append(song(1), 0).unwrap();
    let version = q.version();
    assert_eq!(q.append(song(2), 0), Err(Error::CapacityExceeded(2)));
    assert_eq!(q.len(), 2);
    assert_eq!(q.version(), version);
}

#[test]
fn append_then_delete_restores_length_and_retires_id() {
    let mut q = queue(5);
    let id = q.append(song(9), 0).unwrap();
    let position = q.id_to_position(id).unwrap();
    let removed = q.delete_position(position).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(q.len(), 5);
    assert!(q.get_by_id(id).is_none());
    assert!(q.iter().all(|item| item.id != id));
    assert_bijection(&q);
}

#[test]
fn freed_ids_are_not_reused_before_the_id_space_wraps() {
    let mut q = Queue::with_seed(2, 1);
    let mut seen = Vec::new();
    // Id space is four times the capacity.
    for i in 0..8 {
        let id = q.append(song(i), 0).unwrap();
        seen.push(id);
        q.delete_id(id).unwrap();
    }
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 8);

    let keep = q.append(song(8), 0).unwrap();
    assert_eq!(keep, seen[0]);
    let next = q.append(song(9), 0).unwrap();
    assert_ne!(next, keep);
}

#[test]
fn delete_rejects_bad_arguments() {
    let mut q = queue(3);
    assert_eq!(q.delete_position(3).unwrap_err(), Error::InvalidPosition(3));
    assert_eq!(q.delete_id(999).unwrap_err(), Error::InvalidId(999));
    assert_eq!(q.len(), 3);
}

#[test]
fn delete_in_random_mode_keeps_remaining_order() {
    let mut q = random_queue(8);
    let before = ids_in_order(&q);
    let victim = before[3];
    q.delete_id(victim).unwrap();
    let expected: Vec<u32> = before.into_iter().filter(|&id| id != victim).collect();
    assert_eq!(ids_in_order(&q), expected);
    assert_bijection(&q);
}

#[test]
fn delete_range_removes_block() {
    let mut q = queue(6);
    let removed = q.delete_range(1, 4).unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(uris(&q), vec!["music/00.flac", "music/04.flac", "music/05.flac"]);
    assert_eq!(
        q.delete_range(2, 5).unwrap_err(),
        Error::InvalidRange { start: 2, end: 5 }
    );
    assert_bijection(&q);
}

#[test]
fn move_range_forward_and_backward() {
    let mut q = queue(5);
    q.move_range(1, 3, 3).unwrap();
    assert_eq!(
        uris(&q),
        vec!["music/00.flac", "music/03.flac", "music/04.flac", "music/01.flac", "music/02.flac"]
    );
    q.move_range(3, 5, 0).unwrap();
    assert_eq!(
        uris(&q),
        vec!["music/01.flac", "music/02.flac", "music/00.flac", "music/03.flac", "music/04.flac"]
    );
    assert_bijection(&q);
}

#[test]
fn move_range_rejects_destination_past_end() {
    let mut q = queue(5);
    let version = q.version();
    assert_eq!(
        q.move_range(3, 5, 4).unwrap_err(),
        Error::InvalidRange { start: 3, end: 5 }
    );
    assert_eq!(
        q.move_range(2, 2, 0).unwrap_err(),
        Error::InvalidRange { start: 2, end: 2 }
    );
    assert_eq!(q.version(), version);
}

#[test]
fn move_range_rejects_destinations_that_overflow() {
    let mut q = queue(2);
    assert_eq!(
        q.move_range(0, 1, usize::MAX).unwrap_err(),
        Error::InvalidRange { start: 0, end: 1 }
    );
    assert_eq!(
        q.move_id(0, usize::MAX).unwrap_err(),
        Error::InvalidRange { start: 0, end: 1 }
    );
    assert_eq!(uris(&q), vec!["music/00.flac", "music/01.flac"]);
}

#[test]
fn move_in_random_mode_keeps_playback_sequence() {
    let mut q = random_queue(10);
    let before = ids_in_order(&q);
    let id = q.position_to_id(7).unwrap();
    q.move_id(id, 2).unwrap();
    assert_eq!(q.id_to_position(id), Some(2));
    assert_eq!(ids_in_order(&q), before);
    assert_bijection(&q);
}

#[test]
fn swap_moves_ids_and_priorities_with_entries() {
    let mut q = queue(4);
    q.set_priority(0, 9, None).unwrap();
    let (a, b) = (q.position_to_id(0).unwrap(), q.position_to_id(3).unwrap());
    q.swap_ids(a, b).unwrap();
    assert_eq!(q.id_to_position(a), Some(3));
    assert_eq!(q.get(3).map(|i| i.priority), Some(9));
    assert_eq!(q.swap_positions(0, 4).unwrap_err(), Error::InvalidPosition(4));
    assert_bijection(&q);
}

#[test]
fn swap_in_random_mode_keeps_playback_sequence() {
    let mut q = random_queue(6);
    let before = ids_in_order(&q);
    q.swap_positions(0, 5).unwrap();
    assert_eq!(ids_in_order(&q), before);
    assert_bijection(&q);
}

#[test]
fn shuffle_range_keeps_pinned_entry_first() {
    let mut q = queue(12);
    let pinned = q.position_to_id(6).unwrap();
    q.shuffle_range(2, 12, Some(6)).unwrap();
    assert_eq!(q.id_to_position(pinned), Some(2));
    assert_eq!(&uris(&q)[..2], &["music/00.flac", "music/01.flac"]);
    assert_bijection(&q);
}

#[test]
fn shuffle_range_draws_every_arrangement_evenly() {
    let mut q = queue(3);
    let mut counts: HashMap<Vec<u32>, usize> = HashMap::new();
    for _ in 0..6000 {
        q.shuffle_range(0, 3, None).unwrap();
        *counts.entry(q.iter().map(|item| item.id).collect()).or_default() += 1;
    }
    assert_eq!(counts.len(), 6);
    for (arrangement, count) in &counts {
        assert!((800..1200).contains(count), "{arrangement:?} drawn {count} times");
    }
    assert_bijection(&q);
}

#[test]
fn shuffle_range_in_random_mode_keeps_playback_sequence() {
    let mut q = random_queue(8);
    let before = ids_in_order(&q);
    q.shuffle_range(1, 7, None).unwrap();
    assert_eq!(ids_in_order(&q), before);
    assert_bijection(&q);
}

#[test]
fn clear_frees_everything_and_bumps_version() {
    let mut q = queue(3);
    let version = q.version();
    q.clear();
    assert!(q.is_empty());
    assert_eq!(q.version(), version + 1);
    assert!(q.order().is_empty());
    assert_bijection(&q);
}

#[test]
fn sequential_mode_keeps_identity_order() {
    let mut q = queue(6);
    q.move_range(0, 2, 4).unwrap();
    q.swap_positions(1, 3).unwrap();
    q.delete_position(2).unwrap();
    assert_eq!(q.order().as_slice(), &[0, 1, 2, 3, 4]);
}

#[test]
fn shuffle_order_is_inert_in_sequential_mode() {
    let mut q = queue(6);
    let version = q.version();
    q.shuffle_order(0);
    assert_eq!(q.order().as_slice(), &[0, 1, 2, 3, 4, 5]);
    assert_eq!(q.version(), version);
}

#[test]
fn large_capacity_queue_hands_out_ids_on_demand() {
    let mut q = Queue::with_seed(1 << 20, 5);
    let ids: Vec<u32> = (0..4).map(|i| q.append(song(i), 0).unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    q.delete_id(1).unwrap();
    assert_eq!(q.append(song(4), 0).unwrap(), 4);
    assert_eq!(q.id_to_position(1), None);
    assert_eq!(q.id_to_position(4), Some(3));
    assert_eq!(q.get_by_id(1_000_000), None);
}

#[test]
fn shuffle_order_keeps_history_and_sorts_rest() {
    let mut q = random_queue(16);
    q.set_priority_range(10, 14, 5, None).unwrap();
    let history: Vec<usize> = q.order().as_slice()[..6].to_vec();
    q.shuffle_order(6);
    assert_eq!(&q.order().as_slice()[..6], history.as_slice());
    assert_priority_sorted(&q, 6);
    assert_bijection(&q);
}

#[test]
fn scenario_range_priority_moves_block_to_front() {
    let mut q = random_queue(16);
    assert!(q.set_priority_range(4, 8, 10, None).unwrap());
    let front: HashSet<usize> = (0..4).filter_map(|k| q.order_to_position(k)).collect();
    assert_eq!(front, HashSet::from([4, 5, 6, 7]));
    for k in 4..16 {
        assert_eq!(q.priority_at_order(k), 0);
    }
    assert_priority_sorted(&q, 0);
    assert_bijection(&q);
}

#[test]
fn scenario_unique_highest_priority_plays_first() {
    let mut q = random_queue(16);
    q.set_priority_range(4, 8, 10, None).unwrap();
    q.set_priority_range(15, 16, 50, None).unwrap();
    assert_eq!(q.order_to_position(0), Some(15));
    assert_priority_sorted(&q, 0);
}

#[test]
fn scenario_boost_lands_right_after_current() {
    let mut q = random_queue(16);
    q.set_priority_range(4, 8, 10, None).unwrap();
    q.set_priority_range(15, 16, 50, None).unwrap();
    let current = 4;

    let unplayed_before: Vec<usize> = q.order().as_slice()[current + 1..].to_vec();
    let boosted = q.order_to_position(9).unwrap();
    q.set_priority(boosted, 20, Some(current)).unwrap();
    assert_eq!(q.order_to_position(current + 1), Some(boosted));
    let others: Vec<usize> = unplayed_before
        .iter()
        .copied()
        .filter(|&p| p != boosted)
        .collect();
    assert_eq!(&q.order().as_slice()[current + 2..], others.as_slice());

    let higher = q.order_to_position(12).unwrap();
    q.set_priority(higher, 70, Some(current)).unwrap();
    assert_eq!(q.order_to_position(current + 1), Some(higher));
    assert_eq!(q.order_to_position(current + 2), Some(boosted));
    assert_priority_sorted(&q, current + 1);
    assert_bijection(&q);
}

#[test]
fn scenario_played_entries_are_never_relocated() {
    let mut q = random_queue(16);
    q.set_priority_range(4, 8, 10, None).unwrap();
    let current = 4;
    let before = q.order().as_slice().to_vec();

    let played = q.order_to_position(2).unwrap();
    assert!(q.set_priority(played, 200, Some(current)).unwrap());
    assert_eq!(q.order().as_slice(), before.as_slice());
    assert_eq!(q.get(played).map(|i| i.priority), Some(200));

    let playing = q.order_to_position(current).unwrap();
    q.set_priority(playing, 255, Some(current)).unwrap();
    assert_eq!(q.order().as_slice(), before.as_slice());
}

#[test]
fn lowered_priority_joins_front_of_new_tier() {
    let mut q = random_queue(8);
    q.set_priority_range(0, 4, 30, None).unwrap();
    let p = q.order_to_position(1).unwrap();
    q.set_priority(p, 10, None).unwrap();
    assert_eq!(q.order_to_position(3), Some(p));
    assert_priority_sorted(&q, 0);
}

#[test]
fn setting_same_priority_is_a_no_op() {
    let mut q = random_queue(10);
    q.set_priority_range(2, 5, 7, None).unwrap();
    let order = q.order().as_slice().to_vec();
    let version = q.version();
    assert!(!q.set_priority(3, 7, None).unwrap());
    assert!(!q.set_priority_range(2, 5, 7, Some(0)).unwrap());
    assert_eq!(q.order().as_slice(), order.as_slice());
    assert_eq!(q.version(), version);
}

#[test]
fn priority_rejects_bad_ranges() {
    let mut q = queue(4);
    assert_eq!(
        q.set_priority_range(3, 3, 1, None).unwrap_err(),
        Error::InvalidPriorityRange { start: 3, end: 3 }
    );
    assert_eq!(
        q.set_priority_range(2, 5, 1, None).unwrap_err(),
        Error::InvalidPriorityRange { start: 2, end: 5 }
    );
    assert_eq!(q.set_priority(4, 1, None).unwrap_err(), Error::InvalidPosition(4));
    assert_eq!(q.set_priority_ids(&[0, 77], 1, None).unwrap_err(), Error::InvalidId(77));
    assert!(q.iter().all(|i| i.priority == 0));
}

#[test]
fn priority_in_sequential_mode_leaves_order_alone() {
    let mut q = queue(5);
    let ids: Vec<u32> = [4, 2].iter().filter_map(|&p| q.position_to_id(p)).collect();
    q.set_priority_ids(&ids, 40, None).unwrap();
    assert_eq!(q.order().as_slice(), &[0, 1, 2, 3, 4]);
    assert_eq!(q.get(4).map(|i| i.priority), Some(40));
}

#[test]
fn appended_song_is_shuffled_into_its_priority_group() {
    let mut q = random_queue(10);
    q.set_priority_range(0, 3, 5, None).unwrap();
    let id = q.append(song(10), 0).unwrap();
    q.shuffle_last_into(5);
    let order = q.position_to_order(q.id_to_position(id).unwrap()).unwrap();
    assert!(order >= 5, "landed in history at {order}");
    assert_priority_sorted(&q, 3);
    assert_bijection(&q);
}

#[test]
fn operations_keep_invariants() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(42);
    let mut q = Queue::with_seed(24, 3);
    q.random = true;
    for step in 0..400 {
        let len = q.len();
        match rng.gen_range(0..7) {
            0 | 1 => {
                if q.append(song(step), rng.r#gen()).is_ok() {
                    q.shuffle_last_into(0);
                }
            }
            2 if len > 0 => {
                q.delete_position(rng.gen_range(0..len)).unwrap();
            }
            3 if len > 1 => {
                let start = rng.gen_range(0..len - 1);
                let end = rng.gen_range(start + 1..=len);
                let to = rng.gen_range(0..=len - (end - start));
                q.move_range(start, end, to).unwrap();
            }
            4 if len > 0 => {
                q.swap_positions(rng.gen_range(0..len), rng.gen_range(0..len))
                    .unwrap();
            }
            5 if len > 0 => {
                let start = rng.gen_range(0..len);
                let end = rng.gen_range(start + 1..=len);
                q.set_priority_range(start, end, rng.r#gen(), None).unwrap();
            }
            _ => q.shuffle_order(0),
        }
        assert_bijection(&q);
        assert_priority_sorted(&q, 0);
    }
}

#[test]
fn changes_since_lists_stamped_entries_in_position_order() {
    let mut q = queue(6);
    let since = q.version();
    q.move_range(4, 5, 1).unwrap();
    let Changes::Diff(changes) = q.changes_since(since) else {
        panic!("expected a diff");
    };
    let positions: Vec<usize> = changes.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert!(changes.iter().all(|c| q.id_to_position(c.id) == Some(c.position)));

    let Changes::Diff(none) = q.changes_since(q.version()) else {
        panic!("expected a diff");
    };
    assert!(none.is_empty());
}

#[test]
fn modify_at_position_stamps_without_moving() {
    let mut q = queue(3);
    let since = q.version();
    q.increment_version();
    q.modify_at_position(2).unwrap();
    assert_eq!(q.modify_at_position(3).unwrap_err(), Error::InvalidPosition(3));
    let Changes::Diff(changes) = q.changes_since(since) else {
        panic!("expected a diff");
    };
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].position, 2);
}

#[test]
fn modify_song_edits_snapshot_in_place() {
    let mut q = queue(2);
    let id = q.position_to_id(1).unwrap();
    q.modify_song(1, |song| song.mtime = Some(99)).unwrap();
    let item = q.get(1).unwrap();
    assert_eq!((item.id, item.song.mtime, item.version), (id, Some(99), q.version()));
}

#[test]
fn version_wrap_forces_full_resync() {
    let mut q = queue(3);
    q.force_version(VERSION_LIMIT - 1);
    let client = q.version();
    q.append(song(3), 0).unwrap();
    assert_eq!(q.version(), 1);
    assert!(q.iter().all(|item| item.version <= q.version()));
    assert_eq!(q.changes_since(client), Changes::FullResync);
    assert_eq!(q.changes_since(client).into_entries(&q).len(), 4);

    let Changes::Diff(changes) = q.changes_since(0) else {
        panic!("expected a diff");
    };
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].position, 3);
}
