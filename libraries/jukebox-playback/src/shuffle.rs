//! Queue randomization
//!
//! Pure random (Fisher-Yates) shuffle of everything behind the head entry,
//! followed by renumbering so the visible indices read 1, 2, 3... again.

use crate::types::QueueEntry;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Shuffle the entries after the head and renumber the whole queue
///
/// The head keeps its track but is re-pinned to index 1; the tail is permuted
/// and numbered from 2 in its new order. Fewer than two entries is a no-op.
///
/// Returns the highest index now in use.
pub fn shuffle_tail(entries: &mut [QueueEntry]) -> u64 {
    shuffle_tail_with(entries, &mut thread_rng())
}

/// `shuffle_tail` with a caller-provided RNG (deterministic in tests)
pub fn shuffle_tail_with<R: Rng + ?Sized>(entries: &mut [QueueEntry], rng: &mut R) -> u64 {
    if entries.len() < 2 {
        return entries.iter().map(|e| e.index).max().unwrap_or(0);
    }

    let (head, tail) = entries.split_at_mut(1);
    head[0].index = 1;
    tail.shuffle(rng);

    for (offset, entry) in tail.iter_mut().enumerate() {
        entry.index = offset as u64 + 2;
    }

    entries.len() as u64
}
