//! Ordered entry list with a never-reused index counter
//!
//! Position 0 is the entry currently bound to the engine:
//! ```text
//! #4  Track A   <- playing
//! ─────────────
//! #5  Track B
//! #7  Track D   (#6 was removed, the gap stays)
//! ```

use crate::shuffle::shuffle_tail;
use crate::types::QueueEntry;
use jukebox_core::Track;
use std::time::Duration;

/// Session queue
#[derive(Debug, Clone)]
pub struct EntryQueue {
    /// Entries in play order, head first
    entries: Vec<QueueEntry>,

    /// Index handed to the next inserted track
    next_index: u64,
}

impl EntryQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_index: 1,
        }
    }

    fn take_index(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Append a track at the end
    pub fn push(&mut self, track: Track) -> &QueueEntry {
        let index = self.take_index();
        self.entries.push(QueueEntry::new(index, track));
        &self.entries[self.entries.len() - 1]
    }

    /// Insert a track at the head
    ///
    /// Still consumes a counter value, so indices stay unique even though the
    /// new entry is numbered higher than the ones behind it.
    pub fn unshift(&mut self, track: Track) -> &QueueEntry {
        let index = self.take_index();
        self.entries.insert(0, QueueEntry::new(index, track));
        &self.entries[0]
    }

    /// Remove the entry carrying `index`, wherever it sits
    pub fn remove(&mut self, index: u64) -> Option<QueueEntry> {
        let position = self.entries.iter().position(|e| e.index == index)?;
        Some(self.entries.remove(position))
    }

    /// Drop the head entry
    pub fn pop_head(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Remove everything except the head
    ///
    /// Returns how many entries were removed.
    pub fn clear_tail(&mut self) -> usize {
        if self.entries.len() <= 1 {
            return 0;
        }
        self.entries.drain(1..).count()
    }

    /// Remove every entry, head included
    pub fn clear_all(&mut self) -> usize {
        self.entries.drain(..).count()
    }

    /// Randomize everything behind the head and renumber
    pub fn shuffle(&mut self) {
        let max_index = shuffle_tail(&mut self.entries);
        self.next_index = self.next_index.max(max_index + 1);
    }

    /// Restart numbering at 1, only if nothing could collide
    ///
    /// Returns whether the counter was reset.
    pub fn reset_index_if_empty(&mut self) -> bool {
        if self.entries.is_empty() {
            self.next_index = 1;
            true
        } else {
            false
        }
    }

    /// Entry at the head (currently playing)
    pub fn head(&self) -> Option<&QueueEntry> {
        self.entries.first()
    }

    /// Find an entry by index
    pub fn get(&self, index: u64) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.index == index)
    }

    /// All entries, head first
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Index the next insertion will receive
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Number of entries, head included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of known track durations (unknown lengths count as zero)
    pub fn total_duration(&self) -> Duration {
        self.entries
            .iter()
            .filter_map(|e| e.track.duration)
            .sum()
    }
}

impl Default for EntryQueue {
    fn default() -> Self {
        Self::new()
    }
}
