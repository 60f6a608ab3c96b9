//! Property-based tests for the entry queue
//!
//! Uses proptest to check index invariants across random operation sequences.

use jukebox_core::Track;
use jukebox_playback::{react, shuffle_tail_with, EngineState, EntryQueue, SessionAction};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::Duration;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Push,
    Unshift,
    Remove(u64),
    PopHead,
    Clear,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Push),
        2 => Just(Op::Unshift),
        2 => (1u64..40).prop_map(Op::Remove),
        1 => Just(Op::PopHead),
        1 => Just(Op::Clear),
    ]
}

fn arbitrary_state() -> impl Strategy<Value = EngineState> {
    prop_oneof![
        Just(EngineState::Idle),
        Just(EngineState::Buffering),
        Just(EngineState::Playing),
        Just(EngineState::Paused),
        Just(EngineState::AutoPaused),
    ]
}

fn track(n: usize) -> Track {
    Track::new(n.to_string(), format!("Track {}", n), "https://example.com/v")
        .with_duration(Duration::from_secs(60))
}

// ===== Property Tests =====

proptest! {
    /// Property: inserted indices strictly increase and are never reissued
    #[test]
    fn indices_never_repeat(ops in prop::collection::vec(arbitrary_op(), 1..80)) {
        let mut queue = EntryQueue::new();
        let mut issued = HashSet::new();
        let mut last = 0u64;

        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Push | Op::Unshift => {
                    let index = match op {
                        Op::Push => queue.push(track(n)).index,
                        _ => queue.unshift(track(n)).index,
                    };
                    prop_assert!(index > last);
                    prop_assert!(issued.insert(index));
                    last = index;
                }
                Op::Remove(index) => {
                    let before: Vec<u64> = queue.entries().iter().map(|e| e.index).collect();
                    let removed = queue.remove(index);
                    prop_assert_eq!(removed.is_some(), before.contains(&index));

                    let expected: Vec<u64> = before.into_iter().filter(|i| *i != index).collect();
                    let after: Vec<u64> = queue.entries().iter().map(|e| e.index).collect();
                    prop_assert_eq!(after, expected);
                }
                Op::PopHead => {
                    queue.pop_head();
                }
                Op::Clear => {
                    let len = queue.len();
                    let removed = queue.clear_tail();
                    prop_assert_eq!(removed, len.saturating_sub(1));
                    prop_assert_eq!(queue.len(), len.min(1));
                }
            }

            let live: HashSet<u64> = queue.entries().iter().map(|e| e.index).collect();
            prop_assert_eq!(live.len(), queue.len());
        }
    }

    /// Property: shuffle pins the head to 1 and numbers the tail 2..=n
    #[test]
    fn shuffle_renumbers_tail(len in 2usize..40, removed in prop::collection::vec(1u64..40, 0..10), seed in any::<u64>()) {
        let mut queue = EntryQueue::new();
        for n in 0..len {
            queue.push(track(n));
        }
        for index in removed {
            if queue.len() > 2 {
                queue.remove(index);
            }
        }

        let head_id = queue.head().unwrap().track.id.clone();
        let tail_ids: HashSet<String> = queue.entries()[1..].iter().map(|e| e.track.id.clone()).collect();
        let counter_before = queue.next_index();

        let mut entries = queue.entries().to_vec();
        let max = shuffle_tail_with(&mut entries, &mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(max, entries.len() as u64);
        prop_assert_eq!(entries[0].index, 1);
        prop_assert_eq!(&entries[0].track.id, &head_id);

        let tail: HashSet<u64> = entries[1..].iter().map(|e| e.index).collect();
        let expected: HashSet<u64> = (2..=entries.len() as u64).collect();
        prop_assert_eq!(tail, expected);

        let shuffled_ids: HashSet<String> = entries[1..].iter().map(|e| e.track.id.clone()).collect();
        prop_assert_eq!(shuffled_ids, tail_ids);

        queue.shuffle();
        let next = queue.push(track(len)).index;
        prop_assert!(next >= counter_before);
        prop_assert!(next > queue.len() as u64 - 1);
    }

    /// Property: only transitions into AutoPaused or Idle trigger a reaction
    #[test]
    fn reactions_only_on_autopause_or_idle(old in arbitrary_state(), new in arbitrary_state(), empty in any::<bool>()) {
        match react(old, new, empty) {
            Some(SessionAction::Resume) => {
                prop_assert_eq!(old, EngineState::Playing);
                prop_assert_eq!(new, EngineState::AutoPaused);
            }
            Some(SessionAction::Advance) => {
                prop_assert_eq!(old, EngineState::Playing);
                prop_assert_eq!(new, EngineState::Idle);
            }
            Some(SessionAction::Disconnect) => {
                prop_assert_eq!(new, EngineState::Idle);
                prop_assert!(empty);
            }
            None => {
                prop_assert!(new != EngineState::Idle || (old != EngineState::Playing && !empty));
            }
        }
    }
}
