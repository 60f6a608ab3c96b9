//! Engine events and the session's reaction table
//!
//! Track completion is detected purely from engine state transitions. The
//! reaction to each transition is data: a table of `(from, to, guard) → action`
//! rows, evaluated top to bottom, first match wins. Anything not listed is
//! ignored.

use crate::types::EngineState;

/// Events published by a streaming engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine moved between two states
    StateChange {
        /// State before the transition
        old: EngineState,
        /// State after the transition
        new: EngineState,
    },

    /// Engine reported a playback error
    Error(String),
}

/// Extra condition a transition row needs to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// No condition
    Always,
    /// Session queue holds no entry
    QueueEmpty,
}

/// What the session does in response to a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Unpause the engine (audio subscriber came back)
    Resume,
    /// Drop the finished head and play the next entry, or disconnect
    Advance,
    /// Leave the voice channel
    Disconnect,
}

/// One row of the reaction table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Required previous state, `None` for any
    pub from: Option<EngineState>,
    /// Required new state
    pub to: EngineState,
    /// Additional condition
    pub guard: Guard,
    /// Reaction
    pub action: SessionAction,
}

impl Transition {
    fn matches(&self, old: EngineState, new: EngineState, queue_empty: bool) -> bool {
        let from_ok = self.from.map_or(true, |from| from == old);
        let guard_ok = match self.guard {
            Guard::Always => true,
            Guard::QueueEmpty => queue_empty,
        };
        from_ok && self.to == new && guard_ok
    }
}

/// Session reactions to engine transitions
pub const TRANSITIONS: &[Transition] = &[
    // subscriber vanished for a moment, pick the stream back up
    Transition {
        from: Some(EngineState::Playing),
        to: EngineState::AutoPaused,
        guard: Guard::Always,
        action: SessionAction::Resume,
    },
    // track finished
    Transition {
        from: Some(EngineState::Playing),
        to: EngineState::Idle,
        guard: Guard::Always,
        action: SessionAction::Advance,
    },
    Transition {
        from: None,
        to: EngineState::Idle,
        guard: Guard::QueueEmpty,
        action: SessionAction::Disconnect,
    },
];

/// Look up the reaction to an engine transition
pub fn react(old: EngineState, new: EngineState, queue_empty: bool) -> Option<SessionAction> {
    TRANSITIONS
        .iter()
        .find(|t| t.matches(old, new, queue_empty))
        .map(|t| t.action)
}
