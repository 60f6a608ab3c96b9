//! Jukebox - Playback Sessions
//!
//! Per-tenant playback sessions for a chat bot.
//!
//! This crate provides:
//! - Ordered queue with stable, never-reused entry indices
//! - Voice connection lifecycle (connect, bounded readiness wait, teardown)
//! - Engine state machine with auto-advance on track completion
//! - Bounded retry of pause/unpause/stop
//! - Session registry (one session per tenant)
//!
//! # Architecture
//!
//! `jukebox-playback` does not talk to any chat platform or audio library:
//! - The streaming engine is reached through [`PlaybackEngine`]
//! - The voice gateway is reached through [`VoiceTransport`]
//! - Requests, replies and announcements go through the `jukebox-core` traits
//!
//! Engines publish [`EngineEvent`]s on a channel; each session drains its own
//! events and looks up the reaction in a static transition table.
//!
//! # Example: Transition Table
//!
//! ```rust
//! use jukebox_playback::{react, EngineState, SessionAction};
//!
//! // a track ended
//! assert_eq!(
//!     react(EngineState::Playing, EngineState::Idle, false),
//!     Some(SessionAction::Advance)
//! );
//!
//! // stopped while nothing is queued
//! assert_eq!(
//!     react(EngineState::Paused, EngineState::Idle, true),
//!     Some(SessionAction::Disconnect)
//! );
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use jukebox_playback::{
//!     EngineEventSender, EngineFactory, EngineState, PlaybackEngine, Result, StreamOptions,
//! };
//! use jukebox_core::{TenantId, Track};
//! use std::sync::Arc;
//!
//! struct MyEngine {
//!     events: EngineEventSender,
//! }
//!
//! impl PlaybackEngine for MyEngine {
//!     fn state(&self) -> EngineState {
//!         EngineState::Idle
//!     }
//!
//!     fn play(&self, track: &Track, options: &StreamOptions) -> Result<()> {
//!         // open the stream for track.url and publish state changes on self.events
//!         Ok(())
//!     }
//!
//!     fn pause(&self) -> bool {
//!         true
//!     }
//!
//!     fn unpause(&self) -> bool {
//!         true
//!     }
//!
//!     fn stop(&self) -> bool {
//!         true
//!     }
//! }
//!
//! struct MyEngines;
//!
//! impl EngineFactory for MyEngines {
//!     fn create(&self, _tenant: &TenantId, events: EngineEventSender) -> Arc<dyn PlaybackEngine> {
//!         Arc::new(MyEngine { events })
//!     }
//! }
//! ```

mod connection;
mod engine;
mod error;
mod events;
mod queue;
mod registry;
mod retry;
mod session;
mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use connection::ConnectionManager;
pub use engine::{EngineEventSender, EngineFactory, PlaybackEngine};
pub use error::{PlaybackError, Result};
pub use events::{react, EngineEvent, Guard, SessionAction, Transition, TRANSITIONS};
pub use queue::EntryQueue;
pub use registry::SessionRegistry;
pub use retry::RetryPolicy;
pub use session::{PlaybackSession, SessionContext, SharedSession};
pub use shuffle::{shuffle_tail, shuffle_tail_with};
pub use transport::{Subscription, VoiceConnection, VoiceTransport};
pub use types::{ConnectionStatus, EngineState, QueueEntry, SessionConfig, StreamOptions};
