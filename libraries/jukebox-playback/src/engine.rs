//! Streaming engine contract
//!
//! Abstracts the component that actually fetches, decodes and sends audio.
//! The session only drives it through these calls and learns about progress
//! through `EngineEvent`s.

use crate::error::Result;
use crate::events::EngineEvent;
use crate::types::{EngineState, StreamOptions};
use jukebox_core::{TenantId, Track};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sending half handed to an engine for publishing its events
pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;

/// Stateful streaming engine
///
/// Implementors publish every state transition as
/// `EngineEvent::StateChange` on the sender they were created with.
/// Calling `play` while a resource is active replaces it and moves the engine
/// to `Buffering` without passing through `Idle`.
pub trait PlaybackEngine: Send + Sync {
    /// Current engine state
    fn state(&self) -> EngineState;

    /// Open a stream for the track's URL and start playing it
    ///
    /// # Returns
    /// * `Ok(())` - Resource created and handed to the engine
    /// * `Err(_)` - The stream could not be opened
    fn play(&self, track: &Track, options: &StreamOptions) -> Result<()>;

    /// Pause playback
    ///
    /// Returns false when the engine rejects the transition right now.
    fn pause(&self) -> bool;

    /// Resume from `Paused` or `AutoPaused`
    ///
    /// Returns false when the engine rejects the transition right now.
    fn unpause(&self) -> bool;

    /// Drop the current resource and go `Idle`
    ///
    /// Returns false when the engine rejects the transition right now.
    fn stop(&self) -> bool;
}

/// Creates one engine per session
pub trait EngineFactory: Send + Sync {
    /// Build an engine for a tenant, wired to publish on `events`
    fn create(&self, tenant: &TenantId, events: EngineEventSender) -> Arc<dyn PlaybackEngine>;
}
