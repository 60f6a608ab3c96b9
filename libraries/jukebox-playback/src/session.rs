//! Playback session
//!
//! One session per tenant. It owns the entry queue, the engine and the voice
//! connection, and drives auto-advance from the engine's state changes.
//!
//! # Concurrency
//!
//! Sessions are shared as `Arc<Mutex<PlaybackSession>>`. Every operation,
//! including the reaction to engine events, runs under that lock. Events are
//! drained by a background task holding a `Weak` handle, so they are applied
//! after the operation that caused them has released the lock.
//!
//! A state change whose target is no longer the engine's current state was
//! overtaken by an operation that ran in between (a manual skip after the
//! track ended, for instance) and is dropped.

use crate::connection::ConnectionManager;
use crate::engine::{EngineFactory, PlaybackEngine};
use crate::error::{PlaybackError, Result};
use crate::events::{react, EngineEvent, SessionAction};
use crate::queue::EntryQueue;
use crate::retry::RetryPolicy;
use crate::transport::VoiceTransport;
use crate::types::{EngineState, QueueEntry, SessionConfig};
use jukebox_core::{AnnouncementSink, ChannelId, OutgoingMessage, TenantId, TextChannels, Track};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Session shared between the registry, handlers and its event task
pub type SharedSession = Arc<Mutex<PlaybackSession>>;

/// Everything needed to build sessions
#[derive(Clone)]
pub struct SessionContext {
    /// Opens voice connections
    pub transport: Arc<dyn VoiceTransport>,

    /// Builds one engine per session
    pub engines: Arc<dyn EngineFactory>,

    /// Announcement channel lookup
    pub text_channels: Arc<dyn TextChannels>,

    /// Session tunables
    pub config: SessionConfig,
}

/// Queue, engine and connection of one tenant
pub struct PlaybackSession {
    tenant: TenantId,
    text_channel: Option<Arc<dyn AnnouncementSink>>,
    engine: Arc<dyn PlaybackEngine>,
    connection: ConnectionManager,
    queue: EntryQueue,
    config: SessionConfig,
    retry: RetryPolicy,
    closed: bool,
}

impl PlaybackSession {
    /// Build a session and start its engine event task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(tenant: TenantId, ctx: &SessionContext) -> SharedSession {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = ctx.engines.create(&tenant, tx);
        let session = Arc::new(Mutex::new(Self::new(tenant, engine, ctx)));

        tokio::spawn(run_events(Arc::downgrade(&session), rx));

        session
    }

    fn new(tenant: TenantId, engine: Arc<dyn PlaybackEngine>, ctx: &SessionContext) -> Self {
        let config = ctx.config.clone();
        let connection = ConnectionManager::new(
            tenant.clone(),
            Arc::clone(&ctx.transport),
            config.connect_poll_interval,
            config.connect_timeout,
        );

        Self {
            text_channel: ctx.text_channels.announcement_channel(&tenant),
            tenant,
            engine,
            connection,
            queue: EntryQueue::new(),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_delay),
            config,
            closed: false,
        }
    }

    // ===== Queue =====

    /// Append a track
    ///
    /// Starts playback when the track lands at the head and `autoplay` is set.
    pub fn push(&mut self, track: Track, autoplay: bool) -> QueueEntry {
        let entry = self.queue.push(track).clone();
        tracing::debug!(
            "Tenant {}: queued #{} {}",
            self.tenant,
            entry.index,
            entry.track.title
        );

        if autoplay && self.queue.len() == 1 {
            self.start(&entry);
        }
        entry
    }

    /// Insert a track at the head
    ///
    /// Same autoplay rule as [`push`](Self::push): playback only starts when
    /// the queue was empty before.
    pub fn unshift(&mut self, track: Track, autoplay: bool) -> QueueEntry {
        let entry = self.queue.unshift(track).clone();
        tracing::debug!(
            "Tenant {}: queued #{} {} at head",
            self.tenant,
            entry.index,
            entry.track.title
        );

        if autoplay && self.queue.len() == 1 {
            self.start(&entry);
        }
        entry
    }

    /// Remove the entry carrying `index`
    ///
    /// Removing the head does not stop or skip the current playback.
    pub fn remove(&mut self, index: u64) -> Result<QueueEntry> {
        let entry = self
            .queue
            .remove(index)
            .ok_or(PlaybackError::EntryNotFound(index))?;
        tracing::debug!("Tenant {}: removed #{}", self.tenant, index);
        Ok(entry)
    }

    /// Drop the head and play the next entry
    ///
    /// Returns the new head, or `None` when nothing is left (the engine is
    /// stopped in that case). An already empty queue leaves the engine alone.
    pub async fn skip(&mut self) -> Option<QueueEntry> {
        self.queue.pop_head()?;

        match self.queue.head().cloned() {
            Some(next) => {
                self.start(&next);
                Some(next)
            }
            None => {
                self.stop().await;
                None
            }
        }
    }

    /// Remove every entry except the head
    pub fn clear(&mut self) -> usize {
        let removed = self.queue.clear_tail();
        tracing::debug!("Tenant {}: cleared {} entries", self.tenant, removed);
        removed
    }

    /// Shuffle everything behind the head and renumber from 1
    pub fn shuffle(&mut self) {
        self.queue.shuffle();
        tracing::debug!("Tenant {}: shuffled {} entries", self.tenant, self.queue.len());
    }

    // ===== Playback =====

    /// Pause the engine
    ///
    /// Fails unless playing or buffering; `Ok(false)` when the engine kept
    /// refusing.
    pub async fn pause(&self) -> Result<bool> {
        if !self.engine.state().is_active() {
            return Err(PlaybackError::invalid_state(
                "I am already in pause or not playing",
            ));
        }
        Ok(self.retry.run("pause", || self.engine.pause()).await)
    }

    /// Resume a paused engine
    pub async fn resume(&self) -> Result<bool> {
        if !self.engine.state().is_paused() {
            return Err(PlaybackError::invalid_state("I am not in pause"));
        }
        Ok(self.retry.run("unpause", || self.engine.unpause()).await)
    }

    /// Pause when playing, resume when paused
    pub async fn togglepause(&self) -> Result<bool> {
        let state = self.engine.state();
        if state.is_active() {
            self.pause().await
        } else if state.is_paused() {
            self.resume().await
        } else {
            Err(PlaybackError::invalid_state(
                "I am neither paused nor playing",
            ))
        }
    }

    /// Stop the engine
    pub async fn stop(&self) -> bool {
        self.retry.run("stop", || self.engine.stop()).await
    }

    fn start(&self, entry: &QueueEntry) {
        tracing::info!(
            "Tenant {}: playing #{} {}",
            self.tenant,
            entry.index,
            entry.track.title
        );
        if let Err(e) = self.engine.play(&entry.track, &self.config.stream) {
            tracing::error!("Tenant {}: failed to play {}: {}", self.tenant, entry.track.url, e);
        }
    }

    // ===== Connection =====

    /// Join a voice channel and route the engine into it
    pub async fn connect(&mut self, channel: &ChannelId) -> Result<()> {
        self.connection.connect(channel, &self.engine).await
    }

    /// Leave the voice channel
    ///
    /// The index counter restarts at 1 only when the queue is empty.
    pub fn disconnect(&mut self) -> bool {
        let was_connected = self.connection.disconnect();
        if self.queue.reset_index_if_empty() {
            tracing::debug!("Tenant {}: index counter reset", self.tenant);
        }
        was_connected
    }

    /// Tear the session down for removal from the registry
    ///
    /// Engine events arriving afterwards are ignored.
    pub async fn shutdown(&mut self) {
        self.closed = true;
        let dropped = self.queue.clear_all();
        if self.engine.state() != EngineState::Idle {
            self.stop().await;
        }
        self.disconnect();
        tracing::info!(
            "Tenant {}: session closed, dropped {} entries",
            self.tenant,
            dropped
        );
    }

    // ===== Engine events =====

    /// React to one engine event
    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        let (old, new) = match event {
            EngineEvent::Error(message) => {
                tracing::error!("Tenant {}: engine error: {}", self.tenant, message);
                return;
            }
            EngineEvent::StateChange { old, new } => (old, new),
        };

        if self.closed {
            return;
        }

        let current = self.engine.state();
        if current != new {
            tracing::debug!(
                "Tenant {}: stale engine event {} -> {} (now {})",
                self.tenant,
                old,
                new,
                current
            );
            return;
        }

        tracing::debug!("Tenant {}: engine {} -> {}", self.tenant, old, new);

        match react(old, new, self.queue.is_empty()) {
            Some(SessionAction::Resume) => {
                if !self.retry.run("unpause", || self.engine.unpause()).await {
                    tracing::warn!("Tenant {}: could not recover from auto-pause", self.tenant);
                }
            }
            Some(SessionAction::Advance) => match self.skip().await {
                Some(next) => self.announce(&next),
                None => {
                    tracing::info!("Tenant {}: queue finished", self.tenant);
                    self.disconnect();
                }
            },
            Some(SessionAction::Disconnect) => {
                self.disconnect();
            }
            None => {}
        }
    }

    fn announce(&self, entry: &QueueEntry) {
        let Some(sink) = self.text_channel.clone() else {
            return;
        };
        let message = OutgoingMessage::now_playing(&entry.track);
        let tenant = self.tenant.clone();

        tokio::spawn(async move {
            if let Err(e) = sink.send(message).await {
                tracing::warn!("Tenant {}: announcement failed: {}", tenant, e);
            }
        });
    }

    // ===== Accessors =====

    /// Tenant owning the session
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Entry currently bound to the engine
    pub fn playing(&self) -> Option<&QueueEntry> {
        self.queue.head()
    }

    /// All entries, head first
    pub fn entries(&self) -> &[QueueEntry] {
        self.queue.entries()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Sum of known track durations
    pub fn total_duration(&self) -> Duration {
        self.queue.total_duration()
    }

    /// Index the next queued track will receive
    pub fn next_index(&self) -> u64 {
        self.queue.next_index()
    }

    /// Current engine state
    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    /// Whether the voice connection is ready
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Channel the session is connected to
    pub fn connected_channel(&self) -> Option<ChannelId> {
        self.connection.channel_id()
    }

    /// Whether the session was shut down
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("tenant", &self.tenant)
            .field("len", &self.queue.len())
            .field("engine", &self.engine.state())
            .field("channel", &self.connection.channel_id())
            .field("closed", &self.closed)
            .finish()
    }
}

async fn run_events(
    session: Weak<Mutex<PlaybackSession>>,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(shared) = session.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        guard.handle_engine_event(event).await;
    }
    tracing::trace!("Engine event task finished");
}
