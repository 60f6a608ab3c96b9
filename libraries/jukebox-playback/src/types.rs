//! Core types for playback sessions

use jukebox_core::Track;
use std::fmt;
use std::time::Duration;

/// Track placed in a session's queue
///
/// `index` is the stable handle users refer to ("remove #3"). It is assigned
/// from the session counter when the track enters the queue and does not
/// follow position shifts.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    /// Per-session handle, starts at 1
    pub index: u64,

    /// The queued track
    pub track: Track,
}

impl QueueEntry {
    /// Wrap a track with its assigned index
    pub fn new(index: u64, track: Track) -> Self {
        Self { index, track }
    }
}

/// State reported by the streaming engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Nothing loaded, or the last resource ended
    Idle,

    /// Resource loaded, waiting for data
    Buffering,

    /// Sending audio
    Playing,

    /// Paused on request
    Paused,

    /// Paused by the engine because nothing is subscribed
    AutoPaused,
}

impl EngineState {
    /// Playing or about to play
    pub fn is_active(self) -> bool {
        matches!(self, EngineState::Playing | EngineState::Buffering)
    }

    /// Paused, either on request or by the engine
    pub fn is_paused(self) -> bool {
        matches!(self, EngineState::Paused | EngineState::AutoPaused)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Idle => "idle",
            EngineState::Buffering => "buffering",
            EngineState::Playing => "playing",
            EngineState::Paused => "paused",
            EngineState::AutoPaused => "autopaused",
        };
        f.write_str(name)
    }
}

/// Externally observable state of a voice connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Signalling,
    Connecting,
    Ready,
    Disconnected,
    Destroyed,
}

/// How the engine should open a track's stream
///
/// Audio-only with no buffer ceiling, so network jitter never starves playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Skip video tracks
    pub audio_only: bool,

    /// Maximum bytes buffered ahead, `None` for unbounded
    pub buffer_limit: Option<usize>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            audio_only: true,
            buffer_limit: None,
        }
    }
}

/// Tunables for a playback session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Attempts for pause/unpause/stop before giving up (default: 4)
    pub retry_attempts: u32,

    /// Delay between attempts (default: 250ms)
    pub retry_delay: Duration,

    /// Voice connection readiness poll interval (default: 250ms)
    pub connect_poll_interval: Duration,

    /// Upper bound on the readiness wait (default: 30s)
    pub connect_timeout: Duration,

    /// Stream options handed to the engine on play
    pub stream: StreamOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 4,
            retry_delay: Duration::from_millis(250),
            connect_poll_interval: Duration::from_millis(250),
            connect_timeout: Duration::from_secs(30),
            stream: StreamOptions::default(),
        }
    }
}
