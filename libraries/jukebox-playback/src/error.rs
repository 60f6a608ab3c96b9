//! Error types for playback sessions

use jukebox_core::{ChannelId, CoreError, ErrorKind, TenantId};
use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A session is already registered for the tenant
    #[error("A queue already exists for tenant {0}")]
    SessionExists(TenantId),

    /// No session is registered for the tenant
    #[error("No queue exists for tenant {0}")]
    SessionNotFound(TenantId),

    /// No queued entry carries the index
    #[error("Unable to remove track #{0}")]
    EntryNotFound(u64),

    /// Operation not valid in the current engine state
    #[error("{0}")]
    InvalidState(String),

    /// Invoking user is not in a voice channel
    #[error("You are not in a voice channel")]
    NotInVoiceChannel,

    /// Invoking user and bot sit in different voice channels
    #[error("You are not in the same channel as the bot")]
    ChannelMismatch {
        /// Channel of the invoking user
        user: ChannelId,
        /// Channel the bot occupies
        bot: ChannelId,
    },

    /// Voice connection did not become ready in time
    #[error("Voice connection to {channel} not ready after {waited:?}")]
    ConnectTimeout {
        /// Target channel
        channel: ChannelId,
        /// Time waited before giving up
        waited: Duration,
    },

    /// Voice connection was destroyed while waiting for it
    #[error("Voice connection to {0} was closed")]
    ConnectionClosed(ChannelId),

    /// Voice transport error
    #[error("Voice transport error: {0}")]
    Transport(String),

    /// Streaming engine error
    #[error("Engine error: {0}")]
    Engine(String),

    /// Collaborator (request source, announcement channel) error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PlaybackError {
    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaybackError::SessionExists(_)
            | PlaybackError::SessionNotFound(_)
            | PlaybackError::EntryNotFound(_) => ErrorKind::NotFound,
            PlaybackError::InvalidState(_) => ErrorKind::StateConflict,
            PlaybackError::NotInVoiceChannel | PlaybackError::ChannelMismatch { .. } => {
                ErrorKind::MembershipConflict
            }
            PlaybackError::ConnectTimeout { .. }
            | PlaybackError::ConnectionClosed(_)
            | PlaybackError::Transport(_)
            | PlaybackError::Engine(_) => ErrorKind::Internal,
            PlaybackError::Core(e) => e.kind(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
