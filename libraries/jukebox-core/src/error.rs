/// Core error types for Jukebox
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Broad failure category shared by every Jukebox error type
///
/// The chat front-end uses the kind to decide whether a failure message can be
/// relayed to the user as-is or must be replaced by a generic reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed command argument
    Validation,
    /// Operation invalid for the current playback state
    StateConflict,
    /// Caller not in a voice channel, or in a different one than the bot
    MembershipConflict,
    /// Referenced entry or session does not exist (or already exists)
    NotFound,
    /// Nothing to act on: no search result, nothing queued
    ResourceAbsent,
    /// Transport, engine, configuration or I/O failure
    Internal,
}

impl ErrorKind {
    /// Whether the error message is meant for the person who issued the command
    pub fn is_user_facing(self) -> bool {
        !matches!(self, ErrorKind::Internal)
    }
}

/// Core error type for Jukebox collaborators
#[derive(Error, Debug)]
pub enum CoreError {
    /// Chat platform call failed (reply, membership lookup, channel send)
    #[error("Platform error: {0}")]
    Platform(String),

    /// Media resolver failed (distinct from "no result")
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::Validation,
            CoreError::Platform(_)
            | CoreError::Resolver(_)
            | CoreError::Io(_)
            | CoreError::Serialization(_) => ErrorKind::Internal,
        }
    }
}
