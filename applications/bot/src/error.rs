/// Bot error types
use jukebox_core::{CoreError, ErrorKind};
use jukebox_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Reply used in place of internal error details
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later";

#[derive(Debug, Error)]
pub enum BotError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    ResourceAbsent(String),

    #[error("Command not found :(")]
    UnknownCommand(String),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn absent(msg: impl Into<String>) -> Self {
        Self::ResourceAbsent(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Validation(_) | BotError::UnknownCommand(_) => ErrorKind::Validation,
            BotError::ResourceAbsent(_) => ErrorKind::ResourceAbsent,
            BotError::Playback(e) => e.kind(),
            BotError::Core(e) => e.kind(),
            BotError::Config(_) | BotError::Catalog(_) | BotError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Text sent back to the user who issued the command
    pub fn user_message(&self) -> String {
        if self.kind().is_user_facing() {
            self.to_string()
        } else {
            GENERIC_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::ChannelId;

    #[test]
    fn user_facing_errors_are_relayed() {
        let err = BotError::absent("No results found");
        assert_eq!(err.kind(), ErrorKind::ResourceAbsent);
        assert_eq!(err.user_message(), "No results found");

        let err = BotError::from(PlaybackError::NotInVoiceChannel);
        assert_eq!(err.user_message(), "You are not in a voice channel");
    }

    #[test]
    fn internal_errors_are_hidden() {
        let err = BotError::from(PlaybackError::ConnectionClosed(ChannelId::new("v1")));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = BotError::from(CoreError::platform("gateway closed"));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
