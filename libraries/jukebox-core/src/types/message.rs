//! Outgoing chat messages
//!
//! Replies and announcements share one shape: plain content plus an optional
//! track card. Front-ends translate it into their platform's message format.

use super::track::Track;
use serde::{Deserialize, Serialize};

/// Rich card describing a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Card title
    pub title: String,
    /// Card body
    pub description: String,
    /// Thumbnail image
    pub thumbnail_url: Option<String>,
    /// Link the title points to
    pub url: Option<String>,
}

impl Embed {
    /// Build the card for a track
    pub fn from_track(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            description: track.description.clone(),
            thumbnail_url: track.thumbnail.as_ref().map(|t| t.url.clone()),
            url: (!track.url.is_empty()).then(|| track.url.clone()),
        }
    }
}

/// Message sent to a text channel or as a command reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Message text
    pub content: String,
    /// Optional track card
    pub embed: Option<Embed>,
}

impl OutgoingMessage {
    /// Plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }

    /// Text message with a track card attached
    pub fn with_track(content: impl Into<String>, track: &Track) -> Self {
        Self {
            content: content.into(),
            embed: Some(Embed::from_track(track)),
        }
    }

    /// "Now playing" announcement used on auto-advance
    pub fn now_playing(track: &Track) -> Self {
        Self::with_track(format!("Now playing **{}**", track.title), track)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for OutgoingMessage {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Thumbnail;

    #[test]
    fn now_playing_carries_track_card() {
        let track = Track::new("id", "Title", "https://example.com/v").with_thumbnail(Thumbnail {
            url: "https://example.com/t.jpg".to_string(),
            width: 120,
            height: 90,
        });

        let message = OutgoingMessage::now_playing(&track);

        assert_eq!(message.content, "Now playing **Title**");
        let embed = message.embed.unwrap();
        assert_eq!(embed.title, "Title");
        assert_eq!(embed.thumbnail_url.as_deref(), Some("https://example.com/t.jpg"));
        assert_eq!(embed.url.as_deref(), Some("https://example.com/v"));
    }
}
