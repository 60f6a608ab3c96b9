//! Track descriptor types
//!
//! A `Track` is produced by a media resolver and never mutated afterwards.

use super::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Image reference (thumbnail or avatar)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Uploader / channel that published the track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar: Option<Thumbnail>,
}

/// Identity of the user who asked for a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
}

impl Requester {
    /// Create a new requester
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Opaque metadata bag attached by the caller of the resolver
///
/// `requested_by` is the only field the bot relies on; anything else a front-end
/// wants to carry along goes in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    #[serde(default)]
    pub requested_by: Option<Requester>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TrackMetadata {
    /// Metadata carrying only the requester
    pub fn requested_by(requester: Requester) -> Self {
        Self {
            requested_by: Some(requester),
            extra: BTreeMap::new(),
        }
    }
}

/// Playable media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    /// `None` when the source does not report a length (live streams)
    #[serde(default)]
    pub duration: Option<Duration>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub metadata: TrackMetadata,
}

impl Track {
    /// Create a track with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            url: url.into(),
            duration: None,
            thumbnail: None,
            author: Author::default(),
            views: 0,
            metadata: TrackMetadata::default(),
        }
    }

    /// Set the track length
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author
    #[must_use]
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    /// Set the thumbnail
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Thumbnail) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Replace the metadata bag
    #[must_use]
    pub fn with_metadata(mut self, metadata: TrackMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Record who asked for this track
    #[must_use]
    pub fn requested_by(mut self, requester: Requester) -> Self {
        self.metadata.requested_by = Some(requester);
        self
    }

    /// Display name of the requester, if known
    pub fn requester_name(&self) -> Option<&str> {
        self.metadata.requested_by.as_ref().map(|r| r.name.as_str())
    }
}
