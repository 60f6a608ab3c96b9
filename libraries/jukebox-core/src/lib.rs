//! Jukebox Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for Jukebox.
//!
//! This crate provides the building blocks shared by the playback session manager
//! and the chat front-ends that drive it.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Requester`, `OutgoingMessage`, tenant/channel/user ids
//! - **Collaborator Traits**: `MediaResolver`, `RequestSource`, `AnnouncementSink`, `TextChannels`
//! - **Error Handling**: `CoreError`, `ErrorKind` and the `Result` alias
//!
//! # Example
//!
//! ```rust
//! use jukebox_core::types::{Requester, Track, UserId};
//! use std::time::Duration;
//!
//! let requester = Requester::new(UserId::new("42"), "alice");
//! let track = Track::new("dQw4w9WgXcQ", "Never Gonna Give You Up", "https://youtu.be/dQw4w9WgXcQ")
//!     .with_duration(Duration::from_secs(213))
//!     .requested_by(requester);
//!
//! assert_eq!(track.requester_name(), Some("alice"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, ErrorKind, Result};
pub use traits::{AnnouncementSink, MediaResolver, RequestSource, TextChannels};

pub use types::{
    Author, ChannelId, Embed, OutgoingMessage, Requester, TenantId, Thumbnail, Track,
    TrackMetadata, UserId,
};
