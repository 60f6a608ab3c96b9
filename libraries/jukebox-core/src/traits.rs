//! Collaborator traits
//!
//! The playback core never talks to a chat platform directly. Everything it
//! needs from the outside world (search, voice membership, replies and
//! announcements) goes through these traits.

use crate::error::Result;
use crate::types::{ChannelId, OutgoingMessage, Requester, TenantId, Track, TrackMetadata};
use async_trait::async_trait;
use std::sync::Arc;

/// Turns a free-text query into a playable track
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Search for the best match
    ///
    /// `metadata` is attached unchanged to the returned track.
    ///
    /// # Returns
    /// * `Ok(Some(track))` - A playable match
    /// * `Ok(None)` - Nothing matched the query
    /// * `Err(_)` - The resolver itself failed
    async fn search(&self, query: &str, metadata: TrackMetadata) -> Result<Option<Track>>;
}

/// Text channel that receives announcements
#[async_trait]
pub trait AnnouncementSink: Send + Sync {
    /// Post a message to the channel
    async fn send(&self, message: OutgoingMessage) -> Result<()>;
}

/// Lookup of the announcement channel of each tenant
pub trait TextChannels: Send + Sync {
    /// Announcement channel for a tenant, if it has one
    fn announcement_channel(&self, tenant: &TenantId) -> Option<Arc<dyn AnnouncementSink>>;
}

/// One incoming command invocation, already parsed by a front-end adapter
#[async_trait]
pub trait RequestSource: Send + Sync {
    /// Tenant the command was issued in
    fn tenant_id(&self) -> &TenantId;

    /// User who issued the command
    fn requester(&self) -> &Requester;

    /// Voice channel the invoking user currently sits in
    async fn user_voice_channel(&self) -> Result<Option<ChannelId>>;

    /// Voice channel the bot currently sits in, in the same tenant
    async fn bot_voice_channel(&self) -> Result<Option<ChannelId>>;

    /// Answer the invocation
    async fn reply(&self, message: OutgoingMessage) -> Result<()>;
}
