//! Voice transport contract
//!
//! A transport opens per-tenant voice connections; a connection carries the
//! audio of whichever engine is subscribed to it.

use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::types::ConnectionStatus;
use jukebox_core::{ChannelId, TenantId};
use std::sync::Arc;

/// Link between a connection and the engine feeding it
pub trait Subscription: Send + Sync {
    /// Stop routing the engine's audio into the connection
    fn unsubscribe(&self);
}

/// Voice connection to one channel of one tenant
pub trait VoiceConnection: Send + Sync {
    /// Channel the connection targets
    fn channel_id(&self) -> ChannelId;

    /// Current connection state
    fn status(&self) -> ConnectionStatus;

    /// Route an engine's audio into this connection
    fn subscribe(&self, engine: Arc<dyn PlaybackEngine>) -> Result<Box<dyn Subscription>>;

    /// Leave the channel (the connection may be re-joined)
    fn disconnect(&self) -> bool;

    /// Release every resource held by the connection
    fn destroy(&self);
}

/// Opens voice connections
pub trait VoiceTransport: Send + Sync {
    /// Start joining a voice channel
    ///
    /// Returns immediately; the connection becomes `Ready` asynchronously.
    fn open_connection(
        &self,
        tenant: &TenantId,
        channel: &ChannelId,
    ) -> Result<Arc<dyn VoiceConnection>>;
}
