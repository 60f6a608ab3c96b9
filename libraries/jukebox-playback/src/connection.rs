//! Voice connection lifecycle for one session

use crate::engine::PlaybackEngine;
use crate::error::{PlaybackError, Result};
use crate::transport::{Subscription, VoiceConnection, VoiceTransport};
use crate::types::ConnectionStatus;
use jukebox_core::{ChannelId, TenantId};
use std::sync::Arc;
use std::time::Duration;

/// Owns a session's voice connection and the engine subscription on it
pub struct ConnectionManager {
    tenant: TenantId,
    transport: Arc<dyn VoiceTransport>,
    connection: Option<Arc<dyn VoiceConnection>>,
    subscription: Option<Box<dyn Subscription>>,
    poll_interval: Duration,
    timeout: Duration,
}

impl ConnectionManager {
    /// Create a manager with no connection
    pub fn new(
        tenant: TenantId,
        transport: Arc<dyn VoiceTransport>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            tenant,
            transport,
            connection: None,
            subscription: None,
            poll_interval,
            timeout,
        }
    }

    /// Join `channel` and route `engine` into it
    ///
    /// Any previous connection is torn down first. Resolves once the
    /// connection reports `Ready`; on timeout or destruction the new
    /// connection is torn down too and an error is returned.
    pub async fn connect(
        &mut self,
        channel: &ChannelId,
        engine: &Arc<dyn PlaybackEngine>,
    ) -> Result<()> {
        if self.connection.is_some() {
            tracing::debug!("Tenant {}: replacing existing voice connection", self.tenant);
            self.disconnect();
        }

        let connection = self.transport.open_connection(&self.tenant, channel)?;
        let subscription = match connection.subscribe(Arc::clone(engine)) {
            Ok(subscription) => subscription,
            Err(e) => {
                connection.destroy();
                return Err(e);
            }
        };

        self.connection = Some(Arc::clone(&connection));
        self.subscription = Some(subscription);

        match self.wait_ready(&connection).await {
            Ok(()) => {
                tracing::info!("Tenant {}: connected to {}", self.tenant, channel);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Tenant {}: voice connection failed: {}", self.tenant, e);
                self.disconnect();
                Err(e)
            }
        }
    }

    async fn wait_ready(&self, connection: &Arc<dyn VoiceConnection>) -> Result<()> {
        let channel = connection.channel_id();
        let poll = async {
            loop {
                match connection.status() {
                    ConnectionStatus::Ready => return Ok(()),
                    ConnectionStatus::Destroyed => {
                        return Err(PlaybackError::ConnectionClosed(channel.clone()))
                    }
                    _ => tokio::time::sleep(self.poll_interval).await,
                }
            }
        };

        match tokio::time::timeout(self.timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(PlaybackError::ConnectTimeout {
                channel: channel.clone(),
                waited: self.timeout,
            }),
        }
    }

    /// Leave the voice channel and release the connection
    ///
    /// Returns false when there was no connection.
    pub fn disconnect(&mut self) -> bool {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        match self.connection.take() {
            Some(connection) => {
                if !connection.disconnect() {
                    tracing::debug!(
                        "Tenant {}: transport refused disconnect, destroying",
                        self.tenant
                    );
                }
                connection.destroy();
                tracing::info!("Tenant {}: disconnected", self.tenant);
                true
            }
            None => false,
        }
    }

    /// Whether a connection is held and reports `Ready`
    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| c.status() == ConnectionStatus::Ready)
    }

    /// Channel of the held connection
    pub fn channel_id(&self) -> Option<ChannelId> {
        self.connection.as_ref().map(|c| c.channel_id())
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}
