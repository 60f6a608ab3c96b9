//! Tenant → session registry

use crate::error::{PlaybackError, Result};
use crate::session::{PlaybackSession, SessionContext, SharedSession};
use jukebox_core::{RequestSource, TenantId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns every live playback session, at most one per tenant
pub struct SessionRegistry {
    ctx: SessionContext,
    sessions: RwLock<HashMap<TenantId, SharedSession>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create the session of a tenant
    ///
    /// # Errors
    /// `SessionExists` if the tenant already has one.
    pub async fn create(&self, tenant: TenantId) -> Result<SharedSession> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&tenant) {
            return Err(PlaybackError::SessionExists(tenant));
        }

        let session = PlaybackSession::spawn(tenant.clone(), &self.ctx);
        tracing::info!("Created session for tenant {}", tenant);
        sessions.insert(tenant, Arc::clone(&session));
        Ok(session)
    }

    /// Tear down and forget the session of a tenant
    ///
    /// Playback stops immediately; queued entries are dropped.
    pub async fn delete(&self, tenant: &TenantId) -> Result<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(tenant)
            .ok_or_else(|| PlaybackError::SessionNotFound(tenant.clone()))?;

        session.lock().await.shutdown().await;
        tracing::info!("Deleted session for tenant {}", tenant);
        Ok(())
    }

    /// Session of a tenant, if one exists
    pub async fn get(&self, tenant: &TenantId) -> Option<SharedSession> {
        self.sessions.read().await.get(tenant).cloned()
    }

    /// Session of a tenant, created on first use
    pub async fn resolve(&self, tenant: &TenantId) -> SharedSession {
        if let Some(session) = self.get(tenant).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        // another caller may have created it between the two locks
        if let Some(session) = sessions.get(tenant) {
            return Arc::clone(session);
        }

        let session = PlaybackSession::spawn(tenant.clone(), &self.ctx);
        tracing::info!("Created session for tenant {}", tenant);
        sessions.insert(tenant.clone(), Arc::clone(&session));
        session
    }

    /// Resolve the session of the request's tenant and check voice membership
    ///
    /// With `auto_connect`, joins the invoking user's channel when the bot is
    /// not connected yet.
    ///
    /// # Errors
    /// * `NotInVoiceChannel` - the invoking user sits in no voice channel
    /// * `ChannelMismatch` - the bot occupies another channel of the tenant
    /// * connection errors from joining the channel
    pub async fn resolve_with_channel(
        &self,
        request: &dyn RequestSource,
        auto_connect: bool,
    ) -> Result<SharedSession> {
        let session = self.resolve(request.tenant_id()).await;

        let user_channel = request
            .user_voice_channel()
            .await?
            .ok_or(PlaybackError::NotInVoiceChannel)?;

        let bot_channel = request.bot_voice_channel().await?;
        if let Some(bot) = &bot_channel {
            if *bot != user_channel {
                return Err(PlaybackError::ChannelMismatch {
                    user: user_channel,
                    bot: bot.clone(),
                });
            }
        }

        if auto_connect {
            let mut guard = session.lock().await;
            if bot_channel.is_none() || !guard.is_connected() {
                guard.connect(&user_channel).await?;
            }
        }

        Ok(session)
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is live
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Tenants with a live session, sorted
    pub async fn tenants(&self) -> Vec<TenantId> {
        let mut tenants: Vec<TenantId> = self.sessions.read().await.keys().cloned().collect();
        tenants.sort();
        tenants
    }
}
