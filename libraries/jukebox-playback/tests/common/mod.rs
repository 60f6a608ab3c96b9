//! Shared fakes for playback integration tests
//!
//! Fake engine, transport, request source and announcement sink that record
//! every call so tests can assert on them.

#![allow(dead_code)]

use async_trait::async_trait;
use jukebox_core::{
    AnnouncementSink, ChannelId, OutgoingMessage, RequestSource, Requester, TenantId,
    TextChannels, Track, UserId,
};
use jukebox_playback::{
    ConnectionStatus, EngineEvent, EngineEventSender, EngineFactory, EngineState,
    PlaybackEngine, Result, SessionConfig, SessionContext, SessionRegistry, StreamOptions,
    Subscription, VoiceConnection, VoiceTransport,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Tracks =====

pub fn track(id: &str, duration_secs: u64) -> Track {
    Track::new(id, format!("Track {}", id), format!("https://example.com/watch?v={}", id))
        .with_duration(Duration::from_secs(duration_secs))
}

/// Let spawned tasks (event loop, announcements) run
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// ===== Engine =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Play(String),
    Pause,
    Unpause,
    Stop,
}

pub struct FakeEngine {
    state: Mutex<EngineState>,
    events: EngineEventSender,
    calls: Mutex<Vec<EngineCall>>,
    reject_pause: AtomicU32,
    reject_unpause: AtomicU32,
    reject_stop: AtomicU32,
}

impl FakeEngine {
    fn new(events: EngineEventSender) -> Self {
        Self {
            state: Mutex::new(EngineState::Idle),
            events,
            calls: Mutex::new(Vec::new()),
            reject_pause: AtomicU32::new(0),
            reject_unpause: AtomicU32::new(0),
            reject_stop: AtomicU32::new(0),
        }
    }

    fn set_state(&self, new: EngineState) {
        let old = std::mem::replace(&mut *self.state.lock().unwrap(), new);
        if old != new {
            let _ = self.events.send(EngineEvent::StateChange { old, new });
        }
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejected(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Current track ran to its end
    pub fn finish_track(&self) {
        self.set_state(EngineState::Idle);
    }

    /// Subscriber went away for a moment
    pub fn auto_pause(&self) {
        self.set_state(EngineState::AutoPaused);
    }

    pub fn emit_error(&self, message: &str) {
        let _ = self.events.send(EngineEvent::Error(message.to_string()));
    }

    pub fn reject_pauses(&self, times: u32) {
        self.reject_pause.store(times, Ordering::SeqCst);
    }

    pub fn reject_unpauses(&self, times: u32) {
        self.reject_unpause.store(times, Ordering::SeqCst);
    }

    pub fn reject_stops(&self, times: u32) {
        self.reject_stop.store(times, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Track ids handed to `play`, in order
    pub fn plays(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Play(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

impl PlaybackEngine for FakeEngine {
    fn state(&self) -> EngineState {
        *self.state.lock().unwrap()
    }

    fn play(&self, track: &Track, _options: &StreamOptions) -> Result<()> {
        self.record(EngineCall::Play(track.id.clone()));
        self.set_state(EngineState::Buffering);
        self.set_state(EngineState::Playing);
        Ok(())
    }

    fn pause(&self) -> bool {
        self.record(EngineCall::Pause);
        if Self::rejected(&self.reject_pause) {
            return false;
        }
        self.set_state(EngineState::Paused);
        true
    }

    fn unpause(&self) -> bool {
        self.record(EngineCall::Unpause);
        if Self::rejected(&self.reject_unpause) {
            return false;
        }
        self.set_state(EngineState::Playing);
        true
    }

    fn stop(&self) -> bool {
        self.record(EngineCall::Stop);
        if Self::rejected(&self.reject_stop) {
            return false;
        }
        self.set_state(EngineState::Idle);
        true
    }
}

#[derive(Default)]
pub struct FakeEngineFactory {
    engines: Mutex<Vec<(TenantId, Arc<FakeEngine>)>>,
}

impl FakeEngineFactory {
    /// Engine built for a tenant
    pub fn engine(&self, tenant: &TenantId) -> Arc<FakeEngine> {
        self.engines
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == tenant)
            .map(|(_, e)| Arc::clone(e))
            .expect("no engine created for tenant")
    }

    pub fn created(&self) -> usize {
        self.engines.lock().unwrap().len()
    }
}

impl EngineFactory for FakeEngineFactory {
    fn create(&self, tenant: &TenantId, events: EngineEventSender) -> Arc<dyn PlaybackEngine> {
        let engine = Arc::new(FakeEngine::new(events));
        self.engines
            .lock()
            .unwrap()
            .push((tenant.clone(), Arc::clone(&engine)));
        engine
    }
}

// ===== Transport =====

pub struct FakeSubscription {
    active: Arc<AtomicBool>,
}

impl Subscription for FakeSubscription {
    fn unsubscribe(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

pub struct FakeConnection {
    channel: ChannelId,
    statuses: Mutex<VecDeque<ConnectionStatus>>,
    subscribed: Arc<AtomicBool>,
    disconnected: AtomicBool,
    destroyed: AtomicBool,
}

impl FakeConnection {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl VoiceConnection for FakeConnection {
    fn channel_id(&self) -> ChannelId {
        self.channel.clone()
    }

    fn status(&self) -> ConnectionStatus {
        if self.is_destroyed() {
            return ConnectionStatus::Destroyed;
        }
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(ConnectionStatus::Ready)
        } else {
            statuses.front().copied().unwrap_or(ConnectionStatus::Ready)
        }
    }

    fn subscribe(&self, _engine: Arc<dyn PlaybackEngine>) -> Result<Box<dyn Subscription>> {
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(Box::new(FakeSubscription {
            active: Arc::clone(&self.subscribed),
        }))
    }

    fn disconnect(&self) -> bool {
        self.disconnected.store(true, Ordering::SeqCst);
        true
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

/// Transport whose connections walk through a scripted status sequence
pub struct FakeTransport {
    script: Mutex<Vec<ConnectionStatus>>,
    opened: Mutex<Vec<Arc<FakeConnection>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::scripted(vec![
            ConnectionStatus::Signalling,
            ConnectionStatus::Connecting,
            ConnectionStatus::Ready,
        ])
    }

    /// Every new connection reports `statuses` in order, then stays on the last
    pub fn scripted(statuses: Vec<ConnectionStatus>) -> Self {
        Self {
            script: Mutex::new(statuses),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn set_script(&self, statuses: Vec<ConnectionStatus>) {
        *self.script.lock().unwrap() = statuses;
    }

    pub fn opened(&self) -> Vec<Arc<FakeConnection>> {
        self.opened.lock().unwrap().clone()
    }

    pub fn last(&self) -> Arc<FakeConnection> {
        self.opened()
            .last()
            .cloned()
            .expect("no connection opened")
    }
}

impl VoiceTransport for FakeTransport {
    fn open_connection(
        &self,
        _tenant: &TenantId,
        channel: &ChannelId,
    ) -> Result<Arc<dyn VoiceConnection>> {
        let connection = Arc::new(FakeConnection {
            channel: channel.clone(),
            statuses: Mutex::new(self.script.lock().unwrap().iter().copied().collect()),
            subscribed: Arc::new(AtomicBool::new(false)),
            disconnected: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
        });
        self.opened.lock().unwrap().push(Arc::clone(&connection));
        Ok(connection)
    }
}

// ===== Text channels =====

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<OutgoingMessage>>,
}

impl RecordingSink {
    pub fn contents(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.content.clone())
            .collect()
    }
}

#[async_trait]
impl AnnouncementSink for RecordingSink {
    async fn send(&self, message: OutgoingMessage) -> jukebox_core::Result<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

pub struct FakeTextChannels {
    sink: Arc<RecordingSink>,
}

impl TextChannels for FakeTextChannels {
    fn announcement_channel(&self, _tenant: &TenantId) -> Option<Arc<dyn AnnouncementSink>> {
        Some(Arc::clone(&self.sink) as Arc<dyn AnnouncementSink>)
    }
}

// ===== Requests =====

pub struct FakeRequest {
    tenant: TenantId,
    requester: Requester,
    user_channel: Option<ChannelId>,
    bot_channel: Option<ChannelId>,
    replies: Mutex<Vec<OutgoingMessage>>,
}

impl FakeRequest {
    pub fn new(tenant: &str, user_channel: Option<&str>, bot_channel: Option<&str>) -> Self {
        Self {
            tenant: TenantId::new(tenant),
            requester: Requester::new(UserId::new("u1"), "alice"),
            user_channel: user_channel.map(ChannelId::new),
            bot_channel: bot_channel.map(ChannelId::new),
            replies: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RequestSource for FakeRequest {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant
    }

    fn requester(&self) -> &Requester {
        &self.requester
    }

    async fn user_voice_channel(&self) -> jukebox_core::Result<Option<ChannelId>> {
        Ok(self.user_channel.clone())
    }

    async fn bot_voice_channel(&self) -> jukebox_core::Result<Option<ChannelId>> {
        Ok(self.bot_channel.clone())
    }

    async fn reply(&self, message: OutgoingMessage) -> jukebox_core::Result<()> {
        self.replies.lock().unwrap().push(message);
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub engines: Arc<FakeEngineFactory>,
    pub transport: Arc<FakeTransport>,
    pub sink: Arc<RecordingSink>,
    pub ctx: SessionContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(FakeTransport::new())
    }

    pub fn with_transport(transport: FakeTransport) -> Self {
        let engines = Arc::new(FakeEngineFactory::default());
        let transport = Arc::new(transport);
        let sink = Arc::new(RecordingSink::default());
        let ctx = SessionContext {
            transport: Arc::clone(&transport) as Arc<dyn VoiceTransport>,
            engines: Arc::clone(&engines) as Arc<dyn EngineFactory>,
            text_channels: Arc::new(FakeTextChannels {
                sink: Arc::clone(&sink),
            }),
            config: SessionConfig::default(),
        };

        Self {
            engines,
            transport,
            sink,
            ctx,
        }
    }

    pub fn registry(&self) -> SessionRegistry {
        SessionRegistry::new(self.ctx.clone())
    }
}
