/// Console simulation
///
/// Runs the bot against stdin: every line is a request from a simulated user
/// sitting in a simulated voice channel. Voice connections step through
/// Signalling → Connecting → Ready, and the engine "plays" each track for its
/// (scaled) length, publishing the same state changes a real engine would.
use crate::commands::Bot;
use crate::config::BotConfig;
use crate::error::Result;
use async_trait::async_trait;
use jukebox_core::{
    AnnouncementSink, ChannelId, MediaResolver, OutgoingMessage, RequestSource, Requester,
    TenantId, TextChannels, Track, UserId,
};
use jukebox_playback::{
    ConnectionStatus, EngineEvent, EngineEventSender, EngineFactory, EngineState,
    PlaybackEngine, SessionContext, SessionRegistry, StreamOptions, Subscription,
    VoiceConnection, VoiceTransport,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;

/// Time each simulated connection spends in Signalling and in Connecting
const CONNECT_STEP: Duration = Duration::from_millis(300);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ===== Output =====

/// Everything the console prints, optionally kept for inspection
pub struct Transcript {
    echo: bool,
    lines: Mutex<Vec<String>>,
}

impl Transcript {
    /// Transcript printing to stdout
    pub fn stdout() -> Arc<Self> {
        Arc::new(Self {
            echo: true,
            lines: Mutex::new(Vec::new()),
        })
    }

    /// Transcript that only records
    pub fn silent() -> Arc<Self> {
        Arc::new(Self {
            echo: false,
            lines: Mutex::new(Vec::new()),
        })
    }

    pub fn write(&self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        lock(&self.lines).push(line);
    }

    fn write_message(&self, origin: &str, message: &OutgoingMessage) {
        self.write(format!("[{}] {}", origin, message.content));
        if let Some(embed) = &message.embed {
            match &embed.url {
                Some(url) => self.write(format!("    > {} <{}>", embed.title, url)),
                None => self.write(format!("    > {}", embed.title)),
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.lines).iter().any(|l| l.contains(needle))
    }
}

// ===== Voice =====

/// Which channel the bot sits in, per tenant
#[derive(Clone, Default)]
pub struct VoiceStates {
    channels: Arc<Mutex<HashMap<TenantId, ChannelId>>>,
}

impl VoiceStates {
    pub fn bot_channel(&self, tenant: &TenantId) -> Option<ChannelId> {
        lock(&self.channels).get(tenant).cloned()
    }

    fn join(&self, tenant: &TenantId, channel: &ChannelId) {
        lock(&self.channels).insert(tenant.clone(), channel.clone());
    }

    fn leave(&self, tenant: &TenantId, channel: &ChannelId) {
        let mut channels = lock(&self.channels);
        if channels.get(tenant) == Some(channel) {
            channels.remove(tenant);
        }
    }
}

pub struct SimulatedTransport {
    voice: VoiceStates,
}

impl SimulatedTransport {
    pub fn new(voice: VoiceStates) -> Self {
        Self { voice }
    }
}

impl VoiceTransport for SimulatedTransport {
    fn open_connection(
        &self,
        tenant: &TenantId,
        channel: &ChannelId,
    ) -> jukebox_playback::Result<Arc<dyn VoiceConnection>> {
        tracing::debug!("Tenant {}: joining voice channel {}", tenant, channel);
        Ok(Arc::new(SimulatedConnection {
            tenant: tenant.clone(),
            channel: channel.clone(),
            opened_at: Instant::now(),
            voice: self.voice.clone(),
            joined: AtomicBool::new(false),
            left: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
        }))
    }
}

struct SimulatedConnection {
    tenant: TenantId,
    channel: ChannelId,
    opened_at: Instant,
    voice: VoiceStates,
    joined: AtomicBool,
    left: AtomicBool,
    destroyed: AtomicBool,
}

impl VoiceConnection for SimulatedConnection {
    fn channel_id(&self) -> ChannelId {
        self.channel.clone()
    }

    fn status(&self) -> ConnectionStatus {
        if self.destroyed.load(Ordering::SeqCst) {
            return ConnectionStatus::Destroyed;
        }
        if self.left.load(Ordering::SeqCst) {
            return ConnectionStatus::Disconnected;
        }

        let elapsed = self.opened_at.elapsed();
        if elapsed < CONNECT_STEP {
            ConnectionStatus::Signalling
        } else if elapsed < CONNECT_STEP * 2 {
            ConnectionStatus::Connecting
        } else {
            if !self.joined.swap(true, Ordering::SeqCst) {
                self.voice.join(&self.tenant, &self.channel);
            }
            ConnectionStatus::Ready
        }
    }

    fn subscribe(
        &self,
        _engine: Arc<dyn PlaybackEngine>,
    ) -> jukebox_playback::Result<Box<dyn Subscription>> {
        Ok(Box::new(SimulatedSubscription {
            channel: self.channel.clone(),
        }))
    }

    fn disconnect(&self) -> bool {
        self.left.store(true, Ordering::SeqCst);
        self.voice.leave(&self.tenant, &self.channel);
        true
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.voice.leave(&self.tenant, &self.channel);
    }
}

struct SimulatedSubscription {
    channel: ChannelId,
}

impl Subscription for SimulatedSubscription {
    fn unsubscribe(&self) {
        tracing::trace!("Engine unsubscribed from {}", self.channel);
    }
}

// ===== Engine =====

/// Position bookkeeping of the simulated engine
struct Playhead {
    state: EngineState,
    /// Bumped on every transition; stale end-of-track timers compare against it
    generation: u64,
    remaining: Option<Duration>,
    resumed_at: Instant,
}

struct EngineShared {
    tenant: TenantId,
    events: EngineEventSender,
    playhead: Mutex<Playhead>,
}

impl EngineShared {
    fn transition(&self, playhead: &mut Playhead, new: EngineState) {
        let old = playhead.state;
        playhead.state = new;
        playhead.generation += 1;
        if old != new && self.events.send(EngineEvent::StateChange { old, new }).is_err() {
            tracing::trace!("Tenant {}: engine event dropped", self.tenant);
        }
    }
}

pub struct SimulatedEngine {
    shared: Arc<EngineShared>,
    time_scale: f64,
}

impl SimulatedEngine {
    fn schedule_end(&self, playhead: &Playhead) {
        let Some(remaining) = playhead.remaining else {
            return;
        };
        let generation = playhead.generation;
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let mut playhead = lock(&shared.playhead);
            if playhead.generation == generation && playhead.state == EngineState::Playing {
                shared.transition(&mut playhead, EngineState::Idle);
            }
        });
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn state(&self) -> EngineState {
        lock(&self.shared.playhead).state
    }

    fn play(&self, track: &Track, options: &StreamOptions) -> jukebox_playback::Result<()> {
        tracing::debug!(
            "Tenant {}: streaming {} (audio_only: {})",
            self.shared.tenant,
            track.url,
            options.audio_only
        );

        let mut playhead = lock(&self.shared.playhead);
        self.shared.transition(&mut playhead, EngineState::Buffering);
        playhead.remaining = track.duration.map(|d| d.mul_f64(self.time_scale));
        playhead.resumed_at = Instant::now();
        self.shared.transition(&mut playhead, EngineState::Playing);
        self.schedule_end(&playhead);
        Ok(())
    }

    fn pause(&self) -> bool {
        let mut playhead = lock(&self.shared.playhead);
        if playhead.state != EngineState::Playing {
            return false;
        }
        let played = playhead.resumed_at.elapsed();
        playhead.remaining = playhead.remaining.map(|r| r.saturating_sub(played));
        self.shared.transition(&mut playhead, EngineState::Paused);
        true
    }

    fn unpause(&self) -> bool {
        let mut playhead = lock(&self.shared.playhead);
        if !playhead.state.is_paused() {
            return false;
        }
        playhead.resumed_at = Instant::now();
        self.shared.transition(&mut playhead, EngineState::Playing);
        self.schedule_end(&playhead);
        true
    }

    fn stop(&self) -> bool {
        let mut playhead = lock(&self.shared.playhead);
        playhead.remaining = None;
        self.shared.transition(&mut playhead, EngineState::Idle);
        true
    }
}

pub struct SimulatedEngines {
    time_scale: f64,
}

impl SimulatedEngines {
    pub fn new(time_scale: f64) -> Self {
        Self { time_scale }
    }
}

impl EngineFactory for SimulatedEngines {
    fn create(&self, tenant: &TenantId, events: EngineEventSender) -> Arc<dyn PlaybackEngine> {
        Arc::new(SimulatedEngine {
            shared: Arc::new(EngineShared {
                tenant: tenant.clone(),
                events,
                playhead: Mutex::new(Playhead {
                    state: EngineState::Idle,
                    generation: 0,
                    remaining: None,
                    resumed_at: Instant::now(),
                }),
            }),
            time_scale: self.time_scale,
        })
    }
}

// ===== Text channels =====

struct ConsoleChannel {
    name: String,
    transcript: Arc<Transcript>,
}

#[async_trait]
impl AnnouncementSink for ConsoleChannel {
    async fn send(&self, message: OutgoingMessage) -> jukebox_core::Result<()> {
        self.transcript.write_message(&self.name, &message);
        Ok(())
    }
}

pub struct ConsoleChannels {
    transcript: Arc<Transcript>,
}

impl TextChannels for ConsoleChannels {
    fn announcement_channel(&self, tenant: &TenantId) -> Option<Arc<dyn AnnouncementSink>> {
        Some(Arc::new(ConsoleChannel {
            name: format!("#{}", tenant),
            transcript: Arc::clone(&self.transcript),
        }))
    }
}

// ===== Requests =====

pub struct ConsoleRequest {
    tenant: TenantId,
    requester: Requester,
    user_channel: Option<ChannelId>,
    voice: VoiceStates,
    transcript: Arc<Transcript>,
}

#[async_trait]
impl RequestSource for ConsoleRequest {
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
        Ok(self.voice.bot_channel(&self.tenant))
    }

    async fn reply(&self, message: OutgoingMessage) -> jukebox_core::Result<()> {
        self.transcript.write_message("reply", &message);
        Ok(())
    }
}

// ===== Console =====

pub struct Console {
    bot: Bot,
    tenant: TenantId,
    requester: Requester,
    user_channel: Mutex<Option<ChannelId>>,
    voice: VoiceStates,
    transcript: Arc<Transcript>,
}

impl Console {
    /// Wire a bot to the simulated transport, engine and channels
    pub fn new(
        config: &BotConfig,
        tenant: TenantId,
        resolver: Arc<dyn MediaResolver>,
        transcript: Arc<Transcript>,
    ) -> Self {
        let voice = VoiceStates::default();
        let ctx = SessionContext {
            transport: Arc::new(SimulatedTransport::new(voice.clone())),
            engines: Arc::new(SimulatedEngines::new(config.console.time_scale)),
            text_channels: Arc::new(ConsoleChannels {
                transcript: Arc::clone(&transcript),
            }),
            config: config.playback.session_config(),
        };
        let registry = Arc::new(SessionRegistry::new(ctx));

        Self {
            bot: Bot::new(registry, resolver, config),
            tenant,
            requester: Requester::new(
                UserId::new(config.console.user.clone()),
                config.console.user.clone(),
            ),
            user_channel: Mutex::new(Some(ChannelId::new(config.console.voice_channel.clone()))),
            voice,
            transcript,
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn voice(&self) -> &VoiceStates {
        &self.voice
    }

    fn request(&self) -> ConsoleRequest {
        ConsoleRequest {
            tenant: self.tenant.clone(),
            requester: self.requester.clone(),
            user_channel: lock(&self.user_channel).clone(),
            voice: self.voice.clone(),
            transcript: Arc::clone(&self.transcript),
        }
    }

    /// Handle one input line
    ///
    /// Besides bot commands, `:join <channel>` and `:leave` move the simulated
    /// user. Returns false on `:quit`.
    pub async fn handle(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }

        if let Some(directive) = line.strip_prefix(':') {
            let mut parts = directive.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("quit"), _) => return false,
                (Some("join"), Some(channel)) => {
                    *lock(&self.user_channel) = Some(ChannelId::new(channel));
                    self.transcript
                        .write(format!("* {} joined {}", self.requester.name, channel));
                }
                (Some("leave"), _) => {
                    *lock(&self.user_channel) = None;
                    self.transcript.write(format!("* {} left voice", self.requester.name));
                }
                _ => self
                    .transcript
                    .write("* unknown directive (try :join <channel>, :leave, :quit)"),
            }
            return true;
        }

        let request = self.request();
        if !self.bot.handle_line(&request, line).await {
            self.transcript.write(format!(
                "* commands start with \"{}\" (try {}help)",
                self.bot.prefix(),
                self.bot.prefix()
            ));
        }
        true
    }

    /// Read lines until EOF or `:quit`, then tear the session down
    pub async fn run<R>(&self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.handle(&line).await {
                break;
            }
        }

        if self.bot.registry().get(&self.tenant).await.is_some() {
            self.bot.registry().delete(&self.tenant).await?;
        }
        Ok(())
    }
}
