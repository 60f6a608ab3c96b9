/// Bot configuration
use crate::error::{BotError, Result};
use jukebox_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "jukebox.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default = "default_bot")]
    pub bot: BotSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_list")]
    pub list: ListSettings,

    #[serde(default = "default_console")]
    pub console: ConsoleSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotSettings {
    /// Text commands start with this prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_connect_poll_ms")]
    pub connect_poll_ms: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListSettings {
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    /// TOML catalog the console resolver searches
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Voice channel the simulated user starts in
    #[serde(default = "default_voice_channel")]
    pub voice_channel: String,

    #[serde(default = "default_user")]
    pub user: String,

    /// Multiplier applied to track lengths by the simulated engine
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl BotConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `jukebox.toml` is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings =
                    settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (JUKEBOX_PLAYBACK__RETRY_ATTEMPTS=...)
        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| BotError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| BotError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.bot.prefix.trim().is_empty() {
            return Err(BotError::Config("Command prefix must not be empty".to_string()));
        }

        if self.playback.retry_attempts == 0 {
            return Err(BotError::Config(
                "playback.retry_attempts must be at least 1".to_string(),
            ));
        }

        if self.playback.connect_poll_ms == 0 || self.playback.connect_timeout_secs == 0 {
            return Err(BotError::Config(
                "Connect poll interval and timeout must be positive".to_string(),
            ));
        }

        if self.list.max_per_page == 0 {
            return Err(BotError::Config(
                "list.max_per_page must be at least 1".to_string(),
            ));
        }

        if !self.console.time_scale.is_finite() || self.console.time_scale <= 0.0 {
            return Err(BotError::Config(format!(
                "console.time_scale must be a positive number, got {}",
                self.console.time_scale
            )));
        }

        Ok(())
    }
}

impl PlaybackSettings {
    /// Session tunables for the playback library
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            connect_poll_interval: Duration::from_millis(self.connect_poll_ms),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..SessionConfig::default()
        }
    }
}

// Default values
fn default_bot() -> BotSettings {
    BotSettings {
        prefix: default_prefix(),
        name: default_name(),
    }
}

fn default_prefix() -> String {
    "%".to_string()
}

fn default_name() -> String {
    "jukebox".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        retry_attempts: default_retry_attempts(),
        retry_delay_ms: default_retry_delay_ms(),
        connect_poll_ms: default_connect_poll_ms(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_retry_attempts() -> u32 {
    4
}

fn default_retry_delay_ms() -> u64 {
    250
}

fn default_connect_poll_ms() -> u64 {
    250
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_list() -> ListSettings {
    ListSettings {
        max_per_page: default_max_per_page(),
    }
}

fn default_max_per_page() -> usize {
    10
}

fn default_console() -> ConsoleSettings {
    ConsoleSettings {
        catalog: default_catalog(),
        tenant: default_tenant(),
        voice_channel: default_voice_channel(),
        user: default_user(),
        time_scale: default_time_scale(),
    }
}

fn default_catalog() -> PathBuf {
    PathBuf::from("catalog.toml")
}

fn default_tenant() -> String {
    "console".to_string()
}

fn default_voice_channel() -> String {
    "General".to_string()
}

fn default_user() -> String {
    "listener".to_string()
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot: default_bot(),
            playback: default_playback(),
            list: default_list(),
            console: default_console(),
        }
    }
}
