/// Chat commands
///
/// Text lines are parsed into a [`Command`] and executed against the session
/// registry. Every failure ends up as a reply to the invoking user.
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use jukebox_core::{MediaResolver, OutgoingMessage, RequestSource};
use jukebox_playback::SessionRegistry;
use std::sync::Arc;

pub mod info;
pub mod playback;
pub mod queue;

/// Parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search and append a track
    Push { query: String },
    /// Same as push
    Play { query: String },
    /// Push with a query, list without
    Q { query: Option<String> },
    /// One page of the playlist, 1-based
    List { page: Option<usize> },
    Now,
    Pause,
    Resume,
    Toggle,
    Skip,
    Remove { index: u64 },
    Clear,
    Shuffle,
    Status,
    Help,
}

/// Name and summary of every command, in help order
pub const COMMANDS: &[(&str, &str)] = &[
    ("play <query>", "Adds a track to the end of the playlist"),
    ("push <query>", "Adds a track to the end of the playlist"),
    ("q [query|page]", "List or pushes a track to the playlist"),
    ("list [page]", "Shows the current playlist"),
    ("now", "Displays the current track"),
    ("pause", "Pauses the current track"),
    ("resume", "Resumes the current track"),
    ("toggle", "Pauses or resumes the current track"),
    ("skip", "Skips the current track"),
    ("remove <track_id>", "Removes a song from the playlist"),
    ("clear", "Clears the playlist"),
    ("shuffle", "Shuffles the playlist"),
    ("status", "Shows information about the player"),
    ("help", "Lists the commands"),
];

impl Command {
    /// Parse a prefixed text line
    ///
    /// Returns `None` when the line does not start with `prefix`.
    pub fn parse(line: &str, prefix: &str) -> Option<Result<Self>> {
        let body = line.trim_start().strip_prefix(prefix)?;
        Some(Self::parse_body(body))
    }

    fn parse_body(body: &str) -> Result<Self> {
        let mut args = split_args(body).into_iter();
        let name = args.next().unwrap_or_default().to_lowercase();
        let rest: Vec<String> = args.collect();

        let query = || (!rest.is_empty()).then(|| rest.join(" "));
        let required_query = || query().ok_or_else(|| missing("query"));

        let command = match name.as_str() {
            "push" => Command::Push {
                query: required_query()?,
            },
            "play" => Command::Play {
                query: required_query()?,
            },
            "q" => match query() {
                Some(q) => match q.parse() {
                    Ok(page) => Command::List { page: Some(page) },
                    Err(_) => Command::Q { query: Some(q) },
                },
                None => Command::Q { query: None },
            },
            "list" => Command::List {
                page: rest.first().map(|raw| parse_page(raw)).transpose()?,
            },
            "now" => Command::Now,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "toggle" | "togglepause" => Command::Toggle,
            "skip" => Command::Skip,
            "remove" => {
                let raw = rest.first().ok_or_else(|| missing("track_id"))?;
                let index = raw.parse().map_err(|_| {
                    BotError::validation("Argument \"track_id\" is not a number")
                })?;
                Command::Remove { index }
            }
            "clear" => Command::Clear,
            "shuffle" => Command::Shuffle,
            "status" => Command::Status,
            "help" => Command::Help,
            _ => return Err(BotError::UnknownCommand(name)),
        };

        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Push { .. } => "push",
            Command::Play { .. } => "play",
            Command::Q { .. } => "q",
            Command::List { .. } => "list",
            Command::Now => "now",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Toggle => "toggle",
            Command::Skip => "skip",
            Command::Remove { .. } => "remove",
            Command::Clear => "clear",
            Command::Shuffle => "shuffle",
            Command::Status => "status",
            Command::Help => "help",
        }
    }
}

fn parse_page(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| BotError::validation("Argument \"page\" is not a number"))
}

fn missing(argument: &str) -> BotError {
    BotError::validation(format!("Missing argument \"{}\"", argument))
}

/// Split on whitespace, keeping `"quoted text"` as one argument
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                if quoted || !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }

    args.retain(|a| !a.is_empty());
    args
}

/// Command executor shared by every front-end
pub struct Bot {
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) resolver: Arc<dyn MediaResolver>,
    pub(crate) prefix: String,
    pub(crate) max_per_page: usize,
}

impl Bot {
    pub fn new(
        registry: Arc<SessionRegistry>,
        resolver: Arc<dyn MediaResolver>,
        config: &BotConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            prefix: config.bot.prefix.clone(),
            max_per_page: config.list.max_per_page,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse and run one text line
    ///
    /// Returns false when the line is not a command.
    pub async fn handle_line(&self, request: &dyn RequestSource, line: &str) -> bool {
        let Some(parsed) = Command::parse(line, &self.prefix) else {
            return false;
        };

        match parsed {
            Ok(command) => self.dispatch(request, command).await,
            Err(e) => self.report(request, "parse", &e).await,
        }
        true
    }

    /// Run a command and reply with the outcome
    pub async fn dispatch(&self, request: &dyn RequestSource, command: Command) {
        let name = command.name();
        tracing::info!("Tenant {} {}", request.tenant_id(), name);

        if let Err(e) = self.execute(request, command).await {
            self.report(request, name, &e).await;
        }
    }

    /// Run a command, leaving error replies to the caller
    pub async fn execute(&self, request: &dyn RequestSource, command: Command) -> Result<()> {
        match command {
            Command::Push { query } | Command::Play { query } => {
                queue::push(self, request, &query).await
            }
            Command::Q { query: Some(query) } => queue::push(self, request, &query).await,
            Command::Q { query: None } => info::list(self, request, None).await,
            Command::List { page } => info::list(self, request, page).await,
            Command::Now => info::now(self, request).await,
            Command::Status => info::status(self, request).await,
            Command::Help => info::help(self, request).await,
            Command::Pause => playback::pause(self, request).await,
            Command::Resume => playback::resume(self, request).await,
            Command::Toggle => playback::toggle(self, request).await,
            Command::Skip => playback::skip(self, request).await,
            Command::Remove { index } => queue::remove(self, request, index).await,
            Command::Clear => queue::clear(self, request).await,
            Command::Shuffle => queue::shuffle(self, request).await,
        }
    }

    async fn report(&self, request: &dyn RequestSource, command: &str, error: &BotError) {
        if error.kind().is_user_facing() {
            tracing::debug!("Tenant {} {}: {}", request.tenant_id(), command, error);
        } else {
            tracing::error!("Tenant {} {} failed: {:?}", request.tenant_id(), command, error);
        }

        let reply = OutgoingMessage::text(error.user_message());
        if let Err(e) = request.reply(reply).await {
            tracing::warn!("Tenant {}: failed to send error reply: {}", request.tenant_id(), e);
        }
    }
}
