/// Jukebox Bot - per-guild music queue
use anyhow::Context;
use clap::{Parser, Subcommand};
use jukebox_bot::{BotConfig, CatalogResolver, Console, Transcript};
use jukebox_core::TenantId;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox-bot")]
#[command(about = "Per-guild music queue bot", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "JUKEBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the bot from stdin against a simulated voice platform
    Console {
        /// Tenant (guild) id used for every request
        #[arg(short, long)]
        tenant: Option<String>,
    },
    /// Load and validate the configuration, then print it
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout belongs to the console transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jukebox_bot=info,jukebox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Console { tenant } => console(config, tenant).await?,
        Commands::CheckConfig => check_config(&config)?,
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<BotConfig> {
    let config = BotConfig::load(path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn console(config: BotConfig, tenant: Option<String>) -> anyhow::Result<()> {
    let resolver = CatalogResolver::load(&config.console.catalog)
        .await
        .with_context(|| format!("Failed to load catalog {:?}", config.console.catalog))?;

    let tenant = TenantId::new(tenant.unwrap_or_else(|| config.console.tenant.clone()));
    tracing::info!("Starting console for tenant {}", tenant);
    tracing::info!(
        "User {} in voice channel {}",
        config.console.user,
        config.console.voice_channel
    );

    let console = Console::new(&config, tenant, Arc::new(resolver), Transcript::stdout());
    println!(
        "{} ready. Type {}help for commands, :quit to exit.",
        config.bot.name, config.bot.prefix
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(stdin).await?;

    tracing::info!("Console closed");
    Ok(())
}

fn check_config(config: &BotConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    tracing::info!("Configuration is valid");
    Ok(())
}
