use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use lingobot_commands::handlers::{
    register_translation_commands, AfkCommand, AnimationArena, DownloadCommand, GetModelCommand,
    GetTempCommand, HahaCommand, HelpCommand, ImageCommand, MemeCommand, NoAfkCommand,
    PingCommand, RandmojiCommand, SedCommand, SetModelCommand, SetTempCommand,
    SupportedLangsCommand,
};
use lingobot_commands::{
    rate_limit, require_owner, with_middleware, AwayState, Capabilities, Dispatcher, Registry,
};
use lingobot_config::BotConfig;
use lingobot_gateway::{ConsoleDelivery, ConsoleTransport, Gateway};
use lingobot_services::{
    GeminiImageGenerator, GeminiTranslator, MemeApiClient, WhatlangDetector, YtDlpDownloader,
};

#[derive(Parser)]
#[command(name = "lingobot")]
#[command(about = "LingoBot live-translation chat bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot on a local console transport
    Serve,
    /// Load and validate the configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve().await,
        Commands::CheckConfig => check_config(),
    }
}

fn check_config() -> Result<()> {
    let config = lingobot_config::load()?;
    let report = lingobot_config::validate(&config);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("error: {error}");
        }
        std::process::exit(1);
    }
    println!("configuration ok");
    Ok(())
}

async fn serve() -> Result<()> {
    let config = lingobot_config::load()?;
    logging::init_logger(&config.log_dir, &config.log_level);

    let report = lingobot_config::validate(&config);
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!("{error}");
        }
        anyhow::bail!("invalid configuration");
    }

    let caps = build_capabilities(&config)?;
    let away = Arc::new(AwayState::new(config.away_message.clone()));
    let registry = Arc::new(Registry::new());
    register_commands(&registry, &away, &config)?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry), caps, away));
    let gateway = Gateway::new(dispatcher);

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(ConsoleTransport::new().run(tx));

    info!("lingobot ready; type /help");
    gateway.run(rx).await;
    Ok(())
}

fn build_capabilities(config: &BotConfig) -> Result<Capabilities> {
    let translator = Arc::new(GeminiTranslator::new(
        config.gemini_api_key.clone(),
        config.translate_model.clone(),
        config.temperature,
    )?);
    Ok(Capabilities {
        delivery: Arc::new(ConsoleDelivery),
        translator,
        detector: Arc::new(WhatlangDetector::new()),
        images: Arc::new(GeminiImageGenerator::new(config.gemini_api_key.clone())?),
        memes: Arc::new(MemeApiClient::new()?),
        downloader: Arc::new(YtDlpDownloader::new()),
    })
}

fn register_commands(
    registry: &Arc<Registry>,
    away: &Arc<AwayState>,
    config: &BotConfig,
) -> Result<(), lingobot_core::BotError> {
    let arena = AnimationArena::new();

    registry.register(Arc::new(HelpCommand::new(Arc::clone(registry))))?;
    registry.register(Arc::new(SupportedLangsCommand::new()))?;
    registry.register(Arc::new(GetModelCommand::new()))?;
    registry.register(Arc::new(GetTempCommand::new()))?;
    registry.register(Arc::new(SedCommand::new()))?;

    registry.register(with_middleware(
        Arc::new(PingCommand::new()),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(SetModelCommand::new()),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(SetTempCommand::new()),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(ImageCommand::new()),
        vec![require_owner(), rate_limit(config.command_rate_per_minute)],
    ))?;
    registry.register(with_middleware(
        Arc::new(MemeCommand::new()),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(RandmojiCommand::new(arena.clone())),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(HahaCommand::new(arena)),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(AfkCommand::new(Arc::clone(away))),
        vec![require_owner()],
    ))?;
    registry.register(with_middleware(
        Arc::new(NoAfkCommand::new(Arc::clone(away))),
        vec![require_owner()],
    ))?;
    registry.register(Arc::new(DownloadCommand::new(
        Duration::from_secs(config.download_cooldown_secs),
        config.max_media_bytes,
    )))?;

    register_translation_commands(registry)?;

    // Meme fetches hit an external API; add a per-sender throttle to the
    // already-registered command.
    if let Some(meme) = registry.get("meme") {
        registry.update_command(
            "meme",
            with_middleware(meme, vec![rate_limit(config.command_rate_per_minute)]),
        )?;
    }

    Ok(())
}
