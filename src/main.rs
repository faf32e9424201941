use clap::{Parser, Subcommand};
use std::sync::Arc;

use tutorialbot::application::bot::TutorialBot;
use tutorialbot::application::errors::BotError;
use tutorialbot::application::gateway::run_gateway;
use tutorialbot::extensions;
use tutorialbot::infrastructure::adapters::ConsoleAdapter;
use tutorialbot::infrastructure::config::Settings;
use tutorialbot::infrastructure::http::HttpClient;
use tutorialbot::infrastructure::logging;
use tutorialbot::infrastructure::modules::FsModuleFinder;

#[derive(Parser)]
#[command(name = "tutorialbot")]
#[command(about = "A chat bot that loads its extensions from a package tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// List the extensions that would be loaded
    Extensions,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(&cli.config),
        Commands::Version => {
            println!("tutorialbot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::Extensions => list_extensions(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_bot(settings: &Settings) -> Result<TutorialBot, BotError> {
    let finder = FsModuleFinder::new(settings.extensions.module_path.clone());

    let mut http = HttpClient::create_session(settings.http.timeout_secs)?;
    if !settings.bot.client_id.is_empty() && !settings.bot.secret.is_empty() {
        http = http.create_auth_session(&settings.bot.client_id, &settings.bot.secret)?;
    }

    Ok(TutorialBot::new(Arc::new(finder), settings.bot.prefixes.clone())
        .with_catalog(extensions::catalog())
        .with_http(http))
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    let settings = Settings::init(config_path)?;
    settings.require_token()?;
    logging::setup(&settings.log.level);
    tracing::info!("Running tutorialbot v{} ({})", env!("CARGO_PKG_VERSION"), settings.bot.env);

    let mut bot = build_bot(&settings)?;
    let ignore = settings.extension_ignore();
    bot.load_extensions(
        &settings.extensions.root,
        settings.extensions.package.as_deref(),
        ignore.as_ref(),
        None,
    )?;
    tracing::info!("Loaded {} extensions: {}", bot.extensions().len(), bot.extensions().join(", "));

    let activity = if settings.bot.is_dev() {
        "[DEV] Bot in development...".to_string()
    } else {
        format!("Running version {}", env!("CARGO_PKG_VERSION"))
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(async {
        let gateway = ConsoleAdapter::new(&settings.bot.name, bot.parser().clone())
            .with_activity(activity);
        run_gateway(&bot, &gateway, shutdown_signal()).await
    })
}

fn list_extensions(config_path: &str) -> Result<(), BotError> {
    let settings = Settings::init(config_path)?;
    logging::setup(&settings.log.level);

    let bot = build_bot(&settings)?;
    let ignore = settings.extension_ignore();
    let names = bot.find_extensions(
        &settings.extensions.root,
        settings.extensions.package.as_deref(),
        ignore.as_ref(),
    )?;

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Settings::default())
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

/// Completes on ctrl-c, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutting down...");
}
