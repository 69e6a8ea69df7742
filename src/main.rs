//! Crypto Sentiment Analyzer
//!
//! Serves the sentiment API and drives the analyze flow from the terminal.

use clap::{Parser, Subcommand};
use crypto_sentiment::{
    config::Config,
    controller::{run_prompt, AnalyzeController, ConsoleOutput, HttpAnalyzeApi},
    reddit::{PostSource, RedditClient},
    server::{self, AppState},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crypto-sentiment")]
#[command(about = "Crypto sentiment analysis from Reddit discussion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to config.toml or ~/.config/crypto-sentiment/config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve,
    /// Analyze one coin through the HTTP service
    Analyze {
        /// Coin name (defaults to bitcoin)
        #[arg(default_value = "")]
        coin: String,

        /// Service base URL (overrides client.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Analyze each line read from stdin
    Prompt {
        /// Service base URL (overrides client.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Show sentiment for the popular coins
    Trending,
    /// Test the Reddit API connection
    Test,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if !dotenv_loaded {
        tracing::warn!(".env file not found - using system environment variables");
    }

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Serve => run_server(config).await,
        Commands::Analyze { coin, base_url } => {
            analyze_once(&config, base_url.as_deref(), &coin).await
        }
        Commands::Prompt { base_url } => run_interactive(&config, base_url.as_deref()).await,
        Commands::Trending => show_trending(config).await,
        Commands::Test => {
            validate_environment(&config);
            test_connection(&config).await;
            Ok(())
        }
    }
}

fn validate_environment(config: &Config) {
    let missing = config.reddit.missing_credentials();

    if missing.is_empty() {
        tracing::info!("Reddit credentials loaded");
    } else {
        tracing::warn!("Missing required environment variables: {:?}", missing);
        tracing::warn!("Get Reddit API credentials from https://www.reddit.com/prefs/apps");
    }
}

async fn test_connection(config: &Config) {
    tracing::info!("Testing Reddit API connection...");

    let client = match RedditClient::new(&config.reddit) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Reddit API initialization failed: {}", e);
            return;
        }
    };

    match client.test_connection().await {
        Ok(()) => tracing::info!("Reddit API connected"),
        Err(e) => tracing::error!("Reddit API connection failed: {}", e),
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    validate_environment(&config);
    test_connection(&config).await;

    let state = AppState::from_config(&config.reddit);
    server::serve(&config, state).await
}

fn analyze_controller(
    config: &Config,
    base_url: Option<&str>,
) -> anyhow::Result<AnalyzeController<HttpAnalyzeApi, ConsoleOutput>> {
    let base_url = base_url.unwrap_or(config.client.base_url.as_str());
    let api = HttpAnalyzeApi::new(base_url)?;
    Ok(AnalyzeController::new(api, ConsoleOutput))
}

async fn analyze_once(config: &Config, base_url: Option<&str>, coin: &str) -> anyhow::Result<()> {
    let controller = analyze_controller(config, base_url)?;
    controller.analyze(coin).await;
    Ok(())
}

async fn run_interactive(config: &Config, base_url: Option<&str>) -> anyhow::Result<()> {
    let controller = Arc::new(analyze_controller(config, base_url)?);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    println!("Enter a coin per line (blank = bitcoin), Ctrl-D to quit");
    let activations = run_prompt(controller, stdin).await?;
    tracing::debug!("Handled {} activations", activations);
    Ok(())
}

async fn show_trending(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config.reddit);
    let entries = state
        .trending()
        .await
        .map_err(|e| anyhow::anyhow!(e.message()))?;

    println!("\nTrending Sentiment (r/CryptoCurrency)\n");
    println!("{:<12} {:>10} {:>10} {:>8}", "Coin", "Sentiment", "Direction", "Posts");
    println!("{}", "-".repeat(43));

    for entry in entries {
        println!(
            "{:<12} {:>9.2}% {:>10} {:>8}",
            entry.coin,
            entry.sentiment,
            entry.direction.as_str(),
            entry.posts
        );
    }

    Ok(())
}
