//! Trading Assistant CLI
//!
//! Terminal front end for the snapshot pipeline: an interactive chat session
//! (with optional Ollama narration) and a one-shot `snapshot` command.

mod chat;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistant_core::{GenerationOptions, LlmProvider};
use assistant_runtime::OllamaProvider;
use market_analysis::{
    BinanceClient, Instrument, MarketAnalyst, MarketDataRouter, MockMarketData, Resolver,
    ResolverConfig, YahooClient,
};

use crate::chat::Assistant;

#[derive(Parser)]
#[command(
    name = "trading-assistant",
    about = "Conversational technical-analysis assistant"
)]
struct Cli {
    /// Use deterministic synthetic market data instead of live providers
    #[arg(long)]
    offline: bool,

    /// Crypto pair used when a query names no known asset
    #[arg(long, default_value = "BTC/USDT")]
    default_pair: String,

    /// Model to request from the LLM backend
    #[arg(long, default_value = "llama3.2")]
    model: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat {
        /// Where the conversation memory is persisted
        #[arg(long, default_value = "chat-memory.json")]
        memory_file: PathBuf,
    },

    /// One-shot technical snapshot for a query
    Snapshot {
        /// Free-text query, e.g. "btc price"
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let analyst = build_analyst(cli.offline, &cli.default_pair)?;

    match cli.command {
        Commands::Snapshot { query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("snapshot needs a query, e.g. `snapshot btc price`");
            }
            match analyst.analyze(&query).await {
                Ok(analysis) => println!("{}", analysis.summary()),
                Err(err) => println!("{}", err.unavailable_message()),
            }
        }

        Commands::Chat { memory_file } => {
            let provider = connect_provider().await;
            let options = GenerationOptions {
                model: cli.model,
                ..GenerationOptions::default()
            };

            let assistant = Assistant::new(analyst, provider, options);
            chat::run(&assistant, &memory_file).await?;
        }
    }

    Ok(())
}

fn build_analyst(offline: bool, default_pair: &str) -> anyhow::Result<MarketAnalyst> {
    let (base, quote) = default_pair
        .split_once('/')
        .ok_or_else(|| anyhow::anyhow!("default pair must look like BASE/QUOTE, got {default_pair:?}"))?;

    let resolver = Resolver::new(ResolverConfig {
        quote_currency: quote.to_uppercase(),
        default_instrument: Instrument::crypto(base, quote),
    });

    let router = if offline {
        tracing::info!("offline mode: using deterministic synthetic market data");
        MarketDataRouter::new(Arc::new(MockMarketData::new()), Arc::new(MockMarketData::new()))
    } else {
        MarketDataRouter::new(Arc::new(BinanceClient::new()), Arc::new(YahooClient::new()))
    };

    Ok(MarketAnalyst::new(resolver, router))
}

/// Probe Ollama; narration is optional, so an unreachable backend only
/// downgrades replies to the raw snapshot summary.
async fn connect_provider() -> Option<Arc<dyn LlmProvider>> {
    let provider = OllamaProvider::from_env();

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  model: {model}");
                }
            }
            Some(Arc::new(provider))
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not reachable - replies will show raw analysis only");
            tracing::warn!("  Start it with: ollama serve");
            None
        }
    }
}
