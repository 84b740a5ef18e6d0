//! Risk regime report.
//!
//! # Usage
//!
//! ```bash
//! # Fetch live data and print every timeframe plus the 24h deep dive
//! risk-regime report
//!
//! # Custom universe, 7d deep dive
//! risk-regime report --config config/default.toml --detail 7d
//!
//! # Replay a saved /coins/markets response as JSON
//! risk-regime report --input markets.json --json
//!
//! # Print the effective universe
//! risk-regime universe
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use risk_regime::data::{parse_markets, records_to_snapshot, CoinGeckoClient, MarketSnapshot, Timeframe};
use risk_regime::regime::RegimeClassifier;
use risk_regime::report::{build_report, render_detail, render_summary};
use risk_regime::universe::UniverseConfig;

/// Crypto risk regime CLI.
#[derive(Parser)]
#[command(name = "risk-regime")]
#[command(about = "Score speculative risk appetite relative to BTC")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the 1h, 24h and 7d regimes
    Report {
        /// Universe TOML file (built-in universe if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Timeframe for the detailed breakdown
        #[arg(short, long, default_value = "24h")]
        detail: String,

        /// Saved CoinGecko /coins/markets response to use instead of the API
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective universe as TOML
    Universe {
        /// Universe TOML file (built-in universe if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_universe(path: Option<&PathBuf>) -> Result<UniverseConfig> {
    let universe = match path {
        Some(p) => UniverseConfig::load(p)
            .with_context(|| format!("Failed to load universe from {}", p.display()))?,
        None => UniverseConfig::default(),
    };

    for role in universe.missing_roles() {
        warn!("Role bucket '{}' is not configured; its score reads as 0", role);
    }

    Ok(universe)
}

async fn load_snapshot(universe: &UniverseConfig, input: Option<&PathBuf>) -> Result<MarketSnapshot> {
    let ids = universe.all_assets();

    let snapshot = match input {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records = parse_markets(&body)?;
            info!("Loaded {} market records from {}", records.len(), path.display());
            records_to_snapshot(&records)
        }
        None => {
            let api_key = std::env::var("COINGECKO_API_KEY").ok();
            let mut client = CoinGeckoClient::new(api_key)?;
            info!(
                "Fetching {} assets across {} buckets from CoinGecko (1h, 24h, 7d)",
                ids.len(),
                universe.buckets.len()
            );
            client
                .fetch_snapshot(&ids)
                .await
                .context("Failed to fetch market data")?
        }
    };

    if snapshot.is_empty() {
        bail!("No market data available");
    }

    let missing = ids.iter().filter(|id| !snapshot.assets.contains_key(*id)).count();
    if missing > 0 {
        warn!("{} of {} assets returned no data", missing, ids.len());
    }

    Ok(snapshot)
}

async fn cmd_report(
    config: Option<PathBuf>,
    detail: String,
    input: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let detail_tf = Timeframe::from_str(&detail)
        .with_context(|| format!("Unknown timeframe '{}' (expected 1h, 24h or 7d)", detail))?;

    let universe = load_universe(config.as_ref())?;
    let snapshot = load_snapshot(&universe, input.as_ref()).await?;

    let classifier = RegimeClassifier::new(universe);
    let report = build_report(&classifier, &snapshot, &Timeframe::ALL);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render_summary(&report));

    match report.result(detail_tf) {
        Some(result) => println!("{}", render_detail(detail_tf, result)),
        None => println!("--- {} Deep Dive ---\nN/A (Missing BTC data)", detail_tf),
    }

    Ok(())
}

fn cmd_universe(config: Option<PathBuf>) -> Result<()> {
    let universe = load_universe(config.as_ref())?;
    print!("{}", universe.to_toml_string()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("risk_regime=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            config,
            detail,
            input,
            json,
        } => cmd_report(config, detail, input, json).await?,
        Commands::Universe { config } => cmd_universe(config)?,
    }

    Ok(())
}
