//! HedgeLab CLI — threshold sweep and config commands.
//!
//! Commands:
//! - `run` — sweep every configured threshold with and without transaction
//!   costs, print the summaries and save artifacts
//! - `init-config` — print the default TOML config

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hedgelab_runner::{
    load_prices, render_markdown_summary, run_sweep, save_artifacts, HedgeConfig, LoadOptions,
    SweepResult,
};

#[derive(Parser)]
#[command(
    name = "hedgelab",
    about = "HedgeLab CLI — delta-hedging threshold simulator"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep hedging thresholds over a price series.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV of `timestamp,close` rows (timestamp in epoch milliseconds).
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Use a seeded synthetic random walk instead of a CSV.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Override market.start (RFC 3339).
        #[arg(long)]
        start: Option<String>,

        /// Override market.end (RFC 3339).
        #[arg(long)]
        end: Option<String>,

        /// Run thresholds one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print the default config as TOML.
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            prices,
            synthetic,
            start,
            end,
            sequential,
            output_dir,
        } => run_cmd(config, prices, synthetic, start, end, sequential, output_dir),
        Commands::InitConfig => {
            print!("{}", HedgeConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_timestamp(flag: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid {flag} timestamp '{value}' (expected RFC 3339)"))
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    config_path: Option<PathBuf>,
    prices: Option<PathBuf>,
    synthetic: bool,
    start: Option<String>,
    end: Option<String>,
    sequential: bool,
    output_dir: PathBuf,
) -> Result<()> {
    if prices.is_some() && synthetic {
        bail!("--prices and --synthetic are mutually exclusive");
    }
    if prices.is_none() && !synthetic {
        bail!("one of --prices or --synthetic is required");
    }

    let mut config = match &config_path {
        Some(path) => HedgeConfig::from_file(path)?,
        None => HedgeConfig::default(),
    };
    if let Some(start) = start {
        config.market.start = parse_timestamp("--start", &start)?;
    }
    if let Some(end) = end {
        config.market.end = parse_timestamp("--end", &end)?;
    }
    if sequential {
        config.sweep.parallel = false;
    }
    config.validate()?;

    let opts = LoadOptions {
        prices_path: prices,
        synthetic,
    };
    let loaded = load_prices(&config, &opts)?;
    info!(
        pair = %config.market.trading_pair,
        samples = loaded.prices.len(),
        dataset = %&loaded.dataset_hash[..12],
        "prices loaded"
    );

    let mut passes = vec![0.0];
    if config.costs.transaction_cost > 0.0 {
        passes.push(config.costs.transaction_cost);
    }
    for cost in passes {
        let result = run_sweep(&config, &loaded, cost)?;
        report(&result, &output_dir)?;
    }
    Ok(())
}

fn report(result: &SweepResult, output_dir: &std::path::Path) -> Result<()> {
    println!("{}", render_markdown_summary(result));
    let run_dir = save_artifacts(result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    println!();
    Ok(())
}
