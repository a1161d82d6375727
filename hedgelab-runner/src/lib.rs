//! HedgeLab Runner — configuration, price loading, threshold sweeps, artifacts.
//!
//! This crate builds on `hedgelab-core` to provide:
//! - TOML configuration with validation and content hashing
//! - Price loading from CSV exports or a deterministic synthetic walk
//! - Threshold sweeps, fanned out across rayon workers
//! - Summary tables and JSON/CSV/Markdown artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;
pub mod runner;

pub use config::{ConfigError, HedgeConfig};
pub use data_loader::{
    check_sampling_interval, load_price_csv, load_prices, synthetic_price_series, LoadError, LoadOptions, LoadedPrices,
    PriceSource,
};
pub use export::{load_artifacts, save_artifacts};
pub use report::{
    artifact_dir_name, hedge_position_series, render_markdown_summary, summarize, SummaryRow,
};
pub use runner::{run_sweep, run_threshold, RunError, SweepResult, ThresholdResult, SCHEMA_VERSION};
