//! Price loading for the runner.
//!
//! Resolves the price path a sweep runs over. Fallback policy:
//! 1. If a CSV file is given → load it and keep rows inside the configured range
//! 2. If not and `--synthetic` → generate a seeded random walk (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! Synthetic data is a developer-only debug mode. Reports produced on
//! synthetic data are tagged as such.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use hedgelab_core::domain::{PricePoint, PriceSeries};
use hedgelab_core::HedgeError;

use crate::config::HedgeConfig;

/// Errors from the price loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no price file given (pass --prices or use --synthetic for synthetic data)")]
    NoPriceSource,

    #[error("failed to read prices from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("row {row} of {path}: {reason}")]
    BadRow {
        path: String,
        row: usize,
        reason: String,
    },

    #[error("no prices inside [{start}, {end}] in {path}")]
    EmptyRange {
        path: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(
        "prices are not sampled every {expected_secs}s: gap of {found_secs}s before {at}"
    )]
    Interval {
        expected_secs: i64,
        found_secs: i64,
        at: DateTime<Utc>,
    },

    #[error("price series rejected: {0}")]
    Series(#[from] HedgeError),
}

/// Where the prices came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    CsvImport,
    Synthetic,
}

/// Options controlling how prices are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// CSV with `timestamp,close` columns, timestamp in epoch milliseconds.
    pub prices_path: Option<PathBuf>,
    /// Generate synthetic prices when no file is given.
    pub synthetic: bool,
}

/// A loaded price path with provenance.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub prices: PriceSeries,
    pub source: PriceSource,
    /// BLAKE3 over every timestamp and price, for run fingerprinting.
    pub dataset_hash: String,
}

impl LoadedPrices {
    pub fn new(prices: PriceSeries, source: PriceSource) -> Self {
        let dataset_hash = dataset_hash(&prices);
        Self {
            prices,
            source,
            dataset_hash,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == PriceSource::Synthetic
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: i64,
    close: f64,
}

/// Resolve the price path for `config` according to `opts`.
pub fn load_prices(config: &HedgeConfig, opts: &LoadOptions) -> Result<LoadedPrices, LoadError> {
    let market = &config.market;
    if let Some(path) = &opts.prices_path {
        let prices = load_price_csv(path, market.start, market.end)?;
        check_sampling_interval(&prices, config.interval())?;
        return Ok(LoadedPrices::new(prices, PriceSource::CsvImport));
    }
    if opts.synthetic {
        warn!(
            pair = %market.trading_pair,
            "generating synthetic prices; results will be tagged as synthetic"
        );
        let prices =
            synthetic_price_series(&market.trading_pair, market.start, market.end, config.interval())?;
        return Ok(LoadedPrices::new(prices, PriceSource::Synthetic));
    }
    Err(LoadError::NoPriceSource)
}

/// Reject a series whose samples are not exactly `interval` apart.
///
/// Theta accrues per sample, so a series at any other spacing would book
/// the wrong daily decay.
pub fn check_sampling_interval(prices: &PriceSeries, interval: Duration) -> Result<(), LoadError> {
    for pair in prices.points().windows(2) {
        let gap = pair[1].timestamp - pair[0].timestamp;
        if gap != interval {
            return Err(LoadError::Interval {
                expected_secs: interval.num_seconds(),
                found_secs: gap.num_seconds(),
                at: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

/// Read a `timestamp,close` CSV and keep rows in `[start, end]`.
pub fn load_price_csv(
    path: &Path,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<PriceSeries, LoadError> {
    let path_label = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| LoadError::Read {
        path: path_label.clone(),
        reason: e.to_string(),
    })?;

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|e| LoadError::BadRow {
            path: path_label.clone(),
            row: i + 1,
            reason: e.to_string(),
        })?;
        let timestamp =
            DateTime::<Utc>::from_timestamp_millis(row.timestamp).ok_or_else(|| LoadError::BadRow {
                path: path_label.clone(),
                row: i + 1,
                reason: format!("timestamp {} out of range", row.timestamp),
            })?;
        if timestamp < start || timestamp > end {
            dropped += 1;
            continue;
        }
        points.push(PricePoint::new(timestamp, row.close));
    }

    if dropped > 0 {
        warn!(path = %path_label, dropped, "dropped rows outside the configured range");
    }
    if points.is_empty() {
        return Err(LoadError::EmptyRange {
            path: path_label,
            start,
            end,
        });
    }
    info!(path = %path_label, rows = points.len(), "loaded price series");
    Ok(PriceSeries::new(points)?)
}

/// Generate a synthetic close-price path for testing/development.
///
/// A bounded random walk from 200.0, one sample per `interval` over
/// `[start, end]`. The seed is derived from `pair`, so the same pair and
/// range always give the same path.
pub fn synthetic_price_series(
    pair: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
) -> Result<PriceSeries, LoadError> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(pair.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 200.0_f64;
    let mut current = start;
    while current <= end {
        points.push(PricePoint::new(current, price));
        let step: f64 = rng.gen_range(-0.004..0.004);
        price *= 1.0 + step;
        current += interval;
    }
    Ok(PriceSeries::new(points)?)
}

/// Deterministic BLAKE3 hash over every sample.
pub fn dataset_hash(prices: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for p in prices.points() {
        hasher.update(&p.timestamp.timestamp_millis().to_le_bytes());
        hasher.update(&p.price.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
