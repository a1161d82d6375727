//! Sweep runner — fans thresholds out, runs simulation + attribution per
//! threshold, and collects the results keyed by threshold.
//!
//! Gamma and theta curves are computed once and shared read-only. Each
//! threshold then owns its trade list and ledger run, so workers never share
//! mutable state and output does not depend on scheduling order.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use hedgelab_core::domain::{HedgeTrade, PnlSeries, PriceSeries, Threshold, ThresholdSet};
use hedgelab_core::engine::{simulate_threshold, ComponentCurves};
use hedgelab_core::HedgeError;

use crate::config::{ConfigError, HedgeConfig};
use crate::data_loader::{LoadError, LoadedPrices};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("threshold {threshold}: {source}")]
    Threshold {
        threshold: Threshold,
        #[source]
        source: HedgeError,
    },
    #[error(transparent)]
    Engine(#[from] HedgeError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything produced for one threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub threshold: Threshold,
    pub trades: Vec<HedgeTrade>,
    pub pnl: PnlSeries,
    pub final_total_pnl: f64,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub transaction_costs: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    /// Net hedge inventory after the last trade (long minus short).
    pub final_position: f64,
}

/// Complete result of one threshold sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub config_hash: String,
    pub dataset_hash: String,
    pub trading_pair: String,
    pub transaction_cost: f64,
    pub sample_count: usize,
    pub has_synthetic: bool,
    /// One entry per threshold, ascending.
    pub thresholds: Vec<ThresholdResult>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SweepResult {
    pub fn get(&self, threshold: Threshold) -> Option<&ThresholdResult> {
        self.thresholds
            .binary_search_by(|r| r.threshold.cmp(&threshold))
            .ok()
            .map(|i| &self.thresholds[i])
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// Deterministic id for a (config, dataset, cost) triple.
pub fn run_id(config_hash: &str, dataset_hash: &str, transaction_cost: f64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(config_hash.as_bytes());
    hasher.update(dataset_hash.as_bytes());
    hasher.update(&transaction_cost.to_le_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Run every configured threshold over `loaded` at `transaction_cost`.
///
/// Fails as a whole: the first threshold that errors aborts the sweep and no
/// partial mapping is returned.
pub fn run_sweep(
    config: &HedgeConfig,
    loaded: &LoadedPrices,
    transaction_cost: f64,
) -> Result<SweepResult, RunError> {
    config.validate()?;
    let started = Instant::now();
    let thresholds = ThresholdSet::new(&config.sweep.thresholds)?;
    let params = config.attribution_params(transaction_cost);
    let curves = ComponentCurves::compute(&loaded.prices, params)?;

    info!(
        thresholds = thresholds.len(),
        samples = loaded.prices.len(),
        transaction_cost,
        parallel = config.sweep.parallel,
        "starting threshold sweep"
    );

    let dollar_gamma = config.exposure.dollar_gamma;
    let run_one = |threshold: Threshold| {
        run_threshold(&loaded.prices, &curves, threshold, dollar_gamma)
            .map_err(|source| RunError::Threshold { threshold, source })
    };

    let results: Vec<ThresholdResult> = if config.sweep.parallel {
        thresholds
            .as_slice()
            .par_iter()
            .map(|&t| run_one(t))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        thresholds
            .iter()
            .map(run_one)
            .collect::<Result<Vec<_>, _>>()?
    };

    let config_hash = config.config_hash();
    info!(
        thresholds = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "threshold sweep finished"
    );

    Ok(SweepResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(&config_hash, &loaded.dataset_hash, transaction_cost),
        config_hash,
        dataset_hash: loaded.dataset_hash.clone(),
        trading_pair: config.market.trading_pair.clone(),
        transaction_cost,
        sample_count: loaded.prices.len(),
        has_synthetic: loaded.is_synthetic(),
        thresholds: results,
    })
}

/// Simulate and attribute a single threshold against shared curves.
pub fn run_threshold(
    prices: &PriceSeries,
    curves: &ComponentCurves,
    threshold: Threshold,
    dollar_gamma: f64,
) -> Result<ThresholdResult, HedgeError> {
    let trades = simulate_threshold(prices, threshold, dollar_gamma)?;
    let attribution = curves.attribute(&trades)?;
    let pnl = attribution.pnl;
    let delta = attribution.delta;

    let result = ThresholdResult {
        threshold,
        trade_count: trades.len(),
        final_total_pnl: pnl.final_total(),
        max_drawdown: pnl.max_drawdown(),
        transaction_costs: delta.transaction_costs,
        realized_pnl: delta.realized_pnl,
        unrealized_pnl: delta.unrealized_pnl,
        final_position: delta.final_position.net_quantity(),
        trades,
        pnl,
    };
    debug!(
        threshold = %threshold,
        trades = result.trade_count,
        total_pnl = result.final_total_pnl,
        max_drawdown = result.max_drawdown,
        "threshold done"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::PriceSource;
    use chrono::{Duration, TimeZone, Utc};

    fn loaded(prices: &[f64]) -> LoadedPrices {
        let start = Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap();
        let series = PriceSeries::from_pairs(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + Duration::minutes(i as i64), p)),
        )
        .unwrap();
        LoadedPrices::new(series, PriceSource::CsvImport)
    }

    fn config(thresholds: &[f64], parallel: bool) -> HedgeConfig {
        let mut config = HedgeConfig::default();
        config.sweep.thresholds = thresholds.to_vec();
        config.sweep.parallel = parallel;
        config
    }

    #[test]
    fn sweep_is_sorted_and_complete() {
        let data = loaded(&[100.0, 101.0, 99.0, 100.0, 103.0]);
        let result = run_sweep(&config(&[0.02, 0.01, 0.02], false), &data, 0.0).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.thresholds[0].threshold.value(), 0.01);
        assert_eq!(result.thresholds[1].threshold.value(), 0.02);
        for r in &result.thresholds {
            assert_eq!(r.pnl.len(), 5);
            assert_eq!(r.trade_count, r.trades.len());
            assert_eq!(r.final_total_pnl, r.pnl.final_total());
        }
        assert!(result.get(Threshold::new(0.01).unwrap()).is_some());
        assert!(result.get(Threshold::new(0.5).unwrap()).is_none());
    }

    #[test]
    fn parallel_matches_sequential() {
        let data = loaded(&[100.0, 102.0, 98.5, 101.0, 97.0, 99.5, 104.0]);
        let thresholds = [0.001, 0.01, 0.02, 0.05];
        let seq = run_sweep(&config(&thresholds, false), &data, 0.0005).unwrap();
        let par = run_sweep(&config(&thresholds, true), &data, 0.0005).unwrap();
        for (a, b) in seq.thresholds.iter().zip(&par.thresholds) {
            assert_eq!(a.threshold, b.threshold);
            assert_eq!(a.trades, b.trades);
            assert_eq!(a.pnl, b.pnl);
        }
        assert_eq!(seq.dataset_hash, par.dataset_hash);
    }

    #[test]
    fn run_id_depends_on_cost() {
        let data = loaded(&[100.0, 101.0]);
        let cfg = config(&[0.01], false);
        let free = run_sweep(&cfg, &data, 0.0).unwrap();
        let costly = run_sweep(&cfg, &data, 0.0005).unwrap();
        assert_ne!(free.run_id, costly.run_id);
        assert_eq!(free.config_hash, costly.config_hash);
    }

    #[test]
    fn invalid_cost_fails_whole_sweep() {
        let data = loaded(&[100.0, 101.0]);
        let err = run_sweep(&config(&[0.01, 0.02], false), &data, -1.0).unwrap_err();
        assert!(matches!(err, RunError::Engine(HedgeError::InvalidInput(_))));
    }

    #[test]
    fn invalid_config_is_config_error() {
        let data = loaded(&[100.0, 101.0]);
        let err = run_sweep(&config(&[], false), &data, 0.0).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }
}
