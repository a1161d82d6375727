//! Serializable sweep configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file describes
//! the reference setup: four days of one-minute SOL/USDT closes, a short
//! gamma book of −100k dollar gamma with 20k daily theta, 5 bps costs and a
//! geometric ladder of seventeen rehedge thresholds.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use hedgelab_core::engine::AttributionParams;

pub const MINUTES_PER_DAY: u32 = 60 * 24;

/// Thresholds growing by a roughly constant factor, so hedge frequency also
/// scales by a roughly constant factor from one rung to the next.
pub const DEFAULT_THRESHOLDS: [f64; 17] = [
    0.001, 0.0015, 0.0022, 0.0033, 0.005, 0.007, 0.01, 0.015, 0.022, 0.033, 0.05, 0.07, 0.1,
    0.15, 0.22, 0.33, 0.50,
];

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render config TOML: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HedgeConfig {
    pub market: MarketConfig,
    pub exposure: ExposureConfig,
    pub costs: CostConfig,
    pub sweep: SweepConfig,
}

/// Which price path to evaluate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    /// Label only; the core never interprets it.
    pub trading_pair: String,
    /// First sample instant (inclusive).
    pub start: DateTime<Utc>,
    /// Last sample instant (inclusive).
    pub end: DateTime<Utc>,
    /// Sampling interval. Must divide a day evenly.
    pub interval_minutes: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            trading_pair: "SOL/USDT".to_string(),
            start: Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, 21, 8, 0, 0).unwrap(),
            interval_minutes: 1,
        }
    }
}

/// Option-like exposure being hedged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExposureConfig {
    /// Negative means short gamma.
    pub dollar_gamma: f64,
    /// Theta earned per day, accrued linearly per sample.
    pub daily_theta_decay: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            dollar_gamma: -100_000.0,
            daily_theta_decay: 20_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostConfig {
    /// Fraction of traded notional. 0 disables cost modeling.
    pub transaction_cost: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            transaction_cost: 0.0005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    pub thresholds: Vec<f64>,
    /// Fan thresholds out across the rayon pool.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            parallel: true,
        }
    }
}

impl HedgeConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.market;
        if m.start >= m.end {
            return Err(ConfigError::Invalid(format!(
                "market.start ({}) must be before market.end ({})",
                m.start, m.end
            )));
        }
        if m.interval_minutes == 0 || MINUTES_PER_DAY % m.interval_minutes != 0 {
            return Err(ConfigError::Invalid(format!(
                "market.interval_minutes must evenly divide {MINUTES_PER_DAY}, got {}",
                m.interval_minutes
            )));
        }
        let e = &self.exposure;
        if !e.dollar_gamma.is_finite() || e.dollar_gamma == 0.0 {
            return Err(ConfigError::Invalid(
                "exposure.dollar_gamma must be finite and non-zero".into(),
            ));
        }
        if !e.daily_theta_decay.is_finite() {
            return Err(ConfigError::Invalid(
                "exposure.daily_theta_decay must be finite".into(),
            ));
        }
        let cost = self.costs.transaction_cost;
        if !cost.is_finite() || cost < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "costs.transaction_cost must be non-negative, got {cost}"
            )));
        }
        if self.sweep.thresholds.is_empty() {
            return Err(ConfigError::Invalid("sweep.thresholds is empty".into()));
        }
        if let Some(bad) = self
            .sweep
            .thresholds
            .iter()
            .find(|t| !t.is_finite() || **t <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "sweep.thresholds must be positive, got {bad}"
            )));
        }
        Ok(())
    }

    pub fn intervals_per_day(&self) -> u32 {
        MINUTES_PER_DAY / self.market.interval_minutes
    }

    pub fn theta_per_interval(&self) -> f64 {
        self.exposure.daily_theta_decay / self.intervals_per_day() as f64
    }

    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.market.interval_minutes))
    }

    /// Core parameters for a sweep at the given cost rate.
    pub fn attribution_params(&self, transaction_cost_rate: f64) -> AttributionParams {
        AttributionParams {
            dollar_gamma: self.exposure.dollar_gamma,
            theta_per_interval: self.theta_per_interval(),
            transaction_cost_rate,
        }
    }

    /// Deterministic BLAKE3 hex digest of the canonical JSON form.
    ///
    /// Two identical configs hash identically, so results can be matched
    /// to the configuration that produced them.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}
