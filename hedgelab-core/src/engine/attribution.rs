//! PnL attribution into delta, gamma and theta components.
//!
//! Gamma and theta depend only on the price path, so they are computed once
//! in [`ComponentCurves`] and shared by every threshold. Delta comes from the
//! position ledger run over each threshold's own trades.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::{compute_delta_pnl, DeltaPnl};
use super::simulator::GAMMA_PERCENT_SCALE;
use crate::domain::{HedgeTrade, PnlRow, PnlSeries, PriceSeries, Threshold};
use crate::error::{ensure_finite, HedgeError};

/// Exposure and cost parameters shared by all thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributionParams {
    /// Notional convexity exposure; negative means short gamma.
    pub dollar_gamma: f64,
    /// Theta accrued per sample interval.
    pub theta_per_interval: f64,
    /// Fraction of traded notional charged per trade. Zero disables costs.
    pub transaction_cost_rate: f64,
}

impl AttributionParams {
    fn validate(&self) -> Result<(), HedgeError> {
        if !self.dollar_gamma.is_finite() {
            return Err(HedgeError::invalid("dollar gamma must be finite"));
        }
        if !self.theta_per_interval.is_finite() {
            return Err(HedgeError::invalid("theta per interval must be finite"));
        }
        if !self.transaction_cost_rate.is_finite() || self.transaction_cost_rate < 0.0 {
            return Err(HedgeError::invalid(format!(
                "transaction cost rate must be finite and non-negative, got {}",
                self.transaction_cost_rate
            )));
        }
        Ok(())
    }
}

/// Theta PnL per sample: `i * theta_per_interval`.
pub fn theta_pnl(len: usize, theta_per_interval: f64) -> Result<Vec<f64>, HedgeError> {
    if !theta_per_interval.is_finite() {
        return Err(HedgeError::invalid("theta per interval must be finite"));
    }
    Ok((0..len).map(|i| i as f64 * theta_per_interval).collect())
}

/// Gamma PnL per sample from the second-order expansion around the first price:
/// `dollar_gamma * (p_i / p_0 - 1)^2 * 100 / 2`.
pub fn gamma_pnl(prices: &PriceSeries, dollar_gamma: f64) -> Result<Vec<f64>, HedgeError> {
    let initial = prices.initial_price();
    if initial == 0.0 {
        return Err(HedgeError::degenerate("initial price is zero"));
    }
    prices
        .prices()
        .map(|p| {
            let relative = p / initial - 1.0;
            ensure_finite(
                dollar_gamma * relative.powi(2) * GAMMA_PERCENT_SCALE / 2.0,
                "gamma PnL",
            )
        })
        .collect()
}

/// Threshold-independent curves on the price-series grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCurves {
    timestamps: Vec<DateTime<Utc>>,
    final_price: f64,
    gamma: Vec<f64>,
    theta: Vec<f64>,
    params: AttributionParams,
}

/// Attribution result for one threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub pnl: PnlSeries,
    pub delta: DeltaPnl,
}

impl ComponentCurves {
    pub fn compute(prices: &PriceSeries, params: AttributionParams) -> Result<Self, HedgeError> {
        params.validate()?;
        Ok(Self {
            timestamps: prices.timestamps(),
            final_price: prices.final_price(),
            gamma: gamma_pnl(prices, params.dollar_gamma)?,
            theta: theta_pnl(prices.len(), params.theta_per_interval)?,
            params,
        })
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn params(&self) -> AttributionParams {
        self.params
    }

    /// Run the ledger over `trades` and merge all three components.
    pub fn attribute(&self, trades: &[HedgeTrade]) -> Result<Attribution, HedgeError> {
        let delta = compute_delta_pnl(
            &self.timestamps,
            trades,
            self.final_price,
            self.params.transaction_cost_rate,
        )?;
        if delta.values.len() != self.timestamps.len() {
            return Err(HedgeError::invalid(format!(
                "delta series has {} rows, expected {}",
                delta.values.len(),
                self.timestamps.len()
            )));
        }

        let rows = self
            .timestamps
            .iter()
            .zip(&delta.values)
            .zip(self.gamma.iter().zip(&self.theta))
            .map(|((&timestamp, &d), (&g, &t))| PnlRow::new(timestamp, d, g, t))
            .collect();

        Ok(Attribution {
            pnl: PnlSeries::from_rows(rows),
            delta,
        })
    }
}

/// Attribute PnL for every threshold's trade sequence.
///
/// Fails as a whole on the first threshold whose trades are invalid.
pub fn attribute(
    prices: &PriceSeries,
    trades_by_threshold: &BTreeMap<Threshold, Vec<HedgeTrade>>,
    params: AttributionParams,
) -> Result<BTreeMap<Threshold, PnlSeries>, HedgeError> {
    let curves = ComponentCurves::compute(prices, params)?;
    trades_by_threshold
        .iter()
        .map(|(&threshold, trades)| Ok((threshold, curves.attribute(trades)?.pnl)))
        .collect()
}
