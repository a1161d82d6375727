//! PnlSeries — per-timestamp PnL attribution for one threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::drawdown::max_drawdown;

/// One row of the attribution table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlRow {
    pub timestamp: DateTime<Utc>,
    pub delta_pnl: f64,
    pub gamma_pnl: f64,
    pub theta_pnl: f64,
    pub total_pnl: f64,
}

impl PnlRow {
    pub fn new(timestamp: DateTime<Utc>, delta_pnl: f64, gamma_pnl: f64, theta_pnl: f64) -> Self {
        Self {
            timestamp,
            delta_pnl,
            gamma_pnl,
            theta_pnl,
            total_pnl: delta_pnl + gamma_pnl + theta_pnl,
        }
    }
}

/// Attribution table indexed by the full price-series timestamp grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlSeries {
    rows: Vec<PnlRow>,
}

impl PnlSeries {
    pub(crate) fn from_rows(rows: Vec<PnlRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PnlRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&PnlRow> {
        self.rows.last()
    }

    /// Total PnL at the final timestamp.
    pub fn final_total(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.total_pnl)
    }

    pub fn delta(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.delta_pnl).collect()
    }

    pub fn gamma(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.gamma_pnl).collect()
    }

    pub fn theta(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.theta_pnl).collect()
    }

    pub fn total(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.total_pnl).collect()
    }

    /// Largest peak-to-trough decline of the total PnL column.
    pub fn max_drawdown(&self) -> f64 {
        max_drawdown(&self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn total_is_sum_of_components() {
        let row = PnlRow::new(ts(0), 10.0, -3.0, 0.5);
        assert_eq!(row.total_pnl, 7.5);
    }

    #[test]
    fn columns_and_drawdown() {
        let series = PnlSeries::from_rows(vec![
            PnlRow::new(ts(0), 0.0, 0.0, 0.0),
            PnlRow::new(ts(1), 10.0, 0.0, 0.0),
            PnlRow::new(ts(2), 4.0, 0.0, 0.0),
            PnlRow::new(ts(3), 6.0, 0.0, 1.0),
        ]);
        assert_eq!(series.total(), vec![0.0, 10.0, 4.0, 7.0]);
        assert_eq!(series.final_total(), 7.0);
        assert_eq!(series.max_drawdown(), 6.0);
        assert_eq!(series.theta(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_series_defaults() {
        let series = PnlSeries::from_rows(vec![]);
        assert!(series.is_empty());
        assert_eq!(series.final_total(), 0.0);
        assert_eq!(series.max_drawdown(), 0.0);
    }
}
