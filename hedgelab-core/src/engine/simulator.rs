//! Hedge trigger simulation.
//!
//! For each threshold the simulator walks the price path once, keeping the
//! price at which it last hedged. Whenever the relative move from that price
//! reaches the threshold it emits an offsetting trade and re-arms at the
//! current price. Thresholds never share state.

use std::collections::BTreeMap;

use crate::domain::{HedgeTrade, PriceSeries, Threshold, ThresholdSet};
use crate::error::{ensure_finite, HedgeError};

/// Scale applied to `dollar_gamma * move` to get the delta exposure to flatten.
///
/// Encodes the quadratic percentage convention of the PnL reports; changing
/// it changes every trade size.
pub const GAMMA_PERCENT_SCALE: f64 = 100.0;

/// Simulate every threshold in `thresholds` over `prices`.
///
/// Thresholds are validated, sorted and deduplicated first. Any invalid
/// input fails the whole call before a single trade is produced.
pub fn simulate(
    prices: &PriceSeries,
    thresholds: &[f64],
    dollar_gamma: f64,
) -> Result<BTreeMap<Threshold, Vec<HedgeTrade>>, HedgeError> {
    let thresholds = ThresholdSet::new(thresholds)?;
    simulate_set(prices, &thresholds, dollar_gamma)
}

/// Same as [`simulate`] for an already normalized threshold set.
pub fn simulate_set(
    prices: &PriceSeries,
    thresholds: &ThresholdSet,
    dollar_gamma: f64,
) -> Result<BTreeMap<Threshold, Vec<HedgeTrade>>, HedgeError> {
    validate_dollar_gamma(dollar_gamma)?;
    thresholds
        .iter()
        .map(|t| simulate_threshold(prices, t, dollar_gamma).map(|trades| (t, trades)))
        .collect()
}

/// Simulate a single threshold.
pub fn simulate_threshold(
    prices: &PriceSeries,
    threshold: Threshold,
    dollar_gamma: f64,
) -> Result<Vec<HedgeTrade>, HedgeError> {
    validate_dollar_gamma(dollar_gamma)?;

    let points = prices.points();
    let mut last_hedge_price = points[0].price;
    let mut trades = Vec::new();

    for point in &points[1..] {
        if last_hedge_price == 0.0 {
            return Err(HedgeError::degenerate(format!(
                "last hedge price is zero before {}",
                point.timestamp
            )));
        }
        let relative_move = (point.price - last_hedge_price) / last_hedge_price;
        if relative_move.abs() >= threshold.value() {
            let delta_exposure = dollar_gamma * relative_move * GAMMA_PERCENT_SCALE;
            let quantity = ensure_finite(-delta_exposure / point.price, "hedge quantity")?;
            trades.push(HedgeTrade::new(point.timestamp, point.price, quantity)?);
            last_hedge_price = point.price;
        }
    }

    Ok(trades)
}

fn validate_dollar_gamma(dollar_gamma: f64) -> Result<(), HedgeError> {
    if !dollar_gamma.is_finite() || dollar_gamma == 0.0 {
        return Err(HedgeError::invalid(format!(
            "dollar gamma must be finite and non-zero, got {dollar_gamma}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_pairs(prices.iter().enumerate().map(|(i, &p)| (ts(i as i64), p)))
            .unwrap()
    }

    #[test]
    fn short_gamma_buys_into_rallies() {
        let prices = series(&[100.0, 102.0]);
        let trades = simulate_threshold(&prices, Threshold::new(0.01).unwrap(), -100_000.0)
            .unwrap();
        assert_eq!(trades.len(), 1);
        // move 0.02 → exposure -200000 → buy 200000 / 102
        assert_eq!(trades[0].timestamp, ts(1));
        assert!((trades[0].quantity - 200_000.0 / 102.0).abs() < 1e-9);
        assert!(trades[0].is_buy());
    }

    #[test]
    fn rearms_at_last_hedge_price() {
        // 100 → 100.6 (0.6%) no trade, → 101.2 (1.2% from 100) trade,
        // → 101.9 (0.69% from 101.2) no trade.
        let prices = series(&[100.0, 100.6, 101.2, 101.9]);
        let trades = simulate_threshold(&prices, Threshold::new(0.01).unwrap(), -1.0).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].timestamp, ts(2));
    }

    #[test]
    fn first_sample_never_trades() {
        let prices = series(&[100.0]);
        let trades = simulate(&prices, &[0.001], -100_000.0).unwrap();
        assert!(trades.values().all(Vec::is_empty));
    }

    #[test]
    fn thresholds_are_normalized() {
        let prices = series(&[100.0, 105.0, 99.0]);
        let out = simulate(&prices, &[0.05, 0.01, 0.05], -100_000.0).unwrap();
        let keys: Vec<f64> = out.keys().map(|t| t.value()).collect();
        assert_eq!(keys, vec![0.01, 0.05]);
    }

    #[test]
    fn rejects_bad_threshold_and_gamma() {
        let prices = series(&[100.0, 101.0]);
        assert!(simulate(&prices, &[0.0], -1.0).unwrap_err().is_invalid_input());
        assert!(simulate(&prices, &[0.01], 0.0).unwrap_err().is_invalid_input());
        assert!(simulate(&prices, &[0.01], f64::NAN).is_err());
    }
}
