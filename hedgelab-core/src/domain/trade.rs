//! HedgeTrade — one rehedge fill emitted by the simulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HedgeError;

/// Direction of a hedge trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single hedge trade.
///
/// `quantity` is signed: positive buys (adds long / covers short), negative
/// sells (adds short / reduces long). It is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeTrade {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub quantity: f64,
}

impl HedgeTrade {
    pub fn new(timestamp: DateTime<Utc>, price: f64, quantity: f64) -> Result<Self, HedgeError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(HedgeError::invalid(format!(
                "trade price at {timestamp} must be finite and positive, got {price}"
            )));
        }
        if !quantity.is_finite() || quantity == 0.0 {
            return Err(HedgeError::invalid(format!(
                "trade quantity at {timestamp} must be finite and non-zero, got {quantity}"
            )));
        }
        Ok(Self {
            timestamp,
            price,
            quantity,
        })
    }

    pub fn side(&self) -> TradeSide {
        if self.quantity > 0.0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        }
    }

    pub fn is_buy(&self) -> bool {
        self.side() == TradeSide::Buy
    }

    /// Absolute traded notional: |quantity| * price.
    pub fn notional(&self) -> f64 {
        self.quantity.abs() * self.price
    }

    /// Flat cost charged on the notional.
    pub fn transaction_cost(&self, rate: f64) -> f64 {
        self.notional() * rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, 8, 1, 0).unwrap()
    }

    #[test]
    fn side_follows_sign() {
        let buy = HedgeTrade::new(ts(), 100.0, 10.0).unwrap();
        let sell = HedgeTrade::new(ts(), 100.0, -4.0).unwrap();
        assert_eq!(buy.side(), TradeSide::Buy);
        assert!(buy.is_buy());
        assert_eq!(sell.side(), TradeSide::Sell);
    }

    #[test]
    fn cost_is_on_absolute_notional() {
        let sell = HedgeTrade::new(ts(), 110.0, -4.0).unwrap();
        assert_eq!(sell.notional(), 440.0);
        assert!((sell.transaction_cost(0.0005) - 0.22).abs() < 1e-12);
        assert_eq!(sell.transaction_cost(0.0), 0.0);
    }

    #[test]
    fn rejects_zero_quantity_and_bad_price() {
        assert!(HedgeTrade::new(ts(), 100.0, 0.0).unwrap_err().is_invalid_input());
        assert!(HedgeTrade::new(ts(), 0.0, 1.0).is_err());
        assert!(HedgeTrade::new(ts(), 100.0, f64::INFINITY).is_err());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = HedgeTrade::new(ts(), 101.0, -9.9).unwrap();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: HedgeTrade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
