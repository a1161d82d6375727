//! Position ledger — cumulative delta PnL from a hedge trade sequence.
//!
//! Trades are applied in timestamp order to a single [`Position`] owned by
//! the ledger run. Realized PnL (net of transaction costs) accumulates at
//! trade timestamps and is forward-filled across the rest of the grid. Open
//! inventory is marked to `final_price` on the last row only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{HedgeTrade, Position};
use crate::error::{ensure_finite, HedgeError};

/// Output of one ledger run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaPnl {
    /// Cumulative delta PnL, one value per input timestamp.
    pub values: Vec<f64>,
    /// Realized PnL over all trades, before costs.
    pub realized_pnl: f64,
    /// Sum of transaction costs charged.
    pub transaction_costs: f64,
    /// Mark-to-market of the final position at `final_price`.
    pub unrealized_pnl: f64,
    /// Inventory left after the last trade.
    pub final_position: Position,
}

impl DeltaPnl {
    /// Delta PnL at the last timestamp (realized - costs + unrealized).
    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// Compute the cumulative delta PnL series.
///
/// `trades` must be sorted by strictly increasing timestamp and every trade
/// timestamp must appear in `timestamps`; otherwise the call fails with
/// `InvalidInput` and nothing is returned.
pub fn compute_delta_pnl(
    timestamps: &[DateTime<Utc>],
    trades: &[HedgeTrade],
    final_price: f64,
    transaction_cost_rate: f64,
) -> Result<DeltaPnl, HedgeError> {
    validate(timestamps, trades, final_price, transaction_cost_rate)?;

    let mut position = Position::flat();
    let mut realized_pnl = 0.0;
    let mut transaction_costs = 0.0;
    let mut cumulative = 0.0;
    let mut values = Vec::with_capacity(timestamps.len());
    let mut pending = trades.iter().peekable();

    for &timestamp in timestamps {
        if let Some(trade) = pending.next_if(|t| t.timestamp == timestamp) {
            let trade_pnl = position.apply(trade.quantity, trade.price);
            let trade_cost = trade.transaction_cost(transaction_cost_rate);
            realized_pnl += trade_pnl;
            transaction_costs += trade_cost;
            cumulative += trade_pnl - trade_cost;
        }
        values.push(cumulative);
    }

    if let Some(unmatched) = pending.next() {
        return Err(HedgeError::invalid(format!(
            "trade at {} does not match any price timestamp",
            unmatched.timestamp
        )));
    }

    let unrealized_pnl = position.unrealized_pnl(final_price);
    cumulative = ensure_finite(cumulative + unrealized_pnl, "cumulative delta PnL")?;
    if let Some(last) = values.last_mut() {
        *last = cumulative;
    }

    Ok(DeltaPnl {
        values,
        realized_pnl,
        transaction_costs,
        unrealized_pnl,
        final_position: position,
    })
}

fn validate(
    timestamps: &[DateTime<Utc>],
    trades: &[HedgeTrade],
    final_price: f64,
    transaction_cost_rate: f64,
) -> Result<(), HedgeError> {
    if timestamps.is_empty() {
        return Err(HedgeError::invalid("timestamp grid is empty"));
    }
    if timestamps.windows(2).any(|w| w[1] <= w[0]) {
        return Err(HedgeError::invalid("timestamp grid must be strictly increasing"));
    }
    if !final_price.is_finite() || final_price <= 0.0 {
        return Err(HedgeError::invalid(format!(
            "final price must be finite and positive, got {final_price}"
        )));
    }
    if !transaction_cost_rate.is_finite() || transaction_cost_rate < 0.0 {
        return Err(HedgeError::invalid(format!(
            "transaction cost rate must be finite and non-negative, got {transaction_cost_rate}"
        )));
    }
    if let Some(w) = trades.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(HedgeError::invalid(format!(
            "trades must be in strictly ascending timestamp order: {} follows {}",
            w[1].timestamp, w[0].timestamp
        )));
    }
    for trade in trades {
        if !trade.price.is_finite() || trade.price <= 0.0 {
            return Err(HedgeError::invalid(format!(
                "trade price at {} must be finite and positive",
                trade.timestamp
            )));
        }
        if !trade.quantity.is_finite() || trade.quantity == 0.0 {
            return Err(HedgeError::invalid(format!(
                "trade quantity at {} must be finite and non-zero",
                trade.timestamp
            )));
        }
    }
    Ok(())
}
