//! HedgeLab Core — delta-hedging simulation and PnL attribution.
//!
//! This crate contains the pure computational core:
//! - Domain types (price series, hedge trades, thresholds, positions, PnL rows)
//! - Hedge trigger simulation per rehedge threshold
//! - Weighted-average-cost position ledger with realized/unrealized split
//! - Gamma/theta/delta attribution on a shared timestamp grid
//! - Maximum drawdown
//!
//! Nothing here performs I/O. Every operation validates its inputs up front
//! and returns a [`HedgeError`] instead of a partial result.

pub mod domain;
pub mod engine;
pub mod error;

pub use error::HedgeError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: result types cross thread boundaries, so the
    /// runner can fan thresholds out to a worker pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::HedgeTrade>();
        require_sync::<domain::HedgeTrade>();
        require_send::<domain::Threshold>();
        require_sync::<domain::Threshold>();
        require_send::<domain::PnlSeries>();
        require_sync::<domain::PnlSeries>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();

        require_send::<engine::ComponentCurves>();
        require_sync::<engine::ComponentCurves>();
        require_send::<engine::Attribution>();
        require_sync::<engine::Attribution>();
        require_send::<engine::DeltaPnl>();
        require_sync::<engine::DeltaPnl>();

        require_send::<HedgeError>();
        require_sync::<HedgeError>();
    }

    /// The ledger takes trades by shared slice and owns its position; it has
    /// no way to observe another threshold's state.
    #[test]
    fn ledger_signature_is_self_contained() {
        fn _check(
            timestamps: &[chrono::DateTime<chrono::Utc>],
            trades: &[domain::HedgeTrade],
        ) -> Result<engine::DeltaPnl, HedgeError> {
            engine::compute_delta_pnl(timestamps, trades, 1.0, 0.0)
        }
    }
}
