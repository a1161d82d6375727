//! Hedging engine: trigger simulation, position ledger, attribution, drawdown.

pub mod attribution;
pub mod drawdown;
pub mod ledger;
pub mod simulator;

pub use attribution::{
    attribute, gamma_pnl, theta_pnl, Attribution, AttributionParams, ComponentCurves,
};
pub use drawdown::max_drawdown;
pub use ledger::{compute_delta_pnl, DeltaPnl};
pub use simulator::{simulate, simulate_set, simulate_threshold, GAMMA_PERCENT_SCALE};
