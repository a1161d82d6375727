//! Maximum drawdown of a cumulative PnL curve.

/// Largest peak-to-trough decline, in PnL units.
///
/// Computed against the running maximum of the series. Returns 0.0 for an
/// empty or non-decreasing series; the result is never negative.
pub fn max_drawdown(pnl: &[f64]) -> f64 {
    let Some(&first) = pnl.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in pnl {
        if value > peak {
            peak = value;
        }
        let dd = peak - value;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}
