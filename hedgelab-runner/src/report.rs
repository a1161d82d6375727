//! Summary tables and derived series for reporting collaborators.
//!
//! Everything here is a pure function of a [`SweepResult`]: no I/O, no
//! formatting beyond the Markdown table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hedgelab_core::domain::HedgeTrade;

use crate::runner::SweepResult;

/// One line of the performance summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub threshold: f64,
    pub total_pnl: f64,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub transaction_cost: f64,
}

/// Summary rows ordered by threshold.
pub fn summarize(result: &SweepResult) -> Vec<SummaryRow> {
    result
        .thresholds
        .iter()
        .map(|r| SummaryRow {
            threshold: r.threshold.value(),
            total_pnl: r.final_total_pnl,
            max_drawdown: r.max_drawdown,
            trade_count: r.trade_count,
            transaction_cost: r.transaction_costs,
        })
        .collect()
}

/// Cumulative net hedge inventory at every timestamp.
///
/// Trades whose timestamp is not on the grid are ignored.
pub fn hedge_position_series(
    timestamps: &[DateTime<Utc>],
    trades: &[HedgeTrade],
) -> Vec<(DateTime<Utc>, f64)> {
    let mut pending = trades.iter().peekable();
    let mut position = 0.0;
    timestamps
        .iter()
        .map(|&ts| {
            while let Some(trade) = pending.next_if(|t| t.timestamp <= ts) {
                if trade.timestamp == ts {
                    position += trade.quantity;
                }
            }
            (ts, position)
        })
        .collect()
}

/// Label used in titles and directory names: `zero` or the digits after
/// the decimal point (`0.0005` → `0005`).
pub fn cost_label(transaction_cost: f64) -> String {
    if transaction_cost == 0.0 {
        return "zero".to_string();
    }
    let text = transaction_cost.to_string();
    match text.split_once('.') {
        Some((_, fraction)) => fraction.to_string(),
        None => text,
    }
}

/// Directory name for a sweep's artifacts, e.g. `tx_cost_zero`.
pub fn artifact_dir_name(transaction_cost: f64) -> String {
    format!("tx_cost_{}", cost_label(transaction_cost))
}

/// Markdown performance table, values rounded to two decimals.
pub fn render_markdown_summary(result: &SweepResult) -> String {
    let mut md = String::with_capacity(1024);
    let title = "Hedging Performance Summary";
    if result.transaction_cost == 0.0 {
        md.push_str(&format!("# {title} with no Transaction Cost\n\n"));
    } else {
        md.push_str(&format!(
            "# {title} with {} Transaction Cost\n\n",
            result.transaction_cost
        ));
    }

    md.push_str(&format!("- Pair: {}\n", result.trading_pair));
    md.push_str(&format!("- Samples: {}\n", result.sample_count));
    md.push_str(&format!("- Run ID: `{}`\n", result.run_id));
    if result.has_synthetic {
        md.push_str("- Data: **SYNTHETIC**\n");
    }
    md.push('\n');

    md.push_str("| Threshold | Total PnL | Max Drawdown | Trade Count | Transaction Cost |\n");
    md.push_str("| --- | --- | --- | --- | --- |\n");
    for row in summarize(result) {
        md.push_str(&format!(
            "| {} | {:.2} | {:.2} | {} | {:.2} |\n",
            row.threshold, row.total_pnl, row.max_drawdown, row.trade_count, row.transaction_cost
        ));
    }
    md
}
