//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for sweep results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: summary table, per-threshold PnL attribution, trades and hedge inventory
//! - **Markdown**: human-readable performance summary
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hedgelab_core::domain::{HedgeTrade, PnlSeries};

use crate::report::{artifact_dir_name, hedge_position_series, render_markdown_summary, summarize};
use crate::runner::{SweepResult, ThresholdResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SweepResult` to pretty JSON.
pub fn export_json(result: &SweepResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SweepResult to JSON")
}

/// Deserialize a `SweepResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SweepResult> {
    let result: SweepResult =
        serde_json::from_str(json).context("failed to deserialize SweepResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: threshold, total_pnl, max_drawdown, trade_count, transaction_cost
pub fn export_summary_csv(result: &SweepResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "threshold",
        "total_pnl",
        "max_drawdown",
        "trade_count",
        "transaction_cost",
    ])?;
    for row in summarize(result) {
        wtr.write_record([
            &row.threshold.to_string(),
            &format!("{:.2}", row.total_pnl),
            &format!("{:.2}", row.max_drawdown),
            &row.trade_count.to_string(),
            &format!("{:.2}", row.transaction_cost),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: timestamp, delta_pnl, gamma_pnl, theta_pnl, total_pnl
pub fn export_pnl_csv(pnl: &PnlSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "delta_pnl", "gamma_pnl", "theta_pnl", "total_pnl"])?;
    for row in pnl.rows() {
        wtr.write_record([
            &row.timestamp.to_rfc3339(),
            &format!("{:.6}", row.delta_pnl),
            &format!("{:.6}", row.gamma_pnl),
            &format!("{:.6}", row.theta_pnl),
            &format!("{:.6}", row.total_pnl),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: timestamp, price, quantity
pub fn export_trades_csv(trades: &[HedgeTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "price", "quantity"])?;
    for t in trades {
        wtr.write_record([
            &t.timestamp.to_rfc3339(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.quantity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: timestamp, position. Cumulative hedge inventory on the PnL grid.
pub fn export_position_csv(result: &ThresholdResult) -> Result<String> {
    let grid: Vec<_> = result.pnl.rows().iter().map(|r| r.timestamp).collect();
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "position"])?;
    for (ts, position) in hedge_position_series(&grid, &result.trades) {
        wtr.write_record([&ts.to_rfc3339(), &format!("{:.6}", position)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one sweep.
///
/// Creates `tx_cost_<label>/` under `output_dir` containing:
/// - `manifest.json` — the full `SweepResult`
/// - `summary.csv` and `summary.md` — one row per threshold
/// - `thresholds/<n>_th_<threshold>/{pnl,trades,position}.csv` — per-threshold detail
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &SweepResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(artifact_dir_name(result.transaction_cost));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("summary.csv"), export_summary_csv(result)?)?;
    std::fs::write(run_dir.join("summary.md"), render_markdown_summary(result))?;

    for (i, threshold) in result.thresholds.iter().enumerate() {
        let dir = run_dir
            .join("thresholds")
            .join(format!("{}_th_{}", i + 1, threshold.threshold));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create threshold dir: {}", dir.display()))?;
        std::fs::write(dir.join("pnl.csv"), export_pnl_csv(&threshold.pnl)?)?;
        std::fs::write(dir.join("trades.csv"), export_trades_csv(&threshold.trades)?)?;
        std::fs::write(dir.join("position.csv"), export_position_csv(threshold)?)?;
    }

    Ok(run_dir)
}

/// Load a `SweepResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<SweepResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HedgeConfig;
    use crate::data_loader::{LoadedPrices, PriceSource};
    use crate::runner::run_sweep;
    use chrono::{Duration, TimeZone, Utc};
    use hedgelab_core::domain::PriceSeries;

    fn sample_result(cost: f64) -> SweepResult {
        let start = Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap();
        let prices = [100.0, 101.0, 99.0, 100.5, 102.0, 98.0];
        let series = PriceSeries::from_pairs(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + Duration::minutes(i as i64), p)),
        )
        .unwrap();
        let mut config = HedgeConfig::default();
        config.sweep.thresholds = vec![0.01, 0.02];
        config.sweep.parallel = false;
        let loaded = LoadedPrices::new(series, PriceSource::CsvImport);
        run_sweep(&config, &loaded, cost).unwrap()
    }

    #[test]
    fn json_roundtrip() {
        let result = sample_result(0.0005);
        let json = export_json(&result).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.len(), 2);
        assert_eq!(back.thresholds[0].trades, result.thresholds[0].trades);
    }

    #[test]
    fn import_rejects_future_schema() {
        let mut result = sample_result(0.0);
        result.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn summary_csv_has_row_per_threshold() {
        let result = sample_result(0.0);
        let csv = export_summary_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "threshold,total_pnl,max_drawdown,trade_count,transaction_cost"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0.01,"));
    }

    #[test]
    fn pnl_and_position_csv_cover_every_sample() {
        let result = sample_result(0.0);
        let first = &result.thresholds[0];
        let pnl = export_pnl_csv(&first.pnl).unwrap();
        assert_eq!(pnl.lines().count(), 1 + first.pnl.len());
        let position = export_position_csv(first).unwrap();
        assert_eq!(position.lines().count(), 1 + first.pnl.len());
        let trades = export_trades_csv(&first.trades).unwrap();
        assert_eq!(trades.lines().count(), 1 + first.trades.len());
    }

    #[test]
    fn save_and_load_artifacts() {
        let result = sample_result(0.0005);
        let tmp = tempfile::tempdir().unwrap();
        let dir = save_artifacts(&result, tmp.path()).unwrap();
        assert_eq!(dir, tmp.path().join("tx_cost_0005"));
        assert!(dir.join("summary.csv").exists());
        assert!(dir.join("summary.md").exists());
        assert!(dir.join("thresholds/1_th_0.01/pnl.csv").exists());
        assert!(dir.join("thresholds/2_th_0.02/position.csv").exists());

        let loaded = load_artifacts(&dir).unwrap();
        assert_eq!(loaded.run_id, result.run_id);
        assert_eq!(loaded.transaction_cost, 0.0005);
    }
}
