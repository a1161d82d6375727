//! Criterion benchmarks for HedgeLab hot paths.
//!
//! Benchmarks:
//! 1. Hedge trigger simulation over a day of minute samples
//! 2. Position ledger over the resulting trade sequence
//! 3. Full single-threshold attribution (ledger + gamma/theta merge)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{Duration, TimeZone, Utc};
use hedgelab_core::domain::{PriceSeries, Threshold};
use hedgelab_core::engine::{
    compute_delta_pnl, simulate_threshold, AttributionParams, ComponentCurves,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_prices(n: usize) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2025, 1, 17, 8, 0, 0).unwrap();
    PriceSeries::from_pairs((0..n).map(|i| {
        let price = 200.0 + (i as f64 * 0.05).sin() * 6.0 + (i as f64 * 0.011).cos() * 3.0;
        (start + Duration::minutes(i as i64), price)
    }))
    .unwrap()
}

const PARAMS: AttributionParams = AttributionParams {
    dollar_gamma: -100_000.0,
    theta_per_interval: 20_000.0 / 1440.0,
    transaction_cost_rate: 0.0005,
};

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_simulate(c: &mut Criterion) {
    let prices = make_prices(1440);
    let mut group = c.benchmark_group("simulate_threshold");
    for t in [0.001, 0.01, 0.05] {
        let threshold = Threshold::new(t).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(t), &threshold, |b, &th| {
            b.iter(|| simulate_threshold(black_box(&prices), th, -100_000.0).unwrap())
        });
    }
    group.finish();
}

fn bench_ledger(c: &mut Criterion) {
    let prices = make_prices(1440);
    let timestamps = prices.timestamps();
    let trades = simulate_threshold(&prices, Threshold::new(0.001).unwrap(), -100_000.0).unwrap();
    c.bench_function("compute_delta_pnl_1440", |b| {
        b.iter(|| {
            compute_delta_pnl(
                black_box(&timestamps),
                black_box(&trades),
                prices.final_price(),
                0.0005,
            )
            .unwrap()
        })
    });
}

fn bench_attribution(c: &mut Criterion) {
    let prices = make_prices(1440 * 4);
    let curves = ComponentCurves::compute(&prices, PARAMS).unwrap();
    let trades = simulate_threshold(&prices, Threshold::new(0.0015).unwrap(), -100_000.0).unwrap();
    c.bench_function("attribute_four_days", |b| {
        b.iter(|| curves.attribute(black_box(&trades)).unwrap())
    });
}

criterion_group!(benches, bench_simulate, bench_ledger, bench_attribution);
criterion_main!(benches);
