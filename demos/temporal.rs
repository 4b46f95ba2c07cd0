//! Temporal gradual patterns with fuzzy time lags.
//!
//! Rainfall is recorded daily; the river level follows it three days later.
//!
//! Run with: cargo run --release --example temporal

use gradual_rs::{Dataset, GradualMiner, MinerConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let day = 86_400.0;
    let rain: Vec<f64> = (0..30)
        .map(|i| {
            let t = i as f64;
            10.0 + t * 0.8 + (t * 1.3).sin() * 3.0
        })
        .collect();
    let rows: Vec<Vec<f64>> = (0..rain.len())
        .map(|i| {
            let level = if i >= 3 { rain[i - 3] * 0.5 + 2.0 } else { 2.0 };
            vec![i as f64 * day, rain[i], level]
        })
        .collect();
    let titles = vec!["date".to_string(), "rain".to_string(), "river".to_string()];
    let ds = Dataset::from_rows(titles, &rows, &[0]).expect("well-formed table");

    let mut config = MinerConfig::new(0.8);
    config.temporal.reference_col = 1;
    config.temporal.min_representativity = 0.8;
    let miner = GradualMiner::new(config).expect("valid config");

    let patterns = miner
        .discover_temporal(&ds)
        .expect("time column and reference are valid");
    println!("Temporal patterns: {}", patterns.len());
    for tgp in &patterns {
        println!("  step {:>2}: {}", tgp.step, tgp.describe(ds.titles()));
    }
}
