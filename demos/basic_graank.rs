//! Exact gradual pattern mining with GRAANK.
//!
//! Run with: cargo run --release --example basic_graank

use gradual_rs::{Dataset, GradualMiner, MinerConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Age, salary and free time of 8 people: older people earn more and
    // have less free time, shoe size is unrelated.
    let titles = vec![
        "age".to_string(),
        "salary".to_string(),
        "free_time".to_string(),
        "shoe_size".to_string(),
    ];
    let rows = vec![
        vec![22.0, 1800.0, 30.0, 42.0],
        vec![25.0, 2100.0, 28.0, 38.0],
        vec![29.0, 2000.0, 25.0, 44.0],
        vec![33.0, 2600.0, 22.0, 40.0],
        vec![38.0, 3100.0, 24.0, 39.0],
        vec![41.0, 3300.0, 18.0, 45.0],
        vec![47.0, 3900.0, 15.0, 41.0],
        vec![52.0, 4200.0, 12.0, 43.0],
    ];
    let ds = Dataset::from_rows(titles, &rows, &[]).expect("well-formed table");

    let miner = GradualMiner::new(MinerConfig::new(0.6)).expect("valid config");
    let patterns = miner.discover(&ds);

    println!("Records: {}", ds.n_rows());
    println!("Patterns at min_support 0.6: {}", patterns.len());
    for p in &patterns {
        println!("  {} : {}", p.describe(ds.titles()), p.support());
    }
}
