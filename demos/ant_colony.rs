//! Ant-colony sampling compared with the exact engine.
//!
//! Run with: cargo run --release --example ant_colony

use gradual_rs::config::AcoConfig;
use gradual_rs::samplers::AcoSampler;
use gradual_rs::{graank, sampled_search, Dataset, GradualEncoding, SearchState};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // 12 columns: even columns rise, odd columns fall, with a small wobble.
    let n = 60;
    let cols = 12;
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let t = i as f64;
            (0..cols)
                .map(|c| {
                    let trend = if c % 2 == 0 { t } else { -t };
                    trend + ((t * 0.9 + c as f64) * 2.3).sin() * 4.0
                })
                .collect()
        })
        .collect();
    let ds = Dataset::from_rows(vec![], &rows, &[]).expect("well-formed table");
    let enc = GradualEncoding::encode(&ds, 0.6, false);

    let exact = graank(&enc);
    println!("Exact engine: {} maximal patterns", exact.len());

    let config = AcoConfig {
        max_iterations: 2_000,
        max_repeats: Some(200),
        ..AcoConfig::default()
    };
    let budget = config.budget();
    let mut sampler = AcoSampler::new(&enc, config);
    let mut rng = StdRng::seed_from_u64(2024);
    let state = sampled_search(&mut sampler, &enc, budget, SearchState::new(), &mut rng);

    println!(
        "Ant colony: {} winners after {} draws",
        state.winners().len(),
        state.iterations()
    );
    let mut winners = state.into_winners();
    winners.sort_by(|a, b| b.len().cmp(&a.len()));
    for w in winners.iter().take(5) {
        println!("  {} : {}", w, w.support());
    }

    println!("\nPheromones (+, -, irrelevant):");
    for (attr, row) in sampler.attributes().iter().zip(sampler.pheromones()) {
        println!("  {attr:>2}: {:7.2} {:7.2} {:7.2}", row[0], row[1], row[2]);
    }
}
