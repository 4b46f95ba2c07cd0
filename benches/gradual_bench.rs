use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gradual_rs::config::AcoConfig;
use gradual_rs::samplers::AcoSampler;
use gradual_rs::{
    encode_attribute, graank, sampled_search, Dataset, GradualEncoding, SearchBudget, SearchState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Columns that drift together with a deterministic wobble.
fn synthetic(rows: usize, cols: usize) -> Dataset {
    let data: Vec<Vec<f64>> = (0..rows)
        .map(|i| {
            (0..cols)
                .map(|c| {
                    let t = i as f64;
                    let trend = if c % 2 == 0 { t } else { -t };
                    trend + ((t + c as f64) * 1.7).sin() * (c as f64 + 1.0)
                })
                .collect()
        })
        .collect();
    Dataset::from_rows(vec![], &data, &[]).unwrap()
}

fn bench_encode_attribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_attribute");
    for n in [100, 500, 1_000] {
        let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| encode_attribute(black_box(&values), false))
        });
    }
    group.finish();
}

fn bench_graank(c: &mut Criterion) {
    let mut group = c.benchmark_group("graank");
    group.sample_size(10);
    for cols in [4, 6, 8] {
        let enc = GradualEncoding::encode(&synthetic(200, cols), 0.5, false);
        group.bench_with_input(BenchmarkId::from_parameter(cols), &cols, |b, _| {
            b.iter(|| graank(black_box(&enc)))
        });
    }
    group.finish();
}

fn bench_aco(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco");
    group.sample_size(10);
    for cols in [8, 16] {
        let enc = GradualEncoding::encode(&synthetic(200, cols), 0.5, false);
        group.bench_with_input(BenchmarkId::from_parameter(cols), &cols, |b, _| {
            b.iter(|| {
                let mut sampler = AcoSampler::new(&enc, AcoConfig::default());
                let mut rng = StdRng::seed_from_u64(0);
                sampled_search(
                    &mut sampler,
                    black_box(&enc),
                    SearchBudget::new(200, None),
                    SearchState::new(),
                    &mut rng,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_attribute, bench_graank, bench_aco);
criterion_main!(benches);
