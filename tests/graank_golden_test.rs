use gradual_rs::{graank, Dataset, GradualEncoding, GradualItem, GradualMiner, MinerConfig};
use serde::Deserialize;
use std::fs;

#[derive(Deserialize)]
struct GoldenPattern {
    items: Vec<String>,
    support: f64,
}

#[derive(Deserialize)]
struct GoldenData {
    titles: Vec<String>,
    rows: Vec<Vec<f64>>,
    min_support: f64,
    equal_mode: bool,
    patterns: Vec<GoldenPattern>,
}

const EPSILON: f64 = 1e-3;

fn load_golden(filename: &str) -> GoldenData {
    let path = format!("tests/golden_data/{filename}");
    let data = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Golden data file not found: {path}"));
    serde_json::from_str(&data).unwrap()
}

fn run_golden_test(filename: &str) {
    let golden = load_golden(filename);
    eprintln!(
        "Testing {filename}: n={}, min_support={}",
        golden.rows.len(),
        golden.min_support
    );

    let ds = Dataset::from_rows(golden.titles.clone(), &golden.rows, &[]).unwrap();
    let enc = GradualEncoding::encode(&ds, golden.min_support, golden.equal_mode);
    let mut found: Vec<(Vec<String>, f64)> = graank(&enc)
        .iter()
        .map(|p| {
            let items = p.items().iter().map(|gi| gi.to_string()).collect();
            (items, p.support())
        })
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));

    let mut expected: Vec<(Vec<String>, f64)> = golden
        .patterns
        .iter()
        .map(|p| (p.items.clone(), p.support))
        .collect();
    expected.sort_by(|a, b| a.0.cmp(&b.0));

    let found_items: Vec<&Vec<String>> = found.iter().map(|(i, _)| i).collect();
    let expected_items: Vec<&Vec<String>> = expected.iter().map(|(i, _)| i).collect();
    assert_eq!(found_items, expected_items, "{filename}: pattern sets differ");

    for ((items, got), (_, want)) in found.iter().zip(&expected) {
        assert!(
            (got - want).abs() <= EPSILON,
            "{filename}: {items:?} support {got} vs {want}"
        );
    }
    eprintln!("  {filename}: {} patterns match", found.len());
}

#[test]
fn test_golden_weather() {
    run_golden_test("weather.json");
}

#[test]
fn test_golden_random_with_ties() {
    run_golden_test("random_ties.json");
}

#[test]
fn test_golden_random_equal_mode() {
    run_golden_test("random_ties_equal.json");
}

#[test]
fn test_golden_through_facade_with_titles() {
    let golden = load_golden("weather.json");
    let ds = Dataset::from_rows(golden.titles.clone(), &golden.rows, &[]).unwrap();
    let miner = GradualMiner::new(MinerConfig::new(golden.min_support)).unwrap();
    let rendered: Vec<String> = miner
        .discover(&ds)
        .iter()
        .map(|p| p.describe(ds.titles()))
        .collect();
    assert!(rendered.contains(&r#"["temperature+","humidity-","rain-"]"#.to_string()));
    assert!(rendered.contains(&r#"["temperature+","wind-"]"#.to_string()));
}

#[test]
fn test_golden_items_parse_back() {
    let golden = load_golden("random_ties.json");
    for p in &golden.patterns {
        for s in &p.items {
            let gi: GradualItem = s.parse().unwrap();
            assert_eq!(&gi.to_string(), s);
        }
    }
}
