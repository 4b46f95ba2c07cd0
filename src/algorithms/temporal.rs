//! Temporal gradual patterns (T-GRAANK).
//!
//! The dataset is shifted by every admissible step relative to a reference
//! column. Each step is encoded and mined on its own; a pattern is kept only
//! when a fuzzy time lag can be attached to it.

use crate::algorithms::graank::graank_with;
use crate::algorithms::time_lag::estimate_time_lag;
use crate::config::TemporalConfig;
use crate::core::dataset::{Dataset, TemporalStep};
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::{GradualPattern, TemporalPattern};
use crate::error::{ConfigError, GradualError, GradualResult};

/// Steps worth mining: `1..=max_step`, keeping at least 2 records.
pub fn admissible_steps(dataset: &Dataset, min_representativity: f64) -> Vec<usize> {
    let n = dataset.n_rows();
    let max_step = dataset.max_step(min_representativity);
    (1..=max_step)
        .filter(|&step| {
            let ok = n - step.min(n) >= 2;
            if !ok {
                tracing::warn!(step, rows = n, "step leaves fewer than 2 records, skipped");
            }
            ok
        })
        .collect()
}

/// Run `mine` on every admissible step and concatenate the results in step
/// order.
///
/// Steps are independent: each one gets its own transformed table, and with
/// the `parallel` feature they run concurrently.
pub fn temporal_search<F>(
    dataset: &Dataset,
    config: &TemporalConfig,
    mine: F,
) -> GradualResult<Vec<TemporalPattern>>
where
    F: Fn(&TemporalStep) -> Vec<TemporalPattern> + Sync,
{
    if dataset.time_columns().is_empty() {
        return Err(GradualError::MissingTimeColumn);
    }
    dataset.check_reference(config.reference_col)?;
    let rep = config.min_representativity;
    if !(rep > 0.0 && rep <= 1.0) {
        return Err(ConfigError::ValidationFailed {
            field: "temporal.min_representativity".to_string(),
            message: "must be in (0.0, 1.0]".to_string(),
        }
        .into());
    }

    let steps = admissible_steps(dataset, rep);
    let run = |&step: &usize| -> GradualResult<Vec<TemporalPattern>> {
        let transformed = dataset.transform(step, config.reference_col)?;
        let found = mine(&transformed);
        tracing::debug!(step, patterns = found.len(), "temporal step mined");
        Ok(found)
    };

    #[cfg(feature = "parallel")]
    let per_step: Vec<GradualResult<Vec<TemporalPattern>>> = {
        use rayon::prelude::*;
        steps.par_iter().map(run).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let per_step: Vec<GradualResult<Vec<TemporalPattern>>> = steps.iter().map(run).collect();

    let mut patterns = Vec::new();
    for found in per_step {
        patterns.extend(found?);
    }
    tracing::info!(
        steps = steps.len(),
        patterns = patterns.len(),
        "temporal search finished"
    );
    Ok(patterns)
}

/// Attach time lags to already mined patterns of one step.
///
/// Patterns without a valid lag, or whose items are not all valid in
/// `encoding`, are dropped.
pub fn attach_time_lags(
    encoding: &GradualEncoding,
    step: &TemporalStep,
    reference_col: usize,
    patterns: &[GradualPattern],
) -> Vec<TemporalPattern> {
    patterns
        .iter()
        .filter_map(|p| {
            let matrix = encoding.joint_matrix(p.items())?;
            let lag = estimate_time_lag(&matrix, &step.time_diffs, encoding.min_support());
            lag.is_valid()
                .then(|| TemporalPattern::new(p, reference_col, lag, step.step))
        })
        .collect()
}

/// Exact temporal mining: GRAANK on every step, lag estimated per pattern.
pub fn tgraank(
    dataset: &Dataset,
    min_support: f64,
    equal_mode: bool,
    config: &TemporalConfig,
) -> GradualResult<Vec<TemporalPattern>> {
    let reference_col = config.reference_col;
    temporal_search(dataset, config, |step| {
        let encoding = GradualEncoding::encode(&step.data, min_support, equal_mode);
        graank_with(&encoding, |_, matrix| {
            let lag = estimate_time_lag(matrix, &step.time_diffs, min_support);
            lag.is_valid().then_some(lag)
        })
        .into_iter()
        .map(|(p, lag)| TemporalPattern::new(&p, reference_col, lag, step.step))
        .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::GradualItem;

    /// time, driver, follower: the follower copies the driver two rows later.
    fn lagged() -> Dataset {
        let driver = [1.0, 3.0, 2.0, 5.0, 4.0, 7.0, 6.0, 9.0, 8.0, 10.0];
        let rows: Vec<Vec<f64>> = (0..driver.len())
            .map(|i| {
                let follower = if i >= 2 { driver[i - 2] } else { 0.0 };
                vec![i as f64 * 3600.0, driver[i], follower]
            })
            .collect();
        Dataset::from_rows(
            vec!["time".into(), "driver".into(), "follower".into()],
            &rows,
            &[0],
        )
        .unwrap()
    }

    fn config(reference_col: usize) -> TemporalConfig {
        TemporalConfig {
            reference_col,
            min_representativity: 0.5,
        }
    }

    #[test]
    fn test_admissible_steps() {
        let ds = lagged();
        assert_eq!(admissible_steps(&ds, 0.5), vec![1, 2, 3, 4, 5]);
        assert!(admissible_steps(&ds, 1.0).is_empty());
    }

    #[test]
    fn test_lagged_copy_found_at_its_step() {
        let ds = lagged();
        let found = tgraank(&ds, 0.5, false, &config(1)).unwrap();
        let at_two: Vec<&TemporalPattern> = found.iter().filter(|t| t.step == 2).collect();
        assert!(!at_two.is_empty());
        let tgp = at_two[0];
        assert!(tgp.time_lag.is_valid());
        assert_eq!(tgp.reference, Some(GradualItem::increasing(1)));
        assert_eq!(tgp.temporal_items, vec![GradualItem::increasing(2)]);
        // shifted follower equals the driver, so every pair is concordant
        assert_eq!(tgp.support, 1.0);
        assert_eq!(tgp.time_lag.timestamp, 7200.0);

        let at_one = found.iter().find(|t| t.step == 1).unwrap();
        assert_eq!(at_one.temporal_items, vec![GradualItem::increasing(2)]);
        assert!((at_one.support - 29.0 / 36.0).abs() < 1e-12);
        assert_eq!(at_one.time_lag.timestamp, 3600.0);
        for t in &found {
            assert!(t.time_lag.is_valid());
            assert!(t.support > 0.5);
        }
    }

    #[test]
    fn test_requires_time_column() {
        let ds = Dataset::from_rows(vec![], &[vec![1.0, 2.0], vec![2.0, 1.0]], &[]).unwrap();
        let err = tgraank(&ds, 0.5, false, &config(0)).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_TIME_COLUMN");
    }

    #[test]
    fn test_rejects_bad_reference_and_representativity() {
        let ds = lagged();
        let err = tgraank(&ds, 0.5, false, &config(0)).unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_IS_TIME_COLUMN");
        let err = tgraank(&ds, 0.5, false, &config(9)).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_OUT_OF_RANGE");
        let bad = TemporalConfig {
            reference_col: 1,
            min_representativity: 0.0,
        };
        assert_eq!(
            tgraank(&ds, 0.5, false, &bad).unwrap_err().error_code(),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_attach_time_lags_drops_unknown_items() {
        let ds = lagged();
        let step = ds.transform(2, 1).unwrap();
        let enc = GradualEncoding::encode(&step.data, 0.5, false);
        let good = GradualPattern::from_items([GradualItem::increasing(1), GradualItem::increasing(2)]);
        let unknown = GradualPattern::from_items([GradualItem::increasing(1), GradualItem::increasing(7)]);
        let out = attach_time_lags(&enc, &step, 1, &[good, unknown]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].step, 2);
    }
}
