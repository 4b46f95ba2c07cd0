//! Fuzzy time-lag estimation for temporal gradual patterns.
//!
//! The lag is the center of a triangular membership function over time
//! differences. The function starts at the global quartiles, slides towards
//! the pattern's own lags, and finally widens to the global extremes. The
//! search is bounded and always yields a [`TimeLag`]; support 0 means no lag
//! reached the requested fuzzy support.

use crate::core::bit_matrix::BitMatrix;
use crate::core::dataset::TimeDiff;
use crate::core::pattern::TimeLag;

/// Slide step, as a fraction of the starting center.
const SLIDE_FRACTION: f64 = 0.1;
/// Slides per direction before giving up.
const MAX_SLIDES: usize = 1000;

/// A triangular membership function `(a, b, c)` with `a <= b <= c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub left: f64,
    pub center: f64,
    pub right: f64,
}

impl Triangle {
    pub fn new(left: f64, center: f64, right: f64) -> Self {
        Self {
            left,
            center,
            right,
        }
    }

    /// Membership of `x`: rises on `(a, b)`, 1 at `b`, falls on `(b, c)`.
    pub fn membership(&self, x: f64) -> f64 {
        let Triangle {
            left: a,
            center: b,
            right: c,
        } = *self;
        if x == b {
            1.0
        } else if x > a && x < b {
            (x - a) / (b - a)
        } else if x > b && x < c {
            (c - x) / (c - b)
        } else {
            0.0
        }
    }

    /// Fraction of `sample` with non-zero membership.
    pub fn support(&self, sample: &[f64]) -> f64 {
        if sample.is_empty() {
            return 0.0;
        }
        let hits = sample.iter().filter(|&&x| self.membership(x) > 0.0).count();
        hits as f64 / sample.len() as f64
    }

    fn shifted(&self, delta: f64) -> Self {
        Self::new(self.left + delta, self.center + delta, self.right + delta)
    }
}

/// Quantile `q` of ascending `sorted`, interpolating linearly between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty(), "quantile of an empty sample");
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Best candidate seen during a search.
struct Tracker {
    min_support: f64,
    best_center: f64,
    best_support: f64,
}

impl Tracker {
    /// Record `tri`'s support; `Some` once it meets the minimum.
    fn check(&mut self, tri: &Triangle, sample: &[f64]) -> Option<TimeLag> {
        let support = tri.support(sample);
        if support > self.best_support {
            self.best_support = support;
            self.best_center = tri.center;
        }
        (support >= self.min_support).then(|| TimeLag::new(tri.center, support))
    }

    /// Slide left while the sample median stays at or below the center, then
    /// slide right from `start` while it stays at or above.
    fn slide(&mut self, start: Triangle, sample: &[f64], sample_median: f64) -> Option<TimeLag> {
        let gap = SLIDE_FRACTION * start.center.abs();
        if gap == 0.0 || !gap.is_finite() {
            return None;
        }
        for delta in [-gap, gap] {
            let mut tri = start;
            for _ in 0..MAX_SLIDES {
                let keep_going = if delta < 0.0 {
                    sample_median <= tri.center
                } else {
                    sample_median >= tri.center
                };
                if !keep_going {
                    break;
                }
                tri = tri.shifted(delta);
                if let Some(lag) = self.check(&tri, sample) {
                    return Some(lag);
                }
            }
        }
        None
    }
}

/// Search for a lag whose triangle covers at least `min_support` of
/// `pattern_lags`.
///
/// The triangle is built from `all_lags`: quartiles first, then
/// `(min, median, max)` when sliding the quartile window fails.
pub fn approximate_fuzzy_support(pattern_lags: &[f64], all_lags: &[f64], min_support: f64) -> TimeLag {
    if pattern_lags.is_empty() || all_lags.is_empty() {
        return TimeLag::invalid(0.0);
    }
    let all = sorted_copy(all_lags);
    let sample_median = quantile(&sorted_copy(pattern_lags), 0.5);

    let quartiles = Triangle::new(quantile(&all, 0.25), quantile(&all, 0.5), quantile(&all, 0.75));
    let extremes = Triangle::new(all[0], quartiles.center, all[all.len() - 1]);

    let mut tracker = Tracker {
        min_support,
        best_center: quartiles.center,
        best_support: 0.0,
    };
    for start in [quartiles, extremes] {
        if let Some(lag) = tracker.check(&start, pattern_lags) {
            return lag;
        }
        if let Some(lag) = tracker.slide(start, pattern_lags, sample_median) {
            return lag;
        }
    }

    tracing::debug!(
        best_center = tracker.best_center,
        best_support = tracker.best_support,
        min_support,
        "no time lag reached the fuzzy support"
    );
    TimeLag::invalid(tracker.best_center)
}

/// Time lag of the records taking part in `matrix`.
///
/// `time_diffs` holds one entry per record of the shifted table; entries
/// whose index appears in a true cell form the pattern's sample.
pub fn estimate_time_lag(matrix: &BitMatrix, time_diffs: &[TimeDiff], min_support: f64) -> TimeLag {
    let indices = matrix.participating_indices();
    let pattern_lags: Vec<f64> = time_diffs
        .iter()
        .filter(|d| indices.binary_search(&d.index).is_ok())
        .map(|d| d.seconds)
        .collect();
    let all_lags: Vec<f64> = time_diffs.iter().map(|d| d.seconds).collect();
    approximate_fuzzy_support(&pattern_lags, &all_lags, min_support)
}
