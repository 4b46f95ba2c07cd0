use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::encoding::GradualEncoding;
use crate::core::pattern::GradualPattern;
use crate::core::sampler::{PatternSampler, SampleOutcome};

/// Stopping rule for a sampled search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Total number of draws.
    pub max_iterations: usize,
    /// Stop after this many consecutive draws without a new winner.
    pub max_repeats: Option<usize>,
}

impl SearchBudget {
    pub fn new(max_iterations: usize, max_repeats: Option<usize>) -> Self {
        Self {
            max_iterations,
            max_repeats,
        }
    }

    pub fn is_exhausted(&self, state: &SearchState) -> bool {
        state.iterations >= self.max_iterations
            || self.max_repeats.is_some_and(|k| state.repeats >= k)
    }
}

/// Winner/loser context of one sampled run.
///
/// Passed into [`sampled_search`] and returned from it, so a caller can
/// checkpoint a run and resume it with more budget. Each concurrent run owns
/// its own state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    winners: Vec<GradualPattern>,
    losers: Vec<GradualPattern>,
    iterations: usize,
    repeats: usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximal accepted patterns, in discovery order.
    pub fn winners(&self) -> &[GradualPattern] {
        &self.winners
    }

    /// Rejected patterns, kept only for anti-monotony pruning.
    pub fn losers(&self) -> &[GradualPattern] {
        &self.losers
    }

    pub fn into_winners(self) -> Vec<GradualPattern> {
        self.winners
    }

    /// Draws made so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Consecutive draws since the last new winner.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Already judged, directly or as a full inverse.
    pub fn is_duplicate(&self, pattern: &GradualPattern) -> bool {
        self.winners
            .iter()
            .chain(&self.losers)
            .any(|p| pattern.same_items(p))
    }

    /// Outcome already implied: a superset of a loser fails, a subset of a
    /// winner passes.
    pub fn is_implied(&self, pattern: &GradualPattern) -> bool {
        self.losers.iter().any(|l| pattern.is_superset_of(l))
            || self.winners.iter().any(|w| pattern.is_subset_of(w))
    }
}

/// Run a sampler until its budget is spent.
///
/// Every draw counts towards the budget. A draw is skipped without
/// validation when it has fewer than two items, was already judged, or its
/// outcome is implied by anti-monotony. A validated pattern is judged the
/// same way before it is accepted (support at or above the threshold) or
/// rejected. An accepted pattern replaces earlier winners it contains, so
/// only maximal patterns are kept. When validation had to drop items, the
/// original candidate is recorded as a loser as well.
pub fn sampled_search<S: PatternSampler, R: Rng + ?Sized>(
    sampler: &mut S,
    encoding: &GradualEncoding,
    budget: SearchBudget,
    mut state: SearchState,
    rng: &mut R,
) -> SearchState {
    if encoding.is_empty() {
        tracing::debug!(strategy = sampler.name(), "no valid items, nothing to sample");
        return state;
    }
    let min_support = encoding.min_support();

    while !budget.is_exhausted(&state) {
        state.iterations += 1;
        let candidate = sampler.generate_candidate(encoding, rng);
        if candidate.len() <= 1 || state.is_duplicate(&candidate) || state.is_implied(&candidate) {
            state.repeats += 1;
            continue;
        }

        let validated = sampler.validate(encoding, &candidate);
        let relaxed = validated.item_set() != candidate.item_set();

        if state.is_duplicate(&validated) || state.is_implied(&validated) {
            state.repeats += 1;
        } else if validated.len() >= 2 && validated.raw_support() >= min_support {
            sampler.update_state(encoding, SampleOutcome::Accepted(&validated));
            tracing::debug!(
                strategy = sampler.name(),
                pattern = %validated,
                support = validated.support(),
                "new winner"
            );
            state.winners.retain(|w| !w.is_subset_of(&validated));
            state.winners.push(validated);
            state.repeats = 0;
        } else {
            sampler.update_state(encoding, SampleOutcome::Rejected(&validated));
            state.losers.push(validated);
            state.repeats += 1;
        }

        if relaxed {
            state.losers.push(candidate);
        }
    }

    tracing::info!(
        strategy = sampler.name(),
        iterations = state.iterations,
        winners = state.winners.len(),
        losers = state.losers.len(),
        "sampled search finished"
    );
    state
}
