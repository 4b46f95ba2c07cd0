use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::AcoGraphConfig;
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::{GradualItem, GradualPattern};
use crate::core::sampler::{PatternSampler, SampleOutcome, ValidationMode};

/// Ant-colony sampler over a pheromone matrix indexed by valid item pairs.
///
/// Moves are weighted by `visibility * pheromone`. Visibility is the joint
/// count of two items on different attributes, or 0 when that pair alone is
/// already below the support threshold, so such pairs are never proposed.
#[derive(Debug, Clone)]
pub struct AcoGraphSampler {
    config: AcoGraphConfig,
    items: Vec<GradualItem>,
    visibility: Vec<Vec<f64>>,
    pheromones: Vec<Vec<f64>>,
}

impl AcoGraphSampler {
    pub fn new(encoding: &GradualEncoding, config: AcoGraphConfig) -> Self {
        let bins = encoding.bins();
        let m = bins.len();
        let mut visibility = vec![vec![0.0; m]; m];
        for i in 0..m {
            for j in (i + 1)..m {
                if bins[i].item.attribute == bins[j].item.attribute {
                    continue;
                }
                let count = bins[i].matrix.and_count(&bins[j].matrix);
                if encoding.support_of(count) >= encoding.min_support() {
                    visibility[i][j] = count as f64;
                    visibility[j][i] = count as f64;
                }
            }
        }
        Self {
            config,
            items: bins.iter().map(|b| b.item).collect(),
            visibility,
            pheromones: vec![vec![1.0; m]; m],
        }
    }

    /// Valid items, indexing both matrices.
    pub fn items(&self) -> &[GradualItem] {
        &self.items
    }

    pub fn visibility(&self) -> &[Vec<f64>] {
        &self.visibility
    }

    pub fn pheromones(&self) -> &[Vec<f64>] {
        &self.pheromones
    }

    fn indices_of(&self, pattern: &GradualPattern) -> Vec<usize> {
        pattern
            .items()
            .iter()
            .filter_map(|gi| self.items.iter().position(|x| x == gi))
            .collect()
    }

    fn for_each_pair(&mut self, pattern: &GradualPattern, mut f: impl FnMut(&mut f64)) {
        let idx = self.indices_of(pattern);
        for (k, &a) in idx.iter().enumerate() {
            for &b in &idx[k + 1..] {
                f(&mut self.pheromones[a][b]);
                f(&mut self.pheromones[b][a]);
            }
        }
    }
}

impl PatternSampler for AcoGraphSampler {
    fn name(&self) -> &'static str {
        "aco_graph"
    }

    /// One ant walk: start on a random item that has any visible neighbour,
    /// then keep moving to a neighbour on a new attribute, chosen in
    /// proportion to `visibility * pheromone`, until none is left.
    fn generate_candidate<R: Rng + ?Sized>(
        &mut self,
        _encoding: &GradualEncoding,
        rng: &mut R,
    ) -> GradualPattern {
        let mut pattern = GradualPattern::new();
        let starts: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.visibility[i].iter().any(|&v| v > 0.0))
            .collect();
        let Some(&start) = starts.choose(rng) else {
            return pattern;
        };

        let mut current = start;
        pattern.add_item(self.items[current]);
        loop {
            let weights: Vec<f64> = (0..self.items.len())
                .map(|j| {
                    if pattern.contains_attribute(self.items[j].attribute) {
                        0.0
                    } else {
                        self.visibility[current][j] * self.pheromones[current][j]
                    }
                })
                .collect();
            let total: f64 = weights.iter().sum();
            if total <= 0.0 {
                break;
            }
            let x = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let picked = weights.iter().position(|w| {
                acc += w;
                acc > x
            });
            let Some(next) = picked.or_else(|| weights.iter().rposition(|&w| w > 0.0)) else {
                break;
            };
            pattern.add_item(self.items[next]);
            current = next;
        }
        pattern
    }

    fn validation_mode(&self) -> ValidationMode {
        self.config.validation
    }

    fn update_state(&mut self, _encoding: &GradualEncoding, outcome: SampleOutcome<'_>) {
        match outcome {
            SampleOutcome::Accepted(pattern) => self.for_each_pair(pattern, |p| *p += 1.0),
            SampleOutcome::Rejected(pattern) => {
                let keep = 1.0 - self.config.evaporation_factor;
                self.for_each_pair(pattern, |p| *p *= keep);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::search::{sampled_search, SearchBudget, SearchState};
    use crate::samplers::test_support::rise_fall_noise;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_visibility_blocks_weak_pairs() {
        let enc = rise_fall_noise(0.7);
        let sampler = AcoGraphSampler::new(&enc, AcoGraphConfig::default());
        // bins: 0+ 0- 1+ 1- 2+ 2-
        let vis = sampler.visibility();
        assert_eq!(vis[0][3], 45.0);
        assert_eq!(vis[3][0], 45.0);
        assert_eq!(vis[0][2], 0.0);
        assert_eq!(vis[0][1], 0.0);
        assert!(vis[4].iter().all(|&v| v == 0.0));
        assert!(vis[5].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_deposit_is_symmetric() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = AcoGraphSampler::new(&enc, AcoGraphConfig::default());
        let winner =
            GradualPattern::from_items([GradualItem::increasing(0), GradualItem::decreasing(1)]);
        sampler.update_state(&enc, SampleOutcome::Accepted(&winner));
        assert_eq!(sampler.pheromones()[0][3], 2.0);
        assert_eq!(sampler.pheromones()[3][0], 2.0);
        sampler.update_state(&enc, SampleOutcome::Rejected(&winner));
        assert_eq!(sampler.pheromones()[0][3], 1.0);
        assert_eq!(sampler.pheromones()[1][2], 1.0);
    }

    #[test]
    fn test_finds_pair_and_skips_noise() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = AcoGraphSampler::new(&enc, AcoGraphConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let state = sampled_search(
            &mut sampler,
            &enc,
            SearchBudget::new(50, Some(10)),
            SearchState::new(),
            &mut rng,
        );
        assert_eq!(state.winners().len(), 1);
        let w = &state.winners()[0];
        assert!(!w.contains_attribute(2));
        assert!((w.support() - 1.0).abs() < 1e-12);
    }
}
