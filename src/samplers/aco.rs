use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::AcoConfig;
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::{Direction, GradualItem, GradualPattern};
use crate::core::sampler::{PatternSampler, SampleOutcome, ValidationMode};

const INCREASING: usize = 0;
const DECREASING: usize = 1;
const IRRELEVANT: usize = 2;

fn column(direction: Direction) -> usize {
    match direction {
        Direction::Increasing => INCREASING,
        Direction::Decreasing => DECREASING,
    }
}

/// Ant-colony sampler over an `attributes × 3` pheromone matrix.
///
/// Each row weighs "increasing", "decreasing" and "irrelevant" for one valid
/// attribute. A candidate is drawn attribute by attribute; winners deposit
/// pheromone, rejected patterns evaporate the cells they used.
///
/// # Examples
///
/// ```
/// use gradual_rs::algorithms::search::{sampled_search, SearchBudget, SearchState};
/// use gradual_rs::config::AcoConfig;
/// use gradual_rs::samplers::AcoSampler;
/// use gradual_rs::{Dataset, GradualEncoding};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64, 8.0 - i as f64]).collect();
/// let ds = Dataset::from_rows(vec![], &rows, &[]).unwrap();
/// let enc = GradualEncoding::encode(&ds, 0.5, false);
///
/// let mut sampler = AcoSampler::new(&enc, AcoConfig::default());
/// let mut rng = StdRng::seed_from_u64(7);
/// let state = sampled_search(&mut sampler, &enc, SearchBudget::new(200, None), SearchState::new(), &mut rng);
/// assert_eq!(state.winners().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AcoSampler {
    config: AcoConfig,
    attributes: Vec<usize>,
    pheromones: Vec<[f64; 3]>,
}

impl AcoSampler {
    /// Fresh sampler over the valid attributes of `encoding`, every cell at 1.
    pub fn new(encoding: &GradualEncoding, config: AcoConfig) -> Self {
        let mut attributes: Vec<usize> = encoding.bins().iter().map(|b| b.item.attribute).collect();
        attributes.dedup();
        let pheromones = vec![[1.0; 3]; attributes.len()];
        Self {
            config,
            attributes,
            pheromones,
        }
    }

    /// Sampled attributes, aligned with [`pheromones`](Self::pheromones).
    pub fn attributes(&self) -> &[usize] {
        &self.attributes
    }

    /// Current pheromone rows: `[increasing, decreasing, irrelevant]`.
    pub fn pheromones(&self) -> &[[f64; 3]] {
        &self.pheromones
    }

    fn row_of(&self, attribute: usize) -> Option<usize> {
        self.attributes.iter().position(|&a| a == attribute)
    }

    fn deposit(&mut self, pattern: &GradualPattern) {
        for (row, &attribute) in self.attributes.iter().enumerate() {
            let col = pattern
                .items()
                .iter()
                .find(|gi| gi.attribute == attribute)
                .map_or(IRRELEVANT, |gi| column(gi.direction));
            self.pheromones[row][col] += 1.0;
        }
    }

    fn evaporate(&mut self, pattern: &GradualPattern) {
        let keep = 1.0 - self.config.evaporation_factor;
        for gi in pattern.items() {
            if let Some(row) = self.row_of(gi.attribute) {
                self.pheromones[row][column(gi.direction)] *= keep;
            }
        }
    }
}

impl PatternSampler for AcoSampler {
    fn name(&self) -> &'static str {
        "aco"
    }

    fn generate_candidate<R: Rng + ?Sized>(
        &mut self,
        _encoding: &GradualEncoding,
        rng: &mut R,
    ) -> GradualPattern {
        let mut order: Vec<usize> = (0..self.attributes.len()).collect();
        if self.config.shuffle_attributes {
            order.shuffle(rng);
        }

        let mut pattern = GradualPattern::new();
        for row in order {
            let [inc, dec, irr] = self.pheromones[row];
            let total = inc + dec + irr;
            if total <= 0.0 {
                continue;
            }
            let x: f64 = rng.gen();
            let attribute = self.attributes[row];
            if x < inc / total {
                pattern.add_item(GradualItem::increasing(attribute));
            } else if x < (inc + dec) / total {
                pattern.add_item(GradualItem::decreasing(attribute));
            }
        }
        pattern
    }

    fn validation_mode(&self) -> ValidationMode {
        self.config.validation
    }

    fn update_state(&mut self, _encoding: &GradualEncoding, outcome: SampleOutcome<'_>) {
        match outcome {
            SampleOutcome::Accepted(pattern) => {
                self.deposit(pattern);
                tracing::debug!(pattern = %pattern, "pheromone deposited");
            }
            SampleOutcome::Rejected(pattern) => self.evaporate(pattern),
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

    fn gp(items: &[&str]) -> GradualPattern {
        GradualPattern::from_items(items.iter().map(|s| s.parse::<GradualItem>().unwrap()))
    }

    #[test]
    fn test_pheromones_start_uniform() {
        let enc = rise_fall_noise(0.7);
        let sampler = AcoSampler::new(&enc, AcoConfig::default());
        assert_eq!(sampler.attributes(), &[0, 1, 2]);
        assert!(sampler.pheromones().iter().all(|row| *row == [1.0; 3]));
    }

    #[test]
    fn test_deposit_and_evaporate() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = AcoSampler::new(&enc, AcoConfig::default());
        let winner = gp(&["0+", "1-"]);
        sampler.update_state(&enc, SampleOutcome::Accepted(&winner));
        assert_eq!(sampler.pheromones()[0], [2.0, 1.0, 1.0]);
        assert_eq!(sampler.pheromones()[1], [1.0, 2.0, 1.0]);
        assert_eq!(sampler.pheromones()[2], [1.0, 1.0, 2.0]);

        let loser = gp(&["0+", "2-"]);
        sampler.update_state(&enc, SampleOutcome::Rejected(&loser));
        assert_eq!(sampler.pheromones()[0], [1.0, 1.0, 1.0]);
        assert_eq!(sampler.pheromones()[2], [1.0, 0.5, 2.0]);
    }

    #[test]
    fn test_candidates_use_distinct_valid_attributes() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = AcoSampler::new(&enc, AcoConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let c = sampler.generate_candidate(&enc, &mut rng);
            let mut attrs: Vec<usize> = c.items().iter().map(|gi| gi.attribute).collect();
            let len = attrs.len();
            attrs.sort_unstable();
            attrs.dedup();
            assert_eq!(attrs.len(), len);
            assert!(attrs.iter().all(|a| *a < 3));
        }
    }

    #[test]
    fn test_noise_column_never_wins() {
        let enc = rise_fall_noise(0.7);
        for seed in 0..5 {
            let mut sampler = AcoSampler::new(&enc, AcoConfig::default());
            let mut rng = StdRng::seed_from_u64(seed);
            let state = sampled_search(
                &mut sampler,
                &enc,
                SearchBudget::new(300, None),
                SearchState::new(),
                &mut rng,
            );
            assert!(state.winners().iter().all(|w| !w.contains_attribute(2)));
            assert!(state
                .winners()
                .iter()
                .any(|w| w.same_items(&gp(&["0+", "1-"]))));
            for w in state.winners() {
                assert!(w.raw_support() >= 0.7);
                assert!((enc.joint_support(w.items()) - w.raw_support()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_abort_mode_rejects_whole_candidate() {
        let enc = rise_fall_noise(0.7);
        let config = AcoConfig {
            validation: ValidationMode::Abort,
            ..AcoConfig::default()
        };
        let sampler = AcoSampler::new(&enc, config);
        let out = sampler.validate(&enc, &gp(&["0+", "1-", "2+"]));
        assert_eq!(out.support(), 0.0);
        assert_eq!(out.len(), 3);
    }
}
