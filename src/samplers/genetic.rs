use rand::Rng;

use crate::config::GeneticConfig;
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::GradualPattern;
use crate::core::sampler::{PatternSampler, SampleOutcome};
use crate::samplers::{decode_genes, pattern_cost};

#[derive(Debug, Clone)]
struct Individual {
    genes: Vec<bool>,
    cost: f64,
}

/// Genetic algorithm over bit-genomes, one gene per valid item.
///
/// Every draw breeds one generation: parents are paired at random, children
/// come from blend crossover plus an occasional one-gene mutation, and the
/// fittest individuals survive. The candidate is the new global best when
/// the generation improved on it, otherwise the fittest child.
#[derive(Debug, Clone)]
pub struct GeneticSampler {
    config: GeneticConfig,
    population: Vec<Individual>,
    best: Option<Individual>,
}

impl GeneticSampler {
    pub fn new(config: GeneticConfig) -> Self {
        Self {
            config,
            population: Vec::new(),
            best: None,
        }
    }

    /// Lowest cost seen so far.
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.cost)
    }

    fn evaluate(encoding: &GradualEncoding, genes: Vec<bool>) -> Individual {
        let cost = pattern_cost(encoding, &decode_genes(encoding, genes.iter().copied()));
        Individual { genes, cost }
    }

    fn seed_population<R: Rng + ?Sized>(&mut self, encoding: &GradualEncoding, rng: &mut R) {
        let width = encoding.bins().len();
        self.population = (0..self.config.population)
            .map(|_| {
                let genes = (0..width).map(|_| rng.gen_bool(0.5)).collect();
                Self::evaluate(encoding, genes)
            })
            .collect();
        self.best = self
            .population
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .cloned();
    }

    /// Two children from a per-gene blend of the parents.
    fn crossover<R: Rng + ?Sized>(
        &self,
        a: &[bool],
        b: &[bool],
        rng: &mut R,
    ) -> (Vec<bool>, Vec<bool>) {
        let gamma = self.config.gamma;
        a.iter()
            .zip(b)
            .map(|(&x, &y)| {
                let alpha = rng.gen_range(0.0..=gamma);
                let (x, y) = (f64::from(u8::from(x)), f64::from(u8::from(y)));
                (
                    alpha * x + (1.0 - alpha) * y >= 0.5,
                    alpha * y + (1.0 - alpha) * x >= 0.5,
                )
            })
            .unzip()
    }

    fn mutate<R: Rng + ?Sized>(&self, genes: &mut [bool], rng: &mut R) {
        if !genes.is_empty() && rng.gen_bool(self.config.mutation_rate) {
            let k = rng.gen_range(0..genes.len());
            genes[k] = !genes[k];
        }
    }
}

impl PatternSampler for GeneticSampler {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn generate_candidate<R: Rng + ?Sized>(
        &mut self,
        encoding: &GradualEncoding,
        rng: &mut R,
    ) -> GradualPattern {
        if self.population.is_empty() {
            self.seed_population(encoding, rng);
        }
        let size = self.population.len();
        if size < 2 {
            return GradualPattern::new();
        }

        let pairs = ((self.config.children_ratio * size as f64) / 2.0).round().max(1.0) as usize;
        let mut children = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let i = rng.gen_range(0..size);
            let mut j = rng.gen_range(0..size - 1);
            if j >= i {
                j += 1;
            }
            let (mut c1, mut c2) =
                self.crossover(&self.population[i].genes, &self.population[j].genes, rng);
            self.mutate(&mut c1, rng);
            self.mutate(&mut c2, rng);
            children.push(Self::evaluate(encoding, c1));
            children.push(Self::evaluate(encoding, c2));
        }

        let fittest_child = children
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .cloned();
        self.population.extend(children);
        self.population.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        self.population.truncate(self.config.population);

        let leader = &self.population[0];
        let improved = self.best.as_ref().map_or(true, |b| leader.cost < b.cost);
        let chosen = if improved {
            self.best = Some(leader.clone());
            leader.clone()
        } else {
            match fittest_child {
                Some(child) => child,
                None => leader.clone(),
            }
        };
        decode_genes(encoding, chosen.genes)
    }

    fn update_state(&mut self, _encoding: &GradualEncoding, _outcome: SampleOutcome<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::search::{sampled_search, SearchBudget, SearchState};
    use crate::core::pattern::GradualItem;
    use crate::samplers::test_support::rise_fall_noise;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_population_keeps_its_size() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = GeneticSampler::new(GeneticConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            sampler.generate_candidate(&enc, &mut rng);
            assert_eq!(sampler.population.len(), 5);
        }
    }

    #[test]
    fn test_best_cost_never_worsens() {
        let enc = rise_fall_noise(0.7);
        let mut sampler = GeneticSampler::new(GeneticConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        let mut last = f64::INFINITY;
        for _ in 0..30 {
            sampler.generate_candidate(&enc, &mut rng);
            let cost = sampler.best_cost().unwrap();
            assert!(cost <= last);
            last = cost;
        }
    }

    #[test]
    fn test_finds_pair_and_skips_noise() {
        let enc = rise_fall_noise(0.7);
        let config = GeneticConfig {
            population: 20,
            ..GeneticConfig::default()
        };
        let mut sampler = GeneticSampler::new(config);
        let mut rng = StdRng::seed_from_u64(21);
        let state = sampled_search(
            &mut sampler,
            &enc,
            SearchBudget::new(200, None),
            SearchState::new(),
            &mut rng,
        );
        let pair =
            GradualPattern::from_items([GradualItem::increasing(0), GradualItem::decreasing(1)]);
        assert_eq!(state.winners().len(), 1);
        assert!(state.winners()[0].same_items(&pair));
        assert_eq!(state.winners()[0].raw_support(), 1.0);
    }

    #[test]
    fn test_crossover_keeps_agreeing_genes() {
        let sampler = GeneticSampler::new(GeneticConfig::default());
        let mut rng = StdRng::seed_from_u64(2);
        let a = vec![true, false, true, false];
        let (c1, c2) = sampler.crossover(&a, &a, &mut rng);
        assert_eq!(c1, a);
        assert_eq!(c2, a);
    }
}
