pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod samplers;

pub use crate::algorithms::graank::{graank, graank_with};
pub use crate::algorithms::search::{sampled_search, SearchBudget, SearchState};
pub use crate::algorithms::temporal::tgraank;
pub use crate::algorithms::time_lag::{approximate_fuzzy_support, estimate_time_lag};
pub use crate::config::{MinerConfig, Strategy};
pub use crate::core::bit_matrix::BitMatrix;
pub use crate::core::dataset::{Dataset, TemporalStep, TimeDiff};
pub use crate::core::encoding::{encode_attribute, GradualEncoding};
pub use crate::core::pattern::{Direction, GradualItem, GradualPattern, TemporalPattern, TimeLag};
pub use crate::core::sampler::{PatternSampler, SampleOutcome, ValidationMode};
pub use crate::error::{ConfigError, GradualError, GradualResult};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::temporal::{attach_time_lags, temporal_search};
use crate::samplers::{AcoGraphSampler, AcoSampler, GeneticSampler, ParticleSampler};

/// High-level facade running the configured search strategy.
///
/// # Examples
///
/// ```
/// use gradual_rs::{Dataset, GradualMiner, MinerConfig};
///
/// let rows = vec![
///     vec![1.0, 5.0],
///     vec![2.0, 4.0],
///     vec![3.0, 3.0],
///     vec![4.0, 2.0],
///     vec![5.0, 1.0],
/// ];
/// let ds = Dataset::from_rows(vec!["x".into(), "y".into()], &rows, &[]).unwrap();
/// let miner = GradualMiner::new(MinerConfig::new(0.5)).unwrap();
/// let patterns = miner.discover(&ds);
/// assert_eq!(patterns.len(), 1);
/// assert_eq!(patterns[0].describe(ds.titles()), r#"["x+","y-"]"#);
/// assert_eq!(patterns[0].support(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GradualMiner {
    config: MinerConfig,
}

impl GradualMiner {
    /// Create a miner, validating `config` first.
    pub fn new(config: MinerConfig) -> GradualResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Dominance encoding of `dataset` at the configured threshold.
    pub fn encode(&self, dataset: &Dataset) -> GradualEncoding {
        GradualEncoding::encode(dataset, self.config.min_support, self.config.equal_mode)
    }

    /// Mine gradual patterns with the configured strategy.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn discover(&self, dataset: &Dataset) -> Vec<GradualPattern> {
        let encoding = self.encode(dataset);
        let patterns = self.mine(&encoding, 0);
        tracing::info!(
            strategy = ?self.config.strategy,
            min_support = self.config.min_support,
            patterns = patterns.len(),
            "discovery finished"
        );
        patterns
    }

    /// Mine temporal gradual patterns over every admissible step.
    ///
    /// The exact strategy estimates a lag for every closed candidate; the
    /// sampling strategies estimate lags for their winners.
    pub fn discover_temporal(&self, dataset: &Dataset) -> GradualResult<Vec<TemporalPattern>> {
        let cfg = &self.config;
        if cfg.strategy == Strategy::Exact {
            return tgraank(dataset, cfg.min_support, cfg.equal_mode, &cfg.temporal);
        }
        temporal_search(dataset, &cfg.temporal, |step| {
            let encoding = GradualEncoding::encode(&step.data, cfg.min_support, cfg.equal_mode);
            let winners = self.mine(&encoding, step.step as u64);
            attach_time_lags(&encoding, step, cfg.temporal.reference_col, &winners)
        })
    }

    /// Random source for one run. Seeded runs derive one stream per step.
    fn rng(&self, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    fn mine(&self, encoding: &GradualEncoding, stream: u64) -> Vec<GradualPattern> {
        let cfg = &self.config;
        let mut rng = self.rng(stream);
        let state = SearchState::new();
        let state = match cfg.strategy {
            Strategy::Exact => return graank(encoding),
            Strategy::Aco => {
                let mut sampler = AcoSampler::new(encoding, cfg.aco.clone());
                sampled_search(&mut sampler, encoding, cfg.aco.budget(), state, &mut rng)
            }
            Strategy::AcoGraph => {
                let mut sampler = AcoGraphSampler::new(encoding, cfg.aco_graph.clone());
                sampled_search(&mut sampler, encoding, cfg.aco_graph.budget(), state, &mut rng)
            }
            Strategy::Genetic => {
                let mut sampler = GeneticSampler::new(cfg.genetic.clone());
                sampled_search(&mut sampler, encoding, cfg.genetic.budget(), state, &mut rng)
            }
            Strategy::Particle => {
                let mut sampler = ParticleSampler::new(cfg.particle.clone());
                sampled_search(&mut sampler, encoding, cfg.particle.budget(), state, &mut rng)
            }
        };
        state.into_winners()
    }
}
