//! Miner configuration.
//! TOML-based; every section falls back to compiled defaults.

use serde::{Deserialize, Serialize};

use crate::algorithms::search::SearchBudget;
use crate::core::sampler::ValidationMode;
use crate::error::ConfigError;

/// Search strategy used by [`GradualMiner`](crate::GradualMiner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exhaustive GRAANK closure.
    #[default]
    Exact,
    /// Ant colony with a per-attribute pheromone matrix.
    Aco,
    /// Ant colony with an item-by-item pheromone matrix.
    AcoGraph,
    /// Genetic algorithm over item bit-genomes.
    Genetic,
    /// Binary particle swarm over item bit-genomes.
    Particle,
}

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Minimum support threshold. Default: 0.5.
    pub min_support: f64,
    /// Treat equal values as satisfying both directions. Default: false.
    pub equal_mode: bool,
    pub strategy: Strategy,
    /// Seed for the samplers' random source. Entropy-seeded when absent.
    pub seed: Option<u64>,
    pub aco: AcoConfig,
    pub aco_graph: AcoGraphConfig,
    pub genetic: GeneticConfig,
    pub particle: ParticleConfig,
    pub temporal: TemporalConfig,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: 0.5,
            equal_mode: false,
            strategy: Strategy::Exact,
            seed: None,
            aco: AcoConfig::default(),
            aco_graph: AcoGraphConfig::default(),
            genetic: GeneticConfig::default(),
            particle: ParticleConfig::default(),
            temporal: TemporalConfig::default(),
        }
    }
}

/// Ant colony over an #attributes x 3 pheromone matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Multiplicative decay applied to rejected cells: `p = (1 - e) * p`. Default: 0.5.
    pub evaporation_factor: f64,
    /// Total number of draws. Default: 500.
    pub max_iterations: usize,
    /// Stop after this many consecutive draws without a new winner.
    pub max_repeats: Option<usize>,
    /// Visit attributes in a random order on every draw. Default: true.
    pub shuffle_attributes: bool,
    pub validation: ValidationMode,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            evaporation_factor: 0.5,
            max_iterations: 500,
            max_repeats: None,
            shuffle_attributes: true,
            validation: ValidationMode::Relax,
        }
    }
}

impl AcoConfig {
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::new(self.max_iterations, self.max_repeats)
    }
}

/// Ant colony over a valid-item x valid-item pheromone matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoGraphConfig {
    /// Decay applied to the item pairs of a rejected pattern. Default: 0.5.
    pub evaporation_factor: f64,
    /// Default: 500.
    pub max_iterations: usize,
    pub max_repeats: Option<usize>,
    pub validation: ValidationMode,
}

impl Default for AcoGraphConfig {
    fn default() -> Self {
        Self {
            evaporation_factor: 0.5,
            max_iterations: 500,
            max_repeats: None,
            validation: ValidationMode::Relax,
        }
    }
}

impl AcoGraphConfig {
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::new(self.max_iterations, self.max_repeats)
    }
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Population size. Default: 5.
    pub population: usize,
    /// Children per generation as a fraction of the population. Default: 0.5.
    pub children_ratio: f64,
    /// Upper bound of the crossover blend factor. Default: 1.0.
    pub gamma: f64,
    /// Chance that a child gets one random gene flipped. Default: 0.9.
    pub mutation_rate: f64,
    /// Number of generations. Default: 100.
    pub max_iterations: usize,
    pub max_repeats: Option<usize>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population: 5,
            children_ratio: 0.5,
            gamma: 1.0,
            mutation_rate: 0.9,
            max_iterations: 100,
            max_repeats: None,
        }
    }
}

impl GeneticConfig {
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::new(self.max_iterations, self.max_repeats)
    }
}

/// Binary particle swarm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Swarm size. Default: 5.
    pub particles: usize,
    /// Velocity inertia. Default: 0.9.
    pub inertia: f64,
    /// Pull towards each particle's personal best. Default: 0.01.
    pub personal_coeff: f64,
    /// Pull towards the swarm's global best. Default: 0.9.
    pub global_coeff: f64,
    /// Number of swarm updates. Default: 100.
    pub max_iterations: usize,
    pub max_repeats: Option<usize>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particles: 5,
            inertia: 0.9,
            personal_coeff: 0.01,
            global_coeff: 0.9,
            max_iterations: 100,
            max_repeats: None,
        }
    }
}

impl ParticleConfig {
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::new(self.max_iterations, self.max_repeats)
    }
}

/// Temporal (T-GRAANK) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Column whose rows are held fixed while the others are shifted. Default: 0.
    pub reference_col: usize,
    /// Minimum fraction of records a shifted table must keep. Default: 0.5.
    pub min_representativity: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            reference_col: 0,
            min_representativity: 0.5,
        }
    }
}

impl MinerConfig {
    /// Default configuration with the given support threshold.
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// A `min_support` above 1.0 is accepted: it is unreachable and simply
    /// yields no pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_support.is_finite() || self.min_support < 0.0 {
            return Err(invalid("min_support", "must be a finite value >= 0.0"));
        }
        check_evaporation("aco.evaporation_factor", self.aco.evaporation_factor)?;
        check_evaporation(
            "aco_graph.evaporation_factor",
            self.aco_graph.evaporation_factor,
        )?;
        check_budget("aco.max_iterations", self.aco.max_iterations)?;
        check_budget("aco_graph.max_iterations", self.aco_graph.max_iterations)?;
        check_budget("genetic.max_iterations", self.genetic.max_iterations)?;
        check_budget("particle.max_iterations", self.particle.max_iterations)?;

        if self.genetic.population < 2 {
            return Err(invalid("genetic.population", "must be at least 2"));
        }
        if !(0.0..=1.0).contains(&self.genetic.mutation_rate) {
            return Err(invalid("genetic.mutation_rate", "must be between 0.0 and 1.0"));
        }
        if !(self.genetic.gamma > 0.0 && self.genetic.gamma <= 1.0) {
            return Err(invalid("genetic.gamma", "must be in (0.0, 1.0]"));
        }
        let ratio = self.genetic.children_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(invalid("genetic.children_ratio", "must be a positive number"));
        }
        if self.particle.particles == 0 {
            return Err(invalid("particle.particles", "must be at least 1"));
        }
        for (field, value) in [
            ("particle.inertia", self.particle.inertia),
            ("particle.personal_coeff", self.particle.personal_coeff),
            ("particle.global_coeff", self.particle.global_coeff),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite value >= 0.0"));
            }
        }
        let rep = self.temporal.min_representativity;
        if !(rep > 0.0 && rep <= 1.0) {
            return Err(invalid(
                "temporal.min_representativity",
                "must be in (0.0, 1.0]",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_evaporation(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be strictly between 0.0 and 1.0"))
    }
}

fn check_budget(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(invalid(field, "must be at least 1"))
    } else {
        Ok(())
    }
}
