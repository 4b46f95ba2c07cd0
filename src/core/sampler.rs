use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::encoding::GradualEncoding;
use crate::core::pattern::GradualPattern;

/// How a sampled candidate is checked against the encoded matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Drop items that push the running support below the threshold.
    #[default]
    Relax,
    /// Reject the whole candidate as soon as the running support drops.
    Abort,
}

/// Feedback handed to a sampler after one candidate has been judged.
#[derive(Debug, Clone, Copy)]
pub enum SampleOutcome<'a> {
    /// The validated pattern met the threshold and became a winner.
    Accepted(&'a GradualPattern),
    /// The validated pattern fell below the threshold.
    Rejected(&'a GradualPattern),
}

/// A stochastic strategy that proposes gradual patterns.
///
/// Designed for static polymorphism: [`sampled_search`](crate::algorithms::search::sampled_search)
/// is generic over `S: PatternSampler`, and owns the winner/loser bookkeeping
/// shared by every strategy. Implementations only decide how candidates are
/// drawn and how their private state (pheromones, population, swarm) reacts
/// to outcomes.
pub trait PatternSampler {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Draw the next candidate.
    fn generate_candidate<R: Rng + ?Sized>(
        &mut self,
        encoding: &GradualEncoding,
        rng: &mut R,
    ) -> GradualPattern;

    /// Validation mode used by the default [`validate`](PatternSampler::validate).
    fn validation_mode(&self) -> ValidationMode {
        ValidationMode::Relax
    }

    /// Check a candidate against the encoded matrices.
    ///
    /// Default: the encoding's progressive validation.
    fn validate(&self, encoding: &GradualEncoding, candidate: &GradualPattern) -> GradualPattern {
        encoding.validate(candidate, self.validation_mode())
    }

    /// React to the judgement of the last validated candidate.
    fn update_state(&mut self, encoding: &GradualEncoding, outcome: SampleOutcome<'_>);
}
