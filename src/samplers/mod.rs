//! Interchangeable [`PatternSampler`](crate::core::sampler::PatternSampler)
//! strategies driven by [`sampled_search`](crate::algorithms::search::sampled_search).

pub mod aco;
pub mod aco_graph;
pub mod genetic;
pub mod particle;

pub use aco::AcoSampler;
pub use aco_graph::AcoGraphSampler;
pub use genetic::GeneticSampler;
pub use particle::ParticleSampler;

use crate::core::encoding::GradualEncoding;
use crate::core::pattern::GradualPattern;

/// Pattern made of the bins whose gene is on.
///
/// Genes index [`GradualEncoding::bins`]; a bin whose attribute is already
/// in the pattern is skipped.
pub(crate) fn decode_genes(
    encoding: &GradualEncoding,
    genes: impl IntoIterator<Item = bool>,
) -> GradualPattern {
    GradualPattern::from_items(
        encoding
            .bins()
            .iter()
            .zip(genes)
            .filter(|(_, on)| *on)
            .map(|(bin, _)| bin.item),
    )
}

/// Cost of a decoded pattern: `1 / joint count`, 1.0 when the pattern has
/// fewer than two items or no supporting pair. Lower is better.
pub(crate) fn pattern_cost(encoding: &GradualEncoding, pattern: &GradualPattern) -> f64 {
    if pattern.len() < 2 {
        return 1.0;
    }
    match encoding.joint_count(pattern.items()) {
        0 => 1.0,
        count => 1.0 / count as f64,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::rise_fall_noise;
    use super::*;
    use crate::core::pattern::GradualItem;

    #[test]
    fn test_decode_skips_repeated_attribute() {
        let enc = rise_fall_noise(0.7);
        // bins: 0+ 0- 1+ 1- 2+ 2-
        let p = decode_genes(&enc, [true, true, false, true, false, false]);
        assert_eq!(
            p.items(),
            &[GradualItem::increasing(0), GradualItem::decreasing(1)]
        );
    }

    #[test]
    fn test_cost_prefers_stronger_patterns() {
        let enc = rise_fall_noise(0.7);
        let strong = decode_genes(&enc, [true, false, false, true, false, false]);
        let weak = decode_genes(&enc, [true, false, false, false, true, false]);
        let single = decode_genes(&enc, [true, false, false, false, false, false]);
        assert!(pattern_cost(&enc, &strong) < pattern_cost(&enc, &weak));
        assert_eq!(pattern_cost(&enc, &single), 1.0);
        assert_eq!(pattern_cost(&enc, &strong), 1.0 / 45.0);
    }
}
