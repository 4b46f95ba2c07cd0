use rand::Rng;

use crate::config::ParticleConfig;
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::GradualPattern;
use crate::core::sampler::{PatternSampler, SampleOutcome};
use crate::samplers::{decode_genes, pattern_cost};

/// Velocity bound; keeps every bit's switch-on chance inside (0.018, 0.982).
const MAX_VELOCITY: f64 = 4.0;

#[derive(Debug, Clone)]
struct Particle {
    position: Vec<bool>,
    velocity: Vec<f64>,
    best_position: Vec<bool>,
    best_cost: f64,
}

fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Binary particle swarm over valid items.
///
/// Each bit switches its item on with probability `sigmoid(velocity)`, and
/// velocities are pulled towards the personal and global best bits. Every
/// draw moves the whole swarm once and proposes its best particle, which is
/// also the new global best whenever the move improved on it.
#[derive(Debug, Clone)]
pub struct ParticleSampler {
    config: ParticleConfig,
    swarm: Vec<Particle>,
    best_position: Vec<bool>,
    best_cost: f64,
}

impl ParticleSampler {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            swarm: Vec::new(),
            best_position: Vec::new(),
            best_cost: f64::INFINITY,
        }
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    fn cost(encoding: &GradualEncoding, position: &[bool]) -> f64 {
        pattern_cost(encoding, &decode_genes(encoding, position.iter().copied()))
    }

    fn seed_swarm<R: Rng + ?Sized>(&mut self, encoding: &GradualEncoding, rng: &mut R) {
        let width = encoding.bins().len();
        self.swarm = (0..self.config.particles)
            .map(|_| {
                let position: Vec<bool> = (0..width).map(|_| rng.gen_bool(0.5)).collect();
                let best_cost = Self::cost(encoding, &position);
                Particle {
                    velocity: vec![0.0; width],
                    best_position: position.clone(),
                    position,
                    best_cost,
                }
            })
            .collect();
        for p in &self.swarm {
            if p.best_cost < self.best_cost {
                self.best_cost = p.best_cost;
                self.best_position = p.best_position.clone();
            }
        }
    }
}

impl PatternSampler for ParticleSampler {
    fn name(&self) -> &'static str {
        "particle"
    }

    fn generate_candidate<R: Rng + ?Sized>(
        &mut self,
        encoding: &GradualEncoding,
        rng: &mut R,
    ) -> GradualPattern {
        if self.swarm.is_empty() {
            self.seed_swarm(encoding, rng);
        }
        let ParticleConfig {
            inertia,
            personal_coeff,
            global_coeff,
            ..
        } = self.config;
        let bit = |b: bool| f64::from(u8::from(b));

        let mut round_best: Option<(f64, Vec<bool>)> = None;
        for particle in &mut self.swarm {
            for k in 0..particle.position.len() {
                let r1: f64 = rng.gen();
                let r2: f64 = rng.gen();
                let x = bit(particle.position[k]);
                let v = inertia * particle.velocity[k]
                    + personal_coeff * r1 * (bit(particle.best_position[k]) - x)
                    + global_coeff * r2 * (bit(self.best_position[k]) - x);
                let v = v.clamp(-MAX_VELOCITY, MAX_VELOCITY);
                particle.velocity[k] = v;
                particle.position[k] = rng.gen::<f64>() < sigmoid(v);
            }

            let cost = Self::cost(encoding, &particle.position);
            if cost < particle.best_cost {
                particle.best_cost = cost;
                particle.best_position = particle.position.clone();
            }
            if round_best.as_ref().map_or(true, |(c, _)| cost < *c) {
                round_best = Some((cost, particle.position.clone()));
            }
        }

        let Some((cost, position)) = round_best else {
            return GradualPattern::new();
        };
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best_position = position.clone();
        }
        decode_genes(encoding, position)
    }

    fn update_state(&mut self, _encoding: &GradualEncoding, _outcome: SampleOutcome<'_>) {}
}
