//! Noise overlay sampling
//!
//! A freshly painted cell may receive one decoration (flowers, pebbles, ...)
//! drawn from the noise rules of its material. The roll happens once, at
//! paint time; border passes, resizes and undo never re-roll it.

use map_tiler_core::{Material, NoiseRule, NoiseRuleId, RuleTables};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;

/// Roll a noise overlay for a cell painted with `material`.
///
/// Returns `None` when the material's probability is zero or it has no noise
/// rules. Otherwise draws `r` uniformly from `[0, 100)` and, if
/// `r < noise_probability`, picks one matching rule uniformly.
pub fn roll_noise(
    material: &Material,
    tables: &RuleTables,
    rng: &mut impl Rng,
) -> Option<NoiseRuleId> {
    if material.noise_probability <= 0.0 {
        return None;
    }
    let candidates: Vec<&NoiseRule> = tables.noise_rules_for(&material.id).collect();
    if candidates.is_empty() {
        return None;
    }

    let roll = rng.gen::<f32>() * 100.0;
    if roll >= material.noise_probability {
        return None;
    }
    candidates.choose(rng).map(|rule| rule.id.clone())
}

/// Owns the random source used for noise rolls.
///
/// Any [`RngCore`] can be injected; tests use a seeded or stepping generator
/// to make rolls reproducible.
pub struct NoiseSampler {
    rng: Box<dyn RngCore + Send + Sync>,
}

impl NoiseSampler {
    pub fn new(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// A reproducible sampler
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// A sampler seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    /// Roll a noise overlay for one newly painted cell
    pub fn sample(&mut self, material: &Material, tables: &RuleTables) -> Option<NoiseRuleId> {
        roll_noise(material, tables, &mut self.rng)
    }
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl fmt::Debug for NoiseSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseSampler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_tiler_core::SpriteRect;
    use rand::rngs::mock::StepRng;

    fn tables() -> RuleTables {
        RuleTables::new()
            .with_noise_rule(NoiseRule::new("flowers", "grass", SpriteRect::default()))
            .with_noise_rule(NoiseRule::new("rock", "grass", SpriteRect::default()))
            .with_noise_rule(NoiseRule::new("shells", "sand", SpriteRect::default()))
    }

    fn grass(probability: f32) -> Material {
        Material::new("grass", SpriteRect::default()).with_noise_probability(probability)
    }

    #[test]
    fn test_zero_probability_never_rolls() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..200 {
            assert_eq!(roll_noise(&grass(0.0), &tables(), &mut rng), None);
        }
    }

    #[test]
    fn test_no_matching_rules_never_rolls() {
        let water = Material::new("water", SpriteRect::default()).with_noise_probability(100.0);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(roll_noise(&water, &tables(), &mut rng), None);
    }

    #[test]
    fn test_low_draw_selects_a_matching_rule() {
        // StepRng at zero draws r = 0.0, under any positive probability
        let mut rng = StepRng::new(0, 0);
        let picked = roll_noise(&grass(0.5), &tables(), &mut rng).unwrap();
        assert!(["flowers", "rock"].contains(&picked.as_str()));
    }

    #[test]
    fn test_high_draw_misses() {
        // All-ones draws r just under 100.0
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(roll_noise(&grass(99.0), &tables(), &mut rng), None);
    }

    #[test]
    fn test_full_probability_always_rolls() {
        let mut sampler = NoiseSampler::seeded(7);
        let tables = tables();
        for _ in 0..200 {
            let picked = sampler.sample(&grass(100.0), &tables).unwrap();
            assert_ne!(picked.as_str(), "shells");
        }
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let tables = tables();
        let mut a = NoiseSampler::seeded(99);
        let mut b = NoiseSampler::seeded(99);
        for _ in 0..50 {
            assert_eq!(
                a.sample(&grass(40.0), &tables),
                b.sample(&grass(40.0), &tables)
            );
        }
    }
}
