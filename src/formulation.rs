//! Formulation encoding, repair, and variation operators.
//!
//! A formulation is an ordered proportion vector aligned positionally with a
//! variant's ingredient list. Repair is the feasibility mechanism: instead of
//! rejecting out-of-band candidates, every vector is clamped, pushed into its
//! role bands, and renormalized to sum to one. The fitness cache is cleared
//! by anything that touches the vector.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::variant::{DoughVariantConfig, IngredientRole};

/// Three objectives, all minimized. Elasticity enters negated so a uniform
/// minimization rule covers the whole tuple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub density: f64,
    pub cost: f64,
    pub neg_elasticity: f64,
}

impl Fitness {
    /// Sentinel for an infeasible individual (base ingredient at zero).
    /// Ranks behind every feasible tuple without raising anything.
    pub const PENALTY: Fitness = Fitness {
        density: 9999.0,
        cost: 9999.0,
        neg_elasticity: 9999.0,
    };

    pub fn values(&self) -> [f64; 3] {
        [self.density, self.cost, self.neg_elasticity]
    }

    /// Pareto dominance under minimization: no worse in every objective,
    /// strictly better in at least one.
    pub fn dominates(&self, other: &Fitness) -> bool {
        let mut better_in_any = false;
        for (a, b) in self.values().iter().zip(other.values().iter()) {
            if a > b {
                return false;
            }
            if a < b {
                better_in_any = true;
            }
        }
        better_in_any
    }
}

/// One individual: the proportion vector plus its cached fitness, `None`
/// until evaluated or after any mutation of the vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Formulation {
    pub proportions: Vec<f64>,
    pub fitness: Option<Fitness>,
}

impl Formulation {
    pub fn from_proportions(proportions: Vec<f64>) -> Self {
        Self {
            proportions,
            fitness: None,
        }
    }

    /// Draws an initial candidate with role-dependent ranges, then
    /// normalizes. The ranges seed the search near sensible doughs; repair
    /// still owns feasibility afterwards.
    pub fn random<R: Rng>(variant: &DoughVariantConfig, rng: &mut R) -> Self {
        let mut proportions: Vec<f64> = variant
            .roles()
            .iter()
            .map(|role| match role {
                IngredientRole::Base => rng.random_range(0.2..0.3),
                IngredientRole::Water => rng.random_range(0.4..0.6),
                IngredientRole::StarchBinder => rng.random_range(0.05..0.15),
                IngredientRole::GumBinder => rng.random_range(0.005..0.02),
                IngredientRole::Acid => rng.random_range(0.01..0.02),
                IngredientRole::Free => rng.random_range(0.0..0.1),
            })
            .collect();
        normalize_or_uniform(&mut proportions);
        Self {
            proportions,
            fitness: None,
        }
    }

    /// Projects the vector back into the feasible region: clamp to [0, 1],
    /// enforce the role bands (base 0.2..0.5, water 0.4..0.6, starch binder
    /// min 0.05, gum min 0.005, acid min 0.01), renormalize to sum one.
    /// Must run after every variation and before every evaluation.
    pub fn repair(&mut self, variant: &DoughVariantConfig) {
        let roles = variant.roles();
        assert_eq!(
            self.proportions.len(),
            roles.len(),
            "formulation is misaligned with the variant's ingredient list"
        );
        for (proportion, role) in self.proportions.iter_mut().zip(roles) {
            *proportion = proportion.clamp(0.0, 1.0);
            match role {
                IngredientRole::Base => *proportion = proportion.clamp(0.2, 0.5),
                IngredientRole::Water => *proportion = proportion.clamp(0.4, 0.6),
                IngredientRole::StarchBinder => *proportion = proportion.max(0.05),
                IngredientRole::GumBinder => *proportion = proportion.max(0.005),
                IngredientRole::Acid => *proportion = proportion.max(0.01),
                IngredientRole::Free => {}
            }
        }
        normalize_or_uniform(&mut self.proportions);
        self.fitness = None;
    }

    /// Blend crossover: for each coordinate pair, draw
    /// `gamma = (1 + 2 alpha) u - alpha` with `u ~ U[0, 1)` and rewrite both
    /// parents as the two gamma-interpolations. Offspring usually leave the
    /// simplex; repair brings them back.
    pub fn blend_crossover<R: Rng>(&mut self, other: &mut Formulation, alpha: f64, rng: &mut R) {
        assert_eq!(
            self.proportions.len(),
            other.proportions.len(),
            "crossover parents have different lengths"
        );
        for i in 0..self.proportions.len() {
            let gamma = (1.0 + 2.0 * alpha) * rng.random::<f64>() - alpha;
            let x1 = self.proportions[i];
            let x2 = other.proportions[i];
            self.proportions[i] = (1.0 - gamma) * x1 + gamma * x2;
            other.proportions[i] = gamma * x1 + (1.0 - gamma) * x2;
        }
        self.fitness = None;
        other.fitness = None;
    }

    /// Gaussian mutation: each coordinate independently gains `N(0, sigma)`
    /// noise with probability `indpb`.
    pub fn mutate_gaussian<R: Rng>(&mut self, rng: &mut R, sigma: f64, indpb: f64) {
        let normal = Normal::new(0.0, sigma).expect("sigma must be finite and non-negative");
        for proportion in &mut self.proportions {
            if rng.random::<f64>() < indpb {
                *proportion += normal.sample(rng);
            }
        }
        self.fitness = None;
    }
}

/// Scales the vector to sum one; a degenerate all-zero vector becomes
/// uniform instead of dividing by zero.
fn normalize_or_uniform(proportions: &mut [f64]) {
    let total: f64 = proportions.iter().sum();
    if total > 0.0 {
        for proportion in proportions.iter_mut() {
            *proportion /= total;
        }
    } else if !proportions.is_empty() {
        let uniform = 1.0 / proportions.len() as f64;
        proportions.fill(uniform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn normalize_scales_to_unit_sum() {
        let mut proportions = vec![1.0, 2.0, 1.0];
        normalize_or_uniform(&mut proportions);
        assert_eq!(proportions, vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn normalize_falls_back_to_uniform_on_zero_sum() {
        let mut proportions = vec![0.0, 0.0, 0.0, 0.0];
        normalize_or_uniform(&mut proportions);
        assert_eq!(proportions, vec![0.25; 4]);
    }

    #[test]
    fn blend_crossover_preserves_coordinate_sums() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut a = Formulation::from_proportions(vec![0.2, 0.5, 0.3]);
        let mut b = Formulation::from_proportions(vec![0.4, 0.4, 0.2]);
        a.blend_crossover(&mut b, 0.5, &mut rng);
        for (i, expected) in [0.6, 0.9, 0.5].iter().enumerate() {
            let sum = a.proportions[i] + b.proportions[i];
            assert!((sum - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn variation_clears_the_fitness_cache() {
        let mut rng = Pcg64::seed_from_u64(11);
        let mut a = Formulation::from_proportions(vec![0.5, 0.5]);
        let mut b = Formulation::from_proportions(vec![0.3, 0.7]);
        a.fitness = Some(Fitness::PENALTY);
        b.fitness = Some(Fitness::PENALTY);
        a.blend_crossover(&mut b, 0.5, &mut rng);
        assert!(a.fitness.is_none());
        assert!(b.fitness.is_none());

        a.fitness = Some(Fitness::PENALTY);
        a.mutate_gaussian(&mut rng, 0.05, 1.0);
        assert!(a.fitness.is_none());
    }
}
