//! The (mu + lambda) evolutionary loop.
//!
//! Each generation selects `mu` parents with NSGA-II selection, breeds
//! `lambda` offspring through blend crossover and Gaussian mutation (every
//! offspring repaired back into the feasible region before evaluation), and
//! reselects the combined pool down to `mu + lambda` survivors. Generation
//! count is the sole termination condition; the caller bounds cost by
//! choosing the population size and generation count up front.

use rand::prelude::SeedableRng;
use rand::seq::index;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::algorithms::nsga2;
use crate::formulation::Formulation;
use crate::variant::DoughVariantConfig;
use crate::Evaluator;

const BLEND_ALPHA: f64 = 0.5;
const MUTATION_SIGMA: f64 = 0.05;
const MUTATION_INDPB: f64 = 0.3;

/// Engine state. Serializable mid-run, RNG included, so a search can be
/// snapshotted and resumed deterministically.
#[derive(Serialize, Deserialize)]
pub struct MuPlusLambda {
    population: Vec<Formulation>,
    variant: DoughVariantConfig,
    mu: usize,
    lambda: usize,
    cxpb: f64,
    mutpb: f64,
    generation: usize,
    rng: Pcg64,
}

impl MuPlusLambda {
    /// Creates and repairs an initial population of `pop_size` individuals.
    /// Both the parent count and the offspring count equal `pop_size`, so
    /// the carried population settles at `2 * pop_size` after the first
    /// generation.
    ///
    /// # Panics
    ///
    /// Panics if `pop_size < 2`; breeding samples two distinct parents.
    pub fn new(
        variant: DoughVariantConfig,
        pop_size: usize,
        cxpb: f64,
        mutpb: f64,
        seed: u64,
    ) -> Self {
        assert!(pop_size >= 2, "pop_size must be at least 2");
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut population: Vec<Formulation> = (0..pop_size)
            .map(|_| Formulation::random(&variant, &mut rng))
            .collect();
        for individual in &mut population {
            individual.repair(&variant);
        }
        Self {
            population,
            variant,
            mu: pop_size,
            lambda: pop_size,
            cxpb,
            mutpb,
            generation: 0,
            rng,
        }
    }

    pub fn population(&self) -> &[Formulation] {
        &self.population
    }

    pub fn into_population(self) -> Vec<Formulation> {
        self.population
    }

    pub fn variant(&self) -> &DoughVariantConfig {
        &self.variant
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn mu(&self) -> usize {
        self.mu
    }

    pub fn lambda(&self) -> usize {
        self.lambda
    }

    /// Runs one generation: parent selection, breeding, offspring
    /// evaluation, survivor reselection.
    pub fn step<E: Evaluator>(&mut self, evaluator: &E) {
        self.evaluate_missing(evaluator);

        let parents = nsga2::select(&self.population, self.mu);

        let mut offspring = Vec::with_capacity(self.lambda);
        while offspring.len() < self.lambda {
            let pair = index::sample(&mut self.rng, parents.len(), 2);
            let mut first = parents[pair.index(0)].clone();
            let mut second = parents[pair.index(1)].clone();

            if self.rng.random::<f64>() < self.cxpb {
                first.blend_crossover(&mut second, BLEND_ALPHA, &mut self.rng);
            }
            if self.rng.random::<f64>() < self.mutpb {
                first.mutate_gaussian(&mut self.rng, MUTATION_SIGMA, MUTATION_INDPB);
            }
            if self.rng.random::<f64>() < self.mutpb {
                second.mutate_gaussian(&mut self.rng, MUTATION_SIGMA, MUTATION_INDPB);
            }

            first.repair(&self.variant);
            second.repair(&self.variant);

            offspring.push(first);
            if offspring.len() < self.lambda {
                offspring.push(second);
            }
        }

        evaluate_all(&mut offspring, evaluator);

        let mut pool = parents;
        pool.extend(offspring);
        self.population = nsga2::select(&pool, self.mu + self.lambda);

        self.generation += 1;
        debug!(generation = self.generation, "generation complete");
    }

    /// Runs `ngen` generations. No early stopping.
    pub fn run<E: Evaluator>(&mut self, evaluator: &E, ngen: usize) {
        for _ in 0..ngen {
            self.step(evaluator);
        }
    }

    // Covers the freshly created population and deserialized snapshots;
    // a no-op once everyone carries a fitness.
    fn evaluate_missing<E: Evaluator>(&mut self, evaluator: &E) {
        #[cfg(feature = "parallel")]
        self.population
            .par_iter_mut()
            .filter(|individual| individual.fitness.is_none())
            .for_each(|individual| {
                let fitness = evaluator.evaluate(individual);
                individual.fitness = Some(fitness);
            });
        #[cfg(not(feature = "parallel"))]
        for individual in &mut self.population {
            if individual.fitness.is_none() {
                let fitness = evaluator.evaluate(individual);
                individual.fitness = Some(fitness);
            }
        }
    }
}

fn evaluate_all<E: Evaluator>(individuals: &mut [Formulation], evaluator: &E) {
    #[cfg(feature = "parallel")]
    individuals.par_iter_mut().for_each(|individual| {
        let fitness = evaluator.evaluate(individual);
        individual.fitness = Some(fitness);
    });
    #[cfg(not(feature = "parallel"))]
    for individual in individuals.iter_mut() {
        let fitness = evaluator.evaluate(individual);
        individual.fitness = Some(fitness);
    }
}
