//! Top-level driver: wires the property table, variant config, evaluator and
//! generation loop together and returns structured results. Rendering,
//! plotting and persistence belong to downstream collaborators.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::algorithms::mu_plus_lambda::MuPlusLambda;
use crate::algorithms::nsga2;
use crate::evaluator::DoughEvaluator;
use crate::formulation::{Fitness, Formulation};
use crate::properties::PropertyTable;
use crate::substitution::SubstituteCatalog;
use crate::variant::DoughVariantConfig;

/// Search budget and breeding probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizeParams {
    pub pop_size: usize,
    pub ngen: usize,
    pub cxpb: f64,
    pub mutpb: f64,
    pub seed: u64,
}

impl Default for OptimizeParams {
    fn default() -> Self {
        Self {
            pop_size: 30,
            ngen: 20,
            cxpb: 0.7,
            mutpb: 0.3,
            seed: 0,
        }
    }
}

/// One reported formulation: ingredient shares keyed by name (summing to
/// one) plus the fitness tuple they earned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormulationReport {
    pub proportions: BTreeMap<String, f64>,
    pub fitness: Fitness,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub original: String,
    pub replacement: String,
}

/// Everything the downstream sink needs: the single best recipe, the whole
/// first Pareto front, and any substitution suggestions for the best recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub best: FormulationReport,
    pub front: Vec<FormulationReport>,
    pub substitutions: Vec<Substitution>,
}

/// Runs the full search for one variant and packages the result.
///
/// The final population is the reselected `mu + lambda` pool from the last
/// generation; the best answer is the lowest-density member of its first
/// front.
pub fn optimize(
    variant: &DoughVariantConfig,
    table: &PropertyTable,
    catalog: &SubstituteCatalog,
    params: &OptimizeParams,
) -> OptimizationOutcome {
    debug!(
        variant = variant.key(),
        pop_size = params.pop_size,
        ngen = params.ngen,
        "starting formulation search"
    );

    let evaluator = DoughEvaluator::new(table, variant);
    let mut engine = MuPlusLambda::new(
        variant.clone(),
        params.pop_size,
        params.cxpb,
        params.mutpb,
        params.seed,
    );
    engine.run(&evaluator, params.ngen);

    let front: Vec<FormulationReport> = nsga2::pareto_front(engine.population())
        .iter()
        .map(|individual| report_for(variant, individual))
        .collect();

    let best = front
        .iter()
        .min_by(|a, b| {
            a.fitness
                .density
                .partial_cmp(&b.fitness.density)
                .unwrap_or(Ordering::Equal)
        })
        .cloned()
        .expect("final population always yields a non-empty first front");

    let substitutions: Vec<Substitution> = best
        .proportions
        .keys()
        .filter_map(|name| {
            let replacement = catalog.suggest(table, name);
            if replacement != *name {
                info!(original = %name, %replacement, "substitution suggested");
                Some(Substitution {
                    original: name.clone(),
                    replacement,
                })
            } else {
                None
            }
        })
        .collect();

    info!(
        variant = variant.key(),
        front_size = front.len(),
        density = best.fitness.density,
        cost = best.fitness.cost,
        "formulation search finished"
    );

    OptimizationOutcome {
        best,
        front,
        substitutions,
    }
}

fn report_for(variant: &DoughVariantConfig, individual: &Formulation) -> FormulationReport {
    FormulationReport {
        proportions: variant
            .ingredients()
            .iter()
            .cloned()
            .zip(individual.proportions.iter().copied())
            .collect(),
        fitness: individual
            .fitness
            .expect("front members carry a fitness"),
    }
}
