//! Multi-objective evolutionary search for gluten-free dough formulations.
//!
//! A candidate dough is a fixed-length vector of ingredient proportions that
//! always sums to one. The optimizer minimizes three objectives at once
//! (density, cost, negated elasticity) with NSGA-II selection inside a
//! (mu + lambda) generation loop, keeping every candidate feasible through a
//! domain repair operator instead of rejection.

/// A system that can score a candidate formulation.
///
/// The evaluator must be a pure function of the formulation: same vector in,
/// same fitness tuple out. All per-individual anomalies are expressed through
/// the returned tuple (see [`Fitness::PENALTY`]), never through errors.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, formulation: &Formulation) -> Fitness;
}

pub mod algorithms {
    pub mod mu_plus_lambda;
    pub mod nsga2;
}
pub mod evaluator;
pub mod formulation;
pub mod optimizer;
pub mod properties;
pub mod substitution;
pub mod variant;

pub use evaluator::DoughEvaluator;
pub use formulation::{Fitness, Formulation};
pub use optimizer::{
    optimize, FormulationReport, OptimizationOutcome, OptimizeParams, Substitution,
};
pub use properties::{IngredientProperties, NutrientRecord, PropertyTable};
pub use substitution::SubstituteCatalog;
pub use variant::{DoughVariantConfig, IngredientRole, VariantError};
