//! Three-objective fitness evaluation.

use crate::formulation::{Fitness, Formulation};
use crate::properties::{IngredientProperties, PropertyTable};
use crate::variant::{DoughVariantConfig, IngredientRole};
use crate::Evaluator;

const SODIUM_LIMIT: f64 = 400.0;
const SODIUM_DENSITY_PENALTY: f64 = 200.0;
const PROTEIN_FLOOR: f64 = 6.0;
const PROTEIN_ELASTICITY_PENALTY: f64 = 200.0;
const ACID_THRESHOLD: f64 = 0.01;
const ACID_ELASTICITY_BONUS: f64 = 0.05;

/// Scores a formulation against one variant's ingredient list.
///
/// Properties are resolved once at construction; evaluation itself is pure
/// float accumulation over the proportion vector. Property values must be
/// finite, there is no NaN handling here.
pub struct DoughEvaluator {
    properties: Vec<IngredientProperties>,
    roles: Vec<IngredientRole>,
}

impl DoughEvaluator {
    pub fn new(table: &PropertyTable, variant: &DoughVariantConfig) -> Self {
        Self {
            properties: variant
                .ingredients()
                .iter()
                .map(|name| table.lookup(name))
                .collect(),
            roles: variant.roles().to_vec(),
        }
    }
}

impl Evaluator for DoughEvaluator {
    fn evaluate(&self, formulation: &Formulation) -> Fitness {
        assert_eq!(
            formulation.proportions.len(),
            self.properties.len(),
            "formulation is misaligned with the variant's ingredient list"
        );

        let mut density = 0.0;
        let mut elasticity = 0.0;
        let mut sodium = 0.0;
        let mut protein = 0.0;
        let mut cost = 0.0;
        let mut base_share = 0.0;
        let mut acid_share = 0.0;

        for ((props, role), &share) in self
            .properties
            .iter()
            .zip(&self.roles)
            .zip(&formulation.proportions)
        {
            density += share * props.density;
            elasticity += share * props.elasticity;
            sodium += share * props.sodium;
            protein += share * props.protein;
            cost += share * props.cost;
            match role {
                IngredientRole::Base => base_share = share,
                IngredientRole::Acid => acid_share += share,
                _ => {}
            }
        }

        // Repair forces the base ingredient above zero; this is the
        // defensive guard for vectors that bypassed it.
        if base_share <= 0.0 {
            return Fitness::PENALTY;
        }

        if sodium > SODIUM_LIMIT {
            density += SODIUM_DENSITY_PENALTY;
        }
        if protein < PROTEIN_FLOOR {
            elasticity -= PROTEIN_ELASTICITY_PENALTY;
        }
        if acid_share > ACID_THRESHOLD {
            elasticity += ACID_ELASTICITY_BONUS;
        }

        Fitness {
            density,
            cost,
            neg_elasticity: -elasticity,
        }
    }
}
