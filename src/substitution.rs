//! Ingredient substitution advisor.
//!
//! For ingredients with a registered candidate set, picks the candidate
//! closest to the original in (density, elasticity) space under L1 distance.
//! Everything else passes through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::properties::{normalize_key, PropertyTable};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstituteCatalog {
    candidates: BTreeMap<String, Vec<String>>,
}

impl SubstituteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock candidate sets for the built-in pantry.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(
            "chickpea_flour",
            &["almond_flour", "coconut_flour"],
        );
        catalog.register("rice_flour", &["corn starch", "potato_flour"]);
        catalog
    }

    pub fn register(&mut self, ingredient: &str, candidates: &[&str]) {
        self.candidates.insert(
            normalize_key(ingredient),
            candidates.iter().map(|name| name.to_string()).collect(),
        );
    }

    /// The registered candidate minimizing
    /// `|density(orig) - density(cand)| + |elasticity(orig) - elasticity(cand)|`,
    /// or `ingredient` itself when nothing is registered for it. Ties keep
    /// the earliest candidate.
    pub fn suggest(&self, table: &PropertyTable, ingredient: &str) -> String {
        let key = normalize_key(ingredient);
        let Some(candidates) = self.candidates.get(&key) else {
            return ingredient.to_string();
        };

        let origin = table.lookup(&key);
        let mut best: Option<&String> = None;
        let mut best_distance = f64::INFINITY;
        for candidate in candidates {
            let props = table.lookup(candidate);
            let distance = (origin.density - props.density).abs()
                + (origin.elasticity - props.elasticity).abs();
            if distance < best_distance {
                best_distance = distance;
                best = Some(candidate);
            }
        }
        best.cloned().unwrap_or_else(|| ingredient.to_string())
    }
}
