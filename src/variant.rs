//! Dough-base variant configuration.
//!
//! A variant fixes the ordered ingredient list a formulation vector aligns
//! with, and assigns each position a role that drives the repair bands and
//! the initial sampling ranges. Configs are immutable once built and are
//! threaded explicitly through the optimizer; there is no ambient registry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WATER: &str = "water";
const CORN_STARCH: &str = "corn starch";
const XANTHAN_GUM: &str = "xanthan gum";
const VINEGAR: &str = "vinegar";

const ADJUSTABLE: [&str; 8] = [
    "rice_flour",
    "potato_flour",
    CORN_STARCH,
    "olive_oil",
    XANTHAN_GUM,
    "sugar",
    "salt",
    VINEGAR,
];

#[derive(Debug, Error)]
pub enum VariantError {
    #[error("unknown dough variant key: {0}")]
    UnknownKey(String),
}

/// What a position in the formulation vector is for. Roles other than
/// `Free` carry mandatory minimums or bands enforced by repair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientRole {
    Water,
    Base,
    StarchBinder,
    GumBinder,
    Acid,
    Free,
}

/// One formulation family: a mandatory base ingredient plus its adjustable
/// companions, with water always in front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoughVariantConfig {
    key: String,
    base: String,
    ingredients: Vec<String>,
    roles: Vec<IngredientRole>,
}

impl DoughVariantConfig {
    /// Builds a variant with the stock role names (corn starch as the starch
    /// binder, xanthan gum as the gum binder, vinegar as the acid).
    pub fn new(key: impl Into<String>, base: impl Into<String>, adjustable: &[&str]) -> Self {
        Self::with_roles(key, base, adjustable, CORN_STARCH, XANTHAN_GUM, VINEGAR)
    }

    pub fn with_roles(
        key: impl Into<String>,
        base: impl Into<String>,
        adjustable: &[&str],
        starch_binder: &str,
        gum_binder: &str,
        acid: &str,
    ) -> Self {
        let base = base.into();
        let mut ingredients = vec![WATER.to_string(), base.clone()];
        ingredients.extend(adjustable.iter().map(|name| name.to_string()));
        let roles = ingredients
            .iter()
            .map(|name| classify(name, &base, starch_binder, gum_binder, acid))
            .collect();
        Self {
            key: key.into(),
            base,
            ingredients,
            roles,
        }
    }

    /// Cauliflower-based dough, product key `C12`.
    pub fn cauliflower() -> Self {
        Self::new("C12", "cauliflower", &ADJUSTABLE)
    }

    /// Chickpea-flour-based dough, product key `G12`.
    pub fn chickpea() -> Self {
        Self::new("G12", "chickpea_flour", &ADJUSTABLE)
    }

    /// Resolves a product key to its built-in variant. An unrecognized key
    /// is a configuration error, not a degraded mode.
    pub fn from_key(key: &str) -> Result<Self, VariantError> {
        match key {
            "C12" => Ok(Self::cauliflower()),
            "G12" => Ok(Self::chickpea()),
            other => Err(VariantError::UnknownKey(other.to_string())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The ordered ingredient list. Position `i` here is position `i` in
    /// every formulation vector for this variant.
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Roles aligned one-to-one with [`DoughVariantConfig::ingredients`].
    pub fn roles(&self) -> &[IngredientRole] {
        &self.roles
    }
}

fn classify(
    name: &str,
    base: &str,
    starch_binder: &str,
    gum_binder: &str,
    acid: &str,
) -> IngredientRole {
    if name == base {
        IngredientRole::Base
    } else if name == WATER {
        IngredientRole::Water
    } else if name == starch_binder {
        IngredientRole::StarchBinder
    } else if name == gum_binder {
        IngredientRole::GumBinder
    } else if name == acid {
        IngredientRole::Acid
    } else {
        IngredientRole::Free
    }
}
