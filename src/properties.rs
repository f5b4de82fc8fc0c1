//! Ingredient property lookup.
//!
//! Properties come from an external JSON source keyed by lowercase ingredient
//! name. When the source is missing or unreadable the table degrades to an
//! embedded fallback instead of failing: a search over simulated data is more
//! useful than no search at all. The table is read-only once constructed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Canonical key form: lowercase, surrounding whitespace stripped.
pub(crate) fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Raw per-100g record as found in the property source.
///
/// Nutrient fields default to zero when absent; the physical fields stay
/// unset and are resolved at lookup time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientRecord {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub elasticity: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl NutrientRecord {
    /// Resolves the fields the optimizer reads, applying defaults: density
    /// 0.5, unit cost 0.1, and elasticity estimated from the macronutrients
    /// as `min(1.0, 0.01 carbs + 0.02 protein + 0.005 fat)` when not
    /// measured directly.
    pub fn resolve(&self) -> IngredientProperties {
        let elasticity = self.elasticity.unwrap_or_else(|| {
            (0.01 * self.carbs + 0.02 * self.protein + 0.005 * self.fat).min(1.0)
        });
        IngredientProperties {
            density: self.density.unwrap_or(0.5),
            elasticity,
            sodium: self.sodium,
            protein: self.protein,
            cost: self.cost.unwrap_or(0.1),
        }
    }
}

/// The attributes the fitness evaluator consumes, fully defaulted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientProperties {
    pub density: f64,
    pub elasticity: f64,
    pub sodium: f64,
    pub protein: f64,
    pub cost: f64,
}

/// Immutable name -> record table with case-insensitive keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyTable {
    records: BTreeMap<String, NutrientRecord>,
}

impl PropertyTable {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, NutrientRecord)>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(name, record)| (normalize_key(&name), record))
                .collect(),
        }
    }

    /// Parses a JSON object mapping ingredient names to records.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let records: BTreeMap<String, NutrientRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Loads the table from `path`, degrading to [`PropertyTable::builtin`]
    /// when the file is missing or unparseable. Never an error condition.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "property source unavailable, using the embedded table");
                return Self::builtin();
            }
        };
        match Self::from_json_str(&text) {
            Ok(table) => {
                info!(path = %path.display(), count = table.len(), "ingredient properties loaded");
                table
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "property source unreadable, using the embedded table");
                Self::builtin()
            }
        }
    }

    /// Embedded fallback covering the stock gluten-free pantry.
    pub fn builtin() -> Self {
        let nutrient = |calories, protein, carbs, fat, fiber, sodium, cost| NutrientRecord {
            calories,
            protein,
            carbs,
            fat,
            fiber,
            sodium,
            density: None,
            elasticity: None,
            cost: Some(cost),
        };
        // Substitute candidates carry a unit cost only; their physical
        // attributes fall back to the lookup defaults.
        let cost_only = |cost| NutrientRecord {
            cost: Some(cost),
            ..NutrientRecord::default()
        };
        Self::from_records([
            ("water".into(), nutrient(42.0, 0.0, 10.8, 0.0, 0.0, 8.0, 0.01)),
            ("cauliflower".into(), nutrient(30.0, 2.4, 5.0, 0.4, 2.0, 15.0, 0.25)),
            ("chickpea_flour".into(), nutrient(400.0, 16.67, 70.0, 5.0, 16.7, 0.0, 0.30)),
            ("rice_flour".into(), nutrient(375.0, 7.5, 82.5, 0.0, 0.0, 0.0, 0.20)),
            ("potato_flour".into(), nutrient(333.0, 0.0, 83.3, 0.0, 0.0, 0.0, 0.15)),
            ("corn starch".into(), nutrient(350.0, 0.0, 90.0, 0.0, 0.0, 0.0, 0.10)),
            ("xanthan gum".into(), nutrient(625.0, 0.0, 125.0, 0.0, 0.0, 3125.0, 0.80)),
            ("olive_oil".into(), nutrient(900.0, 0.0, 0.0, 100.0, 0.0, 2.0, 0.50)),
            ("sugar".into(), nutrient(375.0, 0.0, 100.0, 0.0, 0.0, 0.0, 0.05)),
            ("salt".into(), nutrient(0.0, 0.0, 0.0, 0.0, 0.0, 39300.0, 0.03)),
            ("vinegar".into(), nutrient(20.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.07)),
            ("almond_flour".into(), cost_only(0.35)),
            ("coconut_flour".into(), cost_only(0.40)),
        ])
    }

    /// Resolved properties for `name`. Unknown ingredients get the full set
    /// of defaults rather than an error.
    pub fn lookup(&self, name: &str) -> IngredientProperties {
        match self.records.get(&normalize_key(name)) {
            Some(record) => record.resolve(),
            None => NutrientRecord::default().resolve(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NutrientRecord> {
        self.records.get(&normalize_key(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
