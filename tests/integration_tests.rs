use approx::assert_relative_eq;
use dough_genetics::algorithms::mu_plus_lambda::MuPlusLambda;
use dough_genetics::{
    optimize, DoughEvaluator, DoughVariantConfig, Evaluator, Fitness, Formulation,
    NutrientRecord, OptimizeParams, PropertyTable, SubstituteCatalog,
};

// --- Mock Infrastructure ---

/// Cheap synthetic objectives: no domain data needed, still produces a
/// genuine trade-off for the selector to chew on.
struct MockEval;

impl Evaluator for MockEval {
    fn evaluate(&self, formulation: &Formulation) -> Fitness {
        let first = formulation.proportions.first().copied().unwrap_or(0.0);
        let spread = formulation
            .proportions
            .iter()
            .map(|p| (p - first).abs())
            .sum::<f64>();
        Fitness {
            density: first,
            cost: 1.0 - first,
            neg_elasticity: -spread,
        }
    }
}

#[test]
fn first_step_grows_the_population_to_mu_plus_lambda() {
    let variant = DoughVariantConfig::cauliflower();
    let mut engine = MuPlusLambda::new(variant, 10, 0.7, 0.3, 42);
    assert_eq!(engine.population().len(), 10);
    assert_eq!(engine.generation(), 0);

    engine.step(&MockEval);
    assert_eq!(engine.population().len(), engine.mu() + engine.lambda());
    assert_eq!(engine.generation(), 1);

    engine.step(&MockEval);
    assert_eq!(engine.population().len(), 20);
}

#[test]
fn every_survivor_is_evaluated_and_feasible() {
    let variant = DoughVariantConfig::chickpea();
    let mut engine = MuPlusLambda::new(variant, 8, 0.7, 0.3, 9);
    engine.run(&MockEval, 3);

    for individual in engine.population() {
        assert!(individual.fitness.is_some());
        let total: f64 = individual.proportions.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-6);
        for &proportion in &individual.proportions {
            assert!((0.0..=1.0).contains(&proportion));
        }
    }
}

#[test]
fn end_to_end_search_on_a_three_ingredient_dough() {
    let variant = DoughVariantConfig::new("T3", "cauliflower", &["rice_flour"]);
    let table = PropertyTable::builtin();
    let params = OptimizeParams {
        pop_size: 10,
        ngen: 5,
        seed: 42,
        ..OptimizeParams::default()
    };
    let outcome = optimize(&variant, &table, &SubstituteCatalog::builtin(), &params);

    let total: f64 = outcome.best.proportions.values().sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-6);

    assert!(outcome.best.fitness.density.is_finite());
    assert!(outcome.best.fitness.density >= 0.0);
    assert!(outcome.best.fitness.cost.is_finite());
    assert!(outcome.best.fitness.cost >= 0.0);
}

#[test]
fn both_built_in_variants_produce_consistent_fronts() {
    let table = PropertyTable::builtin();
    let catalog = SubstituteCatalog::builtin();
    let params = OptimizeParams {
        pop_size: 20,
        ngen: 10,
        seed: 7,
        ..OptimizeParams::default()
    };

    for variant in [DoughVariantConfig::cauliflower(), DoughVariantConfig::chickpea()] {
        let outcome = optimize(&variant, &table, &catalog, &params);

        assert!(!outcome.front.is_empty());
        assert!(outcome.front.contains(&outcome.best));

        for report in &outcome.front {
            let total: f64 = report.proportions.values().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-6);
            for value in report.fitness.values() {
                assert!(value.is_finite());
            }
        }

        // Front members must be mutually non-dominated.
        for a in &outcome.front {
            for b in &outcome.front {
                assert!(!a.fitness.dominates(&b.fitness) || a == b);
            }
        }
    }
}

#[test]
fn identical_seeds_reproduce_the_outcome_exactly() {
    let variant = DoughVariantConfig::cauliflower();
    let table = PropertyTable::builtin();
    let catalog = SubstituteCatalog::builtin();
    let params = OptimizeParams {
        pop_size: 12,
        ngen: 6,
        seed: 1234,
        ..OptimizeParams::default()
    };

    let first = optimize(&variant, &table, &catalog, &params);
    let second = optimize(&variant, &table, &catalog, &params);
    assert_eq!(first, second);
}

#[test]
fn a_snapshotted_engine_resumes_identically() {
    let variant = DoughVariantConfig::cauliflower();
    let table = PropertyTable::builtin();
    let evaluator = DoughEvaluator::new(&table, &variant);

    let mut live = MuPlusLambda::new(variant, 10, 0.7, 0.3, 99);
    live.run(&evaluator, 3);

    let snapshot = serde_json::to_string(&live).unwrap();
    let mut restored: MuPlusLambda = serde_json::from_str(&snapshot).unwrap();

    live.step(&evaluator);
    restored.step(&evaluator);
    assert_eq!(live.population(), restored.population());
}

#[test]
fn substitution_picks_the_nearest_neighbor() {
    let table = PropertyTable::from_records([
        (
            "glue_flour".to_string(),
            NutrientRecord {
                density: Some(0.55),
                elasticity: Some(0.5),
                ..NutrientRecord::default()
            },
        ),
        (
            "cand_a".to_string(),
            NutrientRecord {
                density: Some(0.5),
                elasticity: Some(0.5),
                ..NutrientRecord::default()
            },
        ),
        (
            "cand_b".to_string(),
            NutrientRecord {
                density: Some(0.9),
                elasticity: Some(0.9),
                ..NutrientRecord::default()
            },
        ),
    ]);
    let mut catalog = SubstituteCatalog::new();
    catalog.register("glue_flour", &["cand_a", "cand_b"]);

    assert_eq!(catalog.suggest(&table, "glue_flour"), "cand_a");
    // Nothing registered: the ingredient passes through unchanged.
    assert_eq!(catalog.suggest(&table, "water"), "water");
}

#[test]
fn default_catalog_ties_keep_the_first_candidate() {
    // Both stock substitutes for chickpea flour resolve to pure defaults in
    // the builtin table, so their distances tie.
    let table = PropertyTable::builtin();
    let catalog = SubstituteCatalog::builtin();
    assert_eq!(catalog.suggest(&table, "chickpea_flour"), "almond_flour");
}
