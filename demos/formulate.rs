use dough_genetics::{optimize, DoughVariantConfig, OptimizeParams, PropertyTable, SubstituteCatalog};

fn main() {
    tracing_subscriber::fmt().compact().init();

    let table = PropertyTable::load("data/ingredients.json");
    let catalog = SubstituteCatalog::builtin();
    let params = OptimizeParams {
        seed: 42,
        ..OptimizeParams::default()
    };

    for variant in [DoughVariantConfig::cauliflower(), DoughVariantConfig::chickpea()] {
        let outcome = optimize(&variant, &table, &catalog, &params);

        println!("--- Optimized {} ({}) ---", variant.key(), variant.base());
        for (ingredient, proportion) in &outcome.best.proportions {
            println!("  {ingredient}: {:.2}%", proportion * 100.0);
        }
        println!(
            "  density {:.3} | cost {:.3} | elasticity {:.3}",
            outcome.best.fitness.density,
            outcome.best.fitness.cost,
            -outcome.best.fitness.neg_elasticity,
        );
        println!("  Pareto front: {} formulations", outcome.front.len());
        for suggestion in &outcome.substitutions {
            println!(
                "  consider swapping {} for {}",
                suggestion.original, suggestion.replacement
            );
        }
        println!();
    }
}
