use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dough_genetics::algorithms::mu_plus_lambda::MuPlusLambda;
use dough_genetics::{
    optimize, DoughEvaluator, DoughVariantConfig, OptimizeParams, PropertyTable,
    SubstituteCatalog,
};

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("mu_plus_lambda/step");
    let table = PropertyTable::builtin();

    for pop_size in [10, 30, 100].iter() {
        group.throughput(Throughput::Elements(*pop_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(pop_size),
            pop_size,
            |b, &size| {
                let variant = DoughVariantConfig::cauliflower();
                let evaluator = DoughEvaluator::new(&table, &variant);
                b.iter_batched(
                    || MuPlusLambda::new(variant.clone(), size, 0.7, 0.3, 42),
                    |mut engine| {
                        engine.step(&evaluator);
                        black_box(engine)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_full_search(c: &mut Criterion) {
    let table = PropertyTable::builtin();
    let catalog = SubstituteCatalog::builtin();
    let params = OptimizeParams {
        pop_size: 30,
        ngen: 20,
        seed: 42,
        ..OptimizeParams::default()
    };

    c.bench_function("optimize/c12_default", |b| {
        let variant = DoughVariantConfig::cauliflower();
        b.iter(|| black_box(optimize(&variant, &table, &catalog, &params)));
    });
}

criterion_group!(benches, bench_generation_step, bench_full_search);
criterion_main!(benches);
