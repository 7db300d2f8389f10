use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use loan_allocator::allocation::observer::NullObserver;
use loan_allocator::allocation::policy::Allocator;
use loan_allocator::core::dataset::Dataset;
use loan_allocator::simulation::generator::{generate_dataset, generate_tables, GeneratorConfig};

fn dataset(facilities: usize, loans: usize) -> Dataset {
    let config = GeneratorConfig {
        bank_count: (facilities / 4).max(1),
        facility_count: facilities,
        covenant_count: facilities * 2,
        loan_count: loans,
        ..Default::default()
    };
    generate_dataset(&config).expect("generated dataset normalizes")
}

fn bench_allocate(c: &mut Criterion, name: &str, facilities: usize, loans: usize) {
    let base = dataset(facilities, loans);
    c.bench_function(name, |b| {
        b.iter_batched(
            || base.clone(),
            |mut ds| Allocator::allocate(black_box(&mut ds), &mut NullObserver),
            BatchSize::LargeInput,
        )
    });
}

fn bench_allocate_10_facilities(c: &mut Criterion) {
    bench_allocate(c, "allocate_10_facilities_1k_loans", 10, 1_000);
}

fn bench_allocate_100_facilities(c: &mut Criterion) {
    bench_allocate(c, "allocate_100_facilities_10k_loans", 100, 10_000);
}

fn bench_normalize(c: &mut Criterion) {
    let tables = generate_tables(&GeneratorConfig {
        bank_count: 25,
        facility_count: 100,
        covenant_count: 400,
        loan_count: 10_000,
        ..Default::default()
    });
    c.bench_function("normalize_10k_loans", |b| {
        b.iter(|| Dataset::from_records(black_box(&tables)))
    });
}

criterion_group!(
    benches,
    bench_allocate_10_facilities,
    bench_allocate_100_facilities,
    bench_normalize
);
criterion_main!(benches);
