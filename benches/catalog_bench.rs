//! Benchmarks for individual content generators.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mock_synth::{GeneratorCatalog, GeneratorParams};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

const GENERATORS: &[&str] = &[
    "person.fullName",
    "internet.email",
    "string.uuid",
    "lorem.sentence",
    "number.int",
    "date.past",
    "location.streetAddress",
];

/// Benchmark single generator calls
fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    let catalog = GeneratorCatalog::global();
    let params = GeneratorParams::default();
    let calls = 1_000u64;
    group.throughput(Throughput::Elements(calls));

    for &name in GENERATORS {
        group.bench_with_input(BenchmarkId::new("call", name), &name, |b, &name| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                for _ in 0..calls {
                    black_box(catalog.generate(Some(name), &params, None, &mut rng));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark name lookup misses
fn bench_unknown_generator(c: &mut Criterion) {
    let catalog = GeneratorCatalog::global();
    let params = GeneratorParams::default();

    c.bench_function("generator_miss", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            black_box(catalog.generate(Some("bogus.unknown"), &params, None, &mut rng))
        })
    });
}

criterion_group!(benches, bench_generators, bench_unknown_generator);
criterion_main!(benches);
