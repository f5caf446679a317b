use criterion::{criterion_group, criterion_main, Criterion};
use pipeline_uq::lhs::{latin_hypercube, optimized_latin_hypercube};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn bench_lhs(c: &mut Criterion) {
    c.bench_function("lhs_plain_200x8", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(latin_hypercube(200, 8, &mut rng)))
    });
    c.bench_function("lhs_random_cd_100x8", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(optimized_latin_hypercube(100, 8, &mut rng)))
    });
}

criterion_group!(benches, bench_lhs);
criterion_main!(benches);
