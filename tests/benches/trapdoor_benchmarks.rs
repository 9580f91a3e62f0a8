//! # Trapdoor Sets Benchmarks
//!
//! | Area | Operation | Expected cost |
//! |------|-----------|---------------|
//! | Trapdoors | create | one keyed hash |
//! | Boolean sets | from_collection | k salted hashes per element |
//! | Boolean sets | contains | O(N) bitwise |
//! | Cardinality | adaptive estimate | O(N) |
//! | Similarity | MinHash signature | permutations x elements |
//! | Threshold | Shamir split / reconstruct | O(n * k * N) |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use trapdoor_sets::operations::{AdaptiveCardinality, CardinalityEstimator, MinHasher, ShamirScheme};
use trapdoor_sets::{BooleanSetFactory, Trapdoor, TrapdoorFactory};

// ============================================================================
// Trapdoor creation
// ============================================================================

fn bench_trapdoor_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("trapdoor-create");

    let t16 = TrapdoorFactory::<16>::new("bench");
    let t32 = TrapdoorFactory::<32>::new("bench");
    let t64 = TrapdoorFactory::<64>::new("bench");

    group.bench_function("create_128", |b| b.iter(|| black_box(t16.create("alice"))));
    group.bench_function("create_256", |b| b.iter(|| black_box(t32.create("alice"))));
    group.bench_function("create_512", |b| b.iter(|| black_box(t64.create("alice"))));

    group.finish();
}

// ============================================================================
// Boolean sets
// ============================================================================

fn bench_boolean_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean-set");
    let factory = BooleanSetFactory::<32>::new("bench");

    for size in [10usize, 50, 100] {
        let values: Vec<u64> = (0..size as u64).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("from_collection", size),
            &values,
            |b, values| b.iter(|| black_box(factory.from_collection(values))),
        );
    }

    let set = factory.from_collection(&[1u64, 2, 3, 4, 5]).unwrap();
    let probe = factory.trapdoor(&3u64).unwrap();
    group.bench_function("contains", |b| b.iter(|| black_box(set.contains(&probe))));

    let estimator = AdaptiveCardinality::default();
    group.bench_function("adaptive_cardinality", |b| {
        b.iter(|| black_box(estimator.estimate(&set)))
    });

    group.finish();
}

// ============================================================================
// Similarity and sharing
// ============================================================================

fn bench_minhash(c: &mut Criterion) {
    let mut group = c.benchmark_group("minhash");

    for permutations in [32usize, 128] {
        let minhash = MinHasher::<32>::new("bench").with_permutations(permutations).unwrap();
        let values: Vec<u32> = (0..20).collect();
        group.bench_with_input(
            BenchmarkId::new("signature", permutations),
            &values,
            |b, values| b.iter(|| black_box(minhash.generate_signature(values))),
        );
    }

    group.finish();
}

fn bench_shamir(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir");

    let factory = TrapdoorFactory::<32>::new("bench");
    let secret = factory.create("secret").unwrap();
    let scheme = ShamirScheme::<32>::new(3, 5).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let shares = scheme.split(&secret, &mut rng);

    group.bench_function("split_3_of_5", |b| {
        b.iter(|| black_box(scheme.split(&secret, &mut rng)))
    });
    group.bench_function("reconstruct_3_of_5", |b| {
        b.iter(|| {
            let rebuilt: Result<Trapdoor<str, 32>, _> =
                scheme.reconstruct(&shares[1..4], factory.key_fingerprint());
            black_box(rebuilt)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_trapdoor_create,
    bench_boolean_sets,
    bench_minhash,
    bench_shamir
);
criterion_main!(benches);
