//! Performance benchmarks for mood scoring, exercise matching, and store snapshots.
//!
//! Run with: cargo bench

use calmly::exercises::{default_catalog, recommend, Exercise};
use calmly::mood::score;
use calmly::store::{reduce, snapshot, Action, RecommendationState};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark keyword scoring at various analysis lengths.
fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    let filler = "The user talks about their week and plans for the weekend. ";
    let sizes = vec![("short", 1), ("paragraph", 10), ("long", 100)];

    for (name, repeats) in sizes {
        // Worst case: no rule matches, every pattern is scanned
        let text = filler.repeat(repeats);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| black_box(score(black_box(text))));
        });
    }

    group.finish();
}

fn catalog_of(size: usize) -> Vec<Exercise> {
    let defaults = default_catalog();
    (0..size)
        .map(|i| Exercise {
            id: format!("bench-{}", i),
            name: format!("Exercise {}", i),
            ..defaults[i % defaults.len()].clone()
        })
        .collect()
}

/// Benchmark mood-driven recommendation over growing catalogs.
fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [3usize, 50, 500] {
        let catalog = catalog_of(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| black_box(recommend(black_box(4.2), catalog)));
        });
    }

    group.finish();
}

/// Benchmark snapshot encoding and decoding of a populated store.
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let state = reduce(
        RecommendationState::default(),
        Action::SetRecommended(catalog_of(100)),
    );
    let encoded = snapshot::encode(&state).expect("encoding failed for benchmark");

    group.bench_function("encode", |b| {
        b.iter(|| black_box(snapshot::encode(black_box(&state))));
    });
    group.bench_function("decode", |b| {
        b.iter(|| black_box(snapshot::decode(black_box(&encoded))));
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_recommend, bench_snapshot);
criterion_main!(benches);
