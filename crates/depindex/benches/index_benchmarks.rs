//! Benchmarks for the version codec and the overlap filter: the two
//! pieces that run once per scanned candidate and so dominate query
//! latency over a large corpus.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use depindex_core::{pack, VersionTriple};
use depindex_range::comparator::parse_range;
use depindex_range::{encode_range, normalize_query, overlap};

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    let v = VersionTriple::new(12, 345, 6789);

    group.bench_function("triple", |b| b.iter(|| pack(black_box(v))));

    group.finish();
}

fn bench_parse_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_range");

    group.bench_function("caret", |b| b.iter(|| parse_range(black_box("^1.2.3"))));
    group.bench_function("hyphen", |b| {
        b.iter(|| parse_range(black_box("1.2.3 - 2.3.4")))
    });
    group.bench_function("disjunction", |b| {
        b.iter(|| parse_range(black_box("1.0.0 || 2.0.0 || ^3.0.0")))
    });

    group.finish();
}

fn bench_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap");

    let query = normalize_query(&parse_range("1.5.0").unwrap()).unwrap();
    let stored = encode_range(&parse_range("^1.2.0").unwrap());
    let stored_disjunctive =
        encode_range(&parse_range("1.0.0 || 2.0.0 || 3.0.0 || 4.0.0 || 5.0.0").unwrap());

    group.bench_function("single_group", |b| {
        b.iter(|| overlap(black_box(&query), black_box(&stored)))
    });
    group.bench_function("five_group_disjunction", |b| {
        b.iter(|| overlap(black_box(&query), black_box(&stored_disjunctive)))
    });

    group.finish();
}

criterion_group!(benches, bench_pack, bench_parse_range, bench_overlap);
criterion_main!(benches);
