//! Benchmarks for the subsetting primitives.
//!
//! Run with: cargo bench --package coverage-subset

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::Rng;

use coverage_subset::{index_of_nearest, mask_by_polygon, null_arg_min, null_min_max, Polygon};
use test_utils::{grid_coverage, regular_axis, sequential_grid, with_missing_every};

fn bench_axis_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis_search");
    let mut rng = rand::thread_rng();

    let ascending = regular_axis(-180.0, 0.25, 1440);
    let descending = regular_axis(90.0, -0.25, 721);
    let queries: Vec<f64> = (0..1000).map(|_| rng.gen_range(-200.0..200.0)).collect();

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("ascending_1440", |b| {
        b.iter(|| {
            for &q in &queries {
                let _ = index_of_nearest(black_box(&ascending), black_box(q));
            }
        })
    });
    group.bench_function("descending_721", |b| {
        b.iter(|| {
            for &q in &queries {
                let _ = index_of_nearest(black_box(&descending), black_box(q));
            }
        })
    });

    group.finish();
}

fn bench_null_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("null_reduce");

    let dense = sequential_grid(1440, 721);
    let sparse = with_missing_every(sequential_grid(1440, 721), 2);

    group.throughput(Throughput::Elements(dense.len() as u64));
    group.bench_function("arg_min_dense", |b| b.iter(|| null_arg_min(black_box(&dense))));
    group.bench_function("arg_min_sparse", |b| b.iter(|| null_arg_min(black_box(&sparse))));
    group.bench_function("min_max_sparse", |b| b.iter(|| null_min_max(black_box(&sparse))));

    group.finish();
}

fn bench_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_by_polygon");

    let coverage = grid_coverage(360, 180);
    let polygon = Polygon::from_ring(vec![
        (20.0, 20.0),
        (200.0, 40.0),
        (300.0, 150.0),
        (100.0, 170.0),
        (40.0, 90.0),
    ]);

    group.bench_function("grid_360x180", |b| {
        b.iter(|| mask_by_polygon(black_box(&coverage), black_box(&polygon)))
    });

    group.finish();
}

criterion_group!(benches, bench_axis_search, bench_null_reduce, bench_mask);
criterion_main!(benches);
