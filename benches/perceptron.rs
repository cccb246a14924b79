//! Benchmarks for sketching and perceptron training.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sketchtron::prelude::*;

/// Two labels separated along the first feature.
fn blobs(n: usize, n_features: usize) -> Dataset {
    let mut data = Vec::with_capacity(n * n_features);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let label = i % 2;
        let sign = if label == 0 { 1.0 } else { -1.0 };
        for j in 0..n_features {
            let wobble = ((i * 31 + j * 17) % 13) as f32 / 13.0 - 0.5;
            let base = if j == 0 { sign * 2.0 } else { 0.0 };
            data.push(base + wobble);
        }
        y.push(label);
    }
    Dataset::new(Matrix::from_vec(n, n_features, data).expect("valid shape"), y).expect("valid labels")
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("stratified_compress");
    let data = blobs(1_000, 16);

    for target in [20, 100, 200].iter() {
        let compressor = StratifiedCompressor::new(LabelSet::range(2).expect("labels"), KMeans::new());
        group.bench_with_input(BenchmarkId::from_parameter(target), target, |b, &target| {
            b.iter(|| compressor.compress(black_box(&data), target).expect("compression"));
        });
    }

    group.finish();
}

fn bench_perceptron_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("perceptron_fit");

    for size in [100, 500, 1_000].iter() {
        let data = blobs(*size, 16);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model =
                    Perceptron::new(LabelSet::range(2).expect("labels"), EpochLimit::Bounded(10));
                model
                    .fit(black_box(data.features()), black_box(data.labels()))
                    .expect("fit");
            });
        });
    }

    group.finish();
}

fn bench_kernel_perceptron_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_perceptron_fit");

    for degree in [1u32, 3, 6].iter() {
        let data = blobs(200, 16);
        group.bench_with_input(BenchmarkId::from_parameter(degree), degree, |b, &degree| {
            b.iter(|| {
                let kernel = Polynomial::new(degree).expect("degree >= 1");
                let mut model =
                    KernelPerceptron::new(kernel, LabelSet::range(2).expect("labels"), EpochLimit::Bounded(5));
                model
                    .fit(black_box(data.features()), black_box(data.labels()))
                    .expect("fit");
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compress,
    bench_perceptron_fit,
    bench_kernel_perceptron_fit
);
criterion_main!(benches);
