//! Benchmark for preprocessing and fitting the shooting hand classifier
//!
//! Run with: cargo bench --bench training_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use rosterfit::pipeline::{
    fit_and_evaluate, train_test_split, ClassifierParams, FeatureScaler, HEIGHT_COLUMN,
    LABEL_COLUMN, NUMERIC_FEATURES, WEIGHT_COLUMN,
};

/// Generate a labeled roster-like table; taller, heavier players lean right-handed
fn generate_roster(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let heights: Vec<f64> = (0..n_rows).map(|_| 170.0 + rng.gen::<f64>() * 35.0).collect();
    let weights: Vec<f64> = heights
        .iter()
        .map(|h| (h - 100.0) + rng.gen::<f64>() * 20.0 - 10.0)
        .collect();
    let labels: Vec<bool> = heights
        .iter()
        .map(|h| rng.gen::<f64>() > (h - 170.0) / 70.0)
        .collect();

    df! {
        WEIGHT_COLUMN => weights,
        HEIGHT_COLUMN => heights,
        LABEL_COLUMN => labels,
    }
    .expect("Failed to create DataFrame")
}

fn split_xy(df: &DataFrame) -> (DataFrame, Series) {
    let y = df
        .column(LABEL_COLUMN)
        .unwrap()
        .as_materialized_series()
        .clone();
    (df.drop(LABEL_COLUMN).unwrap(), y)
}

/// Benchmark fit_and_evaluate for varying row counts
fn benchmark_fit_and_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_and_evaluate");
    group.sample_size(20);

    let row_counts = [1_000, 10_000, 50_000];
    let params = ClassifierParams::default();

    for n_rows in row_counts {
        let df = generate_roster(n_rows, 42);
        let split = train_test_split(&df, 0.3, 123).unwrap();
        let (x_train, y_train) = split_xy(split.train());
        let (x_test, y_test) = split_xy(split.test());
        let scaler = FeatureScaler::fit(&x_train, &NUMERIC_FEATURES).unwrap();

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(
            BenchmarkId::new("logistic", n_rows),
            &(&x_train, &y_train, &x_test, &y_test),
            |b, (x_train, y_train, x_test, y_test)| {
                b.iter(|| {
                    let _ = fit_and_evaluate(
                        black_box(*x_train),
                        black_box(*y_train),
                        black_box(*x_test),
                        black_box(*y_test),
                        scaler.clone(),
                        black_box(&params),
                    );
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the seeded split on its own
fn benchmark_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_test_split");

    for n_rows in [10_000, 100_000] {
        let df = generate_roster(n_rows, 7);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = train_test_split(black_box(df), 0.3, 123);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fit_and_evaluate, benchmark_split);
criterion_main!(benches);
