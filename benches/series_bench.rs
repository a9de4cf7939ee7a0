//! Benchmarks for the series engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use perceived_load::query::{averages, load_averages};
use perceived_load::storage::*;
use std::sync::Arc;
use tempfile::tempdir;

/// A reading every `every_hours` hours, skipping one day in seven
fn create_test_series(count: usize, every_hours: i64) -> Series {
    let records = (0..count as i64)
        .map(|i| i * every_hours * MILLIS_PER_HOUR)
        .filter(|ts| (ts / MILLIS_PER_DAY) % 7 != 3)
        .map(|ts| Record::new(ts, (ts % 17) as f64 / 10.0))
        .collect();
    Series::from_records(Granularity::DAY, records).unwrap()
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for size in [100, 1000, 10000] {
        let series = create_test_series(size, 6);
        let middle = series.records()[series.len() / 2].timestamp;

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("since_{}", size), |b| {
            b.iter(|| series.since(black_box(middle)).len())
        });

        group.bench_function(format!("lookup_{}", size), |b| {
            b.iter(|| series.lookup(black_box(middle)).unwrap())
        });
    }

    group.bench_function("append_insert_1000", |b| {
        b.iter(|| {
            let mut series = Series::new();
            for i in 0..1000 {
                series.insert(black_box(i * MILLIS_PER_HOUR), 1.0).unwrap();
            }
            series
        })
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for size in [1000, 10000] {
        let raw = create_test_series(size, 6);

        group.bench_function(format!("resample_{}", size), |b| {
            b.iter_batched(
                || raw.clone(),
                |mut series| series.resample(Granularity::DAY),
                BatchSize::SmallInput,
            )
        });

        let mut daily = raw.clone();
        daily.resample(Granularity::DAY);

        group.bench_function(format!("interpolate_{}", size), |b| {
            b.iter_batched(
                || daily.clone(),
                |mut series| series.interpolate(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("io");

    let series = create_test_series(10000, 6);
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.csv");
    series.write(&path).unwrap();

    group.bench_function("write_10000", |b| {
        b.iter(|| series.write(black_box(&path)).unwrap())
    });

    group.bench_function("read_10000", |b| {
        b.iter(|| Series::open(black_box(&path)).unwrap())
    });

    group.finish();
}

fn bench_averages(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("averages");

    let mut daily = create_test_series(10000, 6);
    daily.resample(Granularity::DAY);
    daily.interpolate();
    let as_of = daily.last().map(|r| r.timestamp).unwrap_or_default();
    let daily = Arc::new(daily);

    group.bench_function("fan_out_3", |b| {
        b.iter(|| {
            rt.block_on(averages(Arc::clone(&daily), black_box(as_of), &[1, 5, 15]))
                .unwrap()
        })
    });

    let raw = create_test_series(10000, 6);
    group.bench_function("full_report_10000", |b| {
        b.iter_batched(
            || raw.clone(),
            |series| rt.block_on(load_averages(series, as_of, &[1, 5, 15])).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_store, bench_pipeline, bench_io, bench_averages);
criterion_main!(benches);
