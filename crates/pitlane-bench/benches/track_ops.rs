//! Criterion benchmarks for track profile queries.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pitlane_core::TrackConfig;
use pitlane_track::TrackProfile;

fn bench_load_stock(c: &mut Criterion) {
    let config = TrackConfig::default();

    c.bench_function("load_stock_track", |b| {
        b.iter(|| {
            let track = TrackProfile::load(black_box(&config)).unwrap();
            black_box(track);
        });
    });
}

fn bench_curvature_sweep(c: &mut Criterion) {
    let track = TrackProfile::load(&TrackConfig::default()).unwrap();
    let samples: Vec<f32> = (0..1000).map(|i| i as f32 * 4.6).collect();

    c.bench_function("curvature_1000_samples", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for &s in &samples {
                acc += track.curvature(black_box(s));
            }
            black_box(acc);
        });
    });
}

fn bench_wrapped_lookup(c: &mut Criterion) {
    let track = TrackProfile::load(&TrackConfig::default()).unwrap();

    c.bench_function("curvature_far_past_length", |b| {
        b.iter(|| {
            black_box(track.curvature(black_box(1.0e6)));
        });
    });
}

criterion_group!(
    benches,
    bench_load_stock,
    bench_curvature_sweep,
    bench_wrapped_lookup
);
criterion_main!(benches);
