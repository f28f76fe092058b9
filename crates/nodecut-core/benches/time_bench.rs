//! Benchmarks for nodecut-core time operations.
//!
//! Run with: cargo bench -p nodecut-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nodecut_core::{FrameRate, RationalTime, TimeRange};

fn bench_rational_time_arithmetic(c: &mut Criterion) {
    let a = RationalTime::new(1001, 30);
    let b = RationalTime::new(500, 24);

    c.bench_function("rational_time_add", |bencher| {
        bencher.iter(|| black_box(a) + black_box(b));
    });

    c.bench_function("rational_time_mul_i64", |bencher| {
        bencher.iter(|| black_box(a) * black_box(100));
    });
}

fn bench_frame_conversion(c: &mut Criterion) {
    let time = RationalTime::new(3600, 1); // 1 hour
    let rate = FrameRate::FPS_24;

    c.bench_function("to_frames_1hr", |bencher| {
        bencher.iter(|| black_box(time).to_frames(black_box(rate)));
    });

    c.bench_function("from_frames_86400", |bencher| {
        bencher.iter(|| RationalTime::from_frames(black_box(86400), black_box(rate)));
    });
}

fn bench_range_algebra(c: &mut Criterion) {
    let a = TimeRange::new(RationalTime::new(0, 1), RationalTime::new(1001, 24));
    let b = TimeRange::new(RationalTime::new(500, 24), RationalTime::new(2000, 24));

    c.bench_function("range_overlaps", |bencher| {
        bencher.iter(|| black_box(a).overlaps(black_box(b)));
    });

    c.bench_function("range_combine", |bencher| {
        bencher.iter(|| black_box(a).combine(black_box(b)));
    });
}

criterion_group!(
    benches,
    bench_rational_time_arithmetic,
    bench_frame_conversion,
    bench_range_algebra,
);
criterion_main!(benches);
