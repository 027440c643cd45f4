//! Criterion benchmarks for resona-core filter primitives
//!
//! Run with: cargo bench -p resona-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use resona_core::{Biquad, Effect, SvfCoeffs, SvfState, design};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    let coeffs = design::lowpass(1000.0, 0.707, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.set_design(&coeffs);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_svf(c: &mut Criterion) {
    let mut group = c.benchmark_group("Svf");

    let coeffs = SvfCoeffs::from_biquad(&design::lowpass(1000.0, 0.707, SAMPLE_RATE));

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(BenchmarkId::new("tick", block_size), &block_size, |b, _| {
            let mut state = SvfState::new();
            b.iter(|| {
                for &sample in &input {
                    black_box(state.tick(&coeffs, black_box(sample)));
                }
            });
        });
    }

    group.finish();
}

fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("Design");

    group.bench_function("lowpass", |b| {
        b.iter(|| {
            black_box(design::lowpass(
                black_box(1000.0),
                black_box(0.707),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.bench_function("low_shelf", |b| {
        b.iter(|| {
            black_box(design::low_shelf(
                black_box(200.0),
                black_box(6.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.bench_function("biquad_to_svf", |b| {
        let coeffs = design::bell(1000.0, 1.0, 6.0, SAMPLE_RATE);
        b.iter(|| black_box(SvfCoeffs::from_biquad(black_box(&coeffs))));
    });

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_svf, bench_design);
criterion_main!(benches);
