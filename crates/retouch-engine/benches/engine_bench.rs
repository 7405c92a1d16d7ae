// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the retouch-engine hot paths: bilinear resize,
// Sobel edge detection, and the full tonal adjustment chain, each on a
// synthetic 512x512 image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use retouch_core::AdjustmentParameters;
use retouch_engine::{Channels, PixelBuffer, apply_adjustments, resize, sobel_magnitude};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A 512x512 image with smooth ramps in each channel and a bright square in
/// the middle, so resize and Sobel both see real structure.
fn synthetic(channels: Channels) -> PixelBuffer {
    PixelBuffer::from_fn(512, 512, channels, |x, y, c| {
        if (192..320).contains(&x) && (192..320).contains(&y) {
            240
        } else {
            ((x / 2 + y / 3 + c as u32 * 50) % 200) as u8
        }
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_resize(c: &mut Criterion) {
    let rgb = synthetic(Channels::Rgb);

    c.bench_function("resize 512x512 -> 1024x768 (rgb)", |b| {
        b.iter(|| black_box(resize(black_box(rgb.clone()), 1024, 768).unwrap()));
    });

    c.bench_function("resize 512x512 -> 128x128 (rgb)", |b| {
        b.iter(|| black_box(resize(black_box(rgb.clone()), 128, 128).unwrap()));
    });
}

fn bench_sobel(c: &mut Criterion) {
    let luma = synthetic(Channels::Luma);

    c.bench_function("sobel_magnitude 512x512", |b| {
        b.iter(|| black_box(sobel_magnitude(black_box(&luma)).unwrap()));
    });
}

fn bench_adjustments(c: &mut Criterion) {
    let rgb = synthetic(Channels::Rgb);
    let params = AdjustmentParameters {
        brightness: 12.0,
        contrast: 1.2,
        gamma: 0.8,
        saturation: 1.4,
    };

    c.bench_function("apply_adjustments 512x512 (all steps)", |b| {
        b.iter(|| black_box(apply_adjustments(black_box(rgb.clone()), &params).unwrap()));
    });
}

criterion_group!(benches, bench_resize, bench_sobel, bench_adjustments);
criterion_main!(benches);
