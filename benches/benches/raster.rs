// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Circle, Shape};
use rasterline_geometry::{ConvCurve, PathStorage};
use rasterline_raster::{CompOp, Rasterizer, RenderingBuffer, Rgba8, render_scanlines};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// A star-ish polygon with `n` random vertices inside a `size` box.
fn random_polygon(n: usize, size: f64, seed: u64) -> PathStorage {
    let mut rng = Lcg::new(seed);
    let mut path = PathStorage::with_capacity(n + 1);
    path.move_to((rng.next_f64() * size, rng.next_f64() * size));
    for _ in 1..n {
        path.line_to((rng.next_f64() * size, rng.next_f64() * size));
    }
    path.close_polygon();
    path
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterline_raster/rasterize");
    group.sample_size(50);

    for &(n, size) in &[(16_usize, 256.0_f64), (256, 256.0), (256, 1024.0)] {
        let mut path = random_polygon(n, size, 0x5eed);
        let dim = size as u32;
        group.bench_function(format!("polygon_{n}_in_{dim}"), |b| {
            b.iter(|| {
                let mut ras = Rasterizer::with_size(dim, dim);
                ras.add_path(&mut path, 0);
                black_box(ras.sweep())
            });
        });
    }

    let mut circle = PathStorage::from_bez_path(&Circle::new((128.0, 128.0), 100.0).to_path(0.1));
    group.bench_function("circle_r100_flattened", |b| {
        b.iter(|| {
            let mut ras = Rasterizer::with_size(256, 256);
            ras.add_path(&mut ConvCurve::new(&mut circle), 0);
            black_box(ras.sweep())
        });
    });
    group.finish();
}

fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterline_raster/blend");
    group.sample_size(50);

    let mut circle = PathStorage::from_bez_path(&Circle::new((128.0, 128.0), 100.0).to_path(0.1));
    let mut ras = Rasterizer::with_size(256, 256);
    ras.add_path(&mut ConvCurve::new(&mut circle), 0);
    let scanlines = ras.sweep();
    let color = Rgba8::new(200, 40, 40, 180);

    for op in [CompOp::Src, CompOp::SrcOver, CompOp::Multiply, CompOp::SoftLight] {
        group.bench_function(op.name(), |b| {
            b.iter_batched(
                || RenderingBuffer::with_background(256, 256, Rgba8::WHITE).unwrap(),
                |mut buffer| {
                    render_scanlines(&mut buffer, &scanlines, color, op);
                    buffer
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rasterize, bench_blend);
criterion_main!(benches);
