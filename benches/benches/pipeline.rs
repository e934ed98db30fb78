// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use kurbo::{Cap, Join};
use rasterline::{
    DrawTarget, LineStyle, MarkerShape, Pipeline, PipelineConfig, PointStyle, PolyStyle,
    RenderingBuffer, Rgba8,
};
use rasterline_geometry::PathStorage;

fn zigzag(points: usize, step: f64) -> PathStorage {
    let mut path = PathStorage::with_capacity(points);
    path.move_to((8.0, 8.0));
    for i in 1..points {
        let y = if i % 2 == 0 { 8.0 } else { 200.0 };
        path.line_to((8.0 + i as f64 * step, y));
    }
    path
}

fn bench_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterline/draw");
    group.sample_size(30);
    let config = PipelineConfig::default();
    let fresh = || RenderingBuffer::with_background(512, 256, Rgba8::WHITE).unwrap();

    let mut line = zigzag(64, 7.5);
    for (name, style) in [
        ("line_miter", LineStyle::new(Rgba8::BLACK, 3.0)),
        (
            "line_round",
            LineStyle::new(Rgba8::BLACK, 3.0)
                .with_join(Join::Round)
                .with_cap(Cap::Round),
        ),
        (
            "line_dashed",
            LineStyle::new(Rgba8::BLACK, 3.0).with_dash(&[(6.0, 3.0), (1.0, 3.0)]),
        ),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                fresh,
                |mut buffer| {
                    let mut pipeline = Pipeline::new(config);
                    pipeline
                        .draw_line(DrawTarget::Buffer(&mut buffer), &mut line, 0, &style)
                        .unwrap();
                    buffer
                },
                BatchSize::LargeInput,
            );
        });
    }

    let mut polygon = zigzag(64, 7.5);
    polygon.close_polygon();
    let style = PolyStyle::fill(Rgba8::rgb(30, 120, 200))
        .with_line(LineStyle::new(Rgba8::BLACK, 1.5));
    group.bench_function("polygon_fill_and_outline", |b| {
        b.iter_batched(
            fresh,
            |mut buffer| {
                let mut pipeline = Pipeline::new(config);
                pipeline
                    .draw_polygon(DrawTarget::Buffer(&mut buffer), &mut polygon, 0, &style)
                    .unwrap();
                buffer
            },
            BatchSize::LargeInput,
        );
    });

    let style = PointStyle::new(MarkerShape::Circle, Rgba8::BLACK, 6.0, 6.0);
    group.bench_function("points_circle", |b| {
        b.iter_batched(
            fresh,
            |mut buffer| {
                let mut pipeline = Pipeline::new(config);
                pipeline
                    .draw_point(DrawTarget::Buffer(&mut buffer), &mut line, 0, &style)
                    .unwrap();
                buffer
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_draws);
criterion_main!(benches);
