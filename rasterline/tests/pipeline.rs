// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering tests for `Pipeline`.
//!
//! Shapes are placed on whole pixels wherever possible so that coverage is
//! exactly 0 or 255 and results can be compared pixel for pixel.

use kurbo::{Cap, Join};
use peniko::Fill;
use rasterline::{
    CompOp, DrawTarget, LineStyle, MarkerShape, Pipeline, PipelineConfig, PointStyle, PolyStyle,
    RenderingBuffer, Rgba8, ScaleTranslate,
};
use rasterline_geometry::{ByteOrder, PathStorage, decode_path};

const RED: Rgba8 = Rgba8::rgb(255, 0, 0);
const BLUE: Rgba8 = Rgba8::rgb(0, 0, 255);

fn rect(path: &mut PathStorage, x0: f64, y0: f64, x1: f64, y1: f64) {
    path.move_to((x0, y0));
    path.line_to((x1, y0));
    path.line_to((x1, y1));
    path.line_to((x0, y1));
    path.close_polygon();
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PathStorage {
    let mut path = PathStorage::new();
    rect(&mut path, x0, y0, x1, y1);
    path
}

fn segment(from: (f64, f64), to: (f64, f64)) -> PathStorage {
    let mut path = PathStorage::new();
    path.move_to(from);
    path.line_to(to);
    path
}

/// Every pixel of `buffer` is `inside` where `covered(x, y)` and `outside`
/// elsewhere.
fn assert_footprint(
    buffer: &RenderingBuffer,
    inside: Rgba8,
    outside: Rgba8,
    covered: impl Fn(u32, u32) -> bool,
) {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let expected = if covered(x, y) { inside } else { outside };
            assert_eq!(buffer.pixel(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn full_cover_polygon_paints_every_pixel() {
    let mut pipeline = Pipeline::with_buffer(10, 10, PipelineConfig::default()).unwrap();
    assert_eq!(pipeline.buffer().unwrap().to_packed(), vec![0xFFFF_FFFF; 100]);

    pipeline
        .draw_polygon(
            DrawTarget::Owned,
            &mut square(0.0, 0.0, 10.0, 10.0),
            0,
            &PolyStyle::fill(Rgba8::BLACK).with_comp_op(CompOp::SrcOver),
        )
        .unwrap();
    assert_eq!(pipeline.buffer().unwrap().to_packed(), vec![0x0000_00FF; 100]);
}

#[test]
fn solid_line_covers_its_rectangle() {
    let mut buffer = RenderingBuffer::new(20, 20).unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let style = LineStyle::new(Rgba8::BLACK, 4.0).with_cap(Cap::Butt);
    pipeline
        .draw_line(
            DrawTarget::Buffer(&mut buffer),
            &mut segment((2.0, 10.0), (18.0, 10.0)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(&buffer, Rgba8::BLACK, Rgba8::TRANSPARENT, |x, y| {
        (2..18).contains(&x) && (8..12).contains(&y)
    });
}

#[test]
fn square_caps_extend_by_half_the_width() {
    let mut buffer = RenderingBuffer::new(20, 20).unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let style = LineStyle::new(Rgba8::BLACK, 4.0).with_cap(Cap::Square);
    pipeline
        .draw_line(
            DrawTarget::Buffer(&mut buffer),
            &mut segment((4.0, 10.0), (16.0, 10.0)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(&buffer, Rgba8::BLACK, Rgba8::TRANSPARENT, |x, y| {
        (2..18).contains(&x) && (8..12).contains(&y)
    });
}

#[test]
fn dashed_line_leaves_gaps() {
    let mut buffer = RenderingBuffer::new(16, 20).unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let style = LineStyle::new(Rgba8::BLACK, 2.0).with_dash(&[(4.0, 4.0)]);
    pipeline
        .draw_line(
            DrawTarget::Buffer(&mut buffer),
            &mut segment((0.0, 10.0), (16.0, 10.0)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(&buffer, Rgba8::BLACK, Rgba8::TRANSPARENT, |x, y| {
        ((0..4).contains(&x) || (8..12).contains(&x)) && (9..11).contains(&y)
    });
}

#[test]
fn dashes_are_measured_after_the_transform() {
    let mut buffer = RenderingBuffer::new(16, 20).unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    pipeline.set_transform(ScaleTranslate::new(4.0, 4.0, 0.0, 0.0));
    let style = LineStyle::new(Rgba8::BLACK, 2.0).with_dash(&[(4.0, 4.0)]);
    pipeline
        .draw_line(
            DrawTarget::Buffer(&mut buffer),
            &mut segment((0.0, 2.5), (4.0, 2.5)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(&buffer, Rgba8::BLACK, Rgba8::TRANSPARENT, |x, y| {
        ((0..4).contains(&x) || (8..12).contains(&x)) && (9..11).contains(&y)
    });
}

/// A decoded two-vertex line, the way paths arrive off the wire.
fn decoded_line(from: (f32, f32), to: (f32, f32)) -> PathStorage {
    let mut bytes = Vec::new();
    for (op, (x, y)) in [(0x01, from), (0x02, to)] {
        bytes.push(op);
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
    }
    bytes.push(0x00);
    decode_path(&bytes, ByteOrder::LittleEndian).unwrap()
}

#[test]
fn dashed_line_to_the_float_limit_is_cut_to_the_buffer() {
    let mut pipeline = Pipeline::with_buffer(16, 16, PipelineConfig::default()).unwrap();
    let style = LineStyle::new(Rgba8::BLACK, 2.0).with_dash(&[(2.0, 2.0)]);
    pipeline
        .draw_line(
            DrawTarget::Owned,
            &mut decoded_line((0.0, 5.0), (f32::MAX, 5.0)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(pipeline.buffer().unwrap(), Rgba8::BLACK, Rgba8::WHITE, |x, y| {
        x % 4 < 2 && (4..6).contains(&y)
    });
}

#[test]
fn dashed_line_to_infinity_draws_nothing() {
    let mut pipeline = Pipeline::with_buffer(16, 16, PipelineConfig::default()).unwrap();
    let style = LineStyle::new(Rgba8::BLACK, 2.0).with_dash(&[(2.0, 2.0)]);
    pipeline
        .draw_line(
            DrawTarget::Owned,
            &mut decoded_line((0.0, 5.0), (f32::INFINITY, 5.0)),
            0,
            &style,
        )
        .unwrap();
    assert_eq!(pipeline.buffer().unwrap().to_packed(), vec![0xFFFF_FFFF; 256]);
}

#[test]
fn far_reaching_dashed_line_keeps_its_phase() {
    let mut buffer = RenderingBuffer::new(64, 64).unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let style = LineStyle::new(Rgba8::BLACK, 2.0).with_dash(&[(1.0, 1.0)]);
    pipeline
        .draw_line(
            DrawTarget::Buffer(&mut buffer),
            &mut segment((-50_000_000.0, 32.0), (50_000_000.0, 32.0)),
            0,
            &style,
        )
        .unwrap();
    assert_footprint(&buffer, Rgba8::BLACK, Rgba8::TRANSPARENT, |x, y| {
        x % 2 == 0 && (31..33).contains(&y)
    });
}

#[test]
fn rendering_is_deterministic() {
    let draw = || {
        let mut pipeline = Pipeline::with_buffer(32, 32, PipelineConfig::default()).unwrap();
        pipeline.set_transform(ScaleTranslate::new(1.5, 1.5, 0.3, 0.7));
        let mut path = PathStorage::new();
        path.move_to((1.0, 1.0));
        path.quad_to((18.0, 2.0), (17.0, 15.0));
        path.line_to((3.0, 19.0));
        path.close_polygon();
        let style = PolyStyle::fill(RED.with_alpha(200))
            .with_line(LineStyle::new(BLUE, 1.7).with_join(Join::Round));
        pipeline
            .draw_polygon(DrawTarget::Owned, &mut path, 0, &style)
            .unwrap();
        pipeline.into_buffer().unwrap()
    };
    let first = draw();
    assert_eq!(first, draw());
    assert_ne!(first.to_packed(), vec![0xFFFF_FFFF; 32 * 32], "something was drawn");
}

#[test]
fn transform_scales_then_translates() {
    let mut pipeline = Pipeline::with_buffer(10, 10, PipelineConfig::default()).unwrap();
    pipeline.set_transform(ScaleTranslate::new(4.0, 4.0, 2.0, 2.0));
    pipeline
        .draw_polygon(
            DrawTarget::Owned,
            &mut square(0.0, 0.0, 1.0, 1.0),
            0,
            &PolyStyle::fill(Rgba8::BLACK),
        )
        .unwrap();
    assert_footprint(pipeline.buffer().unwrap(), Rgba8::BLACK, Rgba8::WHITE, |x, y| {
        (2..6).contains(&x) && (2..6).contains(&y)
    });
}

#[test]
fn zero_scale_draws_nothing() {
    let mut pipeline = Pipeline::with_buffer(8, 8, PipelineConfig::default()).unwrap();
    pipeline.set_transform(ScaleTranslate::new(0.0, 0.0, 4.0, 4.0));
    pipeline
        .draw_polygon(
            DrawTarget::Owned,
            &mut square(0.0, 0.0, 8.0, 8.0),
            0,
            &PolyStyle::fill(Rgba8::BLACK),
        )
        .unwrap();
    assert_eq!(pipeline.buffer().unwrap().to_packed(), vec![0xFFFF_FFFF; 64]);
}

#[test]
fn polygon_outline_is_drawn_over_the_fill() {
    let mut pipeline = Pipeline::with_buffer(10, 10, PipelineConfig::default()).unwrap();
    let style = PolyStyle::fill(RED).with_line(LineStyle::new(BLUE, 2.0));
    pipeline
        .draw_polygon(DrawTarget::Owned, &mut square(2.0, 2.0, 8.0, 8.0), 0, &style)
        .unwrap();
    let buf = pipeline.buffer().unwrap();
    assert_eq!(buf.pixel(0, 0), Some(Rgba8::WHITE));
    assert_eq!(buf.pixel(1, 1), Some(BLUE), "mitered corner");
    assert_eq!(buf.pixel(1, 5), Some(BLUE));
    assert_eq!(buf.pixel(2, 5), Some(BLUE), "outline covers the fill edge");
    assert_eq!(buf.pixel(3, 5), Some(RED));
    assert_eq!(buf.pixel(5, 5), Some(RED));
    assert_eq!(buf.pixel(8, 8), Some(BLUE));
    assert_eq!(buf.pixel(9, 9), Some(Rgba8::WHITE));
}

#[test]
fn polygon_without_fill_or_line_is_a_no_op() {
    let mut pipeline = Pipeline::with_buffer(4, 4, PipelineConfig::default()).unwrap();
    pipeline
        .draw_polygon(
            DrawTarget::Owned,
            &mut square(0.0, 0.0, 4.0, 4.0),
            0,
            &PolyStyle::default(),
        )
        .unwrap();
    assert_eq!(pipeline.buffer().unwrap().to_packed(), vec![0xFFFF_FFFF; 16]);
}

#[test]
fn fill_rule_comes_from_the_config() {
    let mut nested = square(0.0, 0.0, 9.0, 9.0);
    rect(&mut nested, 3.0, 3.0, 6.0, 6.0);
    let render = |fill: Fill, path: &mut PathStorage| {
        let config = PipelineConfig::new().with_fill_rule(fill);
        let mut pipeline = Pipeline::with_buffer(9, 9, config).unwrap();
        pipeline
            .draw_polygon(DrawTarget::Owned, path, 0, &PolyStyle::fill(Rgba8::BLACK))
            .unwrap();
        pipeline.into_buffer().unwrap()
    };
    let non_zero = render(Fill::NonZero, &mut nested);
    assert_eq!(non_zero.pixel(4, 4), Some(Rgba8::BLACK));
    let even_odd = render(Fill::EvenOdd, &mut nested);
    assert_eq!(even_odd.pixel(4, 4), Some(Rgba8::WHITE));
    assert_eq!(even_odd.pixel(1, 1), Some(Rgba8::BLACK));
}

#[test]
fn only_the_requested_path_is_drawn() {
    let mut paths = square(0.0, 0.0, 2.0, 2.0);
    let second = paths.start_new_path();
    rect(&mut paths, 4.0, 4.0, 6.0, 6.0);

    let mut pipeline = Pipeline::with_buffer(8, 8, PipelineConfig::default()).unwrap();
    pipeline
        .draw_polygon(DrawTarget::Owned, &mut paths, second, &PolyStyle::fill(Rgba8::BLACK))
        .unwrap();
    assert_footprint(pipeline.buffer().unwrap(), Rgba8::BLACK, Rgba8::WHITE, |x, y| {
        (4..6).contains(&x) && (4..6).contains(&y)
    });
}

#[test]
fn square_markers_are_centred_on_each_vertex() {
    let mut points = PathStorage::new();
    points.move_to((4.0, 4.0));
    points.line_to((12.0, 10.0));
    points.close_polygon();

    let mut pipeline = Pipeline::with_buffer(16, 16, PipelineConfig::default()).unwrap();
    let style = PointStyle::new(MarkerShape::Square, Rgba8::BLACK, 4.0, 2.0);
    pipeline
        .draw_point(DrawTarget::Owned, &mut points, 0, &style)
        .unwrap();
    assert_footprint(pipeline.buffer().unwrap(), Rgba8::BLACK, Rgba8::WHITE, |x, y| {
        ((2..6).contains(&x) && (3..5).contains(&y))
            || ((10..14).contains(&x) && (9..11).contains(&y))
    });
}

#[test]
fn marker_size_ignores_the_transform_scale() {
    let mut points = PathStorage::new();
    points.move_to((1.0, 1.0));

    let mut pipeline = Pipeline::with_buffer(16, 16, PipelineConfig::default()).unwrap();
    pipeline.set_transform(ScaleTranslate::new(8.0, 8.0, 0.0, 0.0));
    let style = PointStyle::new(MarkerShape::Square, Rgba8::BLACK, 2.0, 2.0);
    pipeline
        .draw_point(DrawTarget::Owned, &mut points, 0, &style)
        .unwrap();
    assert_footprint(pipeline.buffer().unwrap(), Rgba8::BLACK, Rgba8::WHITE, |x, y| {
        (7..9).contains(&x) && (7..9).contains(&y)
    });
}

#[test]
fn circle_markers_are_antialiased() {
    let mut points = PathStorage::new();
    points.move_to((8.0, 8.0));

    let mut pipeline = Pipeline::with_buffer(16, 16, PipelineConfig::default()).unwrap();
    let style = PointStyle::new(MarkerShape::Circle, Rgba8::BLACK, 10.0, 10.0)
        .with_line(LineStyle::new(RED, 1.0));
    pipeline
        .draw_point(DrawTarget::Owned, &mut points, 0, &style)
        .unwrap();
    let buf = pipeline.buffer().unwrap();
    assert_eq!(buf.pixel(8, 8), Some(Rgba8::BLACK));
    assert_eq!(buf.pixel(0, 0), Some(Rgba8::WHITE));
    let edge = buf.pixel(8, 3).unwrap();
    assert!(edge.r > 0 && edge.g < 255, "outline tints the rim: {edge:?}");
}

#[test]
fn clear_zeroes_only_what_is_covered() {
    let mut pipeline = Pipeline::with_buffer(6, 6, PipelineConfig::default()).unwrap();
    pipeline
        .draw_polygon(
            DrawTarget::Owned,
            &mut square(1.0, 1.0, 5.0, 5.0),
            0,
            &PolyStyle::fill(RED).with_comp_op(CompOp::Clear),
        )
        .unwrap();
    assert_footprint(
        pipeline.buffer().unwrap(),
        Rgba8::TRANSPARENT,
        Rgba8::WHITE,
        |x, y| (1..5).contains(&x) && (1..5).contains(&y),
    );
}

#[test]
fn dst_leaves_the_buffer_untouched() {
    let mut buffer = RenderingBuffer::with_background(6, 6, Rgba8::new(1, 2, 3, 4)).unwrap();
    let before = buffer.clone();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let style = PolyStyle::fill(RED)
        .with_line(LineStyle::new(BLUE, 3.0))
        .with_comp_op(CompOp::Dst);
    pipeline
        .draw_polygon(
            DrawTarget::Buffer(&mut buffer),
            &mut square(0.5, 0.5, 5.5, 5.5),
            0,
            &style,
        )
        .unwrap();
    assert_eq!(buffer, before);
}

#[test]
fn default_comp_op_is_configurable() {
    let translucent = Rgba8::new(0, 0, 0, 128);
    let render = |config: PipelineConfig| {
        let mut pipeline = Pipeline::with_buffer(2, 2, config).unwrap();
        pipeline
            .draw_polygon(
                DrawTarget::Owned,
                &mut square(0.0, 0.0, 2.0, 2.0),
                0,
                &PolyStyle::fill(translucent),
            )
            .unwrap();
        pipeline.into_buffer().unwrap().pixel(0, 0).unwrap()
    };
    let over = render(PipelineConfig::default());
    assert_eq!(over.a, 255, "src-over keeps the opaque background");
    assert!(over.r > 100 && over.r < 150, "{over:?}");
    let replaced = render(PipelineConfig::new().with_default_comp_op(CompOp::Src));
    assert_eq!(replaced, translucent);
}
