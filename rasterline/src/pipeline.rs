// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing pipeline.

use core::f64::consts::SQRT_2;

use kurbo::{Affine, PathEl, Point, Rect};
use peniko::Fill;
use rasterline_geometry::{
    ConvCurve, ConvDash, ConvStroke, ConvTransform, DEFAULT_MITER_LIMIT, DEFAULT_TOLERANCE,
    PathStorage, ScaleTranslate, VertexSource,
};
use rasterline_raster::{CompOp, Rasterizer, RenderingBuffer, Rgba8, render_scanlines};

use crate::error::Error;
use crate::style::{LineStyle, PointStyle, PolyStyle};

/// Pipeline-wide settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Operator used by styles that do not name one.
    ///
    /// Defaults to [`CompOp::SrcOver`]. Use [`CompOp::Src`] to replace
    /// pixels instead of blending over them.
    pub default_comp_op: CompOp,
    /// Fill rule for polygon fills. Strokes and markers always use non-zero.
    pub fill_rule: Fill,
    /// Curve flattening tolerance in device pixels.
    pub tolerance: f64,
    /// Miter limit for line styles that do not set one.
    pub miter_limit: f64,
    /// Initial color of a pipeline-owned buffer.
    pub background: Rgba8,
}

impl PipelineConfig {
    /// The default configuration.
    pub const fn new() -> Self {
        Self {
            default_comp_op: CompOp::SrcOver,
            fill_rule: Fill::NonZero,
            tolerance: DEFAULT_TOLERANCE,
            miter_limit: DEFAULT_MITER_LIMIT,
            background: Rgba8::WHITE,
        }
    }

    /// Builder-style setter for [`default_comp_op`](Self::default_comp_op).
    #[must_use]
    pub const fn with_default_comp_op(mut self, op: CompOp) -> Self {
        self.default_comp_op = op;
        self
    }

    /// Builder-style setter for [`fill_rule`](Self::fill_rule).
    #[must_use]
    pub const fn with_fill_rule(mut self, fill: Fill) -> Self {
        self.fill_rule = fill;
        self
    }

    /// Builder-style setter for [`tolerance`](Self::tolerance).
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder-style setter for [`miter_limit`](Self::miter_limit).
    #[must_use]
    pub const fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder-style setter for [`background`](Self::background).
    #[must_use]
    pub const fn with_background(mut self, color: Rgba8) -> Self {
        self.background = color;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a pipeline's pixels live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferMode {
    /// The pipeline owns one buffer and always draws into it.
    Owned,
    /// The pipeline owns no buffer; every draw names its target.
    External,
}

/// Lifecycle of a [`Pipeline`].
///
/// A pipeline is disposed by dropping it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing has been set or drawn yet.
    Created,
    /// A transform has been set.
    Configured,
    /// At least one draw has been issued.
    Drawing,
}

/// The buffer a draw call writes into.
#[derive(Debug)]
pub enum DrawTarget<'a> {
    /// The pipeline's own buffer ([`BufferMode::Owned`] only).
    Owned,
    /// A caller buffer ([`BufferMode::External`] only).
    Buffer(&'a mut RenderingBuffer),
}

/// Draws points, lines and polygons into RGBA8 buffers.
///
/// Every draw reads vertices from a [`VertexSource`], maps them through the
/// current [transform](Self::set_transform), converts them to fillable
/// outlines, and blends the resulting coverage into the target buffer. Draws
/// remember nothing between calls except the transform.
///
/// ```
/// use rasterline::{DrawTarget, Pipeline, PipelineConfig, PolyStyle};
/// use rasterline_geometry::PathStorage;
/// use rasterline_raster::Rgba8;
///
/// let mut pipeline = Pipeline::with_buffer(10, 10, PipelineConfig::default()).unwrap();
/// let mut square = PathStorage::new();
/// square.move_to((0.0, 0.0));
/// square.line_to((10.0, 0.0));
/// square.line_to((10.0, 10.0));
/// square.line_to((0.0, 10.0));
/// square.close_polygon();
///
/// pipeline
///     .draw_polygon(DrawTarget::Owned, &mut square, 0, &PolyStyle::fill(Rgba8::BLACK))
///     .unwrap();
/// let pixels = pipeline.buffer().unwrap().to_packed();
/// assert!(pixels.iter().all(|&px| px == Rgba8::BLACK.to_u32()));
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    transform: ScaleTranslate,
    state: PipelineState,
    buffer: Option<RenderingBuffer>,
}

impl Pipeline {
    /// A pipeline that draws into caller buffers ([`BufferMode::External`]).
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            transform: ScaleTranslate::IDENTITY,
            state: PipelineState::Created,
            buffer: None,
        }
    }

    /// A pipeline owning a `width` × `height` buffer filled with the
    /// configured background ([`BufferMode::Owned`]).
    pub fn with_buffer(width: u32, height: u32, config: PipelineConfig) -> Result<Self, Error> {
        let buffer = RenderingBuffer::with_background(width, height, config.background)?;
        Ok(Self {
            buffer: Some(buffer),
            ..Self::new(config)
        })
    }

    /// The buffer mode chosen at construction.
    pub fn mode(&self) -> BufferMode {
        if self.buffer.is_some() {
            BufferMode::Owned
        } else {
            BufferMode::External
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The pipeline settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the transform applied to every incoming vertex.
    pub fn set_transform(&mut self, transform: ScaleTranslate) {
        self.transform = transform;
        if self.state == PipelineState::Created {
            self.state = PipelineState::Configured;
        }
    }

    /// The current transform.
    pub fn transform(&self) -> ScaleTranslate {
        self.transform
    }

    /// The owned buffer, if any.
    pub fn buffer(&self) -> Option<&RenderingBuffer> {
        self.buffer.as_ref()
    }

    /// The owned buffer, mutably.
    pub fn buffer_mut(&mut self) -> Option<&mut RenderingBuffer> {
        self.buffer.as_mut()
    }

    /// Give up the owned buffer, if any.
    pub fn into_buffer(self) -> Option<RenderingBuffer> {
        self.buffer
    }

    /// Resolve `target` and hand out what a draw needs.
    fn begin<'a>(&'a mut self, target: DrawTarget<'a>) -> Result<Painter<'a>, Error> {
        let mode = self.mode();
        let buffer = match (target, self.buffer.as_mut()) {
            (DrawTarget::Owned, Some(owned)) => owned,
            (DrawTarget::Buffer(external), None) => external,
            _ => {
                log::warn!("draw target does not match {mode:?} pipeline");
                return Err(Error::TargetMismatch { mode });
            }
        };
        self.state = PipelineState::Drawing;
        Ok(Painter {
            buffer,
            config: self.config,
            affine: self.transform.to_affine(),
        })
    }

    /// Mark every vertex of `source`'s path `path_id` with the style's marker.
    ///
    /// Markers are placed at the transformed vertex positions and sized in
    /// device pixels. All markers of one call are filled in a single pass,
    /// then outlined in a second pass if the style has a line.
    pub fn draw_point<S: VertexSource + ?Sized>(
        &mut self,
        target: DrawTarget<'_>,
        source: &mut S,
        path_id: u32,
        style: &PointStyle,
    ) -> Result<(), Error> {
        let mut painter = self.begin(target)?;
        let mut markers = PathStorage::new();
        let mut vertices = ConvTransform::new(source, painter.affine);
        vertices.rewind(path_id);
        let mut count = 0_usize;
        while let Some(el) = vertices.vertex() {
            let center: Point = match el {
                PathEl::MoveTo(p)
                | PathEl::LineTo(p)
                | PathEl::QuadTo(_, p)
                | PathEl::CurveTo(_, _, p) => p,
                PathEl::ClosePath => continue,
            };
            let outline = style.shape.outline(center, style.width, style.height);
            markers.extend(outline.elements().iter().copied());
            count += 1;
        }
        log::debug!("drawing {count} {} markers", style.shape);
        let tolerance = painter.config.tolerance;
        let op = painter.op(style.comp_op);
        let mut flat = ConvCurve::with_tolerance(&mut markers, tolerance);
        painter.fill(&mut flat, 0, Fill::NonZero, style.color, op);
        if let Some(line) = &style.line {
            let op = painter.op(line.comp_op.or(style.comp_op));
            let flat = ConvCurve::with_tolerance(&mut markers, tolerance);
            painter.stroke(flat, 0, line, op);
        }
        Ok(())
    }

    /// Stroke `source`'s path `path_id`, dashing it first if the style has a
    /// dash pattern.
    pub fn draw_line<S: VertexSource + ?Sized>(
        &mut self,
        target: DrawTarget<'_>,
        source: &mut S,
        path_id: u32,
        style: &LineStyle,
    ) -> Result<(), Error> {
        let mut painter = self.begin(target)?;
        log::debug!(
            "drawing line {path_id}: width {}, {} dashes",
            style.width,
            style.dash.len()
        );
        let op = painter.op(style.comp_op);
        let chain = painter.flattened(source);
        painter.stroke(chain, path_id, style, op);
        Ok(())
    }

    /// Fill and then outline `source`'s path `path_id`.
    ///
    /// The fill uses the configured fill rule; the outline is drawn on top.
    /// Either pass is skipped when the style leaves it out.
    pub fn draw_polygon<S: VertexSource + ?Sized>(
        &mut self,
        target: DrawTarget<'_>,
        source: &mut S,
        path_id: u32,
        style: &PolyStyle,
    ) -> Result<(), Error> {
        let mut painter = self.begin(target)?;
        log::debug!(
            "drawing polygon {path_id}: fill {}, outline {}",
            style.fill.is_some(),
            style.line.is_some()
        );
        if let Some(color) = style.fill {
            let op = painter.op(style.comp_op);
            let fill = painter.config.fill_rule;
            let mut chain = painter.flattened(&mut *source);
            painter.fill(&mut chain, path_id, fill, color, op);
        }
        if let Some(line) = &style.line {
            let op = painter.op(line.comp_op.or(style.comp_op));
            let chain = painter.flattened(&mut *source);
            painter.stroke(chain, path_id, line, op);
        }
        Ok(())
    }
}

/// Per-draw state: the resolved buffer and a snapshot of the settings.
struct Painter<'a> {
    buffer: &'a mut RenderingBuffer,
    config: PipelineConfig,
    affine: Affine,
}

impl Painter<'_> {
    fn op(&self, op: Option<CompOp>) -> CompOp {
        op.unwrap_or(self.config.default_comp_op)
    }

    /// Transform, then flatten curves in device space.
    fn flattened<S: VertexSource>(&self, source: S) -> ConvCurve<ConvTransform<S>> {
        ConvCurve::with_tolerance(ConvTransform::new(source, self.affine), self.config.tolerance)
    }

    fn fill<S: VertexSource + ?Sized>(
        &mut self,
        source: &mut S,
        path_id: u32,
        fill: Fill,
        color: Rgba8,
        op: CompOp,
    ) {
        let mut ras = Rasterizer::with_size(self.buffer.width(), self.buffer.height());
        ras.set_fill_rule(fill);
        ras.add_path(source, path_id);
        let scanlines = ras.sweep();
        log::trace!(
            "filled {} cells into {} scanlines",
            ras.cell_count(),
            scanlines.len()
        );
        render_scanlines(self.buffer, &scanlines, color, op);
    }

    /// The buffer area grown by the farthest a stroke outline can reach
    /// from its centerline, plus a pixel for antialiasing.
    fn stroke_bounds(&self, width: f64, miter_limit: f64) -> Rect {
        let reach = width * 0.5 * miter_limit.max(SQRT_2) + 1.0;
        Rect::new(
            0.0,
            0.0,
            f64::from(self.buffer.width()),
            f64::from(self.buffer.height()),
        )
        .inflate(reach, reach)
    }

    fn stroke<S: VertexSource>(&mut self, source: S, path_id: u32, style: &LineStyle, op: CompOp) {
        if style.width.is_nan() || style.width <= 0.0 {
            return;
        }
        let miter_limit = style.miter_limit.unwrap_or(self.config.miter_limit);
        if style.is_dashed() {
            let mut dash = ConvDash::new(source);
            dash.set_pattern(&style.dash);
            dash.set_clip_box(self.stroke_bounds(style.width, miter_limit));
            let mut stroke = stroker(dash, style, miter_limit);
            self.fill(&mut stroke, path_id, Fill::NonZero, style.color, op);
        } else {
            let mut stroke = stroker(source, style, miter_limit);
            self.fill(&mut stroke, path_id, Fill::NonZero, style.color, op);
        }
    }
}

fn stroker<S: VertexSource>(source: S, style: &LineStyle, miter_limit: f64) -> ConvStroke<S> {
    let mut stroke = ConvStroke::new(source, style.width);
    stroke.set_join(style.join);
    stroke.set_cap(style.cap);
    stroke.set_miter_limit(miter_limit);
    stroke
}
