// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw styles.
//!
//! Styles are plain data. A `comp_op` of `None` means "use the pipeline's
//! [`default_comp_op`](crate::PipelineConfig::default_comp_op)".

use kurbo::{Cap, Join};
use rasterline_geometry::MarkerShape;
use rasterline_raster::{CompOp, Rgba8};

/// How a centerline is stroked.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Full stroke width in device pixels. Negative widths draw nothing.
    pub width: f64,
    /// Join between consecutive segments.
    pub join: Join,
    /// Cap at the ends of open subpaths and dashes.
    pub cap: Cap,
    /// Miter limit, or `None` for the pipeline default.
    pub miter_limit: Option<f64>,
    /// `(on, off)` lengths in device pixels. Empty means solid.
    pub dash: Vec<(f64, f64)>,
    /// Blend operator, or `None` for the pipeline default.
    pub comp_op: Option<CompOp>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            width: 1.0,
            join: Join::Miter,
            cap: Cap::Butt,
            miter_limit: None,
            dash: Vec::new(),
            comp_op: None,
        }
    }
}

impl LineStyle {
    /// A solid line of `color` and `width` with miter joins and butt caps.
    pub fn new(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width: width.max(0.0),
            ..Self::default()
        }
    }

    /// Builder-style setter for [`join`](Self::join).
    #[must_use]
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder-style setter for [`cap`](Self::cap).
    #[must_use]
    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    /// Builder-style setter for [`miter_limit`](Self::miter_limit).
    #[must_use]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    /// Builder-style setter for [`dash`](Self::dash).
    #[must_use]
    pub fn with_dash(mut self, pattern: &[(f64, f64)]) -> Self {
        self.dash = pattern.to_vec();
        self
    }

    /// Builder-style setter for [`comp_op`](Self::comp_op).
    #[must_use]
    pub fn with_comp_op(mut self, op: CompOp) -> Self {
        self.comp_op = Some(op);
        self
    }

    /// Whether the dash pattern breaks the line at all.
    pub fn is_dashed(&self) -> bool {
        self.dash
            .iter()
            .map(|&(on, off)| on.max(0.0) + off.max(0.0))
            .sum::<f64>()
            > 0.0
    }
}

/// How a polygon is drawn: an optional fill, then an optional outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyStyle {
    /// Fill color. `None` skips the fill pass.
    pub fill: Option<Rgba8>,
    /// Outline stroke. `None` skips the stroke pass.
    pub line: Option<LineStyle>,
    /// Blend operator for the fill, and for the outline unless it sets its own.
    pub comp_op: Option<CompOp>,
}

impl PolyStyle {
    /// A fill-only style.
    pub fn fill(color: Rgba8) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// An outline-only style.
    pub fn outline(line: LineStyle) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    /// Builder-style setter for [`line`](Self::line).
    #[must_use]
    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    /// Builder-style setter for [`comp_op`](Self::comp_op).
    #[must_use]
    pub fn with_comp_op(mut self, op: CompOp) -> Self {
        self.comp_op = Some(op);
        self
    }
}

/// How each vertex of a point draw is marked.
#[derive(Clone, Debug, PartialEq)]
pub struct PointStyle {
    /// Marker shape.
    pub shape: MarkerShape,
    /// Fill color of the marker.
    pub color: Rgba8,
    /// Marker box width in device pixels.
    pub width: f64,
    /// Marker box height in device pixels.
    pub height: f64,
    /// Marker outline. `None` skips the stroke pass.
    pub line: Option<LineStyle>,
    /// Blend operator for the marker, and for the outline unless it sets its own.
    pub comp_op: Option<CompOp>,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            color: Rgba8::BLACK,
            width: 5.0,
            height: 5.0,
            line: None,
            comp_op: None,
        }
    }
}

impl PointStyle {
    /// A `width` × `height` marker of `shape` filled with `color`.
    pub fn new(shape: MarkerShape, color: Rgba8, width: f64, height: f64) -> Self {
        Self {
            shape,
            color,
            width,
            height,
            ..Self::default()
        }
    }

    /// Builder-style setter for [`line`](Self::line).
    #[must_use]
    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    /// Builder-style setter for [`comp_op`](Self::comp_op).
    #[must_use]
    pub fn with_comp_op(mut self, op: CompOp) -> Self {
        self.comp_op = Some(op);
        self
    }
}
