// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The anti-aliased scanline rasterizer.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{PathEl, Point, Rect};
use peniko::Fill;
use rasterline_geometry::VertexSource;

use crate::cells::{Cell, CellBuffer, SUBPIXEL_SCALE, SUBPIXEL_SHIFT};

/// Coordinates are clamped to this many subpixels from the origin.
const COORD_LIMIT: f64 = (1 << 29) as f64;

const AA_SHIFT: i32 = 8;
const AA_SCALE: i32 = 1 << AA_SHIFT;
const AA_MASK: i32 = AA_SCALE - 1;
const AA_SCALE2: i32 = AA_SCALE * 2;
const AA_MASK2: i32 = AA_SCALE2 - 1;

/// A run of horizontally adjacent pixels with their coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Column of the first pixel.
    pub x: i32,
    /// Coverage of each pixel from `x` onwards, 255 being full.
    pub covers: Vec<u8>,
}

impl Span {
    /// One past the last column of the span.
    pub fn end(&self) -> i32 {
        self.x.saturating_add(i32::try_from(self.covers.len()).unwrap_or(i32::MAX))
    }
}

/// All covered pixels of one row, as non-overlapping spans sorted by `x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scanline {
    /// Row index.
    pub y: i32,
    /// Spans in increasing column order.
    pub spans: Vec<Span>,
}

impl Scanline {
    fn push(&mut self, x: i32, len: i32, alpha: u8) {
        if len <= 0 {
            return;
        }
        let n = usize::try_from(len).unwrap_or(0);
        match self.spans.last_mut() {
            Some(span) if span.end() == x => span.covers.extend(core::iter::repeat_n(alpha, n)),
            _ => self.spans.push(Span {
                x,
                covers: vec![alpha; n],
            }),
        }
    }

    /// Total number of pixels in all spans.
    pub fn pixel_count(&self) -> usize {
        self.spans.iter().map(|s| s.covers.len()).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ClipBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

const CLIP_RIGHT: u8 = 1;
const CLIP_BELOW: u8 = 2;
const CLIP_LEFT: u8 = 4;
const CLIP_ABOVE: u8 = 8;
const CLIP_X: u8 = CLIP_RIGHT | CLIP_LEFT;
const CLIP_Y: u8 = CLIP_BELOW | CLIP_ABOVE;

impl ClipBox {
    fn flags(&self, x: i32, y: i32) -> u8 {
        let mut f = self.flags_y(y);
        if x > self.x2 {
            f |= CLIP_RIGHT;
        }
        if x < self.x1 {
            f |= CLIP_LEFT;
        }
        f
    }

    fn flags_y(&self, y: i32) -> u8 {
        let mut f = 0;
        if y > self.y2 {
            f |= CLIP_BELOW;
        }
        if y < self.y1 {
            f |= CLIP_ABOVE;
        }
        f
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the result is rounded and clamped to COORD_LIMIT first"
)]
fn mul_div(a: i32, b: i32, c: i32) -> i32 {
    let v = (f64::from(a) * f64::from(b) / f64::from(c)).round();
    v.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the result is rounded and clamped to COORD_LIMIT first"
)]
fn upscale(v: f64) -> i32 {
    let v = (v * f64::from(SUBPIXEL_SCALE)).round();
    if v.is_nan() {
        0
    } else {
        v.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
    }
}

/// Converts closed polygon outlines into per-pixel coverage.
///
/// Vertices are snapped to a 1/256 pixel grid and every edge is accumulated
/// into cells (see [`sweep`](Self::sweep)). Contours are closed implicitly
/// by the next move or by the sweep, so open outlines fill like closed ones.
///
/// When a clip box is set, the parts of edges above or below it are dropped
/// and the parts to its left or right are moved onto its side, which keeps
/// the winding of every pixel inside the box intact.
///
/// ```
/// use kurbo::Point;
/// use rasterline_raster::Rasterizer;
///
/// let mut ras = Rasterizer::new();
/// ras.move_to(Point::new(1.0, 1.0));
/// ras.line_to(Point::new(3.0, 1.0));
/// ras.line_to(Point::new(3.0, 2.0));
/// ras.line_to(Point::new(1.0, 2.0));
/// let lines = ras.sweep();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].spans[0].x, 1);
/// assert_eq!(lines[0].spans[0].covers, vec![255, 255]);
/// ```
#[derive(Clone, Debug)]
pub struct Rasterizer {
    cells: CellBuffer,
    fill: Fill,
    clip: Option<ClipBox>,
    start: (i32, i32),
    last: (i32, i32),
    last_flags: u8,
    open: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    /// An empty, unclipped rasterizer using the non-zero rule.
    pub fn new() -> Self {
        Self {
            cells: CellBuffer::default(),
            fill: Fill::NonZero,
            clip: None,
            start: (0, 0),
            last: (0, 0),
            last_flags: 0,
            open: false,
        }
    }

    /// An empty rasterizer clipped to a `width` × `height` pixel area.
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut ras = Self::new();
        ras.set_clip_box(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
        ras
    }

    /// Drop every accumulated edge, keeping the fill rule and clip box.
    pub fn reset(&mut self) {
        self.cells.reset();
        self.open = false;
    }

    /// Set the fill rule used by [`sweep`](Self::sweep).
    pub fn set_fill_rule(&mut self, fill: Fill) {
        self.fill = fill;
    }

    /// The fill rule in use.
    pub fn fill_rule(&self) -> Fill {
        self.fill
    }

    /// Clip subsequent edges to `rect`, in pixels.
    pub fn set_clip_box(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.clip = Some(ClipBox {
            x1: upscale(rect.x0),
            y1: upscale(rect.y0),
            x2: upscale(rect.x1),
            y2: upscale(rect.y1),
        });
    }

    /// Stop clipping subsequent edges.
    pub fn reset_clipping(&mut self) {
        self.clip = None;
    }

    /// Start a new contour at `p`, closing the current one.
    pub fn move_to(&mut self, p: Point) {
        self.close_polygon();
        let (x, y) = (upscale(p.x), upscale(p.y));
        self.start = (x, y);
        self.last = (x, y);
        self.last_flags = self.clip.map_or(0, |c| c.flags(x, y));
        self.open = true;
    }

    /// Add an edge from the current point to `p`.
    ///
    /// Without a preceding [`move_to`](Self::move_to), the edge starts at
    /// the start of the previous contour.
    pub fn line_to(&mut self, p: Point) {
        if !self.open {
            let (x, y) = self.start;
            self.last = (x, y);
            self.last_flags = self.clip.map_or(0, |c| c.flags(x, y));
            self.open = true;
        }
        self.edge_to(upscale(p.x), upscale(p.y));
    }

    /// Close the current contour with an edge back to its start.
    pub fn close_polygon(&mut self) {
        if self.open {
            let (x, y) = self.start;
            self.edge_to(x, y);
            self.open = false;
        }
    }

    /// Add every contour of `source`'s path `path_id`.
    ///
    /// Curves are taken as straight edges to their end point; flatten them
    /// first to keep their shape.
    pub fn add_path<S: VertexSource + ?Sized>(&mut self, source: &mut S, path_id: u32) {
        source.rewind(path_id);
        while let Some(el) = source.vertex() {
            match el {
                PathEl::MoveTo(p) => self.move_to(p),
                PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                    self.line_to(p);
                }
                PathEl::ClosePath => self.close_polygon(),
            }
        }
        self.close_polygon();
    }

    /// Whether no edge has contributed any coverage yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn edge_to(&mut self, x2: i32, y2: i32) {
        let (x1, y1) = self.last;
        match self.clip {
            None => self.cells.line(x1, y1, x2, y2),
            Some(clip) => {
                let f2 = clip.flags(x2, y2);
                self.clip_line(&clip, x1, y1, x2, y2, self.last_flags, f2);
                self.last_flags = f2;
            }
        }
        self.last = (x2, y2);
    }

    fn clip_line(&mut self, c: &ClipBox, x1: i32, y1: i32, x2: i32, y2: i32, f1: u8, f2: u8) {
        if (f1 & CLIP_Y) == (f2 & CLIP_Y) && (f1 & CLIP_Y) != 0 {
            // Entirely above or below.
            return;
        }
        let y_at = |x: i32| y1 + mul_div(x - x1, y2 - y1, x2 - x1);
        match ((f1 & CLIP_X) << 1) | (f2 & CLIP_X) {
            0 => self.clip_line_y(c, x1, y1, x2, y2, f1, f2),
            1 => {
                // x2 past the right side.
                let y3 = y_at(c.x2);
                let f3 = c.flags_y(y3);
                self.clip_line_y(c, x1, y1, c.x2, y3, f1, f3);
                self.clip_line_y(c, c.x2, y3, c.x2, y2, f3, f2);
            }
            2 => {
                // x1 past the right side.
                let y3 = y_at(c.x2);
                let f3 = c.flags_y(y3);
                self.clip_line_y(c, c.x2, y1, c.x2, y3, f1, f3);
                self.clip_line_y(c, c.x2, y3, x2, y2, f3, f2);
            }
            3 => self.clip_line_y(c, c.x2, y1, c.x2, y2, f1, f2),
            4 => {
                // x2 past the left side.
                let y3 = y_at(c.x1);
                let f3 = c.flags_y(y3);
                self.clip_line_y(c, x1, y1, c.x1, y3, f1, f3);
                self.clip_line_y(c, c.x1, y3, c.x1, y2, f3, f2);
            }
            6 => {
                // Right to left across the whole box.
                let y3 = y_at(c.x2);
                let y4 = y_at(c.x1);
                let f3 = c.flags_y(y3);
                let f4 = c.flags_y(y4);
                self.clip_line_y(c, c.x2, y1, c.x2, y3, f1, f3);
                self.clip_line_y(c, c.x2, y3, c.x1, y4, f3, f4);
                self.clip_line_y(c, c.x1, y4, c.x1, y2, f4, f2);
            }
            8 => {
                // x1 past the left side.
                let y3 = y_at(c.x1);
                let f3 = c.flags_y(y3);
                self.clip_line_y(c, c.x1, y1, c.x1, y3, f1, f3);
                self.clip_line_y(c, c.x1, y3, x2, y2, f3, f2);
            }
            9 => {
                // Left to right across the whole box.
                let y3 = y_at(c.x1);
                let y4 = y_at(c.x2);
                let f3 = c.flags_y(y3);
                let f4 = c.flags_y(y4);
                self.clip_line_y(c, c.x1, y1, c.x1, y3, f1, f3);
                self.clip_line_y(c, c.x1, y3, c.x2, y4, f3, f4);
                self.clip_line_y(c, c.x2, y4, c.x2, y2, f4, f2);
            }
            12 => self.clip_line_y(c, c.x1, y1, c.x1, y2, f1, f2),
            _ => {}
        }
    }

    fn clip_line_y(&mut self, c: &ClipBox, x1: i32, y1: i32, x2: i32, y2: i32, f1: u8, f2: u8) {
        let f1 = f1 & CLIP_Y;
        let f2 = f2 & CLIP_Y;
        if f1 | f2 == 0 {
            self.cells.line(x1, y1, x2, y2);
            return;
        }
        if f1 == f2 {
            return;
        }
        let x_at = |y: i32| x1 + mul_div(y - y1, x2 - x1, y2 - y1);
        let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
        if f1 & CLIP_ABOVE != 0 {
            tx1 = x_at(c.y1);
            ty1 = c.y1;
        }
        if f1 & CLIP_BELOW != 0 {
            tx1 = x_at(c.y2);
            ty1 = c.y2;
        }
        if f2 & CLIP_ABOVE != 0 {
            tx2 = x_at(c.y1);
            ty2 = c.y1;
        }
        if f2 & CLIP_BELOW != 0 {
            tx2 = x_at(c.y2);
            ty2 = c.y2;
        }
        self.cells.line(tx1, ty1, tx2, ty2);
    }

    /// Coverage for a doubled signed area in subpixel units.
    fn alpha(fill: Fill, area: i32) -> u8 {
        let mut cover = (area >> (SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT)).saturating_abs();
        if fill == Fill::EvenOdd {
            cover &= AA_MASK2;
            if cover > AA_SCALE {
                cover = AA_SCALE2 - cover;
            }
        }
        u8::try_from(cover.min(AA_MASK)).unwrap_or(u8::MAX)
    }

    /// Close the open contour and compute the coverage of every touched row.
    ///
    /// Rows are returned top to bottom and only contain pixels with non-zero
    /// coverage. The accumulated edges are kept, so sweeping again without
    /// adding edges gives identical output.
    pub fn sweep(&mut self) -> Vec<Scanline> {
        self.close_polygon();
        let fill = self.fill;
        let cells = self.cells.sorted_cells();
        log::trace!("sweeping {} cells ({fill:?})", cells.len());
        let mut out = Vec::new();
        let mut rest = cells;
        while let Some(first) = rest.first() {
            let y = first.y;
            let n = rest.iter().position(|c| c.y != y).unwrap_or(rest.len());
            let (row, tail) = rest.split_at(n);
            rest = tail;
            let line = Self::sweep_row(fill, y, row);
            if !line.spans.is_empty() {
                out.push(line);
            }
        }
        out
    }

    fn sweep_row(fill: Fill, y: i32, row: &[Cell]) -> Scanline {
        let mut line = Scanline {
            y,
            spans: Vec::new(),
        };
        let mut cover = 0_i32;
        let mut i = 0;
        while i < row.len() {
            let mut x = row[i].x;
            let mut area = 0_i32;
            while i < row.len() && row[i].x == x {
                area = area.wrapping_add(row[i].area);
                cover = cover.wrapping_add(row[i].cover);
                i += 1;
            }
            if area != 0 {
                let alpha = Self::alpha(fill, (cover << (SUBPIXEL_SHIFT + 1)).wrapping_sub(area));
                if alpha != 0 {
                    line.push(x, 1, alpha);
                }
                x += 1;
            }
            if let Some(next) = row.get(i) {
                if next.x > x {
                    let alpha = Self::alpha(fill, cover << (SUBPIXEL_SHIFT + 1));
                    if alpha != 0 {
                        line.push(x, next.x - x, alpha);
                    }
                }
            }
        }
        line
    }

    /// Number of accumulated cells, for diagnostics.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
