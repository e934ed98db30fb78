// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stroke stage.

use alloc::vec::Vec;
use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Cap, Join, PathEl, Point, Vec2};

use crate::polyline::{Subpath, SubpathReader, VERTEX_DIST_EPSILON};
use crate::source::VertexSource;

/// Default ratio of miter length to half the stroke width.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Below this, two unit directions are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Turns every subpath of a centerline into closed outline polygons.
///
/// - An open subpath becomes one closed contour: the left offset walked
///   forward, the end cap, the left offset of the reversed polyline, and the
///   start cap.
/// - A closed subpath with at least three distinct vertices becomes two
///   contours of opposite orientation, one on each side of the centerline.
/// - A subpath whose segments all have zero length becomes a dot for round
///   caps, a square for square caps, and nothing for butt caps.
///
/// Outer joins follow [`Join`]; a miter whose length exceeds the miter limit
/// (relative to half the width) is drawn as a bevel. Inner joins pivot on the
/// vertex, which keeps the outline correct under the non-zero winding rule
/// that it must be filled with. Round joins and caps are approximated with an
/// angular step derived from the width and the
/// [approximation scale](Self::set_approximation_scale).
///
/// Curve commands are stroked as straight lines to their end point, so place
/// a [`ConvCurve`](crate::ConvCurve) before this stage for curved input.
#[derive(Clone, Debug)]
pub struct ConvStroke<S> {
    source: S,
    width: f64,
    join: Join,
    cap: Cap,
    miter_limit: f64,
    approximation_scale: f64,
    reader: SubpathReader,
    subpath: Subpath,
    scratch: Vec<Point>,
    out: Vec<PathEl>,
    next_out: usize,
}

impl<S: VertexSource> ConvStroke<S> {
    /// Wrap `source`, stroking with `width` and miter joins and butt caps.
    pub fn new(source: S, width: f64) -> Self {
        let mut stroke = Self {
            source,
            width: 0.0,
            join: Join::Miter,
            cap: Cap::Butt,
            miter_limit: DEFAULT_MITER_LIMIT,
            approximation_scale: 1.0,
            reader: SubpathReader::default(),
            subpath: Subpath::default(),
            scratch: Vec::new(),
            out: Vec::new(),
            next_out: 0,
        };
        stroke.set_width(width);
        stroke
    }

    /// Set the full stroke width. Negative or non-finite widths become zero.
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    /// Set the join style.
    pub fn set_join(&mut self, join: Join) {
        self.join = join;
    }

    /// Set the cap style.
    pub fn set_cap(&mut self, cap: Cap) {
        self.cap = cap;
    }

    /// Set the miter limit. Values below 1 are raised to 1.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.miter_limit = if limit.is_nan() { DEFAULT_MITER_LIMIT } else { limit.max(1.0) };
    }

    /// Set how finely round joins and caps are approximated.
    ///
    /// Use the device scale when stroking in user space before a transform.
    pub fn set_approximation_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.approximation_scale = scale;
        }
    }

    /// The full stroke width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The join style.
    pub fn join(&self) -> Join {
        self.join
    }

    /// The cap style.
    pub fn cap(&self) -> Cap {
        self.cap
    }

    /// The miter limit.
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    fn params(&self) -> Params {
        let w = self.width * 0.5;
        Params {
            w,
            join: self.join,
            cap: self.cap,
            miter_limit: self.miter_limit,
            da: (w / (w + 0.125 / self.approximation_scale)).acos() * 2.0,
        }
    }

    fn stroke_subpath(&mut self) {
        let params = self.params();
        if params.w <= 0.0 || !self.subpath.has_segments {
            return;
        }
        let pts = &self.subpath.points;
        let mut outline = Outline::new(&mut self.out);
        match pts.len() {
            0 => {}
            1 => params.dot(&mut outline, pts[0]),
            n if self.subpath.closed && n >= 3 => {
                params.closed_side(&mut outline, pts);
                self.scratch.clear();
                self.scratch.extend(pts.iter().rev());
                params.closed_side(&mut outline, &self.scratch);
            }
            _ => {
                params.open_side(&mut outline, pts);
                self.scratch.clear();
                self.scratch.extend(pts.iter().rev());
                params.open_side(&mut outline, &self.scratch);
                outline.close();
            }
        }
    }
}

impl<S: VertexSource> VertexSource for ConvStroke<S> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.reader.reset();
        self.out.clear();
        self.next_out = 0;
    }

    fn vertex(&mut self) -> Option<PathEl> {
        loop {
            if let Some(el) = self.out.get(self.next_out).copied() {
                self.next_out += 1;
                return Some(el);
            }
            self.out.clear();
            self.next_out = 0;
            if !self.reader.next(&mut self.source, &mut self.subpath) {
                return None;
            }
            self.stroke_subpath();
        }
    }
}

/// Appends outline vertices, starting a contour on the first one and
/// skipping exact repeats.
struct Outline<'a> {
    out: &'a mut Vec<PathEl>,
    last: Option<Point>,
}

impl<'a> Outline<'a> {
    fn new(out: &'a mut Vec<PathEl>) -> Self {
        Self { out, last: None }
    }

    fn point(&mut self, p: Point) {
        match self.last {
            None => self.out.push(PathEl::MoveTo(p)),
            Some(last) if last.distance(p) <= VERTEX_DIST_EPSILON => return,
            Some(_) => self.out.push(PathEl::LineTo(p)),
        }
        self.last = Some(p);
    }

    fn close(&mut self) {
        if self.last.take().is_some() {
            self.out.push(PathEl::ClosePath);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Params {
    /// Half the stroke width.
    w: f64,
    join: Join,
    cap: Cap,
    miter_limit: f64,
    /// Angular step for round joins and caps.
    da: f64,
}

fn unit_dir(a: Point, b: Point) -> Vec2 {
    (b - a) / a.distance(b)
}

/// The left-hand normal of a unit direction.
fn normal(d: Vec2) -> Vec2 {
    Vec2::new(-d.y, d.x)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "step counts are small positive integers computed with ceil"
)]
fn arc_steps(sweep: f64, da: f64) -> usize {
    let n = (sweep.abs() / da).ceil();
    if n.is_finite() { (n as usize).clamp(1, 1024) } else { 1 }
}

impl Params {
    /// One side of an open polyline, ending with the cap at its last point.
    fn open_side(&self, o: &mut Outline<'_>, pts: &[Point]) {
        let m = pts.len();
        let d0 = unit_dir(pts[0], pts[1]);
        o.point(pts[0] + normal(d0) * self.w);
        for i in 1..m - 1 {
            self.join(o, pts[i - 1], pts[i], pts[i + 1]);
        }
        self.cap(o, pts[m - 1], unit_dir(pts[m - 2], pts[m - 1]));
    }

    /// One side of a closed polygon, as its own contour.
    fn closed_side(&self, o: &mut Outline<'_>, pts: &[Point]) {
        let m = pts.len();
        for i in 0..m {
            self.join(o, pts[(i + m - 1) % m], pts[i], pts[(i + 1) % m]);
        }
        o.close();
    }

    fn join(&self, o: &mut Outline<'_>, prev: Point, p: Point, next: Point) {
        let d1 = unit_dir(prev, p);
        let d2 = unit_dir(p, next);
        let n1 = normal(d1) * self.w;
        let n2 = normal(d2) * self.w;
        let cross = d1.cross(d2);
        let dot = d1.dot(d2);

        let sweep = if cross.abs() < PARALLEL_EPSILON {
            if dot > 0.0 {
                o.point(p + n1);
                return;
            }
            // Full reversal: the left side wraps around the vertex.
            -PI
        } else if cross > 0.0 {
            // Turning towards the left side: inner join.
            o.point(p + n1);
            o.point(p);
            o.point(p + n2);
            return;
        } else {
            cross.atan2(dot)
        };

        match self.join {
            Join::Bevel => {
                o.point(p + n1);
                o.point(p + n2);
            }
            Join::Miter => {
                let denom = 1.0 + dot;
                if denom > PARALLEL_EPSILON && (2.0 / denom).sqrt() <= self.miter_limit {
                    o.point(p + (n1 + n2) / denom);
                } else {
                    o.point(p + n1);
                    o.point(p + n2);
                }
            }
            Join::Round => self.arc(o, p, n1, sweep, p + n2),
        }
    }

    /// The cap at `p`, the end of a side walking in direction `d`.
    fn cap(&self, o: &mut Outline<'_>, p: Point, d: Vec2) {
        let n = normal(d) * self.w;
        match self.cap {
            Cap::Butt => {
                o.point(p + n);
                o.point(p - n);
            }
            Cap::Square => {
                let e = d * self.w;
                o.point(p + n);
                o.point(p + n + e);
                o.point(p - n + e);
                o.point(p - n);
            }
            Cap::Round => self.arc(o, p, n, -PI, p - n),
        }
    }

    /// An arc around `center` starting at `center + from`, turning by
    /// `sweep` radians and landing exactly on `end`.
    fn arc(&self, o: &mut Outline<'_>, center: Point, from: Vec2, sweep: f64, end: Point) {
        o.point(center + from);
        let n = arc_steps(sweep, self.da);
        let a0 = from.atan2();
        for k in 1..n {
            let a = a0 + sweep * (k as f64) / (n as f64);
            o.point(center + Vec2::from_angle(a) * self.w);
        }
        o.point(end);
    }

    /// The outline of a zero-length subpath at `p`.
    fn dot(&self, o: &mut Outline<'_>, p: Point) {
        match self.cap {
            Cap::Butt => {}
            Cap::Square => {
                let w = self.w;
                o.point(Point::new(p.x - w, p.y - w));
                o.point(Point::new(p.x + w, p.y - w));
                o.point(Point::new(p.x + w, p.y + w));
                o.point(Point::new(p.x - w, p.y + w));
                o.close();
            }
            Cap::Round => {
                let n = arc_steps(2.0 * PI, self.da).max(4);
                for k in 0..n {
                    let a = 2.0 * PI * (k as f64) / (n as f64);
                    o.point(p + Vec2::from_angle(a) * self.w);
                }
                o.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::collect_elements;
    use crate::storage::PathStorage;
    use kurbo::{BezPath, Rect, Shape};

    fn stroke_of(path: &mut PathStorage, width: f64, join: Join, cap: Cap) -> Vec<PathEl> {
        let mut stroke = ConvStroke::new(path, width);
        stroke.set_join(join);
        stroke.set_cap(cap);
        collect_elements(&mut stroke, 0)
    }

    fn contours(els: &[PathEl]) -> Vec<BezPath> {
        let mut out = Vec::new();
        let mut cur = BezPath::new();
        for &el in els {
            if matches!(el, PathEl::MoveTo(_)) && !cur.elements().is_empty() {
                out.push(core::mem::take(&mut cur));
            }
            cur.push(el);
        }
        if !cur.elements().is_empty() {
            out.push(cur);
        }
        out
    }

    fn bbox(els: &[PathEl]) -> Rect {
        BezPath::from_vec(els.to_vec()).bounding_box()
    }

    fn horizontal_line() -> PathStorage {
        let mut p = PathStorage::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        p
    }

    #[test]
    fn butt_line_is_a_rectangle() {
        let els = stroke_of(&mut horizontal_line(), 2.0, Join::Miter, Cap::Butt);
        assert_eq!(contours(&els).len(), 1);
        assert_eq!(els.last(), Some(&PathEl::ClosePath));
        assert_eq!(bbox(&els), Rect::new(0.0, -1.0, 10.0, 1.0));
        assert!((contours(&els)[0].area().abs() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn square_cap_extends_by_half_width() {
        let els = stroke_of(&mut horizontal_line(), 2.0, Join::Miter, Cap::Square);
        assert_eq!(bbox(&els), Rect::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn round_cap_bulges_within_tolerance() {
        let els = stroke_of(&mut horizontal_line(), 2.0, Join::Round, Cap::Round);
        let b = bbox(&els);
        assert!((b.x0 + 1.0).abs() < 0.2, "start cap reaches back: {b:?}");
        assert!((b.x1 - 11.0).abs() < 0.2, "end cap reaches forward: {b:?}");
        assert!(els.len() > 8, "round caps are subdivided");
    }

    #[test]
    fn closed_square_gives_two_opposite_rings() {
        let mut p = PathStorage::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        p.line_to((10.0, 10.0));
        p.line_to((0.0, 10.0));
        p.close_polygon();

        let els = stroke_of(&mut p, 2.0, Join::Miter, Cap::Butt);
        let rings = contours(&els);
        assert_eq!(rings.len(), 2);
        let (a, b) = (rings[0].area(), rings[1].area());
        assert!(a * b < 0.0, "rings must wind in opposite directions");
        assert!((a.abs().max(b.abs()) - 144.0).abs() < 1e-9, "outer ring is mitered");
        assert_eq!(bbox(&els), Rect::new(-1.0, -1.0, 11.0, 11.0));
    }

    #[test]
    fn miter_limit_falls_back_to_bevel() {
        let mut p = PathStorage::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        p.line_to((0.0, 1.0));

        let beveled = stroke_of(&mut p, 2.0, Join::Miter, Cap::Butt);
        assert!(bbox(&beveled).x1 < 11.5, "sharp miter is beveled");

        let mut stroke = ConvStroke::new(&mut p, 2.0);
        stroke.set_miter_limit(100.0);
        let mitered = collect_elements(&mut stroke, 0);
        assert!(bbox(&mitered).x1 > 25.0, "generous limit keeps the spike");
    }

    #[test]
    fn zero_length_subpaths() {
        let mut p = PathStorage::new();
        p.move_to((5.0, 5.0));
        p.line_to((5.0, 5.0));

        assert!(stroke_of(&mut p, 4.0, Join::Miter, Cap::Butt).is_empty());

        let square = stroke_of(&mut p, 4.0, Join::Miter, Cap::Square);
        assert_eq!(bbox(&square), Rect::new(3.0, 3.0, 7.0, 7.0));

        let dot = stroke_of(&mut p, 4.0, Join::Round, Cap::Round);
        assert_eq!(contours(&dot).len(), 1);
        let b = bbox(&dot);
        assert!(b.x0 >= 2.99 && b.x1 <= 7.01 && b.width() > 3.8, "dot fits the width: {b:?}");
    }

    #[test]
    fn lone_move_and_zero_width_emit_nothing() {
        let mut p = PathStorage::new();
        p.move_to((5.0, 5.0));
        assert!(stroke_of(&mut p, 4.0, Join::Round, Cap::Round).is_empty());

        assert!(stroke_of(&mut horizontal_line(), 0.0, Join::Round, Cap::Round).is_empty());
        assert!(stroke_of(&mut horizontal_line(), -3.0, Join::Round, Cap::Round).is_empty());
    }

    #[test]
    fn every_subpath_is_stroked() {
        let mut p = horizontal_line();
        p.move_to((0.0, 10.0));
        p.line_to((10.0, 10.0));
        let els = stroke_of(&mut p, 2.0, Join::Miter, Cap::Butt);
        assert_eq!(contours(&els).len(), 2);
    }
}
