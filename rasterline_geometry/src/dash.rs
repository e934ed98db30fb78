// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dash stage.

use kurbo::{PathEl, Point, Rect};
use smallvec::SmallVec;

use crate::polyline::{Subpath, SubpathReader};
use crate::source::VertexSource;

/// Splits every subpath of a source into "on" dashes.
///
/// The pattern is a sequence of `(on, off)` pairs walked along the arc
/// length of each subpath. The walk restarts at the beginning of the pattern
/// (shifted by the [dash start](Self::set_dash_start)) for every subpath, and
/// closed subpaths are walked including their closing segment. Each dash is
/// emitted as an open subpath, ready for [`ConvStroke`](crate::ConvStroke).
///
/// Dashes are produced one vertex at a time as the source is walked, so the
/// stage holds at most one subpath of its source. With a
/// [clip box](Self::set_clip_box), only the parts of segments inside the box
/// are walked; the pattern phase still advances over the rest, so the dashes
/// inside the box are the same as without clipping.
///
/// A pattern that is empty or whose total length is not positive leaves the
/// source unchanged.
///
/// ```
/// use kurbo::{PathEl, Point};
/// use rasterline_geometry::{collect_elements, ConvDash, PathStorage};
///
/// let mut line = PathStorage::new();
/// line.move_to((0.0, 0.0));
/// line.line_to((16.0, 0.0));
///
/// let mut dash = ConvDash::new(&mut line);
/// dash.add_dash(4.0, 4.0);
/// assert_eq!(
///     collect_elements(&mut dash, 0),
///     vec![
///         PathEl::MoveTo(Point::new(0.0, 0.0)),
///         PathEl::LineTo(Point::new(4.0, 0.0)),
///         PathEl::MoveTo(Point::new(8.0, 0.0)),
///         PathEl::LineTo(Point::new(12.0, 0.0)),
///     ]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ConvDash<S> {
    source: S,
    pattern: SmallVec<[f64; 8]>,
    total: f64,
    dash_start: f64,
    clip: Option<Rect>,
    reader: SubpathReader,
    subpath: Subpath,
    in_subpath: bool,
    /// Next point (solid) or segment (dashed) of the subpath.
    cursor: usize,
    phase: DashPhase,
    segment: Segment,
    pending: Option<PathEl>,
}

impl<S: VertexSource> ConvDash<S> {
    /// Wrap `source` with an empty (solid) pattern.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pattern: SmallVec::new(),
            total: 0.0,
            dash_start: 0.0,
            clip: None,
            reader: SubpathReader::default(),
            subpath: Subpath::default(),
            in_subpath: false,
            cursor: 0,
            phase: DashPhase::default(),
            segment: Segment::default(),
            pending: None,
        }
    }

    /// Append an `(on, off)` pair. Negative lengths count as zero.
    ///
    /// Changing the pattern while iterating takes effect from the next
    /// subpath.
    pub fn add_dash(&mut self, on: f64, off: f64) {
        let on = sanitize(on);
        let off = sanitize(off);
        self.pattern.push(on);
        self.pattern.push(off);
        self.total += on + off;
        self.in_subpath = false;
    }

    /// Replace the whole pattern.
    pub fn set_pattern(&mut self, pairs: &[(f64, f64)]) {
        self.remove_all_dashes();
        for &(on, off) in pairs {
            self.add_dash(on, off);
        }
    }

    /// Clear the pattern, making the stage a pass-through.
    pub fn remove_all_dashes(&mut self) {
        self.pattern.clear();
        self.total = 0.0;
        self.in_subpath = false;
    }

    /// Shift where the pattern starts along every subpath.
    pub fn set_dash_start(&mut self, offset: f64) {
        self.dash_start = sanitize(offset);
    }

    /// The pattern as alternating on and off lengths.
    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }

    /// Only emit the dashes, or parts of dashes, inside `rect`.
    ///
    /// A solid pattern ignores the clip box.
    pub fn set_clip_box(&mut self, rect: Rect) {
        self.clip = Some(rect.abs());
    }

    /// Emit dashes along the whole length of every subpath.
    pub fn reset_clipping(&mut self) {
        self.clip = None;
    }

    fn is_solid(&self) -> bool {
        self.total <= 0.0
    }

    /// Set up the walk of a freshly read subpath, possibly returning its
    /// first vertex.
    fn begin_subpath(&mut self) -> Option<PathEl> {
        self.cursor = 0;
        self.segment = Segment::default();
        self.in_subpath = self.subpath.has_segments;
        if !self.in_subpath || self.is_solid() {
            return None;
        }
        self.phase = DashPhase::new(&self.pattern, self.total, self.dash_start);
        let &[first] = self.subpath.points.as_slice() else {
            return None;
        };
        // A degenerate subpath keeps a dot if it starts inside a dash.
        self.in_subpath = false;
        let inside = self.clip.is_none_or(|r| r.contains(first));
        if self.phase.is_on() && inside {
            self.pending = Some(PathEl::LineTo(first));
            return Some(PathEl::MoveTo(first));
        }
        None
    }

    fn next_solid(&mut self) -> Option<PathEl> {
        let points = &self.subpath.points;
        let first = *points.first()?;
        let i = self.cursor;
        self.cursor += 1;
        let el = if i == 0 {
            PathEl::MoveTo(first)
        } else if let Some(&p) = points.get(i) {
            PathEl::LineTo(p)
        } else if points.len() == 1 && i == 1 {
            PathEl::LineTo(first)
        } else if self.subpath.closed && i == points.len().max(2) {
            PathEl::ClosePath
        } else {
            return None;
        };
        Some(el)
    }

    /// Load the next segment with a non-empty part inside the clip box.
    fn next_segment(&mut self) -> bool {
        let tail = self.segment.tail;
        self.phase.skip(&self.pattern, self.total, tail);
        self.segment = Segment::default();
        let points = &self.subpath.points;
        let n = points.len();
        let count = if self.subpath.closed { n } else { n.saturating_sub(1) };
        while self.cursor < count {
            let a = points[self.cursor];
            let b = points[(self.cursor + 1) % n];
            self.cursor += 1;
            let len = a.distance(b);
            if !len.is_finite() {
                self.phase.drawing = false;
                continue;
            }
            let (t0, t1) = match self.clip {
                None => (0.0, 1.0),
                Some(rect) => match clip_segment(a, b, rect) {
                    Some(range) => range,
                    None => {
                        self.phase.skip(&self.pattern, self.total, len);
                        continue;
                    }
                },
            };
            self.phase.skip(&self.pattern, self.total, t0 * len);
            let (a, b) = (a.lerp(b, t0), a.lerp(b, t1));
            self.segment = Segment {
                a,
                b,
                len: a.distance(b),
                t: 0.0,
                tail: len - t1 * len,
            };
            return true;
        }
        false
    }

    fn next_dashed(&mut self) -> Option<PathEl> {
        loop {
            let seg = self.segment;
            if seg.t >= seg.len {
                if !self.next_segment() {
                    return None;
                }
                continue;
            }
            let step = self.phase.remaining.min(seg.len - seg.t);
            let end = seg.t + step;
            if end <= seg.t {
                // Too long to walk at this precision.
                self.segment.t = seg.len;
                self.phase.drawing = false;
                continue;
            }
            let on = self.phase.is_on();
            let was_drawing = self.phase.drawing;
            let from = seg.at(seg.t);
            let to = seg.at(end);
            self.segment.t = end;
            if on {
                self.phase.drawing = true;
            }
            self.phase.consume(&self.pattern, step);
            if on {
                let line = PathEl::LineTo(to);
                if was_drawing {
                    return Some(line);
                }
                self.pending = Some(line);
                return Some(PathEl::MoveTo(from));
            }
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// The part of the segment `a`–`b` inside `rect`, as a parameter range.
fn clip_segment(a: Point, b: Point, rect: Rect) -> Option<(f64, f64)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-d.x, a.x - rect.x0),
        (d.x, rect.x1 - a.x),
        (-d.y, a.y - rect.y0),
        (d.y, rect.y1 - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// The visible part of one segment, walked from `t = 0` to `len`.
#[derive(Clone, Copy, Debug, Default)]
struct Segment {
    a: Point,
    b: Point,
    len: f64,
    t: f64,
    /// Length of the segment past `b`, outside the clip box.
    tail: f64,
}

impl Segment {
    fn at(&self, t: f64) -> Point {
        if t >= self.len {
            self.b
        } else {
            self.a.lerp(self.b, t / self.len)
        }
    }
}

/// Position within the dash pattern while walking one subpath.
#[derive(Clone, Copy, Debug, Default)]
struct DashPhase {
    index: usize,
    remaining: f64,
    drawing: bool,
}

impl DashPhase {
    fn new(pattern: &[f64], total: f64, start: f64) -> Self {
        let mut phase = Self {
            index: 0,
            remaining: pattern.first().copied().unwrap_or(0.0),
            drawing: false,
        };
        phase.skip(pattern, total, start);
        phase.skip_empty(pattern);
        phase
    }

    fn is_on(&self) -> bool {
        self.index % 2 == 0
    }

    fn advance(&mut self, pattern: &[f64]) {
        self.index = (self.index + 1) % pattern.len();
        self.remaining = pattern[self.index];
        self.drawing = false;
    }

    /// Step past zero-length entries. Terminates because the total is positive.
    fn skip_empty(&mut self, pattern: &[f64]) {
        while self.remaining <= 0.0 {
            self.advance(pattern);
        }
    }

    /// Account for `step` walked units, `step` being at most `remaining`.
    fn consume(&mut self, pattern: &[f64], step: f64) {
        self.remaining -= step;
        if self.remaining <= 0.0 {
            self.advance(pattern);
            self.skip_empty(pattern);
        }
    }

    /// Move the phase `dist` units along without emitting anything.
    ///
    /// Whole pattern repeats are dropped first, so the cost does not depend
    /// on `dist`.
    fn skip(&mut self, pattern: &[f64], total: f64, dist: f64) {
        if !dist.is_finite() || dist <= 0.0 {
            return;
        }
        self.drawing = false;
        let mut dist = dist;
        if dist >= self.remaining {
            dist -= self.remaining;
            self.advance(pattern);
            dist %= total;
            while dist >= self.remaining {
                dist -= self.remaining;
                self.advance(pattern);
            }
        }
        self.remaining -= dist;
        self.skip_empty(pattern);
    }
}

impl<S: VertexSource> VertexSource for ConvDash<S> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.reader.reset();
        self.in_subpath = false;
        self.pending = None;
    }

    fn vertex(&mut self) -> Option<PathEl> {
        loop {
            if let Some(el) = self.pending.take() {
                return Some(el);
            }
            if self.in_subpath {
                let el = if self.is_solid() {
                    self.next_solid()
                } else {
                    self.next_dashed()
                };
                if el.is_some() {
                    return el;
                }
                self.in_subpath = false;
            }
            if !self.reader.next(&mut self.source, &mut self.subpath) {
                return None;
            }
            if let Some(el) = self.begin_subpath() {
                return Some(el);
            }
        }
    }
}
