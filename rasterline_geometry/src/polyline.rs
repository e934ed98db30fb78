// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a vertex stream into polyline subpaths.

use alloc::vec::Vec;

use kurbo::{PathEl, Point};

use crate::source::VertexSource;

/// Points closer than this are treated as coincident.
pub(crate) const VERTEX_DIST_EPSILON: f64 = 1e-14;

/// One polyline subpath with coincident neighbours removed.
#[derive(Clone, Debug, Default)]
pub(crate) struct Subpath {
    pub(crate) points: Vec<Point>,
    pub(crate) closed: bool,
    /// Whether the subpath had any drawing command after its move.
    pub(crate) has_segments: bool,
}

impl Subpath {
    fn clear(&mut self) {
        self.points.clear();
        self.closed = false;
        self.has_segments = false;
    }

    fn push(&mut self, p: Point) {
        match self.points.last() {
            Some(last) if last.distance(p) <= VERTEX_DIST_EPSILON => {}
            _ => self.points.push(p),
        }
    }
}

/// Reads subpaths one at a time, holding back the move that starts the next.
///
/// Curve commands are taken as straight lines to their end point; flatten
/// before this stage to keep their shape.
#[derive(Clone, Debug, Default)]
pub(crate) struct SubpathReader {
    lookahead: Option<PathEl>,
    start: Point,
    done: bool,
}

impl SubpathReader {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fill `out` with the next subpath, returning `false` once the source is
    /// exhausted.
    pub(crate) fn next<S: VertexSource + ?Sized>(&mut self, source: &mut S, out: &mut Subpath) -> bool {
        out.clear();
        while !self.done {
            let Some(el) = self.lookahead.take().or_else(|| source.vertex()) else {
                self.done = true;
                break;
            };
            match el {
                PathEl::MoveTo(p) => {
                    if !out.points.is_empty() {
                        self.lookahead = Some(el);
                        break;
                    }
                    self.start = p;
                    out.points.push(p);
                }
                PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                    if out.points.is_empty() {
                        out.points.push(self.start);
                    }
                    out.has_segments = true;
                    out.push(p);
                }
                PathEl::ClosePath => {
                    if !out.points.is_empty() {
                        out.closed = true;
                        break;
                    }
                }
            }
        }
        if out.closed && out.points.len() > 1 {
            let first = out.points[0];
            if out
                .points
                .last()
                .is_some_and(|last| last.distance(first) <= VERTEX_DIST_EPSILON)
            {
                out.points.pop();
            }
        }
        !out.points.is_empty()
    }
}
