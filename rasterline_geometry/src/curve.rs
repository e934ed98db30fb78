// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The curve flattening stage.

use alloc::vec::Vec;

use kurbo::{PathEl, Point};

use crate::source::VertexSource;

/// Default flattening tolerance, in device pixels.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Flattens quadratic and cubic segments into line segments.
///
/// Move, line and close commands pass through unchanged, so a purely
/// polygonal source comes out identical. Curves are subdivided with
/// [`kurbo::flatten`] so that the result stays within the tolerance of the
/// true curve.
#[derive(Clone, Debug)]
pub struct ConvCurve<S> {
    source: S,
    tolerance: f64,
    pending: Vec<PathEl>,
    next_pending: usize,
    current: Point,
    start: Point,
}

impl<S: VertexSource> ConvCurve<S> {
    /// Wrap `source` with the [default tolerance](DEFAULT_TOLERANCE).
    pub fn new(source: S) -> Self {
        Self::with_tolerance(source, DEFAULT_TOLERANCE)
    }

    /// Wrap `source`, flattening within `tolerance`.
    ///
    /// Non-positive or non-finite tolerances fall back to the default.
    pub fn with_tolerance(source: S, tolerance: f64) -> Self {
        let mut conv = Self {
            source,
            tolerance: DEFAULT_TOLERANCE,
            pending: Vec::new(),
            next_pending: 0,
            current: Point::ORIGIN,
            start: Point::ORIGIN,
        };
        conv.set_tolerance(tolerance);
        conv
    }

    /// Change the flattening tolerance.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_TOLERANCE
        };
    }

    /// The flattening tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn flatten_segment(&mut self, el: PathEl) {
        self.pending.clear();
        self.next_pending = 0;
        let pending = &mut self.pending;
        kurbo::flatten([PathEl::MoveTo(self.current), el], self.tolerance, |e| {
            if let PathEl::LineTo(_) = e {
                pending.push(e);
            }
        });
    }
}

impl<S: VertexSource> VertexSource for ConvCurve<S> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.pending.clear();
        self.next_pending = 0;
        self.current = Point::ORIGIN;
        self.start = Point::ORIGIN;
    }

    fn vertex(&mut self) -> Option<PathEl> {
        if let Some(el) = self.pending.get(self.next_pending).copied() {
            self.next_pending += 1;
            return Some(el);
        }
        let el = self.source.vertex()?;
        match el {
            PathEl::MoveTo(p) => {
                self.current = p;
                self.start = p;
                Some(el)
            }
            PathEl::LineTo(p) => {
                self.current = p;
                Some(el)
            }
            PathEl::ClosePath => {
                self.current = self.start;
                Some(el)
            }
            PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                self.flatten_segment(el);
                self.current = p;
                match self.pending.first().copied() {
                    Some(first) => {
                        self.next_pending = 1;
                        Some(first)
                    }
                    None => Some(PathEl::LineTo(p)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::collect_elements;
    use crate::storage::PathStorage;

    #[test]
    fn polygons_pass_through_unchanged() {
        let mut path = PathStorage::new();
        path.move_to((0.0, 0.0));
        path.line_to((4.0, 0.0));
        path.line_to((4.0, 4.0));
        path.close_polygon();
        let expected = path.elements().to_vec();

        let mut conv = ConvCurve::new(&mut path);
        assert_eq!(collect_elements(&mut conv, 0), expected);
    }

    #[test]
    fn curves_become_lines_ending_on_the_curve_end() {
        let mut path = PathStorage::new();
        path.move_to((0.0, 0.0));
        path.quad_to((50.0, 100.0), (100.0, 0.0));
        path.curve_to((100.0, 50.0), (50.0, 50.0), (0.0, 0.0));

        let mut conv = ConvCurve::with_tolerance(&mut path, 0.1);
        let els = collect_elements(&mut conv, 0);

        assert!(els.len() > 4, "curves should be subdivided");
        assert!(
            els.iter()
                .all(|el| matches!(el, PathEl::MoveTo(_) | PathEl::LineTo(_))),
            "only moves and lines remain"
        );
        assert!(els.contains(&PathEl::LineTo(Point::new(100.0, 0.0))));
        assert_eq!(els.last(), Some(&PathEl::LineTo(Point::new(0.0, 0.0))));
    }

    #[test]
    fn invalid_tolerance_falls_back_to_default() {
        let mut path = PathStorage::new();
        let conv = ConvCurve::with_tolerance(&mut path, -1.0);
        assert_eq!(conv.tolerance(), DEFAULT_TOLERANCE);
    }
}
