// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned, multi-path command storage.

use alloc::vec::Vec;

use kurbo::{BezPath, PathEl, Point};

use crate::source::VertexSource;

/// An owned sequence of path commands, optionally split into several paths.
///
/// Commands are appended with [`move_to`](Self::move_to),
/// [`line_to`](Self::line_to) and [`close_polygon`](Self::close_polygon)
/// (plus [`quad_to`](Self::quad_to) and [`curve_to`](Self::curve_to) for
/// curved input). [`start_new_path`](Self::start_new_path) begins another
/// path and returns its identifier; `rewind(path_id)` then selects which path
/// the storage replays as a [`VertexSource`]. Path `0` always exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathStorage {
    elements: Vec<PathEl>,
    /// Index of the first element of each path after path 0.
    starts: Vec<usize>,
    cursor: usize,
    end: usize,
}

impl PathStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage with room for `capacity` commands.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Build storage holding a single path made of `path`'s elements.
    pub fn from_bez_path(path: &BezPath) -> Self {
        Self::from_elements(path.elements())
    }

    /// Build storage holding a single path made of `elements`.
    pub fn from_elements(elements: &[PathEl]) -> Self {
        Self {
            elements: elements.to_vec(),
            ..Self::default()
        }
    }

    /// Begin a new path and return its identifier for [`VertexSource::rewind`].
    pub fn start_new_path(&mut self) -> u32 {
        self.starts.push(self.elements.len());
        // Path ids beyond u32::MAX are unreachable in practice.
        u32::try_from(self.starts.len()).unwrap_or(u32::MAX)
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.elements.push(PathEl::MoveTo(p.into()));
    }

    /// Add a straight segment to `p`.
    pub fn line_to(&mut self, p: impl Into<Point>) {
        self.elements.push(PathEl::LineTo(p.into()));
    }

    /// Add a quadratic segment with control point `p1` ending at `p2`.
    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) {
        self.elements.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Add a cubic segment with control points `p1`, `p2` ending at `p3`.
    pub fn curve_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) {
        self.elements
            .push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Close the current subpath back to its starting point.
    pub fn close_polygon(&mut self) {
        self.elements.push(PathEl::ClosePath);
    }

    /// Append a raw element.
    pub fn push(&mut self, el: PathEl) {
        self.elements.push(el);
    }

    /// All stored elements, across every path.
    pub fn elements(&self) -> &[PathEl] {
        &self.elements
    }

    /// Number of stored elements, across every path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element has been stored.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of paths, including the implicit path 0.
    pub fn path_count(&self) -> usize {
        self.starts.len() + 1
    }

    /// Remove every element and path.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.starts.clear();
        self.cursor = 0;
        self.end = 0;
    }

    /// Copy path `path_id` into a [`BezPath`].
    pub fn to_bez_path(&self, path_id: u32) -> BezPath {
        let (start, end) = self.range(path_id);
        BezPath::from_vec(self.elements[start..end].to_vec())
    }

    fn range(&self, path_id: u32) -> (usize, usize) {
        let id = path_id as usize;
        let len = self.elements.len();
        let start = match id {
            0 => 0,
            _ => self.starts.get(id - 1).copied().unwrap_or(len),
        };
        let end = self.starts.get(id).copied().unwrap_or(len);
        (start, end.max(start))
    }
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, path_id: u32) {
        let (start, end) = self.range(path_id);
        self.cursor = start;
        self.end = end;
    }

    fn vertex(&mut self) -> Option<PathEl> {
        if self.cursor >= self.end {
            return None;
        }
        let el = self.elements.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(el)
    }
}

impl From<BezPath> for PathStorage {
    fn from(path: BezPath) -> Self {
        Self::from_bez_path(&path)
    }
}

impl Extend<PathEl> for PathStorage {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use crate::source::collect_elements;

    #[test]
    fn replays_commands_in_order() {
        let mut p = PathStorage::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        p.line_to((10.0, 10.0));
        p.close_polygon();

        let els = collect_elements(&mut p, 0);
        assert_eq!(
            els,
            vec![
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 10.0)),
                PathEl::ClosePath,
            ]
        );
        assert_eq!(collect_elements(&mut p, 0), els, "storage is restartable");
    }

    #[test]
    fn path_ids_select_separate_paths() {
        let mut p = PathStorage::new();
        p.move_to((0.0, 0.0));
        p.line_to((1.0, 0.0));
        let second = p.start_new_path();
        p.move_to((5.0, 5.0));
        p.line_to((6.0, 5.0));

        assert_eq!(second, 1);
        assert_eq!(p.path_count(), 2);
        assert_eq!(collect_elements(&mut p, 0).len(), 2);
        let els = collect_elements(&mut p, second);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(5.0, 5.0)));
        assert!(
            collect_elements(&mut p, 7).is_empty(),
            "unknown ids replay nothing"
        );
    }

    #[test]
    fn bez_path_round_trip() {
        let mut bez = BezPath::new();
        bez.move_to((1.0, 1.0));
        bez.quad_to((2.0, 0.0), (3.0, 1.0));
        bez.close_path();

        let storage = PathStorage::from_bez_path(&bez);
        assert_eq!(storage.to_bez_path(0), bez);
    }
}
