// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The vertex-source capability shared by every stage of the pipeline.

use alloc::vec::Vec;

use kurbo::PathEl;

/// A lazy, restartable producer of drawing commands.
///
/// A source is positioned at the start of a path with [`rewind`](Self::rewind)
/// and then polled with [`vertex`](Self::vertex) until it returns `None`, the
/// end-of-path sentinel. Rewinding again restarts the same sequence, so a
/// source can be consumed any number of times (for example once for a fill
/// pass and once for a stroke pass).
///
/// Sources yield [`PathEl`] values. Plain polygonal paths only use
/// [`PathEl::MoveTo`], [`PathEl::LineTo`] and [`PathEl::ClosePath`]; curved
/// sources may also yield [`PathEl::QuadTo`] and [`PathEl::CurveTo`], which
/// [`ConvCurve`](crate::ConvCurve) flattens.
///
/// Every converter in this crate is itself a `VertexSource` wrapping another
/// one, so conversion chains compose freely:
///
/// ```
/// use kurbo::{Affine, Cap, Join, PathEl, Point};
/// use rasterline_geometry::{ConvStroke, ConvTransform, PathStorage, VertexSource};
///
/// let mut path = PathStorage::new();
/// path.move_to(Point::new(0.0, 0.0));
/// path.line_to(Point::new(10.0, 0.0));
///
/// let transformed = ConvTransform::new(&mut path, Affine::scale(2.0));
/// let mut stroke = ConvStroke::new(transformed, 2.0);
/// stroke.set_join(Join::Round);
/// stroke.set_cap(Cap::Square);
///
/// stroke.rewind(0);
/// assert!(matches!(stroke.vertex(), Some(PathEl::MoveTo(_))));
/// ```
pub trait VertexSource {
    /// Restart the sequence of the path identified by `path_id`.
    ///
    /// Sources that only hold a single path ignore the identifier.
    fn rewind(&mut self, path_id: u32);

    /// Produce the next command, or `None` once the path is exhausted.
    fn vertex(&mut self) -> Option<PathEl>;
}

impl<T: VertexSource + ?Sized> VertexSource for &mut T {
    #[inline]
    fn rewind(&mut self, path_id: u32) {
        (**self).rewind(path_id);
    }

    #[inline]
    fn vertex(&mut self) -> Option<PathEl> {
        (**self).vertex()
    }
}

/// A vertex source over a borrowed slice of path elements.
///
/// This is the cheapest way to feed an existing [`kurbo::BezPath`] into a
/// conversion chain: `ElementSource::new(path.elements())`.
#[derive(Clone, Debug)]
pub struct ElementSource<'a> {
    elements: &'a [PathEl],
    cursor: usize,
}

impl<'a> ElementSource<'a> {
    /// Wrap a slice of elements.
    #[inline]
    pub fn new(elements: &'a [PathEl]) -> Self {
        Self {
            elements,
            cursor: 0,
        }
    }
}

impl VertexSource for ElementSource<'_> {
    #[inline]
    fn rewind(&mut self, _path_id: u32) {
        self.cursor = 0;
    }

    #[inline]
    fn vertex(&mut self) -> Option<PathEl> {
        let el = self.elements.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(el)
    }
}

/// Rewind `source` and drain it into a vector.
pub fn collect_elements<S: VertexSource + ?Sized>(source: &mut S, path_id: u32) -> Vec<PathEl> {
    source.rewind(path_id);
    let mut out = Vec::new();
    while let Some(el) = source.vertex() {
        out.push(el);
    }
    out
}
