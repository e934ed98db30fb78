// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The affine transform stage.

use kurbo::{Affine, PathEl};

use crate::source::VertexSource;

/// An axis-aligned scale followed by a translation.
///
/// Maps `(x, y)` to `(x * sx + tx, y * sy + ty)`. This is the transform a
/// map renderer typically needs to go from world to device coordinates; a
/// scale of zero collapses geometry onto a line or point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTranslate {
    /// Horizontal scale factor.
    pub sx: f64,
    /// Vertical scale factor.
    pub sy: f64,
    /// Horizontal offset, applied after scaling.
    pub tx: f64,
    /// Vertical offset, applied after scaling.
    pub ty: f64,
}

impl ScaleTranslate {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 1.0, 0.0, 0.0);

    /// Create a transform from its four components.
    pub const fn new(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self { sx, sy, tx, ty }
    }

    /// The equivalent general affine transform.
    pub const fn to_affine(self) -> Affine {
        Affine::new([self.sx, 0.0, 0.0, self.sy, self.tx, self.ty])
    }
}

impl Default for ScaleTranslate {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<ScaleTranslate> for Affine {
    fn from(t: ScaleTranslate) -> Self {
        t.to_affine()
    }
}

/// Applies an affine transform to every point of a wrapped source.
#[derive(Clone, Debug)]
pub struct ConvTransform<S> {
    source: S,
    affine: Affine,
}

impl<S: VertexSource> ConvTransform<S> {
    /// Wrap `source`, transforming its points by `affine`.
    pub fn new(source: S, affine: impl Into<Affine>) -> Self {
        Self {
            source,
            affine: affine.into(),
        }
    }

    /// Replace the transform.
    pub fn set_transform(&mut self, affine: impl Into<Affine>) {
        self.affine = affine.into();
    }

    /// The current transform.
    pub fn transform(&self) -> Affine {
        self.affine
    }

    /// Unwrap the inner source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: VertexSource> VertexSource for ConvTransform<S> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
    }

    fn vertex(&mut self) -> Option<PathEl> {
        self.source.vertex().map(|el| self.affine * el)
    }
}
