// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterline Geometry: vertex sources and the conversion chain that turns
//! centerlines into fillable outlines.
//!
//! Everything in this crate speaks one small protocol, [`VertexSource`]: a
//! restartable producer of [`kurbo::PathEl`] commands terminated by `None`.
//! Paths come from a [`PathStorage`] (built by hand, converted from a
//! [`kurbo::BezPath`], or decoded from the compact binary stream described in
//! [`binary`]) or from any caller type implementing the trait.
//!
//! Converters wrap one source and are themselves sources:
//!
//! - [`ConvTransform`]: applies an affine transform (see also [`ScaleTranslate`]).
//! - [`ConvCurve`]: flattens quadratic and cubic segments into lines.
//! - [`ConvDash`]: splits each subpath into "on" dashes following a repeating pattern.
//! - [`ConvStroke`]: turns a centerline into closed outline polygons honoring
//!   [`kurbo::Join`], [`kurbo::Cap`] and a miter limit.
//!
//! [`MarkerShape`] produces the outlines used to draw points.
//!
//! Outlines produced by [`ConvStroke`] and [`MarkerShape`] are meant to be
//! filled with the non-zero winding rule.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Affine, PathEl, Point};
//! use rasterline_geometry::{collect_elements, ConvDash, ConvStroke, ConvTransform, PathStorage};
//!
//! let mut path = PathStorage::new();
//! path.move_to(Point::new(0.0, 5.0));
//! path.line_to(Point::new(16.0, 5.0));
//!
//! let transformed = ConvTransform::new(&mut path, Affine::IDENTITY);
//! let mut dashed = ConvDash::new(transformed);
//! dashed.add_dash(4.0, 4.0);
//! let mut stroke = ConvStroke::new(dashed, 2.0);
//!
//! let outline = collect_elements(&mut stroke, 0);
//! let contours = outline.iter().filter(|el| matches!(el, PathEl::MoveTo(_))).count();
//! assert_eq!(contours, 2, "two dashes, one outline each");
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature
//! instead of `std` for float math without the standard library.

#![no_std]

extern crate alloc;

pub mod binary;
mod curve;
mod dash;
mod marker;
mod polyline;
mod source;
mod storage;
mod stroke;
mod transform;

pub use binary::{ByteOrder, PathError, decode_path, encode_path};
pub use curve::{ConvCurve, DEFAULT_TOLERANCE};
pub use dash::ConvDash;
pub use marker::MarkerShape;
pub use source::{ElementSource, VertexSource, collect_elements};
pub use storage::PathStorage;
pub use stroke::{ConvStroke, DEFAULT_MITER_LIMIT};
pub use transform::{ConvTransform, ScaleTranslate};
