// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterline: an anti-aliased 2D rendering pipeline.
//!
//! A [`Pipeline`] draws points, lines and polygons read from any
//! [`VertexSource`] into RGBA8 [`RenderingBuffer`]s:
//!
//! - every vertex is mapped through the pipeline's [`ScaleTranslate`],
//! - curves are flattened, lines are optionally dashed and then stroked into
//!   fillable outlines, and point vertices become [`MarkerShape`] outlines,
//! - outlines are rasterized into anti-aliased coverage and blended into the
//!   target with the style's [`CompOp`].
//!
//! Styles ([`LineStyle`], [`PolyStyle`], [`PointStyle`]) are plain data;
//! pipeline-wide defaults live in [`PipelineConfig`].
//!
//! For callers that cannot hold Rust references, such as a foreign-function
//! layer, [`Session`] owns buffers and pipelines behind checked handles.
//!
//! ## Example
//!
//! ```
//! use rasterline::{DrawTarget, LineStyle, Pipeline, PipelineConfig};
//! use rasterline_geometry::{PathStorage, ScaleTranslate};
//! use rasterline_raster::{RenderingBuffer, Rgba8};
//!
//! let mut buffer = RenderingBuffer::with_background(20, 20, Rgba8::WHITE).unwrap();
//! let mut pipeline = Pipeline::new(PipelineConfig::default());
//! pipeline.set_transform(ScaleTranslate::new(2.0, 2.0, 0.0, 0.0));
//!
//! let mut line = PathStorage::new();
//! line.move_to((1.0, 5.0));
//! line.line_to((9.0, 5.0));
//!
//! let style = LineStyle::new(Rgba8::BLACK, 4.0);
//! pipeline
//!     .draw_line(DrawTarget::Buffer(&mut buffer), &mut line, 0, &style)
//!     .unwrap();
//! assert_eq!(buffer.pixel(10, 9), Some(Rgba8::BLACK));
//! assert_eq!(buffer.pixel(10, 2), Some(Rgba8::WHITE));
//! ```
//!
//! ## Logging
//!
//! Draw calls report what they do through the [`log`] facade at `debug` and
//! `trace` level; rejected handles are reported at `warn` level.

mod error;
mod handle;
mod pipeline;
mod session;
mod style;

pub use error::Error;
pub use pipeline::{BufferMode, DrawTarget, Pipeline, PipelineConfig, PipelineState};
pub use session::{BufferHandle, PipelineHandle, Session};
pub use style::{LineStyle, PointStyle, PolyStyle};

pub use rasterline_geometry::{MarkerShape, ScaleTranslate, VertexSource};
pub use rasterline_raster::{CompOp, RenderingBuffer, Rgba8};
