// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterline Raster: coverage, pixels and blending.
//!
//! This crate turns fillable outlines into pixels:
//!
//! - [`Rasterizer`] accumulates polygon edges in 24.8 fixed point and sweeps
//!   them into [`Scanline`]s of per-pixel coverage, under the non-zero or
//!   even-odd [`Fill`](peniko::Fill) rule.
//! - [`RenderingBuffer`] is a fixed-size RGBA8 image with straight alpha.
//! - [`render_scanlines`] blends a solid [`Rgba8`] into a buffer through that
//!   coverage using one of the 28 [`CompOp`] operators, and [`composite`]
//!   blends a whole buffer into another.
//! - [`write_ppm`] and [`save_ppm`] dump a buffer as a binary PPM image.
//!   They need the `std` feature, which is on by default.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Shape};
//! use rasterline_geometry::PathStorage;
//! use rasterline_raster::{CompOp, Rasterizer, RenderingBuffer, Rgba8, render_scanlines};
//!
//! let mut buffer = RenderingBuffer::with_background(10, 10, Rgba8::WHITE).unwrap();
//! let mut square = PathStorage::from_bez_path(&Rect::new(2.0, 2.0, 8.0, 8.0).to_path(0.1));
//!
//! let mut ras = Rasterizer::with_size(buffer.width(), buffer.height());
//! ras.add_path(&mut square, 0);
//! render_scanlines(&mut buffer, &ras.sweep(), Rgba8::BLACK, CompOp::SrcOver);
//!
//! assert_eq!(buffer.pixel(5, 5), Some(Rgba8::BLACK));
//! assert_eq!(buffer.pixel(0, 0), Some(Rgba8::WHITE));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature
//! instead of `std` for float math without the standard library.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod buffer;
mod cells;
mod color;
mod comp_op;
mod compositor;
mod error;
#[cfg(feature = "std")]
mod ppm;
mod rasterizer;

pub use buffer::RenderingBuffer;
pub use color::Rgba8;
pub use comp_op::CompOp;
pub use compositor::{composite, render_scanlines};
pub use error::BufferError;
#[cfg(feature = "std")]
pub use ppm::{save_ppm, write_ppm};
pub use rasterizer::{Rasterizer, Scanline, Span};
