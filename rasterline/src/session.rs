// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle-based access to buffers and pipelines.
//!
//! A [`Session`] owns every buffer and pipeline it creates and hands out
//! plain integer-convertible handles, the shape a foreign-function layer
//! needs. Every call validates its handles: released, stale, never-issued
//! and wrong-kind handles fail with [`Error::InvalidHandle`] instead of
//! touching memory.

use std::path::Path;

use rasterline_geometry::{ScaleTranslate, VertexSource};
use rasterline_raster::{CompOp, RenderingBuffer, Rgba8, save_ppm};

use crate::error::Error;
use crate::handle::{Handle, HandleTable};
use crate::pipeline::{BufferMode, DrawTarget, Pipeline, PipelineConfig};
use crate::style::{LineStyle, PointStyle, PolyStyle};

const BUFFER_KIND: u8 = 1;
const PIPELINE_KIND: u8 = 2;

/// Names a buffer owned by a [`Session`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BufferHandle(Handle);

/// Names a pipeline owned by a [`Session`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PipelineHandle(Handle);

macro_rules! raw_conversions {
    ($ty:ident) => {
        impl $ty {
            /// The handle as an opaque non-zero integer.
            pub const fn to_raw(self) -> u64 {
                self.0.to_raw()
            }

            /// Rebuild a handle from [`to_raw`](Self::to_raw).
            ///
            /// Any value is accepted here; bogus ones are rejected by the
            /// session when used.
            pub const fn from_raw(raw: u64) -> Self {
                Self(Handle::from_raw(raw))
            }
        }
    };
}

raw_conversions!(BufferHandle);
raw_conversions!(PipelineHandle);

/// Owner of buffers and pipelines addressed by handles.
///
/// ```
/// use rasterline::{PolyStyle, Session};
/// use rasterline_geometry::PathStorage;
/// use rasterline_raster::Rgba8;
///
/// let mut session = Session::new();
/// let buffer = session.create_buffer(4, 4).unwrap();
/// let pipeline = session.create_pipeline();
///
/// let mut square = PathStorage::new();
/// square.move_to((0.0, 0.0));
/// square.line_to((4.0, 0.0));
/// square.line_to((4.0, 4.0));
/// square.line_to((0.0, 4.0));
/// square.close_polygon();
/// session
///     .draw_polygon(pipeline, Some(buffer), &mut square, 0, &PolyStyle::fill(Rgba8::BLACK))
///     .unwrap();
///
/// assert_eq!(session.data(buffer).unwrap(), vec![0x0000_00FF; 16]);
/// session.dispose_buffer(buffer).unwrap();
/// assert!(session.data(buffer).is_err());
/// ```
#[derive(Debug)]
pub struct Session {
    buffers: HandleTable<RenderingBuffer>,
    pipelines: HandleTable<Pipeline>,
    config: PipelineConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session whose pipelines use [`PipelineConfig::default`].
    pub const fn new() -> Self {
        Self::with_config(PipelineConfig::new())
    }

    /// A session whose new buffers and pipelines use `config`.
    pub const fn with_config(config: PipelineConfig) -> Self {
        Self {
            buffers: HandleTable::new(BUFFER_KIND),
            pipelines: HandleTable::new(PIPELINE_KIND),
            config,
        }
    }

    /// Settings given to pipelines created from now on.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Allocate a `width` × `height` buffer filled with the configured
    /// background.
    pub fn create_buffer(&mut self, width: u32, height: u32) -> Result<BufferHandle, Error> {
        let buffer = RenderingBuffer::with_background(width, height, self.config.background)?;
        let handle = BufferHandle(self.buffers.insert(buffer));
        log::debug!("created {width}x{height} buffer {:#x}", handle.to_raw());
        Ok(handle)
    }

    /// Create a pipeline that draws into session buffers named per call.
    pub fn create_pipeline(&mut self) -> PipelineHandle {
        PipelineHandle(self.pipelines.insert(Pipeline::new(self.config)))
    }

    /// Create a pipeline with its own `width` × `height` buffer.
    pub fn create_pipeline_with_buffer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<PipelineHandle, Error> {
        let pipeline = Pipeline::with_buffer(width, height, self.config)?;
        Ok(PipelineHandle(self.pipelines.insert(pipeline)))
    }

    /// Borrow a buffer.
    pub fn buffer(&self, buffer: BufferHandle) -> Result<&RenderingBuffer, Error> {
        self.buffers.get(buffer.0)
    }

    /// Borrow a buffer mutably.
    pub fn buffer_mut(&mut self, buffer: BufferHandle) -> Result<&mut RenderingBuffer, Error> {
        self.buffers.get_mut(buffer.0)
    }

    /// Borrow a pipeline.
    pub fn pipeline(&self, pipeline: PipelineHandle) -> Result<&Pipeline, Error> {
        self.pipelines.get(pipeline.0)
    }

    /// Replace a pipeline's transform with `x' = x*sx + tx`, `y' = y*sy + ty`.
    pub fn set_transform(
        &mut self,
        pipeline: PipelineHandle,
        sx: f64,
        sy: f64,
        tx: f64,
        ty: f64,
    ) -> Result<(), Error> {
        self.pipelines
            .get_mut(pipeline.0)?
            .set_transform(ScaleTranslate::new(sx, sy, tx, ty));
        Ok(())
    }

    /// Overwrite every pixel of a buffer with `color`.
    pub fn set_background(&mut self, buffer: BufferHandle, color: Rgba8) -> Result<(), Error> {
        self.buffers.get_mut(buffer.0)?.set_background(color);
        Ok(())
    }

    /// Overwrite every pixel of a pipeline's own buffer with `color`.
    pub fn set_pipeline_background(
        &mut self,
        pipeline: PipelineHandle,
        color: Rgba8,
    ) -> Result<(), Error> {
        let pipeline = self.pipelines.get_mut(pipeline.0)?;
        let mode = pipeline.mode();
        pipeline
            .buffer_mut()
            .ok_or(Error::TargetMismatch { mode })?
            .set_background(color);
        Ok(())
    }

    fn with_target<F>(
        &mut self,
        pipeline: PipelineHandle,
        target: Option<BufferHandle>,
        draw: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut Pipeline, DrawTarget<'_>) -> Result<(), Error>,
    {
        let pipeline = self.pipelines.get_mut(pipeline.0)?;
        let target = match target {
            Some(buffer) => DrawTarget::Buffer(self.buffers.get_mut(buffer.0)?),
            None => DrawTarget::Owned,
        };
        draw(pipeline, target)
    }

    /// Draw markers at the vertices of `source`'s path `path_id`.
    ///
    /// `target` names the buffer for external pipelines and must be `None`
    /// for pipelines with their own buffer.
    pub fn draw_point<S: VertexSource + ?Sized>(
        &mut self,
        pipeline: PipelineHandle,
        target: Option<BufferHandle>,
        source: &mut S,
        path_id: u32,
        style: &PointStyle,
    ) -> Result<(), Error> {
        self.with_target(pipeline, target, |p, t| p.draw_point(t, source, path_id, style))
    }

    /// Stroke `source`'s path `path_id`. See [`draw_point`](Self::draw_point)
    /// for `target`.
    pub fn draw_line<S: VertexSource + ?Sized>(
        &mut self,
        pipeline: PipelineHandle,
        target: Option<BufferHandle>,
        source: &mut S,
        path_id: u32,
        style: &LineStyle,
    ) -> Result<(), Error> {
        self.with_target(pipeline, target, |p, t| p.draw_line(t, source, path_id, style))
    }

    /// Fill and outline `source`'s path `path_id`. See
    /// [`draw_point`](Self::draw_point) for `target`.
    pub fn draw_polygon<S: VertexSource + ?Sized>(
        &mut self,
        pipeline: PipelineHandle,
        target: Option<BufferHandle>,
        source: &mut S,
        path_id: u32,
        style: &PolyStyle,
    ) -> Result<(), Error> {
        self.with_target(pipeline, target, |p, t| p.draw_polygon(t, source, path_id, style))
    }

    /// Blend all of `src` into `dst` with the operator called `op_name` at
    /// `opacity`.
    ///
    /// Unknown operator names fall back to `src`. `dst` and `src` may be the
    /// same buffer.
    pub fn composite(
        &mut self,
        dst: BufferHandle,
        src: BufferHandle,
        op_name: &str,
        opacity: f64,
    ) -> Result<(), Error> {
        let op = CompOp::from_name(op_name);
        log::debug!("compositing with {op} at opacity {opacity}");
        match self.buffers.pair_mut(dst.0, src.0)? {
            Some((dst, src)) => rasterline_raster::composite(dst, src, op, opacity)?,
            None => {
                let copy = self.buffers.get(src.0)?.clone();
                rasterline_raster::composite(self.buffers.get_mut(dst.0)?, &copy, op, opacity)?;
            }
        }
        Ok(())
    }

    /// The pixels of a buffer, one big-endian `0xRRGGBBAA` word each.
    pub fn data(&self, buffer: BufferHandle) -> Result<Vec<u32>, Error> {
        Ok(self.buffers.get(buffer.0)?.to_packed())
    }

    /// The pixels of a pipeline's own buffer, as [`data`](Self::data).
    pub fn pipeline_data(&self, pipeline: PipelineHandle) -> Result<Vec<u32>, Error> {
        let pipeline = self.pipelines.get(pipeline.0)?;
        pipeline
            .buffer()
            .map(RenderingBuffer::to_packed)
            .ok_or(Error::TargetMismatch {
                mode: BufferMode::External,
            })
    }

    /// Save a buffer as a binary PPM file.
    pub fn write_ppm(&self, buffer: BufferHandle, path: impl AsRef<Path>) -> Result<(), Error> {
        save_ppm(self.buffers.get(buffer.0)?, path)?;
        Ok(())
    }

    /// Release a buffer. Using the handle afterwards is an error.
    pub fn dispose_buffer(&mut self, buffer: BufferHandle) -> Result<(), Error> {
        self.buffers.remove(buffer.0)?;
        log::debug!("disposed buffer {:#x}", buffer.to_raw());
        Ok(())
    }

    /// Release a pipeline and its own buffer, if any.
    pub fn dispose_pipeline(&mut self, pipeline: PipelineHandle) -> Result<(), Error> {
        self.pipelines.remove(pipeline.0)?;
        log::debug!("disposed pipeline {:#x}", pipeline.to_raw());
        Ok(())
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live pipelines.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_of_one_kind_do_not_open_the_other() {
        let mut session = Session::new();
        let buffer = session.create_buffer(2, 2).unwrap();
        let pipeline = session.create_pipeline();
        let as_buffer = BufferHandle::from_raw(pipeline.to_raw());
        let as_pipeline = PipelineHandle::from_raw(buffer.to_raw());
        assert!(matches!(session.data(as_buffer), Err(Error::InvalidHandle)));
        assert!(matches!(
            session.set_transform(as_pipeline, 1.0, 1.0, 0.0, 0.0),
            Err(Error::InvalidHandle)
        ));
    }

    #[test]
    fn counts_track_dispose() {
        let mut session = Session::new();
        let a = session.create_buffer(1, 1).unwrap();
        let p = session.create_pipeline_with_buffer(1, 1).unwrap();
        assert_eq!((session.buffer_count(), session.pipeline_count()), (1, 1));
        session.dispose_buffer(a).unwrap();
        session.dispose_pipeline(p).unwrap();
        assert_eq!((session.buffer_count(), session.pipeline_count()), (0, 0));
        assert!(matches!(session.dispose_pipeline(p), Err(Error::InvalidHandle)));
    }

    #[test]
    fn self_composite_uses_a_snapshot() {
        let mut session = Session::new();
        let b = session.create_buffer(2, 1).unwrap();
        session.set_background(b, Rgba8::new(10, 20, 30, 255)).unwrap();
        session.composite(b, b, "plus", 1.0).unwrap();
        assert_eq!(session.buffer(b).unwrap().pixel(1, 0), Some(Rgba8::new(20, 40, 60, 255)));
    }

    #[test]
    fn pipeline_data_needs_an_owned_buffer() {
        let mut session = Session::new();
        let owned = session.create_pipeline_with_buffer(1, 2).unwrap();
        assert_eq!(session.pipeline_data(owned).unwrap(), vec![0xFFFF_FFFF; 2]);
        let external = session.create_pipeline();
        assert!(matches!(
            session.pipeline_data(external),
            Err(Error::TargetMismatch { mode: BufferMode::External })
        ));
    }
}
