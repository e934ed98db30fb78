// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The RGBA8 pixel buffer.

use alloc::vec::Vec;

use crate::color::Rgba8;
use crate::error::BufferError;

/// Bytes per pixel.
pub const DEPTH: usize = 4;

/// A fixed-size, row-major RGBA8 pixel buffer with straight alpha.
///
/// The storage is allocated once, in [`RenderingBuffer::new`], and never
/// resized. Rows are `width * 4` bytes apart, top row first.
///
/// ```
/// use rasterline_raster::{Rgba8, RenderingBuffer};
///
/// let mut buf = RenderingBuffer::new(4, 2).unwrap();
/// buf.set_background(Rgba8::new(1, 2, 3, 4));
/// assert!(buf.to_packed().iter().all(|&px| px == 0x0102_0304));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RenderingBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderingBuffer {
    /// Allocate a zeroed (transparent black) buffer.
    ///
    /// Fails with [`BufferError::OutOfMemory`] if the byte size overflows
    /// `usize` or the allocation is refused.
    pub fn new(width: u32, height: u32) -> Result<Self, BufferError> {
        let oom = BufferError::OutOfMemory { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(DEPTH))
            .filter(|&len| isize::try_from(len).is_ok())
            .ok_or(oom)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| oom)?;
        data.resize(len, 0);
        log::trace!("allocated {width}x{height} rendering buffer ({len} bytes)");
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a buffer filled with `color`.
    pub fn with_background(width: u32, height: u32, color: Rgba8) -> Result<Self, BufferError> {
        let mut buf = Self::new(width, height)?;
        buf.set_background(color);
        Ok(buf)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel, always 4.
    pub fn depth(&self) -> usize {
        DEPTH
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * DEPTH
    }

    /// Overwrite every pixel with `color`, without blending.
    pub fn set_background(&mut self, color: Rgba8) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(DEPTH) {
            chunk.copy_from_slice(&px);
        }
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * DEPTH;
        let p = self.data.get(i..i + DEPTH)?;
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * DEPTH;
        if let Some(p) = self.data.get_mut(i..i + DEPTH) {
            p.copy_from_slice(&color.to_array());
        }
    }

    /// The bytes of row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    /// The bytes of row `y`, mutably.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get_mut(start..start + stride)
    }

    /// All pixel bytes, row-major, R, G, B, A per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// All pixel bytes, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One `u32` per pixel, packed `0xRRGGBBAA`, row-major from the top.
    pub fn to_packed(&self) -> Vec<u32> {
        self.data
            .chunks_exact(DEPTH)
            .map(|p| u32::from_be_bytes([p[0], p[1], p[2], p[3]]))
            .collect()
    }
}

impl core::fmt::Debug for RenderingBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderingBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish_non_exhaustive()
    }
}
