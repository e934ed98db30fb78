// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Errors produced when creating or combining rendering buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The pixel storage for a `width` × `height` buffer could not be
    /// allocated, or its size does not fit in memory.
    OutOfMemory {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Two buffers that must have the same size do not.
    DimensionMismatch {
        /// Size of the destination, as `(width, height)`.
        expected: (u32, u32),
        /// Size of the source, as `(width, height)`.
        found: (u32, u32),
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { width, height } => {
                write!(f, "out of memory allocating a {width}x{height} buffer")
            }
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "buffer size mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl core::error::Error for BufferError {}
