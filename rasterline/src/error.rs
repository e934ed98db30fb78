// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::io;

use rasterline_geometry::PathError;
use rasterline_raster::BufferError;

use crate::pipeline::BufferMode;

/// Errors produced by pipelines and sessions.
#[derive(Debug)]
pub enum Error {
    /// A binary path could not be decoded.
    MalformedPath(PathError),
    /// Pixel storage for a `width` × `height` buffer could not be allocated.
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
    /// A handle was released, never issued, or refers to the wrong kind of
    /// object.
    InvalidHandle,
    /// A draw named a target that the pipeline's buffer mode does not allow.
    TargetMismatch {
        /// The mode the pipeline was created with.
        mode: BufferMode,
    },
    /// Writing an image failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPath(err) => err.fmt(f),
            Self::OutOfMemory { width, height } => {
                write!(f, "out of memory allocating a {width}x{height} buffer")
            }
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "buffer size mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::InvalidHandle => f.write_str("invalid or released handle"),
            Self::TargetMismatch { mode } => match mode {
                BufferMode::Owned => {
                    f.write_str("pipeline owns its buffer and cannot draw into another one")
                }
                BufferMode::External => {
                    f.write_str("pipeline has no buffer of its own; pass a target buffer")
                }
            },
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::MalformedPath(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Self::MalformedPath(err)
    }
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::OutOfMemory { width, height } => Self::OutOfMemory { width, height },
            BufferError::DimensionMismatch { expected, found } => {
                Self::DimensionMismatch { expected, found }
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
