// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compact binary path format.
//!
//! A binary path is a flat byte stream of records:
//!
//! | Command        | Opcode | Payload                 |
//! |----------------|--------|-------------------------|
//! | Stop           | `0x00` | none                    |
//! | MoveTo         | `0x01` | `x: f32`, `y: f32`      |
//! | LineTo         | `0x02` | `x: f32`, `y: f32`      |
//! | ClosePolygon   | `0x4F` | none                    |
//!
//! Decoding stops at the first Stop record or at the end of the stream,
//! whichever comes first. Coordinates are little-endian unless
//! [`ByteOrder::BigEndian`] is requested.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{PathEl, Point};

use crate::source::VertexSource;
use crate::storage::PathStorage;

/// Opcode terminating a path.
pub const OP_STOP: u8 = 0x00;
/// Opcode starting a subpath.
pub const OP_MOVE_TO: u8 = 0x01;
/// Opcode adding a straight segment.
pub const OP_LINE_TO: u8 = 0x02;
/// Opcode closing the current subpath.
pub const OP_CLOSE: u8 = 0x4F;

/// Byte order of the `f32` coordinates in a binary path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    LittleEndian,
    /// Most significant byte first.
    BigEndian,
}

impl ByteOrder {
    fn read_f32(self, bytes: [u8; 4]) -> f32 {
        match self {
            Self::LittleEndian => f32::from_le_bytes(bytes),
            Self::BigEndian => f32::from_be_bytes(bytes),
        }
    }

    fn write_f32(self, v: f32) -> [u8; 4] {
        match self {
            Self::LittleEndian => v.to_le_bytes(),
            Self::BigEndian => v.to_be_bytes(),
        }
    }
}

/// Why a binary path could not be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Malformed {
    /// A record started with a byte that is not a known opcode.
    UnknownOpcode(u8),
    /// A vertex record ended before both coordinates were read.
    Truncated,
}

/// Errors produced while decoding a binary path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    /// The record starting at `offset` is not well formed.
    MalformedPath {
        /// Byte offset of the offending record.
        offset: usize,
        /// What was wrong with it.
        reason: Malformed,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPath {
                offset,
                reason: Malformed::UnknownOpcode(op),
            } => write!(f, "malformed path: unknown opcode {op:#04x} at byte {offset}"),
            Self::MalformedPath {
                offset,
                reason: Malformed::Truncated,
            } => write!(f, "malformed path: truncated vertex record at byte {offset}"),
        }
    }
}

impl core::error::Error for PathError {}

/// Bounds-checked sequential reader over a byte slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn u8(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn f32(&mut self, order: ByteOrder) -> Option<f32> {
        let end = self.pos.checked_add(4)?;
        let chunk: [u8; 4] = self.bytes.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(order.read_f32(chunk))
    }
}

/// Decode a binary path into a single-path [`PathStorage`].
///
/// ```
/// use kurbo::{PathEl, Point};
/// use rasterline_geometry::{decode_path, ByteOrder};
///
/// let mut bytes = vec![0x01];
/// bytes.extend_from_slice(&1.0_f32.to_le_bytes());
/// bytes.extend_from_slice(&2.0_f32.to_le_bytes());
/// bytes.push(0x00);
///
/// let path = decode_path(&bytes, ByteOrder::LittleEndian).unwrap();
/// assert_eq!(path.elements(), &[PathEl::MoveTo(Point::new(1.0, 2.0))]);
/// ```
pub fn decode_path(bytes: &[u8], order: ByteOrder) -> Result<PathStorage, PathError> {
    let mut cursor = Cursor::new(bytes);
    // Every vertex record is nine bytes.
    let mut path = PathStorage::with_capacity(bytes.len() / 9 + 1);
    loop {
        let offset = cursor.pos;
        let Some(op) = cursor.u8() else {
            break;
        };
        match op {
            OP_STOP => break,
            OP_CLOSE => path.close_polygon(),
            OP_MOVE_TO | OP_LINE_TO => {
                let truncated = PathError::MalformedPath {
                    offset,
                    reason: Malformed::Truncated,
                };
                let x = cursor.f32(order).ok_or(truncated)?;
                let y = cursor.f32(order).ok_or(truncated)?;
                let p = Point::new(f64::from(x), f64::from(y));
                if op == OP_MOVE_TO {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            other => {
                return Err(PathError::MalformedPath {
                    offset,
                    reason: Malformed::UnknownOpcode(other),
                });
            }
        }
    }
    Ok(path)
}

/// Encode path `path_id` of `source` in the binary format, ending with Stop.
///
/// The format has no curve records: quadratic and cubic segments are written
/// as a line to their end point, so flatten curved input with
/// [`ConvCurve`](crate::ConvCurve) first.
pub fn encode_path<S: VertexSource + ?Sized>(
    source: &mut S,
    path_id: u32,
    order: ByteOrder,
) -> Vec<u8> {
    let mut out = Vec::new();
    source.rewind(path_id);
    while let Some(el) = source.vertex() {
        match el {
            PathEl::MoveTo(p) => push_vertex(&mut out, OP_MOVE_TO, p, order),
            PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                push_vertex(&mut out, OP_LINE_TO, p, order);
            }
            PathEl::ClosePath => out.push(OP_CLOSE),
        }
    }
    out.push(OP_STOP);
    out
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the binary format stores f32 coordinates"
)]
fn push_vertex(out: &mut Vec<u8>, op: u8, p: Point, order: ByteOrder) {
    out.push(op);
    out.extend_from_slice(&order.write_f32(p.x as f32));
    out.extend_from_slice(&order.write_f32(p.y as f32));
}
