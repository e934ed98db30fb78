// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing coverage and images into a [`RenderingBuffer`].

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::buffer::{DEPTH, RenderingBuffer};
use crate::color::Rgba8;
use crate::comp_op::CompOp;
use crate::error::BufferError;
use crate::rasterizer::Scanline;

/// Blend `color` into `buffer` through the coverage of `scanlines`.
///
/// Each covered pixel becomes `op.blend(dst, color, coverage)`. Parts of
/// spans outside the buffer are skipped, as are all pixels with no coverage,
/// so [`CompOp::Dst`] leaves the buffer untouched and [`CompOp::Clear`] only
/// clears what the shape covers.
pub fn render_scanlines(
    buffer: &mut RenderingBuffer,
    scanlines: &[Scanline],
    color: Rgba8,
    op: CompOp,
) {
    if op == CompOp::Dst {
        return;
    }
    let width = i64::from(buffer.width());
    let mut pixels = 0_usize;
    for line in scanlines {
        let Ok(y) = u32::try_from(line.y) else {
            continue;
        };
        let Some(row) = buffer.row_mut(y) else {
            continue;
        };
        for span in &line.spans {
            let x0 = i64::from(span.x);
            for (x, &cover) in (x0..).zip(&span.covers) {
                if x < 0 || cover == 0 {
                    continue;
                }
                if x >= width {
                    break;
                }
                let Ok(i) = usize::try_from(x) else {
                    continue;
                };
                blend_at(row, i, color, cover, op);
                pixels += 1;
            }
        }
    }
    log::trace!("blended {pixels} pixels with {op}");
}

fn blend_at(row: &mut [u8], x: usize, color: Rgba8, cover: u8, op: CompOp) {
    let start = x * DEPTH;
    if let Some(px) = row.get_mut(start..start + DEPTH) {
        let dst = Rgba8::new(px[0], px[1], px[2], px[3]);
        px.copy_from_slice(&op.blend(dst, color, cover).to_array());
    }
}

/// Blend every pixel of `src` into `dst` at `opacity`, which is clamped to
/// `0.0..=1.0`.
///
/// Both buffers must have the same size.
pub fn composite(
    dst: &mut RenderingBuffer,
    src: &RenderingBuffer,
    op: CompOp,
    opacity: f64,
) -> Result<(), BufferError> {
    if (dst.width(), dst.height()) != (src.width(), src.height()) {
        return Err(BufferError::DimensionMismatch {
            expected: (dst.width(), dst.height()),
            found: (src.width(), src.height()),
        });
    }
    let cover = opacity_to_cover(opacity);
    log::debug!(
        "compositing {}x{} with {op} at cover {cover}",
        src.width(),
        src.height()
    );
    if cover == 0 || op == CompOp::Dst {
        return Ok(());
    }
    for (d, s) in dst
        .as_bytes_mut()
        .chunks_exact_mut(DEPTH)
        .zip(src.as_bytes().chunks_exact(DEPTH))
    {
        let out = op.blend(
            Rgba8::new(d[0], d[1], d[2], d[3]),
            Rgba8::new(s[0], s[1], s[2], s[3]),
            cover,
        );
        d.copy_from_slice(&out.to_array());
    }
    Ok(())
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to 0..=255 before the cast"
)]
fn opacity_to_cover(opacity: f64) -> u8 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
