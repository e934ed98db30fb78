// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary PPM export.

use alloc::vec::Vec;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::buffer::{DEPTH, RenderingBuffer};

/// Write `buffer` as a binary PPM (`P6`) image, dropping alpha.
pub fn write_ppm<W: Write>(buffer: &RenderingBuffer, mut out: W) -> io::Result<()> {
    write!(out, "P6 {} {} 255 ", buffer.width(), buffer.height())?;
    let mut rgb = Vec::with_capacity(buffer.width() as usize * 3);
    for y in 0..buffer.height() {
        let Some(row) = buffer.row(y) else { break };
        rgb.clear();
        for px in row.chunks_exact(DEPTH) {
            rgb.extend_from_slice(&px[..3]);
        }
        out.write_all(&rgb)?;
    }
    out.flush()
}

/// Write `buffer` to a PPM file at `path`, replacing any existing file.
pub fn save_ppm(buffer: &RenderingBuffer, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    log::debug!("writing {}x{} PPM to {}", buffer.width(), buffer.height(), path.display());
    write_ppm(buffer, BufWriter::new(File::create(path)?))
}
