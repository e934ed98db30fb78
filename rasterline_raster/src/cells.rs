// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell accumulation for the scanline rasterizer.
//!
//! Edges are walked in 24.8 fixed point. Every pixel an edge crosses gets a
//! cell holding the signed vertical extent of the edge inside it (`cover`)
//! and twice the signed area between the edge and the cell's left side
//! (`area`). Sweeping a row from left to right and summing `cover` gives the
//! winding of every pixel, and `area` corrects the pixels that edges pass
//! through.

use alloc::vec::Vec;

/// Bits of subpixel precision.
pub(crate) const SUBPIXEL_SHIFT: i32 = 8;
/// Subpixels per pixel.
pub(crate) const SUBPIXEL_SCALE: i32 = 1 << SUBPIXEL_SHIFT;
const SUBPIXEL_MASK: i32 = SUBPIXEL_SCALE - 1;

/// Lines wider than this are split in two so intermediate products stay in range.
const DX_LIMIT: i64 = 16384 << SUBPIXEL_SHIFT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) cover: i32,
    pub(crate) area: i32,
}

impl Cell {
    const EMPTY: Self = Self {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };
}

/// The cells of every line added since the last reset.
#[derive(Clone, Debug)]
pub(crate) struct CellBuffer {
    cells: Vec<Cell>,
    current: Cell,
    sorted: bool,
}

impl Default for CellBuffer {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            current: Cell::EMPTY,
            sorted: true,
        }
    }
}

impl CellBuffer {
    pub(crate) fn reset(&mut self) {
        self.cells.clear();
        self.current = Cell::EMPTY;
        self.sorted = true;
    }

    fn flush_current(&mut self) {
        if self.current.area | self.current.cover != 0 {
            self.cells.push(self.current);
            self.sorted = false;
        }
    }

    fn set_current(&mut self, x: i32, y: i32) {
        if self.current.x != x || self.current.y != y {
            self.flush_current();
            self.current = Cell {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    /// The part of a line within pixel row `ey`, with `y1`/`y2` as subpixel
    /// offsets inside that row.
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> SUBPIXEL_SHIFT;
        let ex2 = x2 >> SUBPIXEL_SHIFT;
        let fx1 = x1 & SUBPIXEL_MASK;
        let fx2 = x2 & SUBPIXEL_MASK;

        if y1 == y2 {
            self.set_current(ex2, ey);
            return;
        }

        if ex1 == ex2 {
            let delta = y2 - y1;
            self.current.cover += delta;
            self.current.area += (fx1 + fx2) * delta;
            return;
        }

        // The line crosses several cells of this row.
        let dy = i64::from(y2 - y1);
        let mut p = i64::from(SUBPIXEL_SCALE - fx1) * dy;
        let mut first = SUBPIXEL_SCALE;
        let mut incr = 1;
        let mut dx = i64::from(x2) - i64::from(x1);
        if dx < 0 {
            p = i64::from(fx1) * dy;
            first = 0;
            incr = -1;
            dx = -dx;
        }

        let (mut delta, mut modulo) = floor_div(p, dx);
        self.current.cover += delta;
        self.current.area += (fx1 + first) * delta;

        let mut ex = ex1 + incr;
        self.set_current(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            let (lift, rem) = floor_div(i64::from(SUBPIXEL_SCALE) * (dy), dx);
            modulo -= dx;
            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.current.cover += delta;
                self.current.area += SUBPIXEL_SCALE * delta;
                y += delta;
                ex += incr;
                self.set_current(ex, ey);
            }
        }
        delta = y2 - y;
        self.current.cover += delta;
        self.current.area += (fx2 + SUBPIXEL_SCALE - first) * delta;
    }

    /// Accumulate a line between two points in subpixel coordinates.
    pub(crate) fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = i64::from(x2) - i64::from(x1);
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = midpoint(x1, x2);
            let cy = midpoint(y1, y2);
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = i64::from(y2) - i64::from(y1);
        let ex1 = x1 >> SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> SUBPIXEL_SHIFT;
        let ey2 = y2 >> SUBPIXEL_SHIFT;
        let fy1 = y1 & SUBPIXEL_MASK;
        let fy2 = y2 & SUBPIXEL_MASK;

        self.set_current(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        let mut incr = 1;

        if dx == 0 {
            // Vertical line: one cell per row, all with the same area factor.
            let two_fx = (x1 - (ex1 << SUBPIXEL_SHIFT)) << 1;
            let mut first = SUBPIXEL_SCALE;
            if dy < 0 {
                first = 0;
                incr = -1;
            }
            let mut delta = first - fy1;
            self.current.cover += delta;
            self.current.area += two_fx * delta;
            ey1 += incr;
            self.set_current(ex1, ey1);

            delta = first + first - SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.current.cover = delta;
                self.current.area = area;
                ey1 += incr;
                self.set_current(ex1, ey1);
            }
            delta = fy2 - SUBPIXEL_SCALE + first;
            self.current.cover += delta;
            self.current.area += two_fx * delta;
            return;
        }

        // General case: split into one horizontal run per pixel row.
        let mut p = i64::from(SUBPIXEL_SCALE - fy1) * dx;
        let mut first = SUBPIXEL_SCALE;
        let mut dy_abs = dy;
        if dy < 0 {
            p = i64::from(fy1) * dx;
            first = 0;
            incr = -1;
            dy_abs = -dy;
        }

        let (mut delta, mut modulo) = floor_div(p, dy_abs);
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        ey1 += incr;
        self.set_current(x_from >> SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            let (lift, rem) = floor_div(i64::from(SUBPIXEL_SCALE) * dx, dy_abs);
            modulo -= dy_abs;
            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_current(x_from >> SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, SUBPIXEL_SCALE - first, x2, fy2);
    }

    /// Flush the cell under construction and sort all cells by row, then
    /// column. Cells sharing a position are kept; the sweep sums them.
    pub(crate) fn sorted_cells(&mut self) -> &[Cell] {
        self.flush_current();
        self.current = Cell::EMPTY;
        if !self.sorted {
            self.cells.sort_unstable_by_key(|c| (c.y, c.x));
            self.sorted = true;
        }
        &self.cells
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell, flushed or under construction, carries coverage.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.current.area | self.current.cover == 0
    }
}

/// Floor division returning the non-negative remainder.
#[allow(
    clippy::cast_possible_truncation,
    reason = "quotients are bounded by the subpixel scale times DX_LIMIT"
)]
fn floor_div(p: i64, d: i64) -> (i32, i64) {
    let mut q = p / d;
    let mut r = p % d;
    if r < 0 {
        q -= 1;
        r += d;
    }
    (q as i32, r)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the mean of two i32 values fits in an i32"
)]
fn midpoint(a: i32, b: i32) -> i32 {
    ((i64::from(a) + i64::from(b)) >> 1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(v: i32) -> i32 {
        v << SUBPIXEL_SHIFT
    }

    fn row_total(cells: &[Cell], y: i32) -> i32 {
        cells.iter().filter(|c| c.y == y).map(|c| c.cover).sum()
    }

    #[test]
    fn vertical_edge_covers_each_row_fully() {
        let mut buf = CellBuffer::default();
        buf.line(px(2), px(1), px(2), px(4));
        let cells = buf.sorted_cells().to_vec();
        assert_eq!(cells.len(), 3);
        for (row, cell) in (1..4).zip(&cells) {
            assert_eq!((cell.x, cell.y), (2, row));
            assert_eq!(cell.cover, SUBPIXEL_SCALE);
            assert_eq!(cell.area, 0, "edge sits on the cell's left side");
        }
    }

    #[test]
    fn upward_edges_have_negative_cover() {
        let mut buf = CellBuffer::default();
        buf.line(px(2), px(4), px(2), px(1));
        let cells = buf.sorted_cells();
        assert!(cells.iter().all(|c| c.cover == -SUBPIXEL_SCALE));
    }

    #[test]
    fn diagonal_cover_sums_to_row_height() {
        let mut buf = CellBuffer::default();
        buf.line(px(0), px(0), px(7), px(3));
        let cells = buf.sorted_cells().to_vec();
        for y in 0..3 {
            assert_eq!(row_total(&cells, y), SUBPIXEL_SCALE, "row {y}");
        }
        assert!(cells.windows(2).all(|w| (w[0].y, w[0].x) <= (w[1].y, w[1].x)));
    }

    #[test]
    fn horizontal_lines_add_no_cells() {
        let mut buf = CellBuffer::default();
        buf.line(px(0), px(3), px(9), px(3));
        assert!(buf.is_empty());
        assert!(buf.sorted_cells().is_empty());
    }

    #[test]
    fn very_wide_lines_are_split() {
        let mut buf = CellBuffer::default();
        buf.line(0, 0, px(40_000), px(2));
        let cells = buf.sorted_cells().to_vec();
        assert_eq!(row_total(&cells, 0) + row_total(&cells, 1), 2 * SUBPIXEL_SCALE);
    }
}
