use std::ops::Range;

use ndarray::{ArrayView2, s};

/// Fixed rectangular sub-window of a mask.
///
/// Bounds are half-open pixel indices: rows `top..bottom`, columns
/// `left..right`. A `None` end extends to the edge of the mask. Bounds are
/// clamped to the mask shape, so a region never indexes out of range and may
/// come out empty on a small mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    /// First row (inclusive)
    pub top: usize,
    /// Last row (exclusive), or the mask edge
    pub bottom: Option<usize>,
    /// First column (inclusive)
    pub left: usize,
    /// Last column (exclusive), or the mask edge
    pub right: Option<usize>,
}

impl Region {
    #[inline]
    pub const fn new(top: usize, bottom: Option<usize>, left: usize, right: Option<usize>) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Row range of this region within a mask of `rows` rows.
    #[inline]
    pub fn rows(&self, rows: usize) -> Range<usize> {
        clamp(self.top, self.bottom, rows)
    }

    /// Column range of this region within a mask of `cols` columns.
    #[inline]
    pub fn cols(&self, cols: usize) -> Range<usize> {
        clamp(self.left, self.right, cols)
    }

    /// Width in pixels once clamped to a mask of `cols` columns.
    #[inline]
    pub fn width(&self, cols: usize) -> usize {
        self.cols(cols).len()
    }

    /// Borrow the part of `mask` covered by this region.
    pub fn view<'a>(&self, mask: ArrayView2<'a, bool>) -> ArrayView2<'a, bool> {
        let (rows, cols) = mask.dim();
        let r = self.rows(rows);
        let c = self.cols(cols);
        mask.slice_move(s![r, c])
    }
}

fn clamp(start: usize, end: Option<usize>, len: usize) -> Range<usize> {
    let end = end.unwrap_or(len).min(len);
    let start = start.min(end);
    start..end
}
