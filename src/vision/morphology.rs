//! Binary morphology with a square, all-ones structuring element.
//!
//! A `size` x `size` square is the chessboard (L-infinity) ball of radius
//! `size / 2`, so the work is done by `imageproc`'s distance-transform
//! morphology. Pixels outside the mask never influence the result: dilation
//! treats them as background and erosion as foreground, so a shape touching
//! the border survives a closing unchanged. `size` is expected to be odd.

use imageproc::distance_transform::Norm;
use imageproc::morphology;
use ndarray::{Array2, ArrayView2};

use crate::vision::mask::{from_gray_image, to_gray_image};

/// Dilate `mask` with a `size` x `size` square anchored at its center.
pub fn dilate(mask: ArrayView2<'_, bool>, size: usize) -> Array2<bool> {
    let image = to_gray_image(mask, 0);
    from_gray_image(&morphology::dilate(&image, Norm::LInf, radius(size)))
}

/// Erode `mask` with a `size` x `size` square anchored at its center.
pub fn erode(mask: ArrayView2<'_, bool>, size: usize) -> Array2<bool> {
    let image = to_gray_image(mask, 0);
    from_gray_image(&morphology::erode(&image, Norm::LInf, radius(size)))
}

/// Dilate then erode once each: fills holes and gaps narrower than the
/// element without growing the outer boundary.
pub fn close(mask: ArrayView2<'_, bool>, size: usize) -> Array2<bool> {
    let image = to_gray_image(mask, 0);
    let k = radius(size);
    let dilated = morphology::dilate(&image, Norm::LInf, k);
    from_gray_image(&morphology::erode(&dilated, Norm::LInf, k))
}

#[inline]
fn radius(size: usize) -> u8 {
    u8::try_from(size / 2).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(rows: usize, cols: usize, r: std::ops::Range<usize>, c: std::ops::Range<usize>) -> Array2<bool> {
        Array2::from_shape_fn((rows, cols), |(y, x)| r.contains(&y) && c.contains(&x))
    }

    #[test]
    fn test_dilate_grows_by_half_kernel() {
        let mask = square(11, 11, 5..6, 5..6);
        let dilated = dilate(mask.view(), 5);
        assert_eq!(dilated.iter().filter(|&&v| v).count(), 25);
        assert!(dilated[[3, 3]] && dilated[[7, 7]]);
        assert!(!dilated[[2, 5]]);
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let mask = square(6, 6, 0..1, 0..1);
        let dilated = dilate(mask.view(), 5);
        assert_eq!(dilated, square(6, 6, 0..3, 0..3));
    }

    #[test]
    fn test_erode_removes_thin_features() {
        let mask = square(10, 10, 2..8, 4..7);
        let eroded = erode(mask.view(), 5);
        assert!(eroded.iter().all(|&v| !v));
    }

    #[test]
    fn test_erode_keeps_full_mask() {
        let mask = Array2::from_elem((4, 4), true);
        assert_eq!(erode(mask.view(), 5), mask);
    }

    #[test]
    fn test_close_fills_holes() {
        let mut mask = square(16, 16, 4..12, 4..12);
        mask[[7, 7]] = false;
        mask[[8, 8]] = false;
        let closed = close(mask.view(), 5);
        assert_eq!(closed, square(16, 16, 4..12, 4..12));
    }

    #[test]
    fn test_close_keeps_border_shapes() {
        let mask = square(8, 10, 0..8, 0..3);
        let closed = close(mask.view(), 5);
        assert_eq!(closed, mask);

        let corner = square(8, 10, 5..8, 6..10);
        assert_eq!(close(corner.view(), 5), corner);
    }

    #[test]
    fn test_close_bridges_narrow_gap() {
        let mut mask = square(6, 20, 0..6, 0..8);
        for r in 0..6 {
            for c in 12..20 {
                mask[[r, c]] = true;
            }
        }
        let closed = close(mask.view(), 5);
        assert!(closed.iter().all(|&v| v));
    }
}
