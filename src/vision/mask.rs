//! Conversion between boolean masks and 8-bit grayscale images.

use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Render `mask` as a grayscale image surrounded by `border` background
/// pixels on every side.
pub(crate) fn to_gray_image(mask: ArrayView2<'_, bool>, border: u32) -> GrayImage {
    let (rows, cols) = mask.dim();
    let width = cols as u32 + 2 * border;
    let height = rows as u32 + 2 * border;
    GrayImage::from_fn(width, height, |x, y| {
        let set = x
            .checked_sub(border)
            .zip(y.checked_sub(border))
            .and_then(|(c, r)| mask.get((r as usize, c as usize)).copied())
            .unwrap_or(false);
        Luma([if set { FOREGROUND } else { BACKGROUND }])
    })
}

/// Any nonzero pixel is foreground.
pub(crate) fn from_gray_image(image: &GrayImage) -> Array2<bool> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
        image.get_pixel(c as u32, r as u32)[0] != BACKGROUND
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_background() {
        let mask = Array2::from_elem((2, 3), true);
        let image = to_gray_image(mask.view(), 1);
        assert_eq!(image.dimensions(), (5, 4));
        assert_eq!(image.get_pixel(0, 0)[0], BACKGROUND);
        assert_eq!(image.get_pixel(4, 3)[0], BACKGROUND);
        assert_eq!(image.get_pixel(1, 1)[0], FOREGROUND);
        assert_eq!(image.get_pixel(3, 2)[0], FOREGROUND);
    }

    #[test]
    fn test_mask_layout_survives_conversion() {
        let mut mask = Array2::from_elem((3, 4), false);
        mask[[0, 3]] = true;
        mask[[2, 1]] = true;
        let image = to_gray_image(mask.view(), 0);
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(from_gray_image(&image), mask);
    }
}
