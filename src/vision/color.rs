//! Color space conversion and range thresholding.
//!
//! HSV values use the 8-bit convention common to camera pipelines: hue is
//! degrees halved (0..=179), saturation and value span 0..=255.

use ndarray::{Array2, Array3, ArrayView3, Zip};

use crate::vision::frame::Frame;

/// Inclusive per-channel HSV range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl HsvRange {
    pub const fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.low[c] <= hsv[c] && hsv[c] <= self.high[c])
    }
}

/// Convert one BGR pixel to 8-bit HSV.
pub fn bgr_to_hsv([b, g, r]: [u8; 3]) -> [u8; 3] {
    let (b, g, r) = (b as i32, g as i32, r as i32);
    let v = b.max(g).max(r);
    let min = b.min(g).min(r);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff as f32 / v as f32).round() as i32
    };

    let h = if diff == 0 {
        0
    } else {
        // Sector offsets are in units of 60 degrees, scaled by `diff`.
        let sector = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let h = (30.0 * sector as f32 / diff as f32).round() as i32;
        if h < 0 { h + 180 } else { h }
    };

    [h.clamp(0, 179) as u8, s.clamp(0, 255) as u8, v as u8]
}

/// Convert a whole frame to HSV, keeping the `(rows, cols, 3)` layout.
pub fn to_hsv(frame: &Frame) -> Array3<u8> {
    let bgr = frame.view();
    let (rows, cols, _) = bgr.dim();
    let mut hsv = Array3::zeros((rows, cols, 3));
    for row in 0..rows {
        for col in 0..cols {
            let converted = bgr_to_hsv(frame.pixel(row, col));
            for c in 0..3 {
                hsv[[row, col, c]] = converted[c];
            }
        }
    }
    hsv
}

/// Binary mask that is `true` where the HSV pixel lies inside `range`.
pub fn in_range(hsv: ArrayView3<'_, u8>, range: &HsvRange) -> Array2<bool> {
    let (rows, cols, _) = hsv.dim();
    let mut mask = Array2::from_elem((rows, cols), false);
    Zip::from(&mut mask)
        .and(hsv.lanes(ndarray::Axis(2)))
        .for_each(|m, px| *m = range.contains([px[0], px[1], px[2]]));
    mask
}
