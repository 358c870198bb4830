//! Contour extraction from binary masks.
//!
//! Each 8-connected foreground component yields one contour: the ordered
//! outer boundary through pixel centers, as traced by `imageproc`. Holes are
//! skipped since a hole boundary never encloses more area than the outer
//! boundary around it.

use imageproc::contours::{self, BorderType};
use nalgebra::Point2;
use ndarray::ArrayView2;

use crate::vision::mask::to_gray_image;

/// Background pixels added around a mask before tracing.
const PADDING: u32 = 1;

/// Spatial moments of a contour polygon, up to first order.
///
/// `m00` is the signed polygon area; its sign follows the winding order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

/// Closed polygon tracing the boundary of one foreground component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Boundary vertices, x = column and y = row
    points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed polygon area (shoelace formula).
    pub fn area(&self) -> f64 {
        let (twice_area, _, _) = self.moment_sums();
        twice_area.unsigned_abs() as f64 / 2.0
    }

    pub fn moments(&self) -> Moments {
        let (a2, s10, s01) = self.moment_sums();
        Moments {
            m00: a2 as f64 / 2.0,
            m10: s10 as f64 / 6.0,
            m01: s01 as f64 / 6.0,
        }
    }

    /// Center of mass of the enclosed polygon, or `None` for a degenerate
    /// (zero-area) contour.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        let (a2, s10, s01) = self.moment_sums();
        if a2 == 0 {
            return None;
        }
        // m10 / m00 == s10 / (3 * a2); dividing exact integers keeps
        // symmetric shapes on exact pixel centers.
        let denom = 3.0 * a2 as f64;
        Some(Point2::new(s10 as f64 / denom, s01 as f64 / denom))
    }

    /// Integer sums behind the moments: twice the signed area, 6 * m10 and
    /// 6 * m01.
    fn moment_sums(&self) -> (i64, i64, i64) {
        let n = self.points.len();
        if n < 3 {
            return (0, 0, 0);
        }
        let mut a2 = 0i64;
        let mut s10 = 0i64;
        let mut s01 = 0i64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (x0, y0, x1, y1) = (p.x as i64, p.y as i64, q.x as i64, q.y as i64);
            let cross = x0 * y1 - x1 * y0;
            a2 += cross;
            s10 += cross * (x0 + x1);
            s01 += cross * (y0 + y1);
        }
        (a2, s10, s01)
    }
}

/// Extract the outer contour of every 8-connected foreground component,
/// ordered by the raster position of each component's first pixel.
pub fn find_contours(mask: ArrayView2<'_, bool>) -> Vec<Contour> {
    // imageproc never starts a border on the outermost ring of the image, so
    // the mask is traced inside a background frame and shifted back.
    let image = to_gray_image(mask, PADDING);
    let offset = PADDING as i32;
    contours::find_contours::<i32>(&image)
        .into_iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer))
        .map(|contour| {
            let points = contour
                .points
                .iter()
                .map(|p| Point2::new(p.x - offset, p.y - offset))
                .collect();
            Contour::new(points)
        })
        .collect()
}

/// Return the largest-area contour in `mask` if its area is at least
/// `min_area`.
///
/// Ties go to the contour found first.
pub fn find_largest_contour(mask: ArrayView2<'_, bool>, min_area: f64) -> Option<Contour> {
    let mut best: Option<(f64, Contour)> = None;
    for contour in find_contours(mask) {
        let area = contour.area();
        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, contour));
        }
    }
    match best {
        Some((area, contour)) if area >= min_area => Some(contour),
        _ => None,
    }
}
