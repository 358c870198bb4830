//! Single-frame line analysis.
//!
//! The calibration values below are tied to the camera resolution and
//! mounting (128x96 frames looking down at green tape) and are not meant to
//! be tuned at runtime.

use ndarray::s;
use tracing::debug;

use crate::error::AnalysisError;
use crate::vision::color::{HsvRange, in_range, to_hsv};
use crate::vision::contour::find_largest_contour;
use crate::vision::frame::Frame;
use crate::vision::morphology::close;
use crate::vision::reading::{IntersectionCode, IntersectionReading};
use crate::vision::region::Region;

/// Rows above this index are discarded before thresholding.
pub const CROP_TOP: usize = 36;

/// HSV band of the line color (green tape), inclusive.
pub const HSV_LOW: [u8; 3] = [45, 50, 50];
pub const HSV_HIGH: [u8; 3] = [80, 255, 255];
pub const LINE_COLOR: HsvRange = HsvRange::new(HSV_LOW, HSV_HIGH);

/// Side of the square structuring element used to close the mask.
pub const KERNEL_SIZE: usize = 5;

/// Contours smaller than this are treated as noise.
pub const MIN_CONTOUR_AREA: f64 = 10.0;
/// Top and bottom areas at or above this mark the finish.
pub const FINISH_AREA: f64 = 200.0;

/// Regions of the cropped mask.
pub const TOP_REGION: Region = Region::new(0, Some(8), 8, Some(120));
pub const BOTTOM_REGION: Region = Region::new(52, None, 8, Some(120));
pub const LEFT_REGION: Region = Region::new(0, None, 0, Some(8));
pub const RIGHT_REGION: Region = Region::new(0, None, 120, None);

/// Smallest frame the region layout fits in.
pub const MIN_FRAME_WIDTH: usize = 128;
pub const MIN_FRAME_HEIGHT: usize = CROP_TOP + 60;

/// Classify the intersection visible in `frame` and locate the line at the
/// bottom of the frame.
///
/// # Errors
/// Returns [`AnalysisError::FrameTooSmall`] when the frame is smaller than
/// [`MIN_FRAME_WIDTH`] x [`MIN_FRAME_HEIGHT`].
pub fn analyze(frame: &Frame) -> Result<IntersectionReading, AnalysisError> {
    if frame.width() < MIN_FRAME_WIDTH || frame.height() < MIN_FRAME_HEIGHT {
        return Err(AnalysisError::FrameTooSmall {
            width: frame.width(),
            height: frame.height(),
            min_width: MIN_FRAME_WIDTH,
            min_height: MIN_FRAME_HEIGHT,
        });
    }

    let hsv = to_hsv(frame);
    let cropped = hsv.slice(s![CROP_TOP.., .., ..]);
    let raw_mask = in_range(cropped, &LINE_COLOR);
    let mask = close(raw_mask.view(), KERNEL_SIZE);
    let cols = mask.ncols();

    let top = find_largest_contour(TOP_REGION.view(mask.view()), MIN_CONTOUR_AREA);
    let bottom = find_largest_contour(BOTTOM_REGION.view(mask.view()), MIN_CONTOUR_AREA);
    let left = find_largest_contour(LEFT_REGION.view(mask.view()), MIN_CONTOUR_AREA);
    let right = find_largest_contour(RIGHT_REGION.view(mask.view()), MIN_CONTOUR_AREA);

    let bottom = bottom.and_then(|c| Some((c.centroid()?, c.area())));
    let (bottom_offset, area_bottom) = match bottom {
        Some((centroid, area)) => {
            let half_width = BOTTOM_REGION.width(cols) as f32 / 2.0;
            let cx = centroid.x.trunc() as f32;
            ((half_width - cx) / half_width, area)
        }
        None => (0.0, 0.0),
    };
    let area_top = top.as_ref().map_or(0.0, |c| c.area());

    let code = if area_top >= FINISH_AREA && area_bottom >= FINISH_AREA {
        IntersectionCode::FINISH
    } else {
        IntersectionCode::from_paths(left.is_some(), top.is_some(), right.is_some())
    };

    debug!(
        code = code.value(),
        bottom_offset, area_top, area_bottom, "frame analyzed"
    );

    Ok(IntersectionReading::new(code, bottom_offset.clamp(-1.0, 1.0)))
}
