mod analyzer;
mod color;
mod contour;
mod frame;
mod mask;
mod morphology;
mod reading;
mod region;

pub use analyzer::{
    BOTTOM_REGION, CROP_TOP, FINISH_AREA, HSV_HIGH, HSV_LOW, KERNEL_SIZE, LEFT_REGION, LINE_COLOR,
    MIN_CONTOUR_AREA, MIN_FRAME_HEIGHT, MIN_FRAME_WIDTH, RIGHT_REGION, TOP_REGION, analyze,
};
pub use color::{HsvRange, bgr_to_hsv, in_range, to_hsv};
pub use contour::{Contour, Moments, find_contours, find_largest_contour};
pub use frame::{CHANNELS, Frame, FrameBuilder};
pub use morphology::{close, dilate, erode};
pub use reading::{IntersectionCode, IntersectionReading};
pub use region::Region;
