//! BGR camera frames and a builder for synthetic test frames.

use ndarray::{Array3, ArrayView3, s};

use crate::error::FrameError;

/// Number of color channels in a frame (blue, green, red).
pub const CHANNELS: usize = 3;

/// A color image in BGR channel order, laid out as `(rows, cols, channel)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Array3<u8>,
}

impl Frame {
    /// Create an all-black frame.
    pub fn black(width: usize, height: usize) -> Self {
        Self {
            pixels: Array3::zeros((height, width, CHANNELS)),
        }
    }

    /// Wrap an existing `(rows, cols, 3)` array.
    pub fn from_array(pixels: Array3<u8>) -> Result<Self, FrameError> {
        let channels = pixels.dim().2;
        if channels != CHANNELS {
            return Err(FrameError::BadChannels { channels });
        }
        Ok(Self { pixels })
    }

    /// Build a frame from an interleaved BGR byte buffer, row-major.
    pub fn from_bgr_bytes(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), data).map_err(|_| {
            FrameError::BufferSize {
                expected,
                got: expected,
            }
        })?;
        Ok(Self { pixels })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    /// BGR value of the pixel at (`row`, `col`).
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.pixels[[row, col, 0]],
            self.pixels[[row, col, 1]],
            self.pixels[[row, col, 2]],
        ]
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }
}

/// Builder for synthetic frames made of solid-color rectangles.
///
/// Rectangles are given in frame pixel coordinates and clipped to the frame.
/// Later rectangles paint over earlier ones.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    /// Start from an all-black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: Frame::black(width, height),
        }
    }

    /// Paint the whole frame with one BGR color.
    pub fn fill(self, bgr: [u8; 3]) -> Self {
        let (width, height) = (self.frame.width(), self.frame.height());
        self.rect(0, 0, width, height, bgr)
    }

    /// Paint a `width` x `height` rectangle whose top-left pixel is (`x`, `y`).
    pub fn rect(mut self, x: usize, y: usize, width: usize, height: usize, bgr: [u8; 3]) -> Self {
        let x1 = (x + width).min(self.frame.width());
        let y1 = (y + height).min(self.frame.height());
        if x >= x1 || y >= y1 {
            return self;
        }
        let mut area = self.frame.pixels.slice_mut(s![y..y1, x..x1, ..]);
        for mut pixel in area.lanes_mut(ndarray::Axis(2)) {
            pixel[0] = bgr[0];
            pixel[1] = bgr[1];
            pixel[2] = bgr[2];
        }
        self
    }

    /// Build the final `Frame`.
    pub fn build(self) -> Frame {
        self.frame
    }
}
