/// Intersection classification for one frame.
///
/// Codes 0 to 7 are a bitmask of visible paths; 8 marks the finish and never
/// carries path bits.
///
/// | Code | Meaning |
/// |------|---------|
/// | 0 | dead end |
/// | +1 | path to the left |
/// | +2 | path forward |
/// | +4 | path to the right |
/// | 8 | finish marker |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntersectionCode(u8);

impl IntersectionCode {
    pub const DEAD_END: Self = Self(0);
    pub const LEFT: u8 = 1;
    pub const FORWARD: u8 = 2;
    pub const RIGHT: u8 = 4;
    pub const FINISH: Self = Self(8);

    /// Combine the visible paths into a code.
    pub fn from_paths(left: bool, forward: bool, right: bool) -> Self {
        let mut code = 0;
        if left {
            code += Self::LEFT;
        }
        if forward {
            code += Self::FORWARD;
        }
        if right {
            code += Self::RIGHT;
        }
        Self(code)
    }

    /// Raw numeric value, 0 to 8.
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_finish(self) -> bool {
        self == Self::FINISH
    }

    #[inline]
    pub fn is_dead_end(self) -> bool {
        self == Self::DEAD_END
    }

    #[inline]
    pub fn has_left(self) -> bool {
        !self.is_finish() && self.0 & Self::LEFT != 0
    }

    #[inline]
    pub fn has_forward(self) -> bool {
        !self.is_finish() && self.0 & Self::FORWARD != 0
    }

    #[inline]
    pub fn has_right(self) -> bool {
        !self.is_finish() && self.0 & Self::RIGHT != 0
    }
}

impl From<IntersectionCode> for u8 {
    fn from(code: IntersectionCode) -> Self {
        code.0
    }
}

/// Result of analyzing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntersectionReading {
    /// Visible paths or finish marker
    pub code: IntersectionCode,
    /// Horizontal line position at the bottom of the frame, from 1.0 (full
    /// left) to -1.0 (full right); 0.0 when centered or not visible
    pub bottom_offset: f32,
}

impl IntersectionReading {
    pub fn new(code: IntersectionCode, bottom_offset: f32) -> Self {
        Self {
            code,
            bottom_offset,
        }
    }
}
