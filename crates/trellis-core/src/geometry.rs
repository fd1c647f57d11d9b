//! Geometry primitives for constraint resolution.
//!
//! Sizes are `f32` device pixels. An "infinite" extent is represented by the
//! finite sentinel [`INFINITY`] so that subtracting padding from an unbounded
//! axis stays well-defined.

use glam::Vec2;

/// Sentinel used for an unbounded axis.
pub const INFINITY: f32 = 1_000_000.0;

const EPSILON: f32 = 0.001;

/// An offset in pixels, relative to the parent frame unless noted otherwise.
pub type OffsetF = Vec2;

/// Whether `value` should be treated as unbounded.
pub fn greater_or_equal_to_infinity(value: f32) -> bool {
    value >= INFINITY / 2.0
}

/// Approximate float equality used throughout layout.
pub fn near_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size that is unbounded on both axes.
    pub const fn infinite() -> Self {
        Self::new(INFINITY, INFINITY)
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    /// Both axes are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Both axes are zero or greater.
    pub fn is_non_negative(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Subtract edge thicknesses, never going below zero.
    pub fn minus_padding(
        &mut self,
        left: Option<f32>,
        right: Option<f32>,
        top: Option<f32>,
        bottom: Option<f32>,
    ) {
        self.width = (self.width - left.unwrap_or(0.0) - right.unwrap_or(0.0)).max(0.0);
        self.height = (self.height - top.unwrap_or(0.0) - bottom.unwrap_or(0.0)).max(0.0);
    }

    /// Add edge thicknesses.
    pub fn add_padding(
        &mut self,
        left: Option<f32>,
        right: Option<f32>,
        top: Option<f32>,
        bottom: Option<f32>,
    ) {
        self.width += left.unwrap_or(0.0) + right.unwrap_or(0.0);
        self.height += top.unwrap_or(0.0) + bottom.unwrap_or(0.0);
    }

    /// Clamp into `[min, max]` per axis. `max` wins when the range is inverted.
    pub fn constrain(&mut self, min: SizeF, max: SizeF) {
        self.width = self.width.max(min.width).min(max.width);
        self.height = self.height.max(min.height).min(max.height);
    }

    /// Grow each axis to at least `other`.
    pub fn update_size_when_larger(&mut self, other: SizeF) {
        self.width = self.width.max(other.width);
        self.height = self.height.max(other.height);
    }

    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl std::fmt::Display for SizeF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.2} x {:.2}]", self.width, self.height)
    }
}

/// A size whose axes may each be unset. Unset is distinct from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionalSizeF {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl OptionalSizeF {
    pub const fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    pub fn set_width(&mut self, width: Option<f32>) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: Option<f32>) {
        self.height = height;
    }

    pub fn reset(&mut self) {
        self.width = None;
        self.height = None;
    }

    /// Neither axis is set.
    pub fn is_null(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Both axes are set.
    pub fn is_valid(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Fill in whichever axes are unset from `other`. Returns whether anything changed.
    pub fn update_illegal_size_with_check(&mut self, other: &OptionalSizeF) -> bool {
        let mut changed = false;
        if self.width.is_none() && other.width.is_some() {
            self.width = other.width;
            changed = true;
        }
        if self.height.is_none() && other.height.is_some() {
            self.height = other.height;
            changed = true;
        }
        changed
    }

    /// Shrink set axes that exceed `size`. Negative components of `size` are ignored.
    pub fn update_size_when_smaller(&mut self, size: SizeF) {
        if let Some(width) = self.width {
            if size.width >= 0.0 && width > size.width {
                self.width = Some(size.width);
            }
        }
        if let Some(height) = self.height {
            if size.height >= 0.0 && height > size.height {
                self.height = Some(size.height);
            }
        }
    }

    /// Grow set axes that fall short of `size`.
    pub fn update_size_when_larger(&mut self, size: SizeF) {
        if let Some(width) = self.width {
            if width < size.width {
                self.width = Some(size.width);
            }
        }
        if let Some(height) = self.height {
            if height < size.height {
                self.height = Some(size.height);
            }
        }
    }

    /// Subtract edge thicknesses from the set axes, clamped at zero.
    pub fn minus_padding(
        &mut self,
        left: Option<f32>,
        right: Option<f32>,
        top: Option<f32>,
        bottom: Option<f32>,
    ) {
        if let Some(width) = self.width {
            self.width = Some((width - left.unwrap_or(0.0) - right.unwrap_or(0.0)).max(0.0));
        }
        if let Some(height) = self.height {
            self.height = Some((height - top.unwrap_or(0.0) - bottom.unwrap_or(0.0)).max(0.0));
        }
    }

    /// Resolve to a concrete size, using `fallback` for unset axes.
    pub fn with_default(&self, fallback: SizeF) -> SizeF {
        SizeF::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }
}

impl From<SizeF> for OptionalSizeF {
    fn from(size: SizeF) -> Self {
        Self::new(Some(size.width), Some(size.height))
    }
}

impl std::fmt::Display for OptionalSizeF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let axis = |v: Option<f32>| v.map_or_else(|| "NA".to_string(), |v| format!("{:.2}", v));
        write!(f, "[{} x {}]", axis(self.width), axis(self.height))
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rect from an offset and a size.
    pub fn from_offset_size(offset: OffsetF, size: SizeF) -> Self {
        Self::new(offset.x, offset.y, size.width, size.height)
    }

    pub fn offset(&self) -> OffsetF {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    pub fn set_offset(&mut self, offset: OffsetF) {
        self.x = offset.x;
        self.y = offset.y;
    }

    pub fn set_size(&mut self, size: SizeF) {
        self.width = size.width;
        self.height = size.height;
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Translate the rect by `offset`.
    pub fn translated(&self, offset: OffsetF) -> RectF {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Check if a point is inside the rect.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

impl std::fmt::Display for RectF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RectF ({:.2}, {:.2}) - [{:.2} x {:.2}]",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_minus_padding_clamps() {
        let mut size = SizeF::new(10.0, 4.0);
        size.minus_padding(Some(2.0), Some(3.0), Some(3.0), Some(3.0));
        assert!(near_equal(size.width, 5.0));
        assert!(near_equal(size.height, 0.0));
    }

    #[test]
    fn test_infinite_minus_padding_stays_unbounded() {
        let mut size = SizeF::infinite();
        size.minus_padding(Some(10.0), None, None, Some(20.0));
        assert!(greater_or_equal_to_infinity(size.width));
        assert!(greater_or_equal_to_infinity(size.height));
    }

    #[test]
    fn test_optional_size_fill_illegal() {
        let mut size = OptionalSizeF::new(Some(3.0), None);
        let changed = size.update_illegal_size_with_check(&OptionalSizeF::new(Some(9.0), Some(7.0)));
        assert!(changed);
        assert_eq!(size, OptionalSizeF::new(Some(3.0), Some(7.0)));
        assert!(!size.update_illegal_size_with_check(&OptionalSizeF::new(Some(1.0), Some(1.0))));
    }

    #[test]
    fn test_optional_size_clamps_only_set_axes() {
        let mut size = OptionalSizeF::new(Some(50.0), None);
        size.update_size_when_smaller(SizeF::new(20.0, 5.0));
        assert_eq!(size, OptionalSizeF::new(Some(20.0), None));
        size.update_size_when_larger(SizeF::new(30.0, 100.0));
        assert_eq!(size, OptionalSizeF::new(Some(30.0), None));
    }

    #[test]
    fn test_rect_edges() {
        let rect = RectF::from_offset_size(OffsetF::new(10.0, 20.0), SizeF::new(100.0, 50.0));
        assert!(near_equal(rect.right(), 110.0));
        assert!(near_equal(rect.bottom(), 70.0));
        assert!(rect.contains(50.0, 40.0));
        assert!(!rect.contains(5.0, 40.0));
        let moved = rect.translated(OffsetF::new(-10.0, 5.0));
        assert!(near_equal(moved.left(), 0.0));
        assert!(near_equal(moved.top(), 25.0));
    }

    #[test]
    fn test_optional_size_display() {
        insta::assert_snapshot!(OptionalSizeF::new(Some(2.0), None).to_string(), @"[2.00 x NA]");
    }
}
