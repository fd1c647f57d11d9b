//! The size constraint pushed from a parent into a node.

use std::fmt;

use trellis_core::{
    greater_or_equal_to_infinity, CalcSize, OptionalSizeF, ScaleProperty, SizeF,
};

fn is_legal(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Min/max/ideal bounds for one node.
///
/// `self_ideal_size`, when set, lies within `[min_size, max_size]` once
/// `LayoutProperty::update_layout_constraint` has run. `percent_reference` is
/// what percentage lengths of this node resolve against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraintF {
    pub scale_property: ScaleProperty,
    pub min_size: SizeF,
    pub max_size: SizeF,
    pub percent_reference: SizeF,
    pub parent_ideal_size: OptionalSizeF,
    pub self_ideal_size: OptionalSizeF,
}

impl Default for LayoutConstraintF {
    fn default() -> Self {
        Self {
            scale_property: ScaleProperty::default(),
            min_size: SizeF::default(),
            max_size: SizeF::infinite(),
            percent_reference: SizeF::default(),
            parent_ideal_size: OptionalSizeF::default(),
            self_ideal_size: OptionalSizeF::default(),
        }
    }
}

impl LayoutConstraintF {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Deflate every size field by the given edges.
    pub fn minus_padding(
        &mut self,
        left: Option<f32>,
        right: Option<f32>,
        top: Option<f32>,
        bottom: Option<f32>,
    ) {
        self.min_size.minus_padding(left, right, top, bottom);
        self.max_size.minus_padding(left, right, top, bottom);
        self.percent_reference.minus_padding(left, right, top, bottom);
        self.parent_ideal_size.minus_padding(left, right, top, bottom);
        self.self_ideal_size.minus_padding(left, right, top, bottom);
    }

    /// Tighten `max_size` toward `size`. Axes that are illegal, would loosen
    /// the current max, or would drop below `min_size` are ignored.
    pub fn update_max_size_with_check(&mut self, size: SizeF) -> bool {
        let mut changed = false;
        if is_legal(size.width) && size.width < self.max_size.width && size.width >= self.min_size.width {
            self.max_size.width = size.width;
            changed = true;
        }
        if is_legal(size.height) && size.height < self.max_size.height && size.height >= self.min_size.height {
            self.max_size.height = size.height;
            changed = true;
        }
        changed
    }

    /// Raise `min_size` toward `size`. Axes that are illegal, would lower the
    /// current min, or would exceed `max_size` are ignored.
    pub fn update_min_size_with_check(&mut self, size: SizeF) -> bool {
        let mut changed = false;
        if is_legal(size.width) && size.width > self.min_size.width && size.width <= self.max_size.width {
            self.min_size.width = size.width;
            changed = true;
        }
        if is_legal(size.height) && size.height > self.min_size.height && size.height <= self.max_size.height {
            self.min_size.height = size.height;
            changed = true;
        }
        changed
    }

    /// Fill the unset axes of `self_ideal_size` from `size`, skipping illegal values.
    pub fn update_illegal_self_ideal_size_with_check(&mut self, size: &OptionalSizeF) -> bool {
        let legal = OptionalSizeF::new(
            size.width.filter(|v| is_legal(*v)),
            size.height.filter(|v| is_legal(*v)),
        );
        self.self_ideal_size.update_illegal_size_with_check(&legal)
    }

    pub fn update_percent_reference(&mut self, size: SizeF) -> bool {
        if self.percent_reference == size {
            return false;
        }
        self.percent_reference = size;
        true
    }

    /// Pre-adjust the constraint for an aspect ratio before the node's own
    /// resolution runs.
    ///
    /// When the author fixed one axis (`user_size`), that axis drives the other
    /// for ideal, min, max and parent-ideal sizes. Otherwise an existing ideal
    /// width (then height) drives the other axis, and failing that the max
    /// size is narrowed to the ratio.
    pub fn apply_aspect_ratio(&mut self, ratio: f32, user_size: Option<&CalcSize>) {
        if !(ratio.is_finite() && ratio > 0.0) {
            return;
        }
        let use_defined_width = user_size.and_then(|size| {
            if size.width.is_some() {
                Some(true)
            } else if size.height.is_some() {
                Some(false)
            } else {
                None
            }
        });
        match use_defined_width {
            Some(true) => {
                if let Some(width) = self.self_ideal_size.width {
                    self.self_ideal_size.height = Some(width / ratio);
                }
                self.min_size.height = self.min_size.width / ratio;
                self.max_size.height = self.max_size.width / ratio;
                if let Some(width) = self.parent_ideal_size.width {
                    self.parent_ideal_size.height = Some(width / ratio);
                }
                return;
            }
            Some(false) => {
                if let Some(height) = self.self_ideal_size.height {
                    self.self_ideal_size.width = Some(height * ratio);
                }
                self.min_size.width = self.min_size.height * ratio;
                self.max_size.width = self.max_size.height * ratio;
                if let Some(height) = self.parent_ideal_size.height {
                    self.parent_ideal_size.width = Some(height * ratio);
                }
                return;
            }
            None => {
                if let Some(width) = self.self_ideal_size.width {
                    self.self_ideal_size.height = Some(width / ratio);
                    return;
                }
                if let Some(height) = self.self_ideal_size.height {
                    self.self_ideal_size.width = Some(height * ratio);
                    return;
                }
            }
        }

        let width_unbounded = greater_or_equal_to_infinity(self.max_size.width);
        let height_unbounded = greater_or_equal_to_infinity(self.max_size.height);
        if width_unbounded && height_unbounded {
            return;
        }
        if !width_unbounded && (height_unbounded || self.max_size.width / ratio < self.max_size.height) {
            self.max_size.height = self.max_size.width / ratio;
        } else {
            self.max_size.width = self.max_size.height * ratio;
        }
    }

    /// Clamp `size` into `[min_size, max_size]`.
    pub fn constrain(&self, size: SizeF) -> SizeF {
        let mut size = size;
        size.constrain(self.min_size, self.max_size);
        size
    }

    /// Equality that can skip the percent reference on either axis.
    pub fn equal_without_percent(&self, other: &LayoutConstraintF, ignore_width: bool, ignore_height: bool) -> bool {
        let reference_equal = (ignore_width || self.percent_reference.width == other.percent_reference.width)
            && (ignore_height || self.percent_reference.height == other.percent_reference.height);
        reference_equal
            && self.scale_property == other.scale_property
            && self.min_size == other.min_size
            && self.max_size == other.max_size
            && self.parent_ideal_size == other.parent_ideal_size
            && self.self_ideal_size == other.self_ideal_size
    }

    pub fn equal_without_percent_width(&self, other: &LayoutConstraintF) -> bool {
        self.equal_without_percent(other, true, false)
    }

    pub fn equal_without_percent_height(&self, other: &LayoutConstraintF) -> bool {
        self.equal_without_percent(other, false, true)
    }
}

impl fmt::Display for LayoutConstraintF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minSize: {}, maxSize: {}, percentReference: {}, parentIdealSize: {}, selfIdealSize: {}",
            self.min_size, self.max_size, self.percent_reference, self.parent_ideal_size, self.self_ideal_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::CalcLength;

    fn bounded(max_w: f32, max_h: f32) -> LayoutConstraintF {
        LayoutConstraintF {
            max_size: SizeF::new(max_w, max_h),
            ..Default::default()
        }
    }

    #[test]
    fn test_max_size_with_check_only_tightens() {
        let mut c = bounded(100.0, 100.0);
        c.min_size = SizeF::new(10.0, 10.0);
        assert!(c.update_max_size_with_check(SizeF::new(50.0, 200.0)));
        assert_eq!(c.max_size, SizeF::new(50.0, 100.0));
        assert!(!c.update_max_size_with_check(SizeF::new(5.0, -1.0)));
        assert!(!c.update_max_size_with_check(SizeF::new(f32::NAN, f32::INFINITY)));
        assert_eq!(c.max_size, SizeF::new(50.0, 100.0));
    }

    #[test]
    fn test_min_size_with_check_respects_max() {
        let mut c = bounded(100.0, 100.0);
        assert!(c.update_min_size_with_check(SizeF::new(20.0, 150.0)));
        assert_eq!(c.min_size, SizeF::new(20.0, 0.0));
    }

    #[test]
    fn test_illegal_self_ideal_fills_unset_only() {
        let mut c = LayoutConstraintF::default();
        c.self_ideal_size.width = Some(5.0);
        assert!(c.update_illegal_self_ideal_size_with_check(&OptionalSizeF::new(Some(9.0), Some(-3.0))));
        assert_eq!(c.self_ideal_size, OptionalSizeF::new(Some(5.0), None));
    }

    #[test]
    fn test_minus_padding_deflates_every_field() {
        let mut c = bounded(100.0, 80.0);
        c.min_size = SizeF::new(10.0, 10.0);
        c.percent_reference = SizeF::new(100.0, 80.0);
        c.parent_ideal_size = OptionalSizeF::new(Some(100.0), None);
        c.self_ideal_size = OptionalSizeF::new(None, Some(4.0));
        c.minus_padding(Some(5.0), Some(5.0), Some(3.0), Some(3.0));
        assert_eq!(c.max_size, SizeF::new(90.0, 74.0));
        assert_eq!(c.min_size, SizeF::new(0.0, 4.0));
        assert_eq!(c.percent_reference, SizeF::new(90.0, 74.0));
        assert_eq!(c.parent_ideal_size, OptionalSizeF::new(Some(90.0), None));
        assert_eq!(c.self_ideal_size, OptionalSizeF::new(None, Some(0.0)));
    }

    #[test]
    fn test_apply_aspect_ratio_narrows_max() {
        let mut c = bounded(200.0, 300.0);
        c.apply_aspect_ratio(2.0, None);
        assert_eq!(c.max_size, SizeF::new(200.0, 100.0));

        let mut tall = bounded(200.0, 50.0);
        tall.apply_aspect_ratio(2.0, None);
        assert_eq!(tall.max_size, SizeF::new(100.0, 50.0));

        let mut unbounded = LayoutConstraintF::default();
        unbounded.apply_aspect_ratio(2.0, None);
        assert_eq!(unbounded.max_size, SizeF::infinite());
    }

    #[test]
    fn test_apply_aspect_ratio_user_height() {
        let mut c = bounded(200.0, 300.0);
        c.self_ideal_size.height = Some(40.0);
        c.min_size = SizeF::new(0.0, 10.0);
        let user = CalcSize::new(None, Some(CalcLength::px(40.0)));
        c.apply_aspect_ratio(0.5, Some(&user));
        assert_eq!(c.self_ideal_size.width, Some(20.0));
        assert_eq!(c.min_size.width, 5.0);
        assert_eq!(c.max_size.width, 150.0);
    }

    #[test]
    fn test_apply_aspect_ratio_ignores_bad_ratio() {
        let mut c = bounded(200.0, 300.0);
        c.apply_aspect_ratio(0.0, None);
        c.apply_aspect_ratio(f32::NAN, None);
        assert_eq!(c, bounded(200.0, 300.0));
    }

    #[test]
    fn test_equal_without_percent_width() {
        let mut a = bounded(100.0, 100.0);
        let mut b = a;
        a.percent_reference = SizeF::new(10.0, 5.0);
        b.percent_reference = SizeF::new(99.0, 5.0);
        assert!(a.equal_without_percent_width(&b));
        assert!(!a.equal_without_percent_height(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let mut c = bounded(10.0, 10.0);
        c.self_ideal_size.width = Some(2.0);
        insta::assert_snapshot!(
            c.to_string(),
            @"minSize: [0.00 x 0.00], maxSize: [10.00 x 10.00], percentReference: [0.00 x 0.00], parentIdealSize: [NA x NA], selfIdealSize: [2.00 x NA]"
        );
    }
}
