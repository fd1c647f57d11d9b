//! Declared sizing intent of a node: box edges, size overrides, item hints.
//!
//! Everything here is author input. Resolution against a constraint happens
//! in `trellis-layout`.

use indexmap::IndexMap;

use crate::dimension::{CalcLength, CalcSize, ScaleProperty};

/// Four independently optional edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaddingProperty {
    pub top: Option<CalcLength>,
    pub right: Option<CalcLength>,
    pub bottom: Option<CalcLength>,
    pub left: Option<CalcLength>,
}

/// Margins share the edge representation of padding.
pub type MarginProperty = PaddingProperty;

/// Border widths share the edge representation of padding.
pub type BorderWidthProperty = PaddingProperty;

impl PaddingProperty {
    /// The same length on every edge.
    pub fn all(value: CalcLength) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// All four edges are set to the same length.
    pub fn uniform(&self) -> Option<CalcLength> {
        match (self.top, self.right, self.bottom, self.left) {
            (Some(t), Some(r), Some(b), Some(l)) if t == r && r == b && b == l => Some(t),
            _ => None,
        }
    }

    /// Resolve each edge to pixels. Percentages resolve against `percent_reference`
    /// (the reference width, for both axes).
    pub fn to_px(&self, scale: &ScaleProperty, percent_reference: f32) -> PaddingPropertyF {
        let edge = |v: Option<CalcLength>| v.and_then(|v| v.to_px(scale, percent_reference));
        PaddingPropertyF {
            left: edge(self.left),
            right: edge(self.right),
            top: edge(self.top),
            bottom: edge(self.bottom),
        }
    }

    /// Like [`to_px`](Self::to_px) but negative edges become zero.
    pub fn to_non_negative_px(&self, scale: &ScaleProperty, percent_reference: f32) -> PaddingPropertyF {
        let mut resolved = self.to_px(scale, percent_reference);
        for edge in [
            &mut resolved.left,
            &mut resolved.right,
            &mut resolved.top,
            &mut resolved.bottom,
        ] {
            if let Some(v) = edge {
                *v = v.max(0.0);
            }
        }
        resolved
    }
}

/// Edge thicknesses resolved to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddingPropertyF {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
    pub bottom: Option<f32>,
}

pub type MarginPropertyF = PaddingPropertyF;
pub type BorderWidthPropertyF = PaddingPropertyF;

impl PaddingPropertyF {
    /// Total horizontal thickness.
    pub fn width(&self) -> f32 {
        self.left.unwrap_or(0.0) + self.right.unwrap_or(0.0)
    }

    /// Total vertical thickness.
    pub fn height(&self) -> f32 {
        self.top.unwrap_or(0.0) + self.bottom.unwrap_or(0.0)
    }

    /// Edge-wise sum, treating unset as zero. An edge stays unset only when
    /// both sides leave it unset.
    pub fn combine(&self, other: &PaddingPropertyF) -> PaddingPropertyF {
        let sum = |a: Option<f32>, b: Option<f32>| match (a, b) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
        };
        PaddingPropertyF {
            left: sum(self.left, other.left),
            right: sum(self.right, other.right),
            top: sum(self.top, other.top),
            bottom: sum(self.bottom, other.bottom),
        }
    }
}

/// Aspect ratio and layout weight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicItemProperty {
    /// Width / height. Authoritative over an independently computed height.
    pub aspect_ratio: Option<f32>,
    pub layout_weight: Option<f32>,
}

impl MagicItemProperty {
    pub fn has_aspect_ratio(&self) -> bool {
        self.aspect_ratio.is_some()
    }
}

/// Author overrides for ideal, min and max size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureProperty {
    pub min_size: Option<CalcSize>,
    pub max_size: Option<CalcSize>,
    pub self_ideal_size: Option<CalcSize>,
}

/// Which axes a reset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelection {
    Width,
    Height,
    Both,
}

fn update_calc_size(slot: &mut Option<CalcSize>, value: &CalcSize) -> bool {
    match slot {
        Some(existing) => existing.update_size_with_check(value),
        None => {
            *slot = Some(*value);
            true
        }
    }
}

fn reset_calc_size(slot: &mut Option<CalcSize>, axes: AxisSelection) -> bool {
    let Some(size) = slot.as_mut() else {
        return false;
    };
    let before = *size;
    if matches!(axes, AxisSelection::Width | AxisSelection::Both) {
        size.width = None;
    }
    if matches!(axes, AxisSelection::Height | AxisSelection::Both) {
        size.height = None;
    }
    let changed = before != *size;
    if size.is_null() {
        *slot = None;
    }
    changed
}

impl MeasureProperty {
    pub fn update_self_ideal_size_with_check(&mut self, size: &CalcSize) -> bool {
        update_calc_size(&mut self.self_ideal_size, size)
    }

    pub fn update_min_size_with_check(&mut self, size: &CalcSize) -> bool {
        update_calc_size(&mut self.min_size, size)
    }

    pub fn update_max_size_with_check(&mut self, size: &CalcSize) -> bool {
        update_calc_size(&mut self.max_size, size)
    }

    pub fn clear_self_ideal_size(&mut self, axes: AxisSelection) -> bool {
        reset_calc_size(&mut self.self_ideal_size, axes)
    }

    pub fn reset_min_size(&mut self, axes: AxisSelection) -> bool {
        reset_calc_size(&mut self.min_size, axes)
    }

    pub fn reset_max_size(&mut self, axes: AxisSelection) -> bool {
        reset_calc_size(&mut self.max_size, axes)
    }

    pub fn is_empty(&self) -> bool {
        self.min_size.is_none() && self.max_size.is_none() && self.self_ideal_size.is_none()
    }
}

/// Cross-axis alignment of a flex item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexAlign {
    #[default]
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
}

impl FlexAlign {
    pub fn as_json_str(&self) -> &'static str {
        match self {
            FlexAlign::Auto => "ItemAlign.Auto",
            FlexAlign::FlexStart => "ItemAlign.Start",
            FlexAlign::Center => "ItemAlign.Center",
            FlexAlign::FlexEnd => "ItemAlign.End",
            FlexAlign::Stretch => "ItemAlign.Stretch",
            FlexAlign::Baseline => "ItemAlign.Baseline",
        }
    }

    /// Unknown names fall back to `Auto`.
    pub fn from_json_str(s: &str) -> Self {
        match s {
            "ItemAlign.Start" => FlexAlign::FlexStart,
            "ItemAlign.Center" => FlexAlign::Center,
            "ItemAlign.End" => FlexAlign::FlexEnd,
            "ItemAlign.Stretch" => FlexAlign::Stretch,
            "ItemAlign.Baseline" => FlexAlign::Baseline,
            _ => FlexAlign::Auto,
        }
    }
}

/// Edge of a relative-container child that an align rule pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignDirection {
    Left,
    Middle,
    Right,
    Top,
    Center,
    Bottom,
}

/// Which edge of the anchor an [`AlignRule`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorEdge {
    Start,
    Center,
    End,
}

/// Pins one edge of a node to an edge of a named anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignRule {
    pub anchor: String,
    pub edge: AnchorEdge,
}

/// Align rules in declaration order.
pub type AlignRulesMap = IndexMap<AlignDirection, AlignRule>;

/// Flex and relative-container item hints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlexItemProperty {
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Option<CalcLength>,
    pub align_self: Option<FlexAlign>,
    pub display_index: Option<i32>,
    pub align_rules: Option<AlignRulesMap>,
}

/// Breakpoint class a grid span/offset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridSizeType {
    Xs,
    Sm,
    Md,
    Lg,
    #[default]
    Undefined,
}

/// Span and offset for one breakpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTypedOption {
    pub span: Option<i32>,
    pub offset: Option<i32>,
}

/// Grid-container placement per breakpoint class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridProperty {
    options: IndexMap<GridSizeType, GridTypedOption>,
}

impl GridProperty {
    /// Set the span for `size_type`. Negative spans are ignored.
    pub fn update_span(&mut self, span: i32, size_type: GridSizeType) -> bool {
        if span < 0 {
            return false;
        }
        let option = self.options.entry(size_type).or_default();
        if option.span == Some(span) {
            return false;
        }
        option.span = Some(span);
        true
    }

    pub fn update_offset(&mut self, offset: i32, size_type: GridSizeType) -> bool {
        let option = self.options.entry(size_type).or_default();
        if option.offset == Some(offset) {
            return false;
        }
        option.offset = Some(offset);
        true
    }

    pub fn get(&self, size_type: GridSizeType) -> Option<&GridTypedOption> {
        self.options.get(&size_type)
    }
}

/// Two-axis alignment in `[-1, 1]`, where `-1` is start and `1` is end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Alignment {
    pub const TOP_LEFT: Self = Self::new(-1.0, -1.0);
    pub const TOP_CENTER: Self = Self::new(0.0, -1.0);
    pub const TOP_RIGHT: Self = Self::new(1.0, -1.0);
    pub const CENTER_LEFT: Self = Self::new(-1.0, 0.0);
    pub const CENTER: Self = Self::new(0.0, 0.0);
    pub const CENTER_RIGHT: Self = Self::new(1.0, 0.0);
    pub const BOTTOM_LEFT: Self = Self::new(-1.0, 1.0);
    pub const BOTTOM_CENTER: Self = Self::new(0.0, 1.0);
    pub const BOTTOM_RIGHT: Self = Self::new(1.0, 1.0);

    const NAMED: [(Self, &'static str); 9] = [
        (Self::TOP_LEFT, "Alignment.TopStart"),
        (Self::TOP_CENTER, "Alignment.Top"),
        (Self::TOP_RIGHT, "Alignment.TopEnd"),
        (Self::CENTER_LEFT, "Alignment.Start"),
        (Self::CENTER, "Alignment.Center"),
        (Self::CENTER_RIGHT, "Alignment.End"),
        (Self::BOTTOM_LEFT, "Alignment.BottomStart"),
        (Self::BOTTOM_CENTER, "Alignment.Bottom"),
        (Self::BOTTOM_RIGHT, "Alignment.BottomEnd"),
    ];

    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self { horizontal, vertical }
    }

    /// Offset of a child of `child` size inside `parent` size.
    pub fn align(&self, parent: crate::SizeF, child: crate::SizeF) -> crate::OffsetF {
        let free_w = parent.width - child.width;
        let free_h = parent.height - child.height;
        crate::OffsetF::new(
            free_w * (1.0 + self.horizontal) / 2.0,
            free_h * (1.0 + self.vertical) / 2.0,
        )
    }

    pub fn as_json_str(&self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(a, _)| a == self)
            .map_or("Alignment.Center", |(_, name)| *name)
    }

    /// Parse a serialized alignment. Unknown names fall back to center.
    pub fn from_json_str(s: &str) -> Self {
        Self::NAMED
            .iter()
            .find(|(_, name)| *name == s)
            .map_or(Self::CENTER, |(a, _)| *a)
    }
}

/// Visibility of a node. `Gone` nodes take no space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisibleType {
    #[default]
    Visible,
    Invisible,
    Gone,
}

impl VisibleType {
    pub fn as_json_str(&self) -> &'static str {
        match self {
            VisibleType::Visible => "Visibility.Visible",
            VisibleType::Invisible => "Visibility.Hidden",
            VisibleType::Gone => "Visibility.None",
        }
    }

    /// Parse a serialized visibility. Unknown strings are `Visible`.
    pub fn from_json_str(s: &str) -> Self {
        match s {
            "Visibility.Hidden" => VisibleType::Invisible,
            "Visibility.None" => VisibleType::Gone,
            _ => VisibleType::Visible,
        }
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
    Inherit,
    Auto,
}

impl TextDirection {
    pub fn as_json_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "Direction.Ltr",
            TextDirection::Rtl => "Direction.Rtl",
            TextDirection::Inherit => "Direction.Inherit",
            TextDirection::Auto => "Direction.Auto",
        }
    }

    /// Parse a serialized direction. Unknown strings are `Ltr`.
    pub fn from_json_str(s: &str) -> Self {
        match s {
            "Direction.Rtl" => TextDirection::Rtl,
            "Direction.Inherit" => TextDirection::Inherit,
            "Direction.Auto" => TextDirection::Auto,
            _ => TextDirection::Ltr,
        }
    }
}

/// How a node sizes itself relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasureType {
    /// Take the parent's ideal size on any axis not set by the author
    MatchParent,
    /// Size to content
    #[default]
    MatchContent,
    MatchParentCrossAxis,
    MatchParentMainAxis,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SizeF;

    #[test]
    fn test_padding_to_px_uses_width_reference() {
        let padding = PaddingProperty {
            top: Some(CalcLength::percent(0.1)),
            left: Some(CalcLength::vp(2.0)),
            ..Default::default()
        };
        let resolved = padding.to_px(&ScaleProperty::new(2.0, 1.0, 1.0), 300.0);
        assert_eq!(resolved.top, Some(30.0));
        assert_eq!(resolved.left, Some(4.0));
        assert_eq!(resolved.right, None);
        assert!((resolved.width() - 4.0).abs() < 0.001);
        assert!((resolved.height() - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_negative_border_clamped() {
        let border = BorderWidthProperty::all(CalcLength::px(-3.0));
        let resolved = border.to_non_negative_px(&ScaleProperty::default(), 0.0);
        assert_eq!(resolved.left, Some(0.0));
        assert_eq!(resolved.width(), 0.0);
    }

    #[test]
    fn test_combine_keeps_unset_edges() {
        let a = PaddingPropertyF { left: Some(1.0), ..Default::default() };
        let b = PaddingPropertyF { left: Some(2.0), top: Some(4.0), ..Default::default() };
        let sum = a.combine(&b);
        assert_eq!(sum.left, Some(3.0));
        assert_eq!(sum.top, Some(4.0));
        assert_eq!(sum.right, None);
    }

    #[test]
    fn test_measure_property_reset_single_axis() {
        let mut measure = MeasureProperty::default();
        let size = CalcSize::new(Some(CalcLength::px(10.0)), Some(CalcLength::px(20.0)));
        assert!(measure.update_min_size_with_check(&size));
        assert!(!measure.update_min_size_with_check(&size));
        assert!(measure.reset_min_size(AxisSelection::Width));
        assert_eq!(measure.min_size, Some(CalcSize::new(None, Some(CalcLength::px(20.0)))));
        assert!(!measure.reset_min_size(AxisSelection::Width));
        assert!(measure.reset_min_size(AxisSelection::Height));
        assert!(measure.min_size.is_none());
    }

    #[test]
    fn test_grid_property_updates() {
        let mut grid = GridProperty::default();
        assert!(grid.update_span(4, GridSizeType::Md));
        assert!(!grid.update_span(4, GridSizeType::Md));
        assert!(!grid.update_span(-1, GridSizeType::Md));
        assert!(grid.update_offset(1, GridSizeType::Md));
        assert_eq!(
            grid.get(GridSizeType::Md),
            Some(&GridTypedOption { span: Some(4), offset: Some(1) })
        );
    }

    #[test]
    fn test_alignment_offsets_and_names() {
        let offset = Alignment::BOTTOM_RIGHT.align(SizeF::new(100.0, 50.0), SizeF::new(20.0, 10.0));
        assert!((offset.x - 80.0).abs() < 0.001);
        assert!((offset.y - 40.0).abs() < 0.001);
        assert_eq!(Alignment::TOP_LEFT.as_json_str(), "Alignment.TopStart");
        assert_eq!(Alignment::from_json_str("Alignment.Bottom"), Alignment::BOTTOM_CENTER);
        assert_eq!(Alignment::from_json_str("bogus"), Alignment::CENTER);
    }

    #[test]
    fn test_enum_json_defaults() {
        assert_eq!(VisibleType::from_json_str("Visibility.None"), VisibleType::Gone);
        assert_eq!(VisibleType::from_json_str("nonsense"), VisibleType::Visible);
        assert_eq!(TextDirection::from_json_str("Direction.Auto"), TextDirection::Auto);
        assert_eq!(TextDirection::from_json_str(""), TextDirection::Ltr);
    }
}
