//! Declared layout intent of a node and its resolution into constraints.
//!
//! A [`LayoutProperty`] holds what the author asked for (padding, margin,
//! size overrides, aspect ratio, safe-area options, ...). During measure it
//! turns the parent's [`LayoutConstraintF`] into this node's own constraint,
//! its content constraint and the constraint handed to its children:
//!
//! 1. deflate the parent constraint by the margin
//! 2. apply the author's min/max/ideal overrides
//! 3. clamp the ideal size (match-parent, min over max)
//! 4. make room for padding and border
//! 5. enforce the aspect ratio

mod json;

pub use json::{edges_to_json_string, parse_edges_json};

use std::cell::Cell;

use tracing::trace;
use trellis_core::{
    greater_or_equal_to_infinity, AlignRulesMap, Alignment, AxisSelection, BorderWidthProperty,
    CalcLength, CalcSize, FlexAlign, FlexItemProperty, GridProperty, GridSizeType,
    MagicItemProperty, MarginProperty, MarginPropertyF, MeasureProperty, MeasureType,
    PaddingProperty, PaddingPropertyF, SafeAreaExpandOpts, SafeAreaInsets, ScaleProperty, SizeF,
    TextDirection, VisibleType,
};

use crate::constraint::LayoutConstraintF;
use crate::context::ViewportContext;
use crate::flags::PropertyChangeFlag;
use crate::tree::FrameNodeId;

fn update_slot<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Sizing intent of one node, plus the constraints resolved from it during
/// the current pass.
///
/// Every mutator returns the [`PropertyChangeFlag`] it raised (empty when the
/// value did not change) and also accumulates it on the property.
#[derive(Debug, Clone, Default)]
pub struct LayoutProperty {
    host: Option<FrameNodeId>,
    property_change_flag: PropertyChangeFlag,

    layout_constraint: Option<LayoutConstraintF>,
    content_constraint: Option<LayoutConstraintF>,

    calc_layout_constraint: Option<MeasureProperty>,
    padding: Option<PaddingProperty>,
    margin: Option<MarginProperty>,
    border_width: Option<BorderWidthProperty>,
    magic_item_property: Option<MagicItemProperty>,
    flex_item_property: Option<FlexItemProperty>,
    grid_property: Option<GridProperty>,
    alignment: Option<Alignment>,
    layout_direction: Option<TextDirection>,
    visibility: Option<VisibleType>,
    measure_type: Option<MeasureType>,
    safe_area_expand_opts: Option<SafeAreaExpandOpts>,
    safe_area_insets: Option<SafeAreaInsets>,
    geometry_transition: Option<String>,

    /// Margin resolved against the current constraint. Cleared whenever the
    /// constraint or the margin changes.
    margin_result: Cell<Option<MarginPropertyF>>,
    width_percent_sensitive: bool,
    height_percent_sensitive: bool,
}

impl LayoutProperty {
    /// An empty property with nothing declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node this property belongs to.
    pub fn host(&self) -> Option<FrameNodeId> {
        self.host
    }

    /// Attach the property to its node.
    pub fn set_host(&mut self, host: FrameNodeId) {
        self.host = Some(host);
    }

    fn mark(&mut self, changed: bool, flag: PropertyChangeFlag) -> PropertyChangeFlag {
        if !changed {
            return PropertyChangeFlag::NORMAL;
        }
        self.property_change_flag |= flag;
        flag
    }

    /// Flags accumulated since the last [`clean_dirty`](Self::clean_dirty).
    pub fn property_change_flag(&self) -> PropertyChangeFlag {
        self.property_change_flag
    }

    /// OR `flag` into the accumulated change flags.
    pub fn update_property_change_flag(&mut self, flag: PropertyChangeFlag) {
        self.property_change_flag |= flag;
    }

    /// Clear the accumulated change flags.
    pub fn clean_dirty(&mut self) {
        self.property_change_flag = PropertyChangeFlag::NORMAL;
    }

    /// Drop all declared and resolved state. The host link survives.
    pub fn reset(&mut self) -> PropertyChangeFlag {
        *self = Self {
            host: self.host,
            ..Self::default()
        };
        self.mark(true, PropertyChangeFlag::MEASURE)
    }

    /// Copy the declared intent of `other`. Resolved constraints are not copied.
    pub fn update_layout_property(&mut self, other: &LayoutProperty) -> PropertyChangeFlag {
        self.calc_layout_constraint = other.calc_layout_constraint;
        self.padding = other.padding;
        self.margin = other.margin;
        self.border_width = other.border_width;
        self.magic_item_property = other.magic_item_property;
        self.flex_item_property = other.flex_item_property.clone();
        self.grid_property = other.grid_property.clone();
        self.alignment = other.alignment;
        self.layout_direction = other.layout_direction;
        self.visibility = other.visibility;
        self.measure_type = other.measure_type;
        self.safe_area_expand_opts = other.safe_area_expand_opts;
        self.safe_area_insets = other.safe_area_insets;
        self.geometry_transition = other.geometry_transition.clone();
        self.margin_result.set(None);
        self.mark(true, PropertyChangeFlag::MEASURE)
    }

    // Box edges

    /// Declared padding.
    pub fn padding(&self) -> Option<&PaddingProperty> {
        self.padding.as_ref()
    }

    /// Set the padding.
    pub fn update_padding(&mut self, value: PaddingProperty) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.padding, value);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Clear the padding.
    pub fn reset_padding(&mut self) -> PropertyChangeFlag {
        let changed = self.padding.take().is_some();
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Declared margin.
    pub fn margin(&self) -> Option<&MarginProperty> {
        self.margin.as_ref()
    }

    /// Set the margin and drop the memoized pixel margin.
    pub fn update_margin(&mut self, value: MarginProperty) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.margin, value);
        if changed {
            self.margin_result.set(None);
        }
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Clear the margin.
    pub fn reset_margin(&mut self) -> PropertyChangeFlag {
        let changed = self.margin.take().is_some();
        self.margin_result.set(None);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Declared border width.
    pub fn border_width(&self) -> Option<&BorderWidthProperty> {
        self.border_width.as_ref()
    }

    /// Set the border width.
    pub fn update_border_width(&mut self, value: BorderWidthProperty) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.border_width, value);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Clear the border width.
    pub fn reset_border_width(&mut self) -> PropertyChangeFlag {
        let changed = self.border_width.take().is_some();
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    // Magic items

    /// Aspect ratio and layout weight, if either is set.
    pub fn magic_item_property(&self) -> Option<&MagicItemProperty> {
        self.magic_item_property.as_ref()
    }

    /// Width / height, if set.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.magic_item_property.and_then(|m| m.aspect_ratio)
    }

    /// Whether an aspect ratio is set.
    pub fn has_aspect_ratio(&self) -> bool {
        self.aspect_ratio().is_some()
    }

    /// Set width / height. A ratio that is not a positive finite number
    /// clears the aspect ratio instead.
    pub fn update_aspect_ratio(&mut self, ratio: f32) -> PropertyChangeFlag {
        if !(ratio.is_finite() && ratio > 0.0) {
            return self.reset_aspect_ratio();
        }
        let magic = self.magic_item_property.get_or_insert_with(Default::default);
        let changed = update_slot(&mut magic.aspect_ratio, ratio);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Clear the aspect ratio.
    pub fn reset_aspect_ratio(&mut self) -> PropertyChangeFlag {
        let changed = self
            .magic_item_property
            .as_mut()
            .is_some_and(|m| m.aspect_ratio.take().is_some());
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Share of the remaining main-axis space, if set.
    pub fn layout_weight(&self) -> Option<f32> {
        self.magic_item_property.and_then(|m| m.layout_weight)
    }

    /// Set the layout weight, clamped to at least zero.
    pub fn update_layout_weight(&mut self, weight: f32) -> PropertyChangeFlag {
        let magic = self.magic_item_property.get_or_insert_with(Default::default);
        let changed = update_slot(&mut magic.layout_weight, non_negative(weight));
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    // Flex and relative-container items

    /// Flex and relative-container hints.
    pub fn flex_item_property(&self) -> Option<&FlexItemProperty> {
        self.flex_item_property.as_ref()
    }

    fn update_flex_item<T: PartialEq>(
        &mut self,
        value: T,
        field: fn(&mut FlexItemProperty) -> &mut Option<T>,
    ) -> PropertyChangeFlag {
        let flex = self.flex_item_property.get_or_insert_with(Default::default);
        let changed = update_slot(field(flex), value);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Set the flex grow factor, clamped to at least zero.
    pub fn update_flex_grow(&mut self, grow: f32) -> PropertyChangeFlag {
        self.update_flex_item(non_negative(grow), |f| &mut f.flex_grow)
    }

    /// Set the flex shrink factor, clamped to at least zero.
    pub fn update_flex_shrink(&mut self, shrink: f32) -> PropertyChangeFlag {
        self.update_flex_item(non_negative(shrink), |f| &mut f.flex_shrink)
    }

    /// Negative bases become zero in the same unit.
    pub fn update_flex_basis(&mut self, basis: CalcLength) -> PropertyChangeFlag {
        let basis = if basis.is_negative() {
            CalcLength::new(0.0, basis.unit)
        } else {
            basis
        };
        self.update_flex_item(basis, |f| &mut f.flex_basis)
    }

    /// Set the cross-axis alignment of this item.
    pub fn update_align_self(&mut self, align: FlexAlign) -> PropertyChangeFlag {
        self.update_flex_item(align, |f| &mut f.align_self)
    }

    /// Set the display priority.
    pub fn update_display_index(&mut self, index: i32) -> PropertyChangeFlag {
        self.update_flex_item(index, |f| &mut f.display_index)
    }

    /// Set the relative-container anchor rules.
    pub fn update_align_rules(&mut self, rules: AlignRulesMap) -> PropertyChangeFlag {
        self.update_flex_item(rules, |f| &mut f.align_rules)
    }

    // Grid

    /// Grid span and offset per breakpoint.
    pub fn grid_property(&self) -> Option<&GridProperty> {
        self.grid_property.as_ref()
    }

    /// Set the span and/or offset for one breakpoint class.
    pub fn update_grid_property(
        &mut self,
        span: Option<i32>,
        offset: Option<i32>,
        size_type: GridSizeType,
    ) -> PropertyChangeFlag {
        let grid = self.grid_property.get_or_insert_with(Default::default);
        let mut changed = false;
        if let Some(span) = span {
            changed |= grid.update_span(span, size_type);
        }
        if let Some(offset) = offset {
            changed |= grid.update_offset(offset, size_type);
        }
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    // Placement and direction

    /// Alignment of children in the content box.
    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    /// Alignment only moves children, so it needs a layout but no measure.
    pub fn update_alignment(&mut self, alignment: Alignment) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.alignment, alignment);
        self.mark(changed, PropertyChangeFlag::LAYOUT)
    }

    /// Declared direction, which may be `Auto` or `Inherit`.
    pub fn layout_direction(&self) -> Option<TextDirection> {
        self.layout_direction
    }

    /// Set the layout direction.
    pub fn update_layout_direction(&mut self, direction: TextDirection) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.layout_direction, direction);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Concrete direction: `Auto` and `Inherit` (and unset) take the
    /// viewport's direction.
    pub fn non_auto_layout_direction(&self, ctx: &ViewportContext) -> TextDirection {
        match self.layout_direction {
            Some(TextDirection::Ltr) => TextDirection::Ltr,
            Some(TextDirection::Rtl) => TextDirection::Rtl,
            _ if ctx.is_rtl() => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    /// Visibility, `Visible` when unset.
    pub fn visibility(&self) -> VisibleType {
        self.visibility.unwrap_or_default()
    }

    /// Set the visibility.
    pub fn update_visibility(&mut self, visibility: VisibleType) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.visibility, visibility);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// How the node sizes against its parent.
    pub fn measure_type(&self) -> MeasureType {
        self.measure_type.unwrap_or_default()
    }

    /// Set the measure type.
    pub fn update_measure_type(&mut self, measure_type: MeasureType) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.measure_type, measure_type);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Shared-element transition id.
    pub fn geometry_transition(&self) -> Option<&str> {
        self.geometry_transition.as_deref()
    }

    /// Set the transition id. An empty id clears it.
    pub fn update_geometry_transition(&mut self, id: impl Into<String>) -> PropertyChangeFlag {
        let id = id.into();
        if id.is_empty() {
            return self.reset_geometry_transition();
        }
        let changed = update_slot(&mut self.geometry_transition, id);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Clear the transition id.
    pub fn reset_geometry_transition(&mut self) -> PropertyChangeFlag {
        let changed = self.geometry_transition.take().is_some();
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    // Safe area

    /// Which safe areas and edges this node grows into.
    pub fn safe_area_expand_opts(&self) -> Option<&SafeAreaExpandOpts> {
        self.safe_area_expand_opts.as_ref()
    }

    /// Set the safe-area expansion options.
    pub fn update_safe_area_expand_opts(&mut self, opts: SafeAreaExpandOpts) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.safe_area_expand_opts, opts);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Insets subtracted from the parent constraint.
    pub fn safe_area_insets(&self) -> Option<&SafeAreaInsets> {
        self.safe_area_insets.as_ref()
    }

    /// Set the insets subtracted from the parent constraint.
    pub fn update_safe_area_insets(&mut self, insets: SafeAreaInsets) -> PropertyChangeFlag {
        let changed = update_slot(&mut self.safe_area_insets, insets);
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    // Size overrides

    /// Author ideal, min and max overrides.
    pub fn calc_layout_constraint(&self) -> Option<&MeasureProperty> {
        self.calc_layout_constraint.as_ref()
    }

    /// Replace all size overrides at once.
    pub fn update_calc_layout_property(&mut self, measure: MeasureProperty) -> PropertyChangeFlag {
        let value = if measure.is_empty() { None } else { Some(measure) };
        let changed = self.calc_layout_constraint != value;
        self.calc_layout_constraint = value;
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    fn update_measure<F>(&mut self, update: F) -> PropertyChangeFlag
    where
        F: FnOnce(&mut MeasureProperty) -> bool,
    {
        let measure = self.calc_layout_constraint.get_or_insert_with(Default::default);
        let changed = update(measure);
        if measure.is_empty() {
            self.calc_layout_constraint = None;
        }
        self.mark(changed, PropertyChangeFlag::MEASURE)
    }

    /// Set the ideal size on the axes given.
    pub fn update_user_defined_ideal_size(&mut self, size: CalcSize) -> PropertyChangeFlag {
        self.update_measure(|m| m.update_self_ideal_size_with_check(&size))
    }

    /// Clear the ideal size on the selected axes.
    pub fn clear_user_defined_ideal_size(&mut self, axes: AxisSelection) -> PropertyChangeFlag {
        self.update_measure(|m| m.clear_self_ideal_size(axes))
    }

    /// Set the min size on the axes given.
    pub fn update_calc_min_size(&mut self, size: CalcSize) -> PropertyChangeFlag {
        self.update_measure(|m| m.update_min_size_with_check(&size))
    }

    /// Set the max size on the axes given.
    pub fn update_calc_max_size(&mut self, size: CalcSize) -> PropertyChangeFlag {
        self.update_measure(|m| m.update_max_size_with_check(&size))
    }

    /// Clear the min size on the selected axes.
    pub fn reset_calc_min_size(&mut self, axes: AxisSelection) -> PropertyChangeFlag {
        self.update_measure(|m| m.reset_min_size(axes))
    }

    /// Clear the max size on the selected axes.
    pub fn reset_calc_max_size(&mut self, axes: AxisSelection) -> PropertyChangeFlag {
        self.update_measure(|m| m.reset_max_size(axes))
    }

    /// The author fixed the width in a non-percentage unit.
    pub fn has_fixed_width(&self) -> bool {
        self.calc_layout_constraint
            .and_then(|m| m.self_ideal_size)
            .and_then(|s| s.width)
            .is_some_and(|w| !w.is_percent())
    }

    /// The author fixed the height in a non-percentage unit.
    pub fn has_fixed_height(&self) -> bool {
        self.calc_layout_constraint
            .and_then(|m| m.self_ideal_size)
            .and_then(|s| s.height)
            .is_some_and(|h| !h.is_percent())
    }

    // Resolution

    /// Constraint resolved for this node in the current pass.
    pub fn layout_constraint(&self) -> Option<&LayoutConstraintF> {
        self.layout_constraint.as_ref()
    }

    /// Constraint of the content box in the current pass.
    pub fn content_constraint(&self) -> Option<&LayoutConstraintF> {
        self.content_constraint.as_ref()
    }

    fn scale_and_reference(&self, ctx: &ViewportContext) -> (ScaleProperty, f32) {
        match &self.layout_constraint {
            Some(c) => (c.scale_property, c.percent_reference.width),
            None => (ctx.scale_property(), ctx.root_width()),
        }
    }

    /// Padding in pixels. Percentages resolve against the reference width.
    pub fn create_padding(&self, ctx: &ViewportContext) -> PaddingPropertyF {
        let (scale, reference) = self.scale_and_reference(ctx);
        self.padding
            .map(|p| p.to_non_negative_px(&scale, reference))
            .unwrap_or_default()
    }

    /// Border widths in pixels.
    pub fn create_border(&self, ctx: &ViewportContext) -> PaddingPropertyF {
        let (scale, reference) = self.scale_and_reference(ctx);
        self.border_width
            .map(|b| b.to_non_negative_px(&scale, reference))
            .unwrap_or_default()
    }

    /// Padding plus border in pixels.
    pub fn create_padding_and_border(&self, ctx: &ViewportContext) -> PaddingPropertyF {
        self.create_padding(ctx).combine(&self.create_border(ctx))
    }

    /// Margin in pixels, memoized until the constraint or margin changes.
    pub fn create_margin(&self, ctx: &ViewportContext) -> MarginPropertyF {
        if let Some(margin) = self.margin_result.get() {
            return margin;
        }
        let (scale, reference) = self.scale_and_reference(ctx);
        let margin = self
            .margin
            .map(|m| m.to_px(&scale, reference))
            .unwrap_or_default();
        self.margin_result.set(Some(margin));
        margin
    }

    /// Resolve this node's constraint from `parent`.
    pub fn update_layout_constraint(&mut self, ctx: &ViewportContext, parent: &LayoutConstraintF) {
        self.layout_constraint = Some(*parent);
        self.margin_result.set(None);
        let mut constraint = *parent;
        if self.margin.is_some() {
            let margin = self.create_margin(ctx);
            constraint.minus_padding(margin.left, margin.right, margin.top, margin.bottom);
        }
        let origin_max = constraint.max_size;

        if let Some(calc) = self.calc_layout_constraint {
            let scale = &parent.scale_property;
            let reference = parent.percent_reference;
            if let Some(max) = calc.max_size {
                constraint.update_max_size_with_check(max.to_px_or_negative(scale, reference));
            }
            if let Some(min) = calc.min_size {
                constraint.update_min_size_with_check(min.to_px_or_negative(scale, reference));
            }
            if let Some(ideal) = calc.self_ideal_size {
                constraint.update_illegal_self_ideal_size_with_check(&ideal.to_optional_px(scale, reference));
            }
        }
        self.layout_constraint = Some(constraint);

        self.check_self_ideal_size(parent, origin_max);
        self.check_border_and_padding(ctx);
        self.check_aspect_ratio();
        if let Some(resolved) = &self.layout_constraint {
            trace!(node = ?self.host, constraint = %resolved, "layout constraint updated");
        }
    }

    /// Settle the ideal size: take the parent's ideal size for match-parent,
    /// let an author min beat an author max, then clamp into `[min, max]`.
    pub fn check_self_ideal_size(&mut self, parent: &LayoutConstraintF, origin_max: SizeF) {
        let Some(mut c) = self.layout_constraint else {
            return;
        };
        if self.measure_type() == MeasureType::MatchParent {
            let parent_ideal = c.parent_ideal_size;
            c.update_illegal_self_ideal_size_with_check(&parent_ideal);
        }
        if let Some(calc) = self.calc_layout_constraint {
            let scale = &parent.scale_property;
            let reference = parent.percent_reference;
            let max = calc.max_size.map(|s| s.to_px_or_negative(scale, reference));
            let min = calc.min_size.map(|s| s.to_px_or_negative(scale, reference));
            if let (Some(max), Some(min)) = (max, min) {
                if max.width >= 0.0 && min.width > max.width {
                    c.max_size.width = origin_max.width;
                }
                if max.height >= 0.0 && min.height > max.height {
                    c.max_size.height = origin_max.height;
                }
            }
            if let Some(min) = min {
                c.update_min_size_with_check(min);
            }
        }
        c.self_ideal_size.update_size_when_smaller(c.max_size);
        c.self_ideal_size.update_size_when_larger(c.min_size);
        self.layout_constraint = Some(c);
    }

    /// Grow the set ideal axes so padding plus border always fits. Min and
    /// max are left alone.
    pub fn check_border_and_padding(&mut self, ctx: &ViewportContext) {
        let padding = self.create_padding_and_border(ctx);
        let Some(mut c) = self.layout_constraint else {
            return;
        };
        let horizontal = padding.width();
        let vertical = padding.height();
        if horizontal <= 0.0 && vertical <= 0.0 {
            return;
        }
        if let Some(width) = c.self_ideal_size.width {
            c.self_ideal_size.width = Some(width.max(horizontal));
        }
        if let Some(height) = c.self_ideal_size.height {
            c.self_ideal_size.height = Some(height.max(vertical));
        }
        self.layout_constraint = Some(c);
    }

    /// Cap the max height to `max_width / ratio`, then derive one ideal axis
    /// from the other. Width wins when both are set.
    pub fn check_aspect_ratio(&mut self) {
        let Some(ratio) = self.aspect_ratio() else {
            return;
        };
        let Some(mut c) = self.layout_constraint else {
            return;
        };
        let max_width = c.max_size.width;
        let max_height = c.max_size.height.min(max_width / ratio);
        c.max_size.height = max_height;
        if let Some(width) = c.self_ideal_size.width {
            let mut width = width;
            let mut height = width / ratio;
            if height > max_height {
                height = max_height;
                width = height * ratio;
            }
            c.self_ideal_size.width = Some(width);
            c.self_ideal_size.height = Some(height);
        } else if let Some(height) = c.self_ideal_size.height {
            let mut height = height;
            let mut width = height * ratio;
            if width > max_width {
                width = max_width;
                height = width / ratio;
            }
            c.self_ideal_size.width = Some(width);
            c.self_ideal_size.height = Some(height);
        }
        self.layout_constraint = Some(c);
    }

    /// The constraint for this node's content box. Percentages inside the
    /// content resolve against the parent's ideal size where it is known.
    pub fn create_content_constraint(&self, ctx: &ViewportContext) -> Option<LayoutConstraintF> {
        let mut c = self.layout_constraint?;
        if let Some(width) = c.parent_ideal_size.width {
            c.percent_reference.width = width;
        }
        if let Some(height) = c.parent_ideal_size.height {
            c.percent_reference.height = height;
        }
        let padding = self.create_padding_and_border(ctx);
        c.minus_padding(padding.left, padding.right, padding.top, padding.bottom);
        Some(c)
    }

    /// Store [`create_content_constraint`](Self::create_content_constraint).
    pub fn update_content_constraint(&mut self, ctx: &ViewportContext) {
        self.content_constraint = self.create_content_constraint(ctx);
    }

    /// The constraint handed to each child: this node's ideal size becomes
    /// the children's parent-ideal size, max size and percent reference.
    pub fn create_child_constraint(&self) -> LayoutConstraintF {
        let Some(mut c) = self.content_constraint else {
            return LayoutConstraintF::default();
        };
        c.parent_ideal_size = c.self_ideal_size;
        if let Some(width) = c.self_ideal_size.width {
            c.max_size.width = width;
            c.percent_reference.width = width;
        }
        if let Some(height) = c.self_ideal_size.height {
            c.max_size.height = height;
            c.percent_reference.height = height;
        }
        c.self_ideal_size.reset();
        c.min_size = SizeF::default();
        c
    }

    /// Whether the current constraints match the previous pass. The percent
    /// reference of an unbounded axis is ignored unless a child reported
    /// depending on it.
    pub fn constraint_equal(
        &self,
        prev_layout: Option<&LayoutConstraintF>,
        prev_content: Option<&LayoutConstraintF>,
    ) -> bool {
        let (Some(prev_layout), Some(prev_content), Some(layout), Some(content)) = (
            prev_layout,
            prev_content,
            self.layout_constraint.as_ref(),
            self.content_constraint.as_ref(),
        ) else {
            return false;
        };
        let ignore_width = greater_or_equal_to_infinity(layout.max_size.width) && !self.width_percent_sensitive;
        let ignore_height = greater_or_equal_to_infinity(layout.max_size.height) && !self.height_percent_sensitive;
        prev_layout.equal_without_percent(layout, ignore_width, ignore_height)
            && prev_content.equal_without_percent(content, ignore_width, ignore_height)
    }

    /// Record that content depends on the percent reference. Only axes whose
    /// content max is unbounded are recorded; the flags are sticky.
    pub fn update_percent_sensitive(&mut self, width: bool, height: bool) {
        let Some(content) = &self.content_constraint else {
            return;
        };
        self.width_percent_sensitive |= width && greater_or_equal_to_infinity(content.max_size.width);
        self.height_percent_sensitive |= height && greater_or_equal_to_infinity(content.max_size.height);
    }

    /// Recorded percent sensitivity as `(width, height)`.
    pub fn percent_sensitive(&self) -> (bool, bool) {
        (self.width_percent_sensitive, self.height_percent_sensitive)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use trellis_core::CalcLength;

    use super::*;

    fn px(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<CalcLength>> {
        proptest::option::of(range.prop_map(CalcLength::px))
    }

    fn calc_size(range: std::ops::Range<f64>) -> impl Strategy<Value = CalcSize> {
        (px(range.clone()), px(range)).prop_map(|(w, h)| CalcSize::new(w, h))
    }

    proptest! {
        #[test]
        fn ideal_size_within_min_max(
            parent_w in 1.0f32..2000.0,
            parent_h in 1.0f32..2000.0,
            ideal in calc_size(0.0..3000.0),
            min in calc_size(0.0..1000.0),
            max in calc_size(0.0..3000.0),
            match_parent in any::<bool>(),
        ) {
            let ctx = ViewportContext::default();
            let mut prop = LayoutProperty::new();
            prop.update_user_defined_ideal_size(ideal);
            prop.update_calc_min_size(min);
            prop.update_calc_max_size(max);
            if match_parent {
                prop.update_measure_type(MeasureType::MatchParent);
            }
            let parent = LayoutConstraintF {
                max_size: SizeF::new(parent_w, parent_h),
                percent_reference: SizeF::new(parent_w, parent_h),
                parent_ideal_size: SizeF::new(parent_w, parent_h).into(),
                ..Default::default()
            };
            prop.update_layout_constraint(&ctx, &parent);
            let c = *prop.layout_constraint().unwrap();
            prop_assert!(c.min_size.width <= c.max_size.width);
            prop_assert!(c.min_size.height <= c.max_size.height);
            if let Some(width) = c.self_ideal_size.width {
                prop_assert!(c.min_size.width <= width && width <= c.max_size.width);
            }
            if let Some(height) = c.self_ideal_size.height {
                prop_assert!(c.min_size.height <= height && height <= c.max_size.height);
            }
        }

        #[test]
        fn aspect_ratio_leaves_unset_ideal_unset(
            ratio in 0.05f32..20.0,
            max_w in 1u16..2000,
            max_h in 1u16..2000,
        ) {
            let ctx = ViewportContext::default();
            let mut prop = LayoutProperty::new();
            prop.update_aspect_ratio(ratio);
            let parent = LayoutConstraintF {
                max_size: SizeF::new(max_w as f32, max_h as f32),
                ..Default::default()
            };
            prop.update_layout_constraint(&ctx, &parent);
            let c = prop.layout_constraint().unwrap();
            prop_assert!(c.self_ideal_size.is_null());
            prop_assert!(c.max_size.height <= max_h as f32);
            prop_assert!(c.max_size.height <= max_w as f32 / ratio);
        }

        #[test]
        fn padding_grows_ideal_size(
            width in 0u16..500,
            height in 0u16..500,
            edges in (0u16..300, 0u16..300, 0u16..300, 0u16..300),
        ) {
            let ctx = ViewportContext::default();
            let (left, right, top, bottom) = edges;
            let mut prop = LayoutProperty::new();
            prop.update_user_defined_ideal_size(CalcSize::new(
                Some(CalcLength::px(width as f64)),
                Some(CalcLength::px(height as f64)),
            ));
            prop.update_padding(PaddingProperty {
                left: Some(CalcLength::px(left as f64)),
                right: Some(CalcLength::px(right as f64)),
                top: Some(CalcLength::px(top as f64)),
                bottom: Some(CalcLength::px(bottom as f64)),
            });
            prop.update_layout_constraint(&ctx, &LayoutConstraintF::default());
            let ideal = prop.layout_constraint().unwrap().self_ideal_size;
            prop_assert_eq!(ideal.width, Some((width as f32).max(left as f32 + right as f32)));
            prop_assert_eq!(ideal.height, Some((height as f32).max(top as f32 + bottom as f32)));
        }

        #[test]
        fn margin_deflation_is_distributive(
            min in (0u16..200, 0u16..200),
            max in (200u16..2000, 200u16..2000),
            reference in (0u16..2000, 0u16..2000),
            margin in (0u16..100, 0u16..100, 0u16..100, 0u16..100),
        ) {
            let ctx = ViewportContext::default();
            let parent = LayoutConstraintF {
                min_size: SizeF::new(min.0 as f32, min.1 as f32),
                max_size: SizeF::new(max.0 as f32, max.1 as f32),
                percent_reference: SizeF::new(reference.0 as f32, reference.1 as f32),
                ..Default::default()
            };
            let (left, right, top, bottom) = margin;
            let mut prop = LayoutProperty::new();
            prop.update_margin(PaddingProperty {
                left: Some(CalcLength::px(left as f64)),
                right: Some(CalcLength::px(right as f64)),
                top: Some(CalcLength::px(top as f64)),
                bottom: Some(CalcLength::px(bottom as f64)),
            });
            prop.update_layout_constraint(&ctx, &parent);

            let mut expected = parent;
            expected.minus_padding(
                Some(left as f32),
                Some(right as f32),
                Some(top as f32),
                Some(bottom as f32),
            );
            let c = prop.layout_constraint().unwrap();
            prop_assert_eq!(c.min_size, expected.min_size);
            prop_assert_eq!(c.max_size, expected.max_size);
            prop_assert_eq!(c.percent_reference, expected.percent_reference);
        }

        #[test]
        fn percent_of_unbounded_reference_is_unset(fraction in 0.0f64..4.0) {
            let scale = ScaleProperty::default();
            prop_assert_eq!(CalcLength::percent(fraction).to_px(&scale, SizeF::infinite().width), None);
        }

        #[test]
        fn setters_are_idempotent(value in 0.0f64..500.0, ratio in 0.01f32..10.0) {
            let mut prop = LayoutProperty::new();
            let padding = PaddingProperty::all(CalcLength::vp(value));
            prop.update_padding(padding);
            prop.update_aspect_ratio(ratio);
            prop.clean_dirty();
            prop_assert_eq!(prop.update_padding(padding), PropertyChangeFlag::NORMAL);
            prop_assert_eq!(prop.update_aspect_ratio(ratio), PropertyChangeFlag::NORMAL);
            prop_assert!(prop.property_change_flag().is_empty());
        }
    }
}
