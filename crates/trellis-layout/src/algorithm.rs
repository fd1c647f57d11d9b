//! Pluggable measure and layout strategies.

use std::fmt;

use trellis_core::{Alignment, OffsetF, SizeF, TextDirection, VisibleType};

use crate::context::ViewportContext;
use crate::wrapper::LayoutWrapper;

/// Sizes a node and places its children.
///
/// Implementations run with the node's constraints already resolved: the
/// wrapper's [`LayoutProperty`](crate::LayoutProperty) holds the layout and
/// content constraints when `measure` is called.
pub trait LayoutAlgorithm: fmt::Debug {
    /// Measure children and set this node's frame and content size.
    fn measure(&self, wrapper: &mut LayoutWrapper<'_>, ctx: &ViewportContext);

    /// Set the frame offset of each child.
    fn layout(&self, wrapper: &mut LayoutWrapper<'_>, ctx: &ViewportContext);
}

/// Stacks all children in the content box, each placed by the node's
/// alignment (centered by default). Content size is the largest child.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxLayoutAlgorithm;

impl LayoutAlgorithm for BoxLayoutAlgorithm {
    fn measure(&self, wrapper: &mut LayoutWrapper<'_>, ctx: &ViewportContext) {
        let Some(property) = wrapper.layout_property() else {
            return;
        };
        let Some(constraint) = property.layout_constraint().copied() else {
            return;
        };
        let child_constraint = property.create_child_constraint();
        let padding = property.create_padding_and_border(ctx);

        let mut extent = SizeF::default();
        let mut width_percent = false;
        let mut height_percent = false;
        for child in wrapper.frame_children() {
            wrapper.measure_child(ctx, child, child_constraint);
            let Some(node) = wrapper.tree().get(child) else {
                continue;
            };
            let ideal = node
                .layout_property
                .calc_layout_constraint()
                .and_then(|calc| calc.self_ideal_size);
            if let Some(ideal) = ideal {
                width_percent |= ideal.width.is_some_and(|w| w.is_percent());
                height_percent |= ideal.height.is_some_and(|h| h.is_percent());
            }
            if node.layout_property.visibility() != VisibleType::Gone {
                extent.update_size_when_larger(node.geometry_node.margin_frame_size());
            }
        }
        if let Some(property) = wrapper.layout_property_mut() {
            property.update_percent_sensitive(width_percent, height_percent);
        }

        let mut size = SizeF::new(extent.width + padding.width(), extent.height + padding.height());
        size = constraint.constrain(size);
        size = constraint.self_ideal_size.with_default(size);
        let content = SizeF::new(
            (size.width - padding.width()).max(0.0),
            (size.height - padding.height()).max(0.0),
        );
        if let Some(geometry) = wrapper.geometry_node_mut() {
            geometry.set_frame_size(size);
            geometry.set_content_size(content);
            geometry.set_content_offset(OffsetF::new(
                padding.left.unwrap_or(0.0),
                padding.top.unwrap_or(0.0),
            ));
        }
    }

    fn layout(&self, wrapper: &mut LayoutWrapper<'_>, ctx: &ViewportContext) {
        let Some(property) = wrapper.layout_property() else {
            return;
        };
        let mut alignment = property.alignment().unwrap_or(Alignment::CENTER);
        if property.non_auto_layout_direction(ctx) == TextDirection::Rtl {
            alignment.horizontal = -alignment.horizontal;
        }
        let Some(geometry) = wrapper.geometry_node() else {
            return;
        };
        let content_offset = geometry.content_offset();
        let content_size = geometry.content_size().unwrap_or_else(|| geometry.frame_size());

        for child in wrapper.frame_children() {
            let Some(node) = wrapper.tree_mut().get_mut(child) else {
                continue;
            };
            let geometry = &mut node.geometry_node;
            let margin = geometry.margin().copied().unwrap_or_default();
            let offset = content_offset
                + alignment.align(content_size, geometry.margin_frame_size())
                + OffsetF::new(margin.left.unwrap_or(0.0), margin.top.unwrap_or(0.0));
            geometry.set_frame_offset(offset);
        }
    }
}
