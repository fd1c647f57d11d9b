//! Per-node measure and layout orchestration.
//!
//! A [`LayoutWrapper`] borrows the frame tree and drives one node through a
//! pass: constraint application, measure (skipped when nothing changed),
//! child placement, then the safe-area and keyboard adjustments. Every
//! operation is a no-op for an id that is not in the tree.

use tracing::{debug, trace};
use trellis_core::{Inset, OffsetF, RectF, SafeAreaEdge, SafeAreaInsets, SizeF, TextDirection, VisibleType};

use crate::algorithm::{BoxLayoutAlgorithm, LayoutAlgorithm};
use crate::constraint::LayoutConstraintF;
use crate::context::ViewportContext;
use crate::geometry_node::GeometryNode;
use crate::property::LayoutProperty;
use crate::tree::{FrameNodeId, FrameTree};

/// Where a node is in the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutStage {
    #[default]
    Unmeasured,
    Measured,
    SafeAreaExpanded,
    KeyboardAvoided,
    LaidOut,
}

/// One node of a [`FrameTree`] during a layout pass.
pub struct LayoutWrapper<'a> {
    tree: &'a mut FrameTree,
    id: FrameNodeId,
}

impl<'a> LayoutWrapper<'a> {
    pub fn new(tree: &'a mut FrameTree, id: FrameNodeId) -> Self {
        Self { tree, id }
    }

    pub fn host_id(&self) -> FrameNodeId {
        self.id
    }

    pub fn host_tag(&self) -> Option<&str> {
        self.tree.get(self.id).map(|n| n.tag.as_str())
    }

    pub fn tree(&self) -> &FrameTree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FrameTree {
        self.tree
    }

    pub fn layout_property(&self) -> Option<&LayoutProperty> {
        self.tree.get(self.id).map(|n| &n.layout_property)
    }

    pub fn layout_property_mut(&mut self) -> Option<&mut LayoutProperty> {
        self.tree.get_mut(self.id).map(|n| &mut n.layout_property)
    }

    pub fn geometry_node(&self) -> Option<&GeometryNode> {
        self.tree.get(self.id).map(|n| &n.geometry_node)
    }

    pub fn geometry_node_mut(&mut self) -> Option<&mut GeometryNode> {
        self.tree.get_mut(self.id).map(|n| &mut n.geometry_node)
    }

    pub fn stage(&self) -> LayoutStage {
        self.tree.get(self.id).map_or(LayoutStage::Unmeasured, |n| n.stage)
    }

    fn set_stage(&mut self, stage: LayoutStage) {
        if let Some(node) = self.tree.get_mut(self.id) {
            node.stage = stage;
        }
    }

    /// Nearest frame descendants of this node.
    pub fn frame_children(&self) -> Vec<FrameNodeId> {
        self.tree.frame_children(self.id)
    }

    pub fn measure_child(&mut self, ctx: &ViewportContext, child: FrameNodeId, constraint: LayoutConstraintF) {
        LayoutWrapper::new(self.tree, child).measure(ctx, Some(constraint));
    }

    /// Resolve the constraint of a root node from the viewport.
    pub fn create_root_constraint(&mut self, ctx: &ViewportContext) {
        let Some(node) = self.tree.get_mut(self.id) else {
            return;
        };
        let property = &mut node.layout_property;
        let root = ctx.root_size();
        let mut constraint = LayoutConstraintF {
            scale_property: ctx.scale_property(),
            max_size: root,
            parent_ideal_size: root.into(),
            ..Default::default()
        };
        constraint.percent_reference = SizeF::new(
            root.width,
            property.aspect_ratio().map_or(root.height, |ratio| root.width / ratio),
        );
        property.update_layout_constraint(ctx, &constraint);
    }

    /// Record `constraint` from the parent and resolve this node's constraint
    /// from it, after the aspect-ratio and safe-area pre-adjustments.
    pub fn apply_constraint(&mut self, ctx: &ViewportContext, mut constraint: LayoutConstraintF) {
        let Some(node) = self.tree.get_mut(self.id) else {
            return;
        };
        node.geometry_node.set_parent_layout_constraint(constraint);
        let property = &mut node.layout_property;
        if let Some(ratio) = property.aspect_ratio() {
            let user_size = property.calc_layout_constraint().and_then(|m| m.self_ideal_size);
            constraint.apply_aspect_ratio(ratio, user_size.as_ref());
        }
        if let Some(insets) = property.safe_area_insets().copied() {
            Self::apply_safe_area(&insets, &mut constraint);
        }
        property.update_layout_constraint(ctx, &constraint);
    }

    /// Deflate `constraint` by the non-empty insets.
    pub fn apply_safe_area(insets: &SafeAreaInsets, constraint: &mut LayoutConstraintF) {
        let length = |inset: Inset| inset.is_valid().then(|| inset.length() as f32);
        constraint.minus_padding(
            length(insets.left),
            length(insets.right),
            length(insets.top),
            length(insets.bottom),
        );
    }

    /// Measure this node under `parent_constraint`, or as a root when `None`.
    pub fn measure(&mut self, ctx: &ViewportContext, parent_constraint: Option<LayoutConstraintF>) {
        let Some(node) = self.tree.get(self.id) else {
            trace!(node = ?self.id, "measure of missing node");
            return;
        };
        if !node.is_frame {
            for child in self.tree.children(self.id) {
                LayoutWrapper::new(self.tree, child).measure(ctx, parent_constraint);
            }
            return;
        }
        if node.layout_property.visibility() == VisibleType::Gone {
            if let Some(geometry) = self.geometry_node_mut() {
                geometry.set_frame_size(SizeF::default());
                geometry.set_content_size(SizeF::default());
            }
            self.set_stage(LayoutStage::Measured);
            return;
        }

        match parent_constraint {
            Some(constraint) => self.apply_constraint(ctx, constraint),
            None => self.create_root_constraint(ctx),
        }

        let Some(node) = self.tree.get_mut(self.id) else {
            return;
        };
        let property = &mut node.layout_property;
        property.update_content_constraint(ctx);
        node.geometry_node.update_margin(property.create_margin(ctx));
        node.geometry_node
            .update_padding_with_border(property.create_padding_and_border(ctx));

        let flag = property.property_change_flag();
        let skip = !flag.check_measure_flag()
            && !flag.check_request_new_child_node_flag()
            && property.constraint_equal(
                node.prev_layout_constraint.as_ref(),
                node.prev_content_constraint.as_ref(),
            );
        node.prev_layout_constraint = property.layout_constraint().copied();
        node.prev_content_constraint = property.content_constraint().copied();
        if skip {
            trace!(node = ?self.id, "constraints unchanged, measure skipped");
            node.stage = LayoutStage::Measured;
            return;
        }

        match node.algorithm.clone() {
            Some(algorithm) => algorithm.measure(self, ctx),
            None => BoxLayoutAlgorithm.measure(self, ctx),
        }
        self.set_stage(LayoutStage::Measured);
    }

    /// Place children, lay them out, then apply the safe-area and keyboard
    /// adjustments to this node.
    pub fn layout(&mut self, ctx: &mut ViewportContext, is_focus_on_page: bool) {
        let Some(node) = self.tree.get(self.id) else {
            return;
        };
        if !node.is_frame {
            for child in self.tree.children(self.id) {
                LayoutWrapper::new(self.tree, child).layout(ctx, is_focus_on_page);
            }
            return;
        }
        if node.layout_property.visibility() == VisibleType::Gone {
            self.set_stage(LayoutStage::LaidOut);
            return;
        }

        match node.algorithm.clone() {
            Some(algorithm) => algorithm.layout(self, ctx),
            None => BoxLayoutAlgorithm.layout(self, ctx),
        }
        for child in self.tree.children(self.id) {
            LayoutWrapper::new(self.tree, child).layout(ctx, is_focus_on_page);
        }

        let parent_global = self.tree.parent_global_offset(self.id);
        if let Some(geometry) = self.geometry_node_mut() {
            geometry.set_parent_global_offset(parent_global);
        }
        self.save_geo_state(ctx);
        self.expand_safe_area(ctx, is_focus_on_page);
        self.avoid_keyboard(ctx, is_focus_on_page);
        self.set_stage(LayoutStage::LaidOut);
    }

    /// Snapshot the geometry of nodes that may be moved by safe-area or
    /// keyboard handling, and register them for restoration.
    pub fn save_geo_state(&mut self, ctx: &mut ViewportContext) {
        let Some(node) = self.tree.get_mut(self.id) else {
            return;
        };
        let expansive = node
            .layout_property
            .safe_area_expand_opts()
            .is_some_and(|opts| opts.expansive());
        if !(expansive || node.is_page()) {
            return;
        }
        // A node still registered from an earlier pass keeps its older snapshot.
        if ctx.safe_area_manager_mut().add_geo_restore_node(self.id) {
            node.geometry_node.save();
        }
    }

    /// Undo the adjustments recorded by [`save_geo_state`](Self::save_geo_state).
    /// Idempotent.
    pub fn restore_geo_state(&mut self, ctx: &mut ViewportContext) {
        if !ctx.safe_area_manager_mut().remove_restore_node(self.id) {
            return;
        }
        if let Some(geometry) = self.geometry_node_mut() {
            geometry.restore();
        }
    }

    /// Grow the frame into the safe-area insets it touches. Returns whether
    /// the frame changed.
    pub fn expand_safe_area(&mut self, ctx: &ViewportContext, is_focus_on_page: bool) -> bool {
        let Some(node) = self.tree.get(self.id) else {
            return false;
        };
        let property = &node.layout_property;
        let Some(opts) = property.safe_area_expand_opts().copied() else {
            return false;
        };
        if !opts.expansive() {
            return false;
        }
        let parent_scrollable = self
            .tree
            .ancestor_frame_node(self.id)
            .and_then(|parent| self.tree.get(parent))
            .is_some_and(|parent| parent.scrollable);
        if parent_scrollable {
            return false;
        }
        let has_fixed_width = property.has_fixed_width();
        let has_fixed_height = property.has_fixed_height();
        let aspect_ratio = property.aspect_ratio();
        let rtl = property.non_auto_layout_direction(ctx) == TextDirection::Rtl;

        if opts.expansive_keyboard() && is_focus_on_page {
            self.expand_into_keyboard(ctx);
        }

        let safe_area = ctx.safe_area_manager().combined_safe_area(&opts);
        if !safe_area.is_valid() {
            return false;
        }
        let Some(original) = self.geometry_node().map(|g| g.frame_rect()) else {
            return false;
        };
        let parent_global = self.tree.parent_global_offset(self.id);
        let frame = original.translated(parent_global);
        let (left_edge, right_edge) = if rtl {
            (SafeAreaEdge::END, SafeAreaEdge::START)
        } else {
            (SafeAreaEdge::START, SafeAreaEdge::END)
        };

        let mut left = frame.left();
        let mut top = frame.top();
        let mut right = frame.right();
        let mut bottom = frame.bottom();
        if opts.edges.contains(SafeAreaEdge::TOP) && safe_area.top.is_overlapped(top) {
            top = safe_area.top.start as f32;
        }
        if opts.edges.contains(left_edge) && safe_area.left.is_overlapped(left) {
            left = safe_area.left.start as f32;
        }
        if opts.edges.contains(SafeAreaEdge::BOTTOM) && safe_area.bottom.is_overlapped(bottom) {
            bottom = safe_area.bottom.end as f32;
        }
        if opts.edges.contains(right_edge) && safe_area.right.is_overlapped(right) {
            right = safe_area.right.end as f32;
        }

        let mut expanded = RectF::new(left, top, right - left, bottom - top);
        if has_fixed_width {
            expanded.width = original.width;
        }
        if has_fixed_height {
            expanded.height = original.height;
        }
        if let Some(ratio) = aspect_ratio {
            expanded.height = expanded.width / ratio;
        }
        if expanded == frame {
            return false;
        }

        let local = expanded.translated(-parent_global);
        let diff = original.offset() - local.offset();
        if let Some(geometry) = self.geometry_node_mut() {
            let grown = SizeF::new(local.width - original.width, local.height - original.height);
            if let Some(content) = geometry.content_size() {
                geometry.set_content_size(SizeF::new(
                    (content.width + grown.width).max(0.0),
                    (content.height + grown.height).max(0.0),
                ));
            }
            geometry.set_frame_rect(local);
        }
        if diff != OffsetF::ZERO {
            self.adjust_children(diff);
        }
        self.set_stage(LayoutStage::SafeAreaExpanded);
        debug!(node = ?self.id, frame = %local, "expanded into safe area");
        true
    }

    /// Undo the keyboard shift of the enclosing page so this node stays
    /// under the keyboard. Skipped when an ancestor already does so.
    pub fn expand_into_keyboard(&mut self, ctx: &ViewportContext) -> bool {
        let mut ancestor = self.tree.ancestor_frame_node(self.id);
        while let Some(id) = ancestor {
            let Some(node) = self.tree.get(id) else {
                break;
            };
            let expands_keyboard = node
                .layout_property
                .safe_area_expand_opts()
                .is_some_and(|opts| opts.expansive_keyboard());
            if expands_keyboard {
                trace!(node = ?self.id, ancestor = ?id, "ancestor already expands into keyboard");
                return false;
            }
            ancestor = self.tree.ancestor_frame_node(id);
        }
        let keyboard_offset = ctx.safe_area_manager().keyboard_offset();
        let Some(geometry) = self.geometry_node_mut() else {
            return false;
        };
        geometry.set_frame_offset(geometry.frame_offset() - OffsetF::new(0.0, keyboard_offset));
        true
    }

    /// Shift a focused page by the keyboard offset. Other nodes are left alone.
    pub fn avoid_keyboard(&mut self, ctx: &ViewportContext, is_focus_on_page: bool) -> bool {
        if !is_focus_on_page {
            return false;
        }
        let keyboard_offset = ctx.safe_area_manager().keyboard_offset();
        let Some(node) = self.tree.get_mut(self.id) else {
            return false;
        };
        if !node.is_page() {
            return false;
        }
        let geometry = &mut node.geometry_node;
        geometry.set_frame_offset(geometry.frame_offset() + OffsetF::new(0.0, keyboard_offset));
        node.stage = LayoutStage::KeyboardAvoided;
        true
    }

    /// Move every frame child by `offset`, looking through syntax nodes.
    pub fn adjust_children(&mut self, offset: OffsetF) {
        for child in self.tree.children(self.id) {
            adjust_child(self.tree, child, offset);
        }
    }
}

fn adjust_child(tree: &mut FrameTree, id: FrameNodeId, offset: OffsetF) {
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    if node.is_frame {
        let geometry = &mut node.geometry_node;
        geometry.set_frame_offset(geometry.frame_offset() + offset);
        geometry.set_parent_global_offset(geometry.parent_global_offset() - offset);
        return;
    }
    for child in tree.children(id) {
        adjust_child(tree, child, offset);
    }
}
