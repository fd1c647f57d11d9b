//! Whole-tree measure and layout.

use tracing::debug;

use crate::context::ViewportContext;
use crate::tree::FrameTree;
use crate::wrapper::LayoutWrapper;

/// One measure-and-layout pass over every root of a [`FrameTree`].
///
/// Geometry moved by the previous pass's safe-area and keyboard handling is
/// restored first, so adjustments never accumulate. Dirty flags are cleared
/// once every node has been laid out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutPass {
    is_focus_on_page: bool,
}

impl LayoutPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the focused input lives on a page, which makes pages avoid
    /// the keyboard.
    pub fn with_focus_on_page(mut self, focus: bool) -> Self {
        self.is_focus_on_page = focus;
        self
    }

    pub fn run(&self, tree: &mut FrameTree, ctx: &mut ViewportContext) {
        let restore: Vec<_> = ctx.safe_area_manager().geo_restore_nodes().collect();
        for id in restore {
            LayoutWrapper::new(tree, id).restore_geo_state(ctx);
        }

        for root in tree.roots().to_vec() {
            LayoutWrapper::new(tree, root).measure(ctx, None);
            LayoutWrapper::new(tree, root).layout(ctx, self.is_focus_on_page);
        }

        for node in tree.nodes_mut() {
            node.layout_property.clean_dirty();
        }
        debug!(nodes = tree.len(), "layout pass finished");
    }
}
