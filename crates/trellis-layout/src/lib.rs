//! Constraint resolution and layout orchestration for Trellis.
//!
//! Every node of a [`FrameTree`] carries a [`LayoutProperty`] (what the author
//! declared) and a [`GeometryNode`] (what layout produced). A pass runs in
//! three stages:
//!
//! 1. **Constraint resolution**: each node turns its parent's
//!    [`LayoutConstraintF`] and its own declarations into a layout and a
//!    content constraint
//! 2. **Measure and layout**: a [`LayoutAlgorithm`] sizes the node and places
//!    its children, skipping nodes whose constraints did not change
//! 3. **Safe areas**: nodes that opt in grow into the system, cutout and
//!    keyboard insets tracked by the [`SafeAreaManager`], and pages shift to
//!    avoid the keyboard
//!
//! # Example
//!
//! ```
//! use trellis_core::{CalcLength, CalcSize, MeasureType};
//! use trellis_layout::{FrameNode, FrameTree, LayoutPass, ViewportContext};
//!
//! let mut ctx = ViewportContext::new(400.0, 300.0);
//! let mut tree = FrameTree::new();
//! let root = tree.next_id();
//! tree.add_root(FrameNode::new(root, "Stack"));
//! tree.update_layout_property(root, |p| p.update_measure_type(MeasureType::MatchParent));
//! let child = tree.next_id();
//! tree.add_child(root, FrameNode::new(child, "Text"));
//! tree.update_layout_property(child, |p| {
//!     p.update_user_defined_ideal_size(CalcSize::new(
//!         Some(CalcLength::px(100.0)),
//!         Some(CalcLength::px(50.0)),
//!     ))
//! });
//!
//! LayoutPass::new().run(&mut tree, &mut ctx);
//! let frame = tree.get(child).unwrap().geometry_node.frame_rect();
//! assert_eq!((frame.x, frame.y), (150.0, 125.0));
//! ```

mod algorithm;
mod constraint;
mod context;
mod flags;
mod geometry_node;
mod pass;
mod property;
mod safe_area_manager;
mod tree;
mod wrapper;

pub use algorithm::{BoxLayoutAlgorithm, LayoutAlgorithm};
pub use constraint::LayoutConstraintF;
pub use context::ViewportContext;
pub use flags::PropertyChangeFlag;
pub use geometry_node::GeometryNode;
pub use pass::LayoutPass;
pub use property::{edges_to_json_string, parse_edges_json, LayoutProperty};
pub use safe_area_manager::{KeyboardAvoidMode, SafeAreaManager};
pub use tree::{FrameNode, FrameNodeId, FrameTree, PAGE_TAG};
pub use wrapper::{LayoutStage, LayoutWrapper};
