//! Frame-node arena.
//!
//! Nodes live in a table keyed by [`FrameNodeId`]. Parent and child links are
//! ids, so a node never owns its relatives and lookups of removed nodes just
//! miss.

use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;
use trellis_core::OffsetF;

use crate::algorithm::LayoutAlgorithm;
use crate::constraint::LayoutConstraintF;
use crate::flags::PropertyChangeFlag;
use crate::geometry_node::GeometryNode;
use crate::property::LayoutProperty;
use crate::wrapper::LayoutStage;

/// Tag of page nodes. Only pages avoid the keyboard.
pub const PAGE_TAG: &str = "Page";

/// Unique identifier for a frame node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameNodeId(pub u64);

/// A node in the frame tree.
#[derive(Debug, Clone)]
pub struct FrameNode {
    pub id: FrameNodeId,
    /// Component tag, e.g. `"Page"` or `"Column"`
    pub tag: String,
    pub parent: Option<FrameNodeId>,
    pub children: SmallVec<[FrameNodeId; 4]>,
    pub layout_property: LayoutProperty,
    pub geometry_node: GeometryNode,
    /// `None` uses [`BoxLayoutAlgorithm`](crate::BoxLayoutAlgorithm).
    pub algorithm: Option<Rc<dyn LayoutAlgorithm>>,
    /// Frame nodes own geometry. Non-frame (syntax) nodes only group children
    /// and are transparent to measure and layout.
    pub is_frame: bool,
    /// Children of scrollable nodes never expand into safe areas.
    pub scrollable: bool,
    pub stage: LayoutStage,
    pub(crate) prev_layout_constraint: Option<LayoutConstraintF>,
    pub(crate) prev_content_constraint: Option<LayoutConstraintF>,
}

impl FrameNode {
    /// Create a new frame node.
    pub fn new(id: FrameNodeId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            parent: None,
            children: SmallVec::new(),
            layout_property: LayoutProperty::default(),
            geometry_node: GeometryNode::default(),
            algorithm: None,
            is_frame: true,
            scrollable: false,
            stage: LayoutStage::default(),
            prev_layout_constraint: None,
            prev_content_constraint: None,
        }
    }

    /// Create a syntax node that groups children without geometry of its own.
    pub fn syntax(id: FrameNodeId, tag: impl Into<String>) -> Self {
        Self {
            is_frame: false,
            ..Self::new(id, tag)
        }
    }

    pub fn with_layout_property(mut self, property: LayoutProperty) -> Self {
        self.layout_property = property;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Rc<dyn LayoutAlgorithm>) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn with_scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = scrollable;
        self
    }

    pub fn is_page(&self) -> bool {
        self.tag == PAGE_TAG
    }
}

/// All frame nodes of one window.
#[derive(Debug, Clone, Default)]
pub struct FrameTree {
    nodes: HashMap<FrameNodeId, FrameNode>,
    roots: Vec<FrameNodeId>,
    next_id: u64,
}

impl FrameTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique node ID.
    pub fn next_id(&mut self) -> FrameNodeId {
        let id = FrameNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_root(&mut self, mut node: FrameNode) -> FrameNodeId {
        let id = node.id;
        node.layout_property.set_host(id);
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent_id: FrameNodeId, mut node: FrameNode) -> FrameNodeId {
        let id = node.id;
        node.parent = Some(parent_id);
        node.layout_property.set_host(id);
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(id);
        }
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: FrameNodeId) -> Option<FrameNode> {
        let node = self.nodes.remove(&id)?;
        match node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        for child in node.children.iter().copied() {
            self.remove_subtree(child);
        }
        Some(node)
    }

    fn remove_subtree(&mut self, id: FrameNodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn get(&self, id: FrameNodeId) -> Option<&FrameNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: FrameNodeId) -> Option<&mut FrameNode> {
        self.nodes.get_mut(&id)
    }

    pub fn roots(&self) -> &[FrameNodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FrameNode> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut FrameNode> {
        self.nodes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children, frame or not.
    pub fn children(&self, id: FrameNodeId) -> SmallVec<[FrameNodeId; 4]> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Nearest frame descendants, looking through syntax nodes.
    pub fn frame_children(&self, id: FrameNodeId) -> Vec<FrameNodeId> {
        let mut out = Vec::new();
        for child in self.children(id) {
            match self.nodes.get(&child) {
                Some(node) if node.is_frame => out.push(child),
                Some(_) => out.extend(self.frame_children(child)),
                None => {}
            }
        }
        out
    }

    /// Nearest frame ancestor, skipping syntax nodes.
    pub fn ancestor_frame_node(&self, id: FrameNodeId) -> Option<FrameNodeId> {
        let mut current = self.nodes.get(&id)?.parent;
        while let Some(parent_id) = current {
            let parent = self.nodes.get(&parent_id)?;
            if parent.is_frame {
                return Some(parent_id);
            }
            current = parent.parent;
        }
        None
    }

    /// Window position of the frame that `id`'s offset is relative to.
    pub fn parent_global_offset(&self, id: FrameNodeId) -> OffsetF {
        let mut offset = OffsetF::ZERO;
        let mut current = self.ancestor_frame_node(id);
        while let Some(ancestor) = current {
            if let Some(node) = self.nodes.get(&ancestor) {
                offset += node.geometry_node.frame_offset();
            }
            current = self.ancestor_frame_node(ancestor);
        }
        offset
    }

    /// Window position of `id`'s frame.
    pub fn global_offset(&self, id: FrameNodeId) -> OffsetF {
        let own = self
            .nodes
            .get(&id)
            .map_or(OffsetF::ZERO, |n| n.geometry_node.frame_offset());
        self.parent_global_offset(id) + own
    }

    /// Apply a property mutation to `id` and propagate its flags.
    ///
    /// A change that needs a measure asks every ancestor to re-measure its
    /// children.
    pub fn update_layout_property<F>(&mut self, id: FrameNodeId, update: F) -> PropertyChangeFlag
    where
        F: FnOnce(&mut LayoutProperty) -> PropertyChangeFlag,
    {
        let Some(node) = self.nodes.get_mut(&id) else {
            return PropertyChangeFlag::NORMAL;
        };
        let flag = update(&mut node.layout_property);
        if flag.check_measure_flag() {
            let mut current = node.parent;
            while let Some(parent_id) = current {
                let Some(parent) = self.nodes.get_mut(&parent_id) else {
                    break;
                };
                parent
                    .layout_property
                    .update_property_change_flag(PropertyChangeFlag::BY_CHILD_REQUEST);
                current = parent.parent;
            }
        }
        flag
    }
}
