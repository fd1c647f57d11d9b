//! Per-node geometry output of measure and layout.

use trellis_core::{MarginPropertyF, OffsetF, PaddingPropertyF, RectF, SizeF};

use crate::constraint::LayoutConstraintF;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GeometrySnapshot {
    frame: RectF,
    content_size: Option<SizeF>,
    content_offset: OffsetF,
    parent_global_offset: OffsetF,
}

/// Frame and content geometry of one node.
///
/// The frame offset is relative to the nearest frame ancestor. A snapshot
/// stack lets the safe-area and keyboard adjustments of one pass be undone
/// before the next.
#[derive(Debug, Clone, Default)]
pub struct GeometryNode {
    frame: RectF,
    content_size: Option<SizeF>,
    content_offset: OffsetF,
    margin: Option<MarginPropertyF>,
    padding_with_border: Option<PaddingPropertyF>,
    parent_layout_constraint: Option<LayoutConstraintF>,
    parent_global_offset: OffsetF,
    restore_stack: Vec<GeometrySnapshot>,
}

impl GeometryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_rect(&self) -> RectF {
        self.frame
    }

    pub fn set_frame_rect(&mut self, rect: RectF) {
        self.frame = rect;
    }

    pub fn frame_offset(&self) -> OffsetF {
        self.frame.offset()
    }

    pub fn set_frame_offset(&mut self, offset: OffsetF) {
        self.frame.set_offset(offset);
    }

    pub fn frame_size(&self) -> SizeF {
        self.frame.size()
    }

    pub fn set_frame_size(&mut self, size: SizeF) {
        self.frame.set_size(size);
    }

    /// Frame size grown by the margin.
    pub fn margin_frame_size(&self) -> SizeF {
        let mut size = self.frame.size();
        if let Some(margin) = &self.margin {
            size.add_padding(margin.left, margin.right, margin.top, margin.bottom);
        }
        size
    }

    pub fn content_size(&self) -> Option<SizeF> {
        self.content_size
    }

    pub fn set_content_size(&mut self, size: SizeF) {
        self.content_size = Some(size);
    }

    pub fn content_offset(&self) -> OffsetF {
        self.content_offset
    }

    pub fn set_content_offset(&mut self, offset: OffsetF) {
        self.content_offset = offset;
    }

    /// Content box relative to the frame.
    pub fn content_rect(&self) -> Option<RectF> {
        self.content_size
            .map(|size| RectF::from_offset_size(self.content_offset, size))
    }

    pub fn margin(&self) -> Option<&MarginPropertyF> {
        self.margin.as_ref()
    }

    pub fn update_margin(&mut self, margin: MarginPropertyF) {
        self.margin = Some(margin);
    }

    pub fn padding_with_border(&self) -> Option<&PaddingPropertyF> {
        self.padding_with_border.as_ref()
    }

    pub fn update_padding_with_border(&mut self, padding: PaddingPropertyF) {
        self.padding_with_border = Some(padding);
    }

    pub fn parent_layout_constraint(&self) -> Option<&LayoutConstraintF> {
        self.parent_layout_constraint.as_ref()
    }

    pub fn set_parent_layout_constraint(&mut self, constraint: LayoutConstraintF) {
        self.parent_layout_constraint = Some(constraint);
    }

    pub fn reset_parent_layout_constraint(&mut self) {
        self.parent_layout_constraint = None;
    }

    pub fn parent_global_offset(&self) -> OffsetF {
        self.parent_global_offset
    }

    pub fn set_parent_global_offset(&mut self, offset: OffsetF) {
        self.parent_global_offset = offset;
    }

    /// Push the current frame and content geometry.
    pub fn save(&mut self) {
        self.restore_stack.push(GeometrySnapshot {
            frame: self.frame,
            content_size: self.content_size,
            content_offset: self.content_offset,
            parent_global_offset: self.parent_global_offset,
        });
    }

    /// Pop the last saved geometry. Returns false when nothing was saved.
    pub fn restore(&mut self) -> bool {
        let Some(snapshot) = self.restore_stack.pop() else {
            return false;
        };
        self.frame = snapshot.frame;
        self.content_size = snapshot.content_size;
        self.content_offset = snapshot.content_offset;
        self.parent_global_offset = snapshot.parent_global_offset;
        true
    }

    pub fn has_saved_state(&self) -> bool {
        !self.restore_stack.is_empty()
    }
}
