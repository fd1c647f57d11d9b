//! Dirty flags raised by layout-property mutations.

use bitflags::bitflags;

bitflags! {
    /// What a property change invalidates.
    ///
    /// Mutators on [`LayoutProperty`](crate::LayoutProperty) return the flags
    /// they raised; an empty set means the call was a no-op.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyChangeFlag: u32 {
        const MEASURE = 1;
        const LAYOUT = 1 << 1;
        const DIFF = 1 << 2;
        const MEASURE_SELF = 1 << 3;
        const MEASURE_SELF_AND_PARENT = 1 << 4;
        const BY_CHILD_REQUEST = 1 << 5;
        const RENDER = 1 << 6;
        const RENDER_BY_CHILD_REQUEST = 1 << 7;
        const EVENT = 1 << 8;
        const MEASURE_SELF_AND_CHILD = 1 << 9;
    }
}

impl PropertyChangeFlag {
    /// Nothing changed.
    pub const NORMAL: Self = Self::empty();

    /// The node needs a measure or layout of any kind.
    pub fn check_need_request_measure_and_layout(self) -> bool {
        self.check_measure_flag() || self.check_layout_flag() || self.check_request_new_child_node_flag()
    }

    /// The node's own size may have changed.
    pub fn check_measure_flag(self) -> bool {
        self.intersects(
            Self::MEASURE
                | Self::MEASURE_SELF
                | Self::MEASURE_SELF_AND_PARENT
                | Self::MEASURE_SELF_AND_CHILD,
        )
    }

    /// A descendant asked to be measured again.
    pub fn check_request_new_child_node_flag(self) -> bool {
        self.contains(Self::BY_CHILD_REQUEST)
    }

    pub fn check_layout_flag(self) -> bool {
        self.contains(Self::LAYOUT)
    }

    pub fn check_need_render(self) -> bool {
        self.intersects(Self::RENDER | Self::RENDER_BY_CHILD_REQUEST)
    }
}
