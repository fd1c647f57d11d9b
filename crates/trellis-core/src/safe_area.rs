//! Safe-area insets and expansion options.
//!
//! An [`Inset`] is a half-open pixel range `[start, end)` along one axis of
//! the window: the top inset `[0, 20)` is a 20px status bar, the bottom
//! inset `[780, 800)` a 20px home indicator on an 800px screen.

use std::fmt;

use bitflags::bitflags;

/// Half-open range covered by an obstruction on one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inset {
    pub start: u32,
    pub end: u32,
}

impl Inset {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Non-empty range.
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    pub fn length(&self) -> u32 {
        if self.is_valid() {
            self.end - self.start
        } else {
            0
        }
    }

    /// Whether `pos` touches the range. The end is inclusive so that an edge
    /// laid out flush against the inset still counts.
    pub fn is_overlapped(&self, pos: f32) -> bool {
        self.is_valid() && self.start as f32 <= pos && pos <= self.end as f32
    }

    /// Union by outer bounds. An empty side yields the other side.
    pub fn combine(&self, other: &Inset) -> Inset {
        if !self.is_valid() {
            return *other;
        }
        if !other.is_valid() {
            return *self;
        }
        Inset::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Inset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// One [`Inset`] per edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafeAreaInsets {
    pub left: Inset,
    pub top: Inset,
    pub right: Inset,
    pub bottom: Inset,
}

impl SafeAreaInsets {
    pub const fn new(left: Inset, top: Inset, right: Inset, bottom: Inset) -> Self {
        Self { left, top, right, bottom }
    }

    /// Any edge is non-empty.
    pub fn is_valid(&self) -> bool {
        self.left.is_valid() || self.top.is_valid() || self.right.is_valid() || self.bottom.is_valid()
    }

    /// Edge-wise union.
    pub fn combine(&self, other: &SafeAreaInsets) -> SafeAreaInsets {
        SafeAreaInsets {
            left: self.left.combine(&other.left),
            top: self.top.combine(&other.top),
            right: self.right.combine(&other.right),
            bottom: self.bottom.combine(&other.bottom),
        }
    }
}

impl fmt::Display for SafeAreaInsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left {}, top {}, right {}, bottom {}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

bitflags! {
    /// Sources of obstruction a node may expand into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SafeAreaType: u32 {
        const SYSTEM = 1;
        const CUTOUT = 1 << 1;
        const KEYBOARD = 1 << 2;
    }
}

bitflags! {
    /// Edges a node may expand toward.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SafeAreaEdge: u32 {
        const TOP = 1;
        const BOTTOM = 1 << 1;
        const START = 1 << 2;
        const END = 1 << 3;
    }
}

/// Which safe-area sources and edges a node expands into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafeAreaExpandOpts {
    pub kind: SafeAreaType,
    pub edges: SafeAreaEdge,
}

impl SafeAreaExpandOpts {
    pub const fn new(kind: SafeAreaType, edges: SafeAreaEdge) -> Self {
        Self { kind, edges }
    }

    /// Both masks are non-empty.
    pub fn expansive(&self) -> bool {
        !self.kind.is_empty() && !self.edges.is_empty()
    }

    /// Expands through the bottom edge into the keyboard.
    pub fn expansive_keyboard(&self) -> bool {
        self.kind.contains(SafeAreaType::KEYBOARD) && self.edges.contains(SafeAreaEdge::BOTTOM)
    }
}
