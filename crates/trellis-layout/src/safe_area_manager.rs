//! Window-level safe-area state shared by a layout pass.

use indexmap::IndexSet;
use tracing::debug;
use trellis_core::{Inset, SafeAreaEdge, SafeAreaExpandOpts, SafeAreaInsets, SafeAreaType};

use crate::tree::FrameNodeId;

/// How the window reacts to the soft keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardAvoidMode {
    /// Pages are shifted by the keyboard offset.
    #[default]
    Offset,
    /// The keyboard area becomes part of the bottom safe area.
    Resize,
}

/// Holds the system, cutout, navigation and keyboard insets of the window,
/// plus the set of nodes whose geometry must be restored before the next pass.
///
/// Every setter compares before writing and reports whether the value changed.
#[derive(Debug, Clone, Default)]
pub struct SafeAreaManager {
    system_safe_area: SafeAreaInsets,
    cutout_safe_area: SafeAreaInsets,
    nav_safe_area: SafeAreaInsets,
    keyboard_inset: Inset,
    /// Vertical shift applied to pages while the keyboard is up. Negative moves up.
    keyboard_offset: f32,
    is_full_screen: bool,
    ignore_safe_area: bool,
    keyboard_avoid_mode: KeyboardAvoidMode,
    geo_restore_nodes: IndexSet<FrameNodeId>,
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl SafeAreaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_system_safe_area(&mut self, insets: SafeAreaInsets) -> bool {
        replace(&mut self.system_safe_area, insets)
    }

    pub fn update_cutout_safe_area(&mut self, insets: SafeAreaInsets) -> bool {
        replace(&mut self.cutout_safe_area, insets)
    }

    pub fn update_nav_area(&mut self, insets: SafeAreaInsets) -> bool {
        replace(&mut self.nav_safe_area, insets)
    }

    /// Recompute the keyboard inset for a keyboard of `keyboard_height`.
    ///
    /// The keyboard rises from the top of the system bottom inset when there is
    /// one, otherwise from the bottom of the root.
    pub fn update_keyboard_safe_area(&mut self, keyboard_height: f32, root_height: f32) -> bool {
        let bottom = if self.system_safe_area.bottom.is_valid() {
            self.system_safe_area.bottom.start
        } else {
            root_height.max(0.0).round() as u32
        };
        let height = (keyboard_height.max(0.0).round() as u32).min(bottom);
        let inset = Inset::new(bottom - height, bottom);
        let changed = replace(&mut self.keyboard_inset, inset);
        if changed {
            debug!(keyboard = %inset, "keyboard safe area updated");
        }
        changed
    }

    pub fn update_keyboard_offset(&mut self, offset: f32) -> bool {
        replace(&mut self.keyboard_offset, offset)
    }

    pub fn set_is_full_screen(&mut self, value: bool) -> bool {
        replace(&mut self.is_full_screen, value)
    }

    pub fn set_ignore_safe_area(&mut self, value: bool) -> bool {
        replace(&mut self.ignore_safe_area, value)
    }

    pub fn set_keyboard_avoid_mode(&mut self, mode: KeyboardAvoidMode) -> bool {
        replace(&mut self.keyboard_avoid_mode, mode)
    }

    pub fn keyboard_avoid_mode(&self) -> KeyboardAvoidMode {
        self.keyboard_avoid_mode
    }

    pub fn keyboard_safe_area_enabled(&self) -> bool {
        self.keyboard_avoid_mode == KeyboardAvoidMode::Resize
    }

    pub fn is_full_screen(&self) -> bool {
        self.is_full_screen
    }

    pub fn is_ignore_safe_area(&self) -> bool {
        self.ignore_safe_area
    }

    /// Safe areas apply at all: the window is full screen and not ignoring them.
    pub fn is_safe_area_valid(&self) -> bool {
        !self.ignore_safe_area && self.is_full_screen
    }

    /// System, cutout and navigation insets combined, or empty when safe
    /// areas do not apply.
    pub fn safe_area(&self) -> SafeAreaInsets {
        if !self.is_safe_area_valid() {
            return SafeAreaInsets::default();
        }
        self.safe_area_without_process()
    }

    /// Combined insets regardless of window mode.
    pub fn safe_area_without_process(&self) -> SafeAreaInsets {
        self.system_safe_area
            .combine(&self.cutout_safe_area)
            .combine(&self.nav_safe_area)
    }

    pub fn cutout_safe_area(&self) -> SafeAreaInsets {
        if !self.is_safe_area_valid() {
            return SafeAreaInsets::default();
        }
        self.cutout_safe_area
    }

    pub fn system_safe_area(&self) -> SafeAreaInsets {
        self.system_safe_area
    }

    pub fn nav_safe_area(&self) -> SafeAreaInsets {
        self.nav_safe_area
    }

    pub fn keyboard_inset(&self) -> Inset {
        self.keyboard_inset
    }

    pub fn keyboard_offset(&self) -> f32 {
        self.keyboard_offset
    }

    /// Union of the insets selected by `opts`.
    ///
    /// The keyboard only contributes to the bottom edge, and only in
    /// [`KeyboardAvoidMode::Resize`].
    pub fn combined_safe_area(&self, opts: &SafeAreaExpandOpts) -> SafeAreaInsets {
        let mut res = SafeAreaInsets::default();
        if !self.is_safe_area_valid() {
            return res;
        }
        if opts.kind.contains(SafeAreaType::CUTOUT) {
            res = res.combine(&self.cutout_safe_area);
        }
        if opts.kind.contains(SafeAreaType::SYSTEM) {
            res = res.combine(&self.system_safe_area).combine(&self.nav_safe_area);
        }
        if self.keyboard_safe_area_enabled()
            && opts.kind.contains(SafeAreaType::KEYBOARD)
            && opts.edges.contains(SafeAreaEdge::BOTTOM)
        {
            res.bottom = res.bottom.combine(&self.keyboard_inset);
        }
        res
    }

    /// Register a node whose saved geometry must be restored before the next pass.
    pub fn add_geo_restore_node(&mut self, id: FrameNodeId) -> bool {
        self.geo_restore_nodes.insert(id)
    }

    /// Returns whether `id` was registered.
    pub fn remove_restore_node(&mut self, id: FrameNodeId) -> bool {
        self.geo_restore_nodes.shift_remove(&id)
    }

    pub fn geo_restore_nodes(&self) -> impl Iterator<Item = FrameNodeId> + '_ {
        self.geo_restore_nodes.iter().copied()
    }

    /// Drain the restore set.
    pub fn take_geo_restore_nodes(&mut self) -> Vec<FrameNodeId> {
        self.geo_restore_nodes.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_bar() -> SafeAreaInsets {
        SafeAreaInsets {
            top: Inset::new(0, 20),
            bottom: Inset::new(780, 800),
            ..Default::default()
        }
    }

    #[test]
    fn test_setters_report_change() {
        let mut manager = SafeAreaManager::new();
        assert!(manager.update_system_safe_area(status_bar()));
        assert!(!manager.update_system_safe_area(status_bar()));
        assert!(manager.set_is_full_screen(true));
        assert!(!manager.set_is_full_screen(true));
        assert!(manager.set_keyboard_avoid_mode(KeyboardAvoidMode::Resize));
        assert!(!manager.set_keyboard_avoid_mode(KeyboardAvoidMode::Resize));
    }

    #[test]
    fn test_safe_area_requires_full_screen() {
        let mut manager = SafeAreaManager::new();
        manager.update_system_safe_area(status_bar());
        assert_eq!(manager.safe_area(), SafeAreaInsets::default());
        manager.set_is_full_screen(true);
        assert_eq!(manager.safe_area(), status_bar());
        manager.set_ignore_safe_area(true);
        assert!(!manager.is_safe_area_valid());
        assert_eq!(manager.safe_area(), SafeAreaInsets::default());
        assert_eq!(manager.safe_area_without_process(), status_bar());
    }

    #[test]
    fn test_keyboard_inset_from_system_bottom() {
        let mut manager = SafeAreaManager::new();
        manager.update_system_safe_area(status_bar());
        assert!(manager.update_keyboard_safe_area(300.0, 800.0));
        assert_eq!(manager.keyboard_inset(), Inset::new(480, 780));
        assert!(!manager.update_keyboard_safe_area(300.0, 800.0));
    }

    #[test]
    fn test_keyboard_inset_from_root_height() {
        let mut manager = SafeAreaManager::new();
        manager.update_keyboard_safe_area(1000.0, 600.0);
        assert_eq!(manager.keyboard_inset(), Inset::new(0, 600));
    }

    #[test]
    fn test_combined_keyboard_only_in_resize_mode() {
        let mut manager = SafeAreaManager::new();
        manager.set_is_full_screen(true);
        manager.update_keyboard_safe_area(300.0, 800.0);
        let opts = SafeAreaExpandOpts::new(SafeAreaType::KEYBOARD, SafeAreaEdge::BOTTOM);
        assert!(!manager.combined_safe_area(&opts).bottom.is_valid());
        manager.set_keyboard_avoid_mode(KeyboardAvoidMode::Resize);
        assert_eq!(manager.combined_safe_area(&opts).bottom, Inset::new(500, 800));
        let top_only = SafeAreaExpandOpts::new(SafeAreaType::KEYBOARD, SafeAreaEdge::TOP);
        assert!(!manager.combined_safe_area(&top_only).is_valid());
    }

    #[test]
    fn test_restore_set() {
        let mut manager = SafeAreaManager::new();
        assert!(manager.add_geo_restore_node(FrameNodeId(3)));
        assert!(!manager.add_geo_restore_node(FrameNodeId(3)));
        manager.add_geo_restore_node(FrameNodeId(1));
        assert_eq!(manager.geo_restore_nodes().collect::<Vec<_>>(), vec![FrameNodeId(3), FrameNodeId(1)]);
        assert!(manager.remove_restore_node(FrameNodeId(3)));
        assert!(!manager.remove_restore_node(FrameNodeId(3)));
        assert_eq!(manager.take_geo_restore_nodes(), vec![FrameNodeId(1)]);
        assert_eq!(manager.geo_restore_nodes().count(), 0);
    }
}
