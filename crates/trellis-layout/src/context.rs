//! Viewport-wide inputs to constraint resolution.

use trellis_core::{ScaleProperty, SizeF};

use crate::safe_area_manager::SafeAreaManager;

/// Root size, unit scales, direction and safe-area state for one window.
///
/// Passed explicitly to every resolver that needs window information.
#[derive(Debug, Clone)]
pub struct ViewportContext {
    root_width: f32,
    root_height: f32,
    dip_scale: f32,
    font_scale: f32,
    /// Design-width ratio used for `lpx`.
    lpx_scale: f32,
    rtl: bool,
    safe_area_manager: SafeAreaManager,
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl ViewportContext {
    pub fn new(root_width: f32, root_height: f32) -> Self {
        Self {
            root_width,
            root_height,
            dip_scale: 1.0,
            font_scale: 1.0,
            lpx_scale: 1.0,
            rtl: false,
            safe_area_manager: SafeAreaManager::default(),
        }
    }

    pub fn with_dip_scale(mut self, scale: f32) -> Self {
        self.dip_scale = scale;
        self
    }

    pub fn with_font_scale(mut self, scale: f32) -> Self {
        self.font_scale = scale;
        self
    }

    pub fn with_lpx_scale(mut self, scale: f32) -> Self {
        self.lpx_scale = scale;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_safe_area_manager(mut self, manager: SafeAreaManager) -> Self {
        self.safe_area_manager = manager;
        self
    }

    pub fn root_width(&self) -> f32 {
        self.root_width
    }

    pub fn root_height(&self) -> f32 {
        self.root_height
    }

    pub fn root_size(&self) -> SizeF {
        SizeF::new(self.root_width, self.root_height)
    }

    /// Resize the root. Returns whether the size changed.
    pub fn set_root_size(&mut self, width: f32, height: f32) -> bool {
        if self.root_width == width && self.root_height == height {
            return false;
        }
        self.root_width = width;
        self.root_height = height;
        true
    }

    pub fn dip_scale(&self) -> f32 {
        self.dip_scale
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Scales in the shape layout constraints carry them.
    pub fn scale_property(&self) -> ScaleProperty {
        ScaleProperty::new(self.dip_scale, self.font_scale, self.lpx_scale)
    }

    pub fn safe_area_manager(&self) -> &SafeAreaManager {
        &self.safe_area_manager
    }

    pub fn safe_area_manager_mut(&mut self) -> &mut SafeAreaManager {
        &mut self.safe_area_manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = ViewportContext::default();
        assert_eq!(ctx.root_size(), SizeF::new(800.0, 600.0));
        assert_eq!(ctx.scale_property(), ScaleProperty::default());
        assert!(!ctx.is_rtl());
    }

    #[test]
    fn test_builders() {
        let ctx = ViewportContext::new(360.0, 780.0)
            .with_dip_scale(3.0)
            .with_font_scale(1.5)
            .with_lpx_scale(0.5)
            .with_rtl(true);
        assert_eq!(ctx.scale_property(), ScaleProperty::new(3.0, 1.5, 0.5));
        assert!(ctx.is_rtl());
    }

    #[test]
    fn test_set_root_size() {
        let mut ctx = ViewportContext::default();
        assert!(!ctx.set_root_size(800.0, 600.0));
        assert!(ctx.set_root_size(1024.0, 768.0));
        assert_eq!(ctx.root_height(), 768.0);
    }
}
