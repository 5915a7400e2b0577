//! Viewport dimensions

use crate::core::ViewportConfig;

/// Drawable surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Device pixel ratio
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Create a viewport with a pixel ratio of 1
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixel_ratio: 1.0 }
    }

    /// Set the device pixel ratio
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Width over height; a zero height is treated as one pixel
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Texel size used by the anti-aliasing pass
    pub fn inverse_resolution(&self) -> (f32, f32) {
        let width = (self.width.max(1) as f32) * self.pixel_ratio;
        let height = (self.height.max(1) as f32) * self.pixel_ratio;
        (1.0 / width, 1.0 / height)
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(config: ViewportConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            pixel_ratio: config.pixel_ratio,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        ViewportConfig::default().into()
    }
}
