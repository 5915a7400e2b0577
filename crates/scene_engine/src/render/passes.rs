//! Composite post-processing passes
//!
//! The final image is assembled from two render targets: the bloom target
//! (only luminant objects visible, everything else flat black) and the base
//! target (the normal scene). The pixel adder sums them and FXAA smooths the
//! result.

use crate::core::BloomSettings;

use super::viewport::Viewport;

/// Unreal-style bloom applied to the off-screen target
#[derive(Debug, Clone, PartialEq)]
pub struct BloomPass {
    /// Glow strength multiplier
    pub strength: f32,
    /// Blur radius
    pub radius: f32,
    /// Luminance threshold below which pixels do not glow
    pub threshold: f32,
    /// Resolution of the bloom target in pixels
    pub resolution: (u32, u32),
}

impl BloomPass {
    pub fn new(settings: &BloomSettings, viewport: &Viewport) -> Self {
        Self {
            strength: settings.strength,
            radius: settings.radius,
            threshold: settings.threshold,
            resolution: (viewport.width, viewport.height),
        }
    }
}

/// Additive blend of the base image and the bloom target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelAdderPass {
    /// Weight of the base image
    pub base_weight: f32,
    /// Weight of the bloom image
    pub bloom_weight: f32,
}

impl Default for PixelAdderPass {
    fn default() -> Self {
        Self {
            base_weight: 1.0,
            bloom_weight: 1.0,
        }
    }
}

/// Fast approximate anti-aliasing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxaaPass {
    /// Texel size `(1 / (width * ratio), 1 / (height * ratio))`
    pub inverse_resolution: (f32, f32),
}

impl FxaaPass {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            inverse_resolution: viewport.inverse_resolution(),
        }
    }
}

/// The pass chain built once when the first camera is bound
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePasses {
    pub bloom: BloomPass,
    pub adder: PixelAdderPass,
    pub fxaa: FxaaPass,
}

impl CompositePasses {
    /// Build the bloom, pixel-adder and FXAA passes for a viewport
    pub fn new(settings: &BloomSettings, viewport: &Viewport) -> Self {
        Self {
            bloom: BloomPass::new(settings, viewport),
            adder: PixelAdderPass::default(),
            fxaa: FxaaPass::new(viewport),
        }
    }

    /// Follow a viewport resize without rebuilding the chain
    pub fn resize(&mut self, viewport: &Viewport) {
        let resolution = (viewport.width, viewport.height);
        if self.bloom.resolution != resolution {
            log::debug!("Composite passes resized to {}x{}", viewport.width, viewport.height);
            self.bloom.resolution = resolution;
        }
        self.fxaa.inverse_resolution = viewport.inverse_resolution();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fxaa_resolution_includes_pixel_ratio() {
        let viewport = Viewport::new(800, 400).with_pixel_ratio(2.0);
        let passes = CompositePasses::new(&BloomSettings::default(), &viewport);

        assert_relative_eq!(passes.fxaa.inverse_resolution.0, 1.0 / 1600.0);
        assert_relative_eq!(passes.fxaa.inverse_resolution.1, 1.0 / 800.0);
        assert_eq!(passes.bloom.resolution, (800, 400));
    }

    #[test]
    fn test_resize_updates_targets() {
        let mut passes = CompositePasses::new(&BloomSettings::default(), &Viewport::new(100, 100));
        passes.resize(&Viewport::new(200, 50));

        assert_eq!(passes.bloom.resolution, (200, 50));
        assert_relative_eq!(passes.fxaa.inverse_resolution.1, 1.0 / 50.0);
        assert_relative_eq!(passes.bloom.strength, 3.0);
    }
}
