//! # Scene Configuration
//!
//! Settings for the scene kernel, the notice board and the bloom compositor.
//! Every struct has sensible defaults matching the stock viewer and can be
//! loaded from TOML or RON through [`Config`].

use serde::{Serialize, Deserialize};

use crate::config::Config;

/// Initial viewport description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Device pixel ratio used by the anti-aliasing pass
    pub pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
        }
    }
}

/// Notice board growth settings
///
/// Messages addressed to names that never register stay on the board for
/// the life of the process. The soft limit only makes that visible in the
/// logs; nothing is ever dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeBoardConfig {
    /// Log a warning when the board grows past this many pending notices
    pub soft_limit: Option<usize>,
}

/// Bloom pass parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Glow strength
    pub strength: f32,
    /// Blur radius
    pub radius: f32,
    /// Luminance threshold; 0 lets every non-black pixel glow
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 3.0,
            radius: 1.0,
            threshold: 0.0,
        }
    }
}

/// Top level scene configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial viewport
    pub viewport: ViewportConfig,
    /// Notice board settings
    pub notice_board: NoticeBoardConfig,
    /// Bloom pass settings
    pub bloom: BloomSettings,
    /// View-space depth tolerance for the raster occlusion test
    ///
    /// A queried point counts as nearest when its depth is at most the hit
    /// depth plus this bias.
    pub depth_bias: f32,
}

impl Config for SceneConfig {}
