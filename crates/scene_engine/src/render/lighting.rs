//! Lighting system

use crate::foundation::math::Vec3;

use super::color::Color;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Uniform light from every direction
    Ambient,
    /// Directional light (like sunlight)
    Directional,
    /// Point light (like a lightbulb)
    Point,
}

/// Shadow map parameters for shadow-casting lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Near plane of the shadow camera
    pub near: f32,
    /// Far plane of the shadow camera
    pub far: f32,
    /// Half extent of the orthographic shadow frustum
    pub half_extent: f32,
    /// Depth bias against acne
    pub bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 1024,
            near: 0.1,
            far: 200.0,
            half_extent: 10.0,
            bias: -0.0005,
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub light_type: LightType,
    /// Light position (directional lights shine from here toward `target`)
    pub position: Vec3,
    /// Point the light aims at (directional lights)
    pub target: Vec3,
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Light range (point lights, 0 = unlimited)
    pub range: f32,
    /// Shadow casting parameters
    pub shadow: Option<ShadowSettings>,
}

impl Light {
    /// Create an ambient light
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            light_type: LightType::Ambient,
            position: Vec3::zeros(),
            target: Vec3::zeros(),
            color,
            intensity,
            range: 0.0,
            shadow: None,
        }
    }

    /// Create a directional light shining from `position` toward `target`
    pub fn directional(position: Vec3, target: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            light_type: LightType::Directional,
            position,
            target,
            color,
            intensity,
            range: 0.0,
            shadow: None,
        }
    }

    /// Create a point light
    pub fn point(position: Vec3, color: Color, intensity: f32, range: f32) -> Self {
        Self {
            light_type: LightType::Point,
            position,
            target: Vec3::zeros(),
            color,
            intensity,
            range,
            shadow: None,
        }
    }

    /// Enable shadow casting
    pub fn with_shadow(mut self, shadow: ShadowSettings) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Direction the light travels in, zero for ambient lights
    pub fn direction(&self) -> Vec3 {
        match self.light_type {
            LightType::Directional => {
                let dir = self.target - self.position;
                dir.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
            }
            LightType::Ambient | LightType::Point => Vec3::zeros(),
        }
    }
}
