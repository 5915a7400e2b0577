//! Material system for rendering

use serde::{Serialize, Deserialize};

use super::color::Color;

/// Identifier of a texture owned by the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// How a surface responds to lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shading {
    /// Lambert/Phong style lighting
    #[default]
    Lit,
    /// Flat color, lights are ignored
    Unlit,
}

/// Which faces of a surface are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    /// Faces pointing at the camera
    #[default]
    Front,
    /// Faces pointing away; used for sky spheres seen from inside
    Back,
    /// Both faces
    Double,
}

/// Surface appearance of a single mesh leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color
    pub base_color: Color,

    /// Emissive color added regardless of lighting
    pub emissive: Color,

    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,

    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,

    /// Alpha/transparency (0.0 = transparent, 1.0 = opaque)
    pub alpha: f32,

    /// Optional color map
    pub texture: Option<TextureId>,

    /// Lighting model
    pub shading: Shading,

    /// Rendered faces
    pub side: Side,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            base_color: Color::WHITE,
            emissive: Color::BLACK,
            metallic: 0.0,
            roughness: 0.5,
            alpha: 1.0,
            texture: None,
            shading: Shading::Lit,
            side: Side::Front,
        }
    }

    /// Flat unlit black, used to hide non-luminant surfaces from the bloom pass
    ///
    /// Keeps nothing from the original surface: no emission, no specular
    /// response, no texture.
    pub fn flat_black() -> Self {
        Self {
            base_color: Color::BLACK,
            emissive: Color::BLACK,
            metallic: 0.0,
            roughness: 1.0,
            alpha: 1.0,
            texture: None,
            shading: Shading::Unlit,
            side: Side::Front,
        }
    }

    /// Unlit flat color
    pub fn unlit(color: Color) -> Self {
        Self {
            base_color: color,
            shading: Shading::Unlit,
            ..Self::new()
        }
    }

    /// Set the base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    /// Set the emissive color
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    /// Set the metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the alpha/transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the color map
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the rendered faces
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// True when this material is the bloom-pass black
    pub fn is_flat_black(&self) -> bool {
        *self == Self::flat_black()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
