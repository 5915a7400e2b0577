//! World-anchored screen markers

use crate::foundation::math::{Vec2, Vec3};

/// A clickable marker pinned to a world position
///
/// The owning actor updates the raster position and visibility every frame
/// from the scene's occlusion query; a UI layer reads them back to place the
/// marker on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    name: String,
    world_position: Vec3,
    raster: Vec2,
    visible: bool,
}

impl Hotspot {
    pub fn new(name: impl Into<String>, world_position: Vec3) -> Self {
        Self {
            name: name.into(),
            world_position,
            raster: Vec2::zeros(),
            visible: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    pub fn set_world_position(&mut self, position: Vec3) {
        self.world_position = position;
    }

    pub fn set_raster_coordinates(&mut self, x: f32, y: f32) {
        self.raster = Vec2::new(x, y);
    }

    /// Last raster position the marker was shown at
    pub fn raster_coordinates(&self) -> Vec2 {
        self.raster
    }

    pub fn show(&mut self) {
        if !self.visible {
            log::trace!("Hotspot '{}' shown", self.name);
        }
        self.visible = true;
    }

    pub fn hide(&mut self) {
        if self.visible {
            log::trace!("Hotspot '{}' hidden", self.name);
        }
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
