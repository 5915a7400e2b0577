//! Ambient light participant

use crate::render::{Color, Light};
use crate::scene::{Message, ObjectArena, ObjectId, ParticipantRole, SceneManager, SceneNode, SceneParticipant};

/// Only messages from this sender change the ambient level
pub const SUN_SENDER: &str = "DirectLight";

/// Uniform fill light dimmed by the sun's elevation
pub struct AmbientLight {
    name: String,
    light: ObjectId,
    intensity: f32,
}

impl AmbientLight {
    pub fn new(name: impl Into<String>, objects: &mut ObjectArena, color: Color, intensity: f32) -> Self {
        let name = name.into();
        let light = objects.insert(SceneNode::light(name.clone(), Light::ambient(color, intensity)));
        Self { name, light, intensity }
    }

    pub fn light(&self) -> ObjectId {
        self.light
    }

    /// Base intensity before scaling
    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

impl SceneParticipant for AmbientLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Light
    }

    fn is_drawable(&self) -> bool {
        true
    }

    fn lights(&self) -> Vec<ObjectId> {
        vec![self.light]
    }

    fn on_message(&mut self, scene: &mut SceneManager, sender: &str, data: &Message) {
        let (SUN_SENDER, Some(factor)) = (sender, data.as_scalar()) else {
            return;
        };
        if let Some(light) = scene.objects_mut().get_mut(self.light).and_then(|node| node.light_mut()) {
            light.intensity = self.intensity * factor;
            log::trace!("'{}' intensity set to {:.3}", self.name, light.intensity);
        }
    }
}
