//! Single-mesh actor

use crate::foundation::math::Vec3;
use crate::render::Color;
use crate::scene::{
    Drawable, Message, ObjectArena, ObjectId, ParticipantRole, SceneManager, SceneNode, SceneParticipant,
};

/// One mesh, such as a floor plane or the sky sphere
///
/// Any color message recolors the mesh.
pub struct ShapeActor {
    name: String,
    object: ObjectId,
    ray_castable: bool,
}

impl ShapeActor {
    /// Insert `node` into the arena and wrap it
    pub fn new(name: impl Into<String>, objects: &mut ObjectArena, node: SceneNode) -> Self {
        Self {
            name: name.into(),
            object: objects.insert(node),
            ray_castable: true,
        }
    }

    /// Exclude the mesh from occlusion ray casts
    pub fn without_ray_casting(mut self) -> Self {
        self.ray_castable = false;
        self
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn set_position(&self, objects: &mut ObjectArena, position: Vec3) {
        if let Some(node) = objects.get_mut(self.object) {
            node.transform.position = position;
        }
    }

    /// Recolor the mesh, keeping the change across bloom passes
    pub fn apply_color(&self, scene: &mut SceneManager, color: Color) {
        let Some(material) = scene.objects().material(self.object).cloned() else {
            return;
        };
        if let Err(e) = scene.set_material(self.object, material.with_color(color)) {
            log::warn!("'{}' could not apply color: {}", self.name, e);
        }
    }
}

impl SceneParticipant for ShapeActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Actor
    }

    fn is_drawable(&self) -> bool {
        true
    }

    fn drawables(&self) -> Vec<Drawable> {
        if self.ray_castable {
            vec![Drawable::ray_castable(self.object)]
        } else {
            vec![Drawable::new(self.object)]
        }
    }

    fn on_message(&mut self, scene: &mut SceneManager, sender: &str, data: &Message) {
        match data.as_color() {
            Some(color) => self.apply_color(scene, color),
            None => log::trace!("'{}' ignored {:?} from '{}'", self.name, data, sender),
        }
    }
}
