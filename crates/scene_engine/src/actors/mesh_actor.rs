//! Multi-mesh model actor
//!
//! Wraps a model made of several mesh hierarchies, an optional looping
//! animation, an invisible pick box used for occlusion ray casts, and any
//! number of hotspots that follow the model on screen.

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::math::Vec3;
use crate::render::{Color, Material};
use crate::scene::{
    Drawable, Message, NodeKind, ObjectArena, ObjectId, ParticipantRole, SceneManager, SceneNode, SceneParticipant, AABB,
};

use super::animation::{AnimationClip, AnimationMixer};
use super::hotspot::Hotspot;

/// Sender whose scalar messages scrub the animation
pub const ANIMATION_SENDER: &str = "Slider";
/// Sender whose color messages recolor the model
pub const COLOR_SENDER: &str = "ColorMenu";
/// Sender whose hotspot messages attach markers
pub const HOTSPOT_SENDER: &str = "Hotspot";

/// Model actor
pub struct MeshActor {
    name: String,
    meshes: Vec<ObjectId>,
    pick_bounds: Option<ObjectId>,
    mixer: Option<AnimationMixer>,
    hotspots: Vec<Rc<RefCell<Hotspot>>>,
    position: Vec3,
}

impl MeshActor {
    /// Wrap mesh hierarchies already inserted into the arena
    ///
    /// Every mesh leaf is set up to cast and receive shadows with a
    /// non-metallic material.
    pub fn new(name: impl Into<String>, objects: &mut ObjectArena, meshes: Vec<ObjectId>) -> Self {
        for root in &meshes {
            for leaf in objects.leaves(*root) {
                if let Some(NodeKind::Mesh(mesh)) = objects.get_mut(leaf).map(|node| &mut node.kind) {
                    mesh.material.metallic = 0.0;
                    mesh.cast_shadow = true;
                    mesh.receive_shadow = true;
                }
            }
        }

        Self {
            name: name.into(),
            meshes,
            pick_bounds: None,
            mixer: None,
            hotspots: Vec::new(),
            position: Vec3::zeros(),
        }
    }

    /// Add an invisible box used as this model's occluder in ray casts
    pub fn with_pick_bounds(mut self, objects: &mut ObjectArena, size: Vec3, position: Vec3) -> Self {
        let node = SceneNode::mesh(format!("{}_bounds", self.name), Material::unlit(Color::WHITE).with_alpha(0.0))
            .with_bounds(AABB::from_size(size.x, size.y, size.z))
            .with_position(position);
        self.pick_bounds = Some(objects.insert(node));
        self
    }

    /// Play `clip`, starting `start_time` seconds in
    pub fn with_animation(mut self, objects: &mut ObjectArena, clip: AnimationClip, start_time: f32) -> Self {
        let mut mixer = AnimationMixer::new(clip);
        mixer.update(start_time, objects);
        self.mixer = Some(mixer);
        self
    }

    pub fn meshes(&self) -> &[ObjectId] {
        &self.meshes
    }

    pub fn pick_bounds(&self) -> Option<ObjectId> {
        self.pick_bounds
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the model; mesh roots keep their offsets relative to each other
    pub fn set_position(&mut self, objects: &mut ObjectArena, position: Vec3) {
        let delta = position - self.position;
        for root in &self.meshes {
            if let Some(node) = objects.get_mut(*root) {
                node.transform.position += delta;
            }
        }
        self.position = position;
    }

    /// Advance the animation by `delta_seconds`
    pub fn update_animation_frame(&mut self, objects: &mut ObjectArena, delta_seconds: f32) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(delta_seconds, objects);
        }
    }

    /// Recolor every mesh leaf
    pub fn apply_color(&self, scene: &mut SceneManager, color: Color) {
        for root in &self.meshes {
            for leaf in scene.objects().leaves(*root) {
                let Some(material) = scene.objects().material(leaf).cloned() else {
                    continue;
                };
                if let Err(e) = scene.set_material(leaf, material.with_color(color)) {
                    log::warn!("'{}' could not recolor {:?}: {}", self.name, leaf, e);
                }
            }
        }
    }

    pub fn add_hotspot(&mut self, hotspot: Rc<RefCell<Hotspot>>) {
        self.hotspots.push(hotspot);
    }

    pub fn hotspots(&self) -> &[Rc<RefCell<Hotspot>>] {
        &self.hotspots
    }
}

impl SceneParticipant for MeshActor {
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
        self.pick_bounds
            .map(Drawable::ray_castable)
            .into_iter()
            .chain(self.meshes.iter().copied().map(Drawable::new))
            .collect()
    }

    fn on_message(&mut self, scene: &mut SceneManager, sender: &str, data: &Message) {
        match (sender, data) {
            (ANIMATION_SENDER, Message::Scalar(delta)) => self.update_animation_frame(scene.objects_mut(), *delta),
            (COLOR_SENDER, Message::Color(color)) => self.apply_color(scene, *color),
            (HOTSPOT_SENDER, Message::Hotspot(hotspot)) => self.add_hotspot(Rc::clone(hotspot)),
            _ => log::trace!("'{}' ignored {:?} from '{}'", self.name, data, sender),
        }
    }

    fn on_scene_render(&mut self, scene: &mut SceneManager) {
        for hotspot in &self.hotspots {
            let Ok(mut hotspot) = hotspot.try_borrow_mut() else {
                continue;
            };
            let query = scene.raster_coord_if_nearest(&hotspot.world_position());
            match query.visible_coord() {
                Some(coord) => {
                    hotspot.set_raster_coordinates(coord.x, coord.y);
                    hotspot.show();
                }
                None => hotspot.hide(),
            }
        }
    }
}
