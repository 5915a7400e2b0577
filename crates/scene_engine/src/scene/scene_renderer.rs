//! # Scene Render Pipeline
//!
//! Bridges "add this object, is it luminant" to the two-pass renderer.
//!
//! ## Buckets
//!
//! - **Main scene objects** are attached to the scene graph permanently.
//!   Before the bloom pass every main leaf is painted flat black so only
//!   luminant objects glow; after it, each leaf gets a fresh clone of the
//!   material snapshotted at insertion.
//! - **Bloom objects** are attached only while the bloom pass is drawn.
//! - **Lights** are attached directly and never recolored.
//!
//! ## State
//!
//! The pipeline is inert until the first camera is bound. That first bind
//! builds the composite passes once; later binds only swap the camera
//! reference and leave the passes as they are.

use slotmap::SecondaryMap;

use crate::core::BloomSettings;
use crate::render::{
    BackendResult, Camera, CompositePasses, FrameView, Material, PassKind, RenderBackend, Viewport,
};

use super::object::{ObjectArena, ObjectId};

/// Setup state of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    /// No camera bound yet; nothing is rendered
    Uninitialized,
    /// Passes built; `camera` names the participant whose camera is used
    CameraBound { camera: String },
}

/// Two-pass bloom/final render pipeline adapter
pub struct SceneRenderer {
    backend: Box<dyn RenderBackend>,
    bloom_settings: BloomSettings,
    state: PipelineState,
    passes: Option<CompositePasses>,
    paused: bool,
    bloom_objects: Vec<ObjectId>,
    main_objects: Vec<ObjectId>,
    lights: Vec<ObjectId>,
    /// Scene graph roots, in attachment order
    attached: Vec<ObjectId>,
    snapshots: SecondaryMap<ObjectId, Material>,
}

impl SceneRenderer {
    /// Pipeline drawing through `backend`; passes are built once a camera binds
    pub fn new(backend: Box<dyn RenderBackend>, bloom_settings: BloomSettings) -> Self {
        Self {
            backend,
            bloom_settings,
            state: PipelineState::Uninitialized,
            passes: None,
            paused: false,
            bloom_objects: Vec::new(),
            main_objects: Vec::new(),
            lights: Vec::new(),
            attached: Vec::new(),
            snapshots: SecondaryMap::new(),
        }
    }

    /// Point the pipeline at a camera participant
    ///
    /// Builds the composite passes on the first call only.
    pub fn change_camera(&mut self, camera: &str, viewport: &Viewport) {
        if self.state == PipelineState::Uninitialized {
            self.passes = Some(CompositePasses::new(&self.bloom_settings, viewport));
            log::info!(
                "Render pipeline set up for camera '{}' at {}x{} (bloom strength {}, radius {}, threshold {})",
                camera,
                viewport.width,
                viewport.height,
                self.bloom_settings.strength,
                self.bloom_settings.radius,
                self.bloom_settings.threshold
            );
        } else {
            log::debug!("Render pipeline camera changed to '{}'", camera);
        }
        self.state = PipelineState::CameraBound {
            camera: camera.to_owned(),
        };
    }

    /// Stop or resume rendering without touching setup
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// True once set up and not paused
    pub fn is_rendering(&self) -> bool {
        !self.paused && self.passes.is_some()
    }

    /// Whether a camera has been bound yet
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Name of the camera participant the pipeline renders through
    pub fn bound_camera(&self) -> Option<&str> {
        match &self.state {
            PipelineState::CameraBound { camera } => Some(camera),
            PipelineState::Uninitialized => None,
        }
    }

    /// Composite passes, once built
    pub fn passes(&self) -> Option<&CompositePasses> {
        self.passes.as_ref()
    }

    /// Add an object to the pipeline
    ///
    /// Lights are attached directly. Luminant objects join the bloom bucket.
    /// Everything else joins the main bucket, is attached immediately and has
    /// every leaf's material snapshotted.
    pub fn add(&mut self, objects: &ObjectArena, id: ObjectId, luminant: bool) {
        if !objects.contains(id) {
            log::warn!("Ignoring add of unknown object {:?}", id);
            return;
        }
        if self.lights.contains(&id) || self.bloom_objects.contains(&id) || self.main_objects.contains(&id) {
            log::debug!("Object {:?} already in the render pipeline", id);
            return;
        }

        if objects.is_light(id) {
            self.lights.push(id);
            self.attach(id);
        } else if luminant {
            self.bloom_objects.push(id);
        } else {
            self.main_objects.push(id);
            self.attach(id);
            for leaf in objects.leaves(id) {
                if let Some(material) = objects.material(leaf) {
                    self.snapshots.insert(leaf, material.clone());
                }
            }
        }
    }

    /// Remove an object from whichever bucket holds it and detach it
    pub fn remove(&mut self, objects: &ObjectArena, id: ObjectId) {
        if let Some(pos) = self.bloom_objects.iter().position(|o| *o == id) {
            self.bloom_objects.remove(pos);
        } else if let Some(pos) = self.main_objects.iter().position(|o| *o == id) {
            self.main_objects.remove(pos);
            for leaf in objects.leaves(id) {
                self.snapshots.remove(leaf);
            }
        } else {
            self.lights.retain(|o| *o != id);
        }
        self.detach(id);
    }

    /// Replace the remembered original material of a main-bucket leaf
    pub fn update_snapshot(&mut self, id: ObjectId, material: &Material) {
        if let Some(snapshot) = self.snapshots.get_mut(id) {
            *snapshot = material.clone();
        }
    }

    /// Material saved for a main-scene mesh before the bloom pass
    pub fn snapshot(&self, id: ObjectId) -> Option<&Material> {
        self.snapshots.get(id)
    }

    /// True when the object is currently a scene graph root
    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.attached.contains(&id)
    }

    /// Scene graph roots in attachment order
    pub fn attached(&self) -> &[ObjectId] {
        &self.attached
    }

    /// Luminant objects drawn only in the bloom pass
    pub fn bloom_objects(&self) -> &[ObjectId] {
        &self.bloom_objects
    }

    /// Ordinary objects, blackened during the bloom pass
    pub fn main_objects(&self) -> &[ObjectId] {
        &self.main_objects
    }

    /// Lights, attached in both passes
    pub fn lights(&self) -> &[ObjectId] {
        &self.lights
    }

    fn attach(&mut self, id: ObjectId) {
        if !self.attached.contains(&id) {
            self.attached.push(id);
            self.backend.object_attached(id);
        }
    }

    fn detach(&mut self, id: ObjectId) {
        if let Some(pos) = self.attached.iter().position(|o| *o == id) {
            self.attached.remove(pos);
            self.backend.object_detached(id);
        }
    }

    /// Draw one frame: bloom pass, then final pass
    ///
    /// Main-bucket appearance is restored even when the bloom pass fails.
    pub fn render(&mut self, objects: &mut ObjectArena, camera: &Camera, viewport: &Viewport) -> BackendResult<()> {
        if self.paused {
            return Ok(());
        }
        let Some(passes) = self.passes.as_mut() else {
            return Ok(());
        };
        passes.resize(viewport);
        self.backend.set_size(viewport)?;

        self.prepare_for_bloom_pass(objects);
        let bloom = self.draw(PassKind::Bloom, objects, camera, viewport);
        self.prepare_for_final_pass(objects);
        bloom?;

        self.draw(PassKind::Final, objects, camera, viewport)
    }

    fn draw(&mut self, pass: PassKind, objects: &ObjectArena, camera: &Camera, viewport: &Viewport) -> BackendResult<()> {
        let Some(passes) = self.passes.as_ref() else {
            return Ok(());
        };
        let frame = FrameView {
            pass,
            objects,
            attached: &self.attached,
            camera,
            viewport,
            passes,
        };
        match pass {
            PassKind::Bloom => self.backend.render_bloom(&frame),
            PassKind::Final => self.backend.render_final(&frame),
        }
    }

    fn prepare_for_bloom_pass(&mut self, objects: &mut ObjectArena) {
        for root in self.main_objects.clone() {
            for leaf in objects.leaves(root) {
                self.blacken(objects, leaf);
            }
        }
        for root in self.bloom_objects.clone() {
            for leaf in objects.leaves(root) {
                self.attach(leaf);
            }
        }
    }

    fn prepare_for_final_pass(&mut self, objects: &mut ObjectArena) {
        for root in self.main_objects.clone() {
            for leaf in objects.leaves(root) {
                self.unblacken(objects, leaf);
            }
        }
        for root in self.bloom_objects.clone() {
            for leaf in objects.leaves(root) {
                self.detach(leaf);
            }
        }
    }

    fn blacken(&mut self, objects: &mut ObjectArena, leaf: ObjectId) {
        let Some(material) = objects.material_mut(leaf) else {
            return;
        };
        if !self.snapshots.contains_key(leaf) {
            log::debug!("Snapshotting late-attached leaf {:?}", leaf);
            self.snapshots.insert(leaf, material.clone());
        }
        *material = Material::flat_black();
    }

    fn unblacken(&mut self, objects: &mut ObjectArena, leaf: ObjectId) {
        let Some(material) = objects.material_mut(leaf) else {
            return;
        };
        match self.snapshots.get(leaf) {
            Some(snapshot) => *material = snapshot.clone(),
            None => log::warn!("No material snapshot for leaf {:?}; left as drawn", leaf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::{Color, HeadlessBackend, Light, RenderLog};
    use crate::scene::object::SceneNode;

    fn pipeline() -> (SceneRenderer, RenderLog) {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        (SceneRenderer::new(Box::new(backend), BloomSettings::default()), log)
    }

    #[test]
    fn test_inert_until_camera_bound() {
        let (mut renderer, log) = pipeline();
        let mut objects = ObjectArena::new();
        let camera = Camera::default();
        let viewport = Viewport::new(64, 64);

        assert_eq!(renderer.state(), &PipelineState::Uninitialized);
        renderer.render(&mut objects, &camera, &viewport).unwrap();
        assert!(log.is_empty());

        renderer.change_camera("Cam", &viewport);
        renderer.render(&mut objects, &camera, &viewport).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_setup_happens_once() {
        let (mut renderer, _log) = pipeline();
        renderer.change_camera("Cam1", &Viewport::new(100, 100));
        let passes = renderer.passes().cloned();

        renderer.change_camera("Cam2", &Viewport::new(300, 300));
        assert_eq!(renderer.bound_camera(), Some("Cam2"));
        assert_eq!(renderer.passes().cloned(), passes);
    }

    #[test]
    fn test_buckets() {
        let (mut renderer, _log) = pipeline();
        let mut objects = ObjectArena::new();
        let light = objects.insert(SceneNode::light("sun", Light::ambient(Color::WHITE, 1.0)));
        let glow = objects.insert(SceneNode::mesh("glow", Material::unlit(Color::WHITE)));
        let floor = objects.insert(SceneNode::mesh("floor", Material::new()));

        renderer.add(&objects, light, true);
        renderer.add(&objects, glow, true);
        renderer.add(&objects, floor, false);
        renderer.add(&objects, floor, false);

        assert_eq!(renderer.lights(), &[light]);
        assert_eq!(renderer.bloom_objects(), &[glow]);
        assert_eq!(renderer.main_objects(), &[floor]);
        assert_eq!(renderer.attached(), &[light, floor]);
        assert!(renderer.snapshot(floor).is_some());
        assert!(renderer.snapshot(glow).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut renderer, _log) = pipeline();
        let mut objects = ObjectArena::new();
        let floor = objects.insert(SceneNode::mesh("floor", Material::new()));

        renderer.add(&objects, floor, false);
        renderer.remove(&objects, floor);
        renderer.remove(&objects, floor);

        assert!(renderer.main_objects().is_empty());
        assert!(!renderer.is_attached(floor));
    }

    #[test]
    fn test_paused_pipeline_draws_nothing() {
        let (mut renderer, log) = pipeline();
        let mut objects = ObjectArena::new();
        let viewport = Viewport::new(64, 64);
        renderer.change_camera("Cam", &viewport);
        renderer.set_paused(true);

        renderer.render(&mut objects, &Camera::default(), &viewport).unwrap();
        assert!(log.is_empty());
        assert!(!renderer.is_rendering());

        renderer.set_paused(false);
        assert!(renderer.is_rendering());
    }

    #[test]
    fn test_failed_bloom_pass_still_restores_materials() {
        let backend = HeadlessBackend::new().failing_on(PassKind::Bloom);
        let mut renderer = SceneRenderer::new(Box::new(backend), BloomSettings::default());
        let mut objects = ObjectArena::new();
        let original = Material::new().with_color(Color::rgb(0.2, 0.4, 0.6));
        let floor = objects.insert(SceneNode::mesh("floor", original.clone()).with_position(Vec3::zeros()));
        let viewport = Viewport::new(64, 64);

        renderer.add(&objects, floor, false);
        renderer.change_camera("Cam", &viewport);

        assert!(renderer.render(&mut objects, &Camera::default(), &viewport).is_err());
        assert_eq!(objects.material(floor), Some(&original));
    }
}
