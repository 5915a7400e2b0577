//! # Scene Manager
//!
//! The scene kernel: participant registry, message routing, active camera,
//! occlusion queries and the per-frame loop.
//!
//! ## Frame phases
//!
//! With an active camera every [`tick`](SceneManager::tick) runs, in order:
//!
//! 1. camera aspect ratio from the viewport
//! 2. camera matrix update
//! 3. promotion of parked participants that became ready
//! 4. bloom pass then final pass
//! 5. `on_scene_render` for every started participant
//!
//! Without an active camera a tick only advances FPS accounting.
//!
//! ## Messaging
//!
//! Addressed messages reach a started participant synchronously. Messages
//! for names that are unknown or still parked wait on the [`NoticeBoard`].
//! A message for a participant whose own callback is currently running is
//! held back and delivered as soon as that callback returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use crate::config::Config;
use crate::core::SceneConfig;
use crate::foundation::math::{Vec2, Vec3};
use crate::foundation::time::FpsCounter;
use crate::render::{Camera, HeadlessBackend, Material, RenderBackend, RenderLog, Viewport};

use super::notice_board::{Notice, NoticeBoard};
use super::object::{ObjectArena, ObjectId};
use super::participant::{Message, SceneParticipant, SharedParticipant};
use super::raycast::{BoundsRayCaster, RayIntersector};
use super::registry::{Lifecycle, ParticipantRegistry};
use super::scene_renderer::SceneRenderer;
use super::scheduler::FrameScheduler;
use super::SceneError;

/// Result of an occlusion-aware projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterQuery {
    /// Raster position, present whenever the point is inside the frustum
    pub coord: Option<Vec2>,
    /// True when the point is the nearest surface along its camera ray
    pub visible: bool,
}

impl RasterQuery {
    fn hidden(coord: Option<Vec2>) -> Self {
        Self { coord, visible: false }
    }

    /// Raster position if the point is visible
    pub fn visible_coord(&self) -> Option<Vec2> {
        if self.visible {
            self.coord
        } else {
            None
        }
    }
}

struct ActiveCamera {
    name: String,
    /// Copy of the participant's camera as of the last update
    camera: Camera,
}

/// Scene kernel
pub struct SceneManager {
    config: SceneConfig,
    registry: ParticipantRegistry,
    notice_board: NoticeBoard,
    objects: ObjectArena,
    renderer: SceneRenderer,
    ray_intersector: Box<dyn RayIntersector>,
    active_camera: Option<ActiveCamera>,
    viewport: Viewport,
    fps: FpsCounter,
    dispatch_depth: usize,
    deferred: VecDeque<Notice>,
    draining: bool,
}

impl SceneManager {
    /// Create a scene drawing through `backend`
    pub fn new(config: SceneConfig, backend: Box<dyn RenderBackend>) -> Self {
        log::info!(
            "Creating scene manager ({}x{}, depth bias {})",
            config.viewport.width,
            config.viewport.height,
            config.depth_bias
        );
        Self {
            registry: ParticipantRegistry::default(),
            notice_board: NoticeBoard::new(&config.notice_board),
            objects: ObjectArena::new(),
            renderer: SceneRenderer::new(backend, config.bloom),
            ray_intersector: Box::new(BoundsRayCaster::new()),
            active_camera: None,
            viewport: config.viewport.into(),
            fps: FpsCounter::new(),
            dispatch_depth: 0,
            deferred: VecDeque::new(),
            draining: false,
            config,
        }
    }

    /// Create a scene with a recording backend
    pub fn headless(config: SceneConfig) -> (Self, RenderLog) {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        (Self::new(config, Box::new(backend)), log)
    }

    /// Create a scene from a TOML or RON configuration file
    pub fn from_config_file(path: impl AsRef<Path>, backend: Box<dyn RenderBackend>) -> Result<Self, SceneError> {
        let config = SceneConfig::load_from_file(path)?;
        Ok(Self::new(config, backend))
    }

    /// Replace the default bounds-based ray intersector
    pub fn with_ray_intersector(mut self, intersector: Box<dyn RayIntersector>) -> Self {
        self.ray_intersector = intersector;
        self
    }

    /// Settings the scene was created with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Register a participant and return a shared handle to it
    pub fn register<P: SceneParticipant + 'static>(&mut self, participant: P) -> Rc<RefCell<P>> {
        let shared = Rc::new(RefCell::new(participant));
        self.register_shared(shared.clone());
        shared
    }

    /// Register an already shared participant
    ///
    /// A drawable participant that is not ready yet is parked: it is not
    /// inserted into the scene and gets no start callback until a later frame
    /// finds it ready. Everything else is inserted and started right away.
    /// Either way, notices already waiting for the name are delivered.
    pub fn register_shared(&mut self, participant: SharedParticipant) {
        let (name, drawable, ready) = match participant.try_borrow() {
            Ok(p) => (p.name().to_owned(), p.is_drawable(), p.is_ready()),
            Err(_) => {
                log::warn!("Cannot register a participant that is mutably borrowed");
                return;
            }
        };

        let parked = drawable && !ready;
        let lifecycle = if parked { Lifecycle::Parked } else { Lifecycle::Started };
        if let Some(previous) = self.registry.insert(&name, Rc::clone(&participant), lifecycle) {
            log::warn!("Participant '{}' registered again; previous registration replaced", name);
            for id in previous.inserted {
                self.renderer.remove(&self.objects, id);
                self.ray_intersector.remove(id);
            }
        }

        if parked {
            log::debug!("Participant '{}' parked until ready", name);
        } else {
            self.start(&name, &participant);
        }
        self.deliver_pending(&name, &participant);
    }

    /// Take a participant's drawables and lights out of the render pipeline
    ///
    /// The participant stays registered and keeps receiving messages.
    pub fn remove(&mut self, name: &str) {
        let Some(entry) = self.registry.get_mut(name) else {
            log::debug!("Remove of unknown participant '{}' ignored", name);
            return;
        };
        let inserted = std::mem::take(&mut entry.inserted);
        log::debug!("Removing {} objects of '{}' from the scene", inserted.len(), name);
        for id in inserted {
            self.renderer.remove(&self.objects, id);
            self.ray_intersector.remove(id);
        }
    }

    /// True when a participant with this name is registered, parked or started
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// True once the participant has been inserted and started
    pub fn is_started(&self, name: &str) -> bool {
        self.registry.lifecycle(name) == Some(Lifecycle::Started)
    }

    /// Shared handle of a registered participant
    pub fn participant(&self, name: &str) -> Option<SharedParticipant> {
        self.registry.participant(name)
    }

    /// Registered names in registration order
    pub fn participant_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_owned).collect()
    }

    /// Number of registered participants
    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    fn start(&mut self, name: &str, participant: &SharedParticipant) {
        self.insert_into_scene(name, participant);
        self.registry.set_lifecycle(name, Lifecycle::Started);
        log::debug!("Participant '{}' started", name);
        if !self.invoke(participant, |p, scene| p.on_scene_start(scene)) {
            log::warn!("Participant '{}' busy; start callback skipped", name);
        }
    }

    fn insert_into_scene(&mut self, name: &str, participant: &SharedParticipant) {
        let (drawables, lights) = match participant.try_borrow() {
            Ok(p) => (p.drawables(), p.lights()),
            Err(_) => {
                log::warn!("Participant '{}' busy; objects not inserted", name);
                return;
            }
        };

        let mut inserted = Vec::with_capacity(drawables.len() + lights.len());
        for drawable in drawables {
            self.renderer.add(&self.objects, drawable.object, drawable.is_luminant());
            if drawable.is_ray_castable() {
                self.ray_intersector.add(drawable.object);
            }
            inserted.push(drawable.object);
        }
        for light in lights {
            self.renderer.add(&self.objects, light, false);
            inserted.push(light);
        }

        log::trace!("Inserted {} objects for '{}'", inserted.len(), name);
        if let Some(entry) = self.registry.get_mut(name) {
            entry.inserted = inserted;
        }
    }

    fn promote_ready(&mut self) {
        for (name, participant) in self.registry.snapshot(Some(Lifecycle::Parked)) {
            if self.registry.lifecycle(&name) != Some(Lifecycle::Parked) {
                continue;
            }
            let ready = participant.try_borrow().map(|p| p.is_ready()).unwrap_or(false);
            if ready {
                log::debug!("Participant '{}' became ready", name);
                self.start(&name, &participant);
                self.deliver_pending(&name, &participant);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Messaging
    // ---------------------------------------------------------------------

    /// Send `data` to the participant named `recipient`
    ///
    /// Delivered immediately when the recipient is started, otherwise kept
    /// on the notice board until it is.
    pub fn broadcast_to(&mut self, sender: &str, recipient: &str, data: impl Into<Message>) {
        self.route(sender, recipient, data.into());
    }

    /// Send `data` to every registered participant except the sender
    ///
    /// Recipients are visited in registration order. A parked recipient gets
    /// the message on the notice board, delivered once it starts.
    /// Participants registered by a recipient during the broadcast are not
    /// included.
    pub fn broadcast_to_all(&mut self, sender: &str, data: impl Into<Message>) {
        let data = data.into();
        for (name, participant) in self.registry.snapshot(None) {
            if name == sender {
                continue;
            }
            match self.registry.lifecycle(&name) {
                Some(Lifecycle::Started) => {
                    if !self.invoke(&participant, |p, scene| p.on_message(scene, sender, &data)) {
                        self.defer(sender, &name, data.clone());
                    }
                }
                Some(Lifecycle::Parked) => self.notice_board.push(sender, &name, data.clone()),
                None => {}
            }
        }
    }

    /// Notices waiting for recipients that cannot receive yet
    pub fn notice_board(&self) -> &NoticeBoard {
        &self.notice_board
    }

    /// Returns false when the recipient was busy and the message was deferred
    fn route(&mut self, sender: &str, recipient: &str, data: Message) -> bool {
        let receiver = match self.registry.get(recipient) {
            Some(entry) if entry.lifecycle == Lifecycle::Started => Some(Rc::clone(&entry.participant)),
            _ => None,
        };

        match receiver {
            Some(participant) => {
                if self.invoke(&participant, |p, scene| p.on_message(scene, sender, &data)) {
                    true
                } else {
                    self.defer(sender, recipient, data);
                    false
                }
            }
            None => {
                self.notice_board.push(sender, recipient, data);
                true
            }
        }
    }

    fn deliver_pending(&mut self, name: &str, participant: &SharedParticipant) {
        for notice in self.notice_board.flush(name) {
            let delivered = self.invoke(participant, |p, scene| p.on_message(scene, &notice.sender, &notice.data));
            if !delivered {
                self.deferred.push_back(notice);
            }
        }
    }

    fn defer(&mut self, sender: &str, recipient: &str, data: Message) {
        log::trace!("'{}' is busy; message from '{}' deferred", recipient, sender);
        self.deferred.push_back(Notice {
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
            data,
        });
    }

    fn drain_deferred(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        loop {
            let round = self.deferred.len();
            let mut progressed = false;
            for _ in 0..round {
                let Some(notice) = self.deferred.pop_front() else {
                    break;
                };
                progressed |= self.route(&notice.sender, &notice.recipient, notice.data);
            }
            if !progressed {
                break;
            }
        }
        self.draining = false;
    }

    /// Run a callback on a participant with the scene available to it
    ///
    /// Returns false, without calling, when the participant is already
    /// borrowed further up the stack.
    fn invoke<F>(&mut self, participant: &SharedParticipant, callback: F) -> bool
    where
        F: FnOnce(&mut dyn SceneParticipant, &mut SceneManager),
    {
        let Ok(mut guard) = participant.try_borrow_mut() else {
            return false;
        };
        self.dispatch_depth += 1;
        callback(&mut *guard, self);
        self.dispatch_depth -= 1;
        drop(guard);

        if self.dispatch_depth == 0 {
            self.drain_deferred();
        }
        true
    }

    // ---------------------------------------------------------------------
    // Camera
    // ---------------------------------------------------------------------

    /// Make the named camera participant the active camera
    ///
    /// Unknown names are ignored; participants without a camera are
    /// ignored with a warning.
    pub fn set_active_camera(&mut self, name: &str) {
        let Some(participant) = self.registry.participant(name) else {
            log::debug!("No participant '{}' to use as camera", name);
            return;
        };

        let camera = match participant.try_borrow() {
            Ok(p) => match p.as_camera() {
                Some(manager) => manager.camera().clone(),
                None => {
                    log::warn!("Participant '{}' has no camera", name);
                    return;
                }
            },
            Err(_) => {
                log::warn!("Camera participant '{}' is busy; activation skipped", name);
                return;
            }
        };

        log::info!("Active camera: '{}'", name);
        self.active_camera = Some(ActiveCamera {
            name: name.to_owned(),
            camera,
        });
        self.invoke(&participant, |p, scene| {
            if let Some(manager) = p.as_camera_mut() {
                manager.on_active(scene);
            }
        });
        self.refresh_active_camera(name, &participant);

        let viewport = self.viewport;
        self.renderer.change_camera(name, &viewport);
    }

    /// Copy the camera as it stands after `on_active` adjusted it
    fn refresh_active_camera(&mut self, name: &str, participant: &SharedParticipant) {
        let Ok(p) = participant.try_borrow() else {
            return;
        };
        let active = self.active_camera.as_mut().filter(|active| active.name == name);
        if let (Some(manager), Some(active)) = (p.as_camera(), active) {
            active.camera = manager.camera().clone();
        }
    }

    /// Name of the active camera participant
    pub fn active_camera(&self) -> Option<&str> {
        self.active_camera.as_ref().map(|active| active.name.as_str())
    }

    /// The active camera as of its last matrix update
    pub fn active_camera_view(&self) -> Option<&Camera> {
        self.active_camera.as_ref().map(|active| &active.camera)
    }

    /// Project a world point and report whether nothing ray-castable hides it
    ///
    /// The point is visible only when it lies inside the frustum, the camera
    /// ray through its raster position hits something, and the point's view
    /// depth is not behind the hit's depth (plus the configured bias).
    pub fn raster_coord_if_nearest(&self, world: &Vec3) -> RasterQuery {
        let Some(active) = &self.active_camera else {
            return RasterQuery::hidden(None);
        };
        let camera = &active.camera;

        let Some(coord) = camera.world_to_raster(world, &self.viewport) else {
            return RasterQuery::hidden(None);
        };
        let Some(hit) = self.ray_intersector.raycast(&coord, camera, &self.viewport, &self.objects) else {
            return RasterQuery::hidden(Some(coord));
        };

        let point_depth = camera.world_to_view(world).z;
        let hit_depth = camera.world_to_view(&hit.point).z;
        RasterQuery {
            coord: Some(coord),
            visible: point_depth <= hit_depth + self.config.depth_bias,
        }
    }

    // ---------------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------------

    /// Scene graph storage
    pub fn objects(&self) -> &ObjectArena {
        &self.objects
    }

    /// Mutable scene graph storage for building and animating objects
    pub fn objects_mut(&mut self) -> &mut ObjectArena {
        &mut self.objects
    }

    /// Put a single object into the render pipeline
    pub fn add_object(&mut self, id: ObjectId, luminant: bool) {
        self.renderer.add(&self.objects, id, luminant);
    }

    /// Take a single object out of the render pipeline and the ray caster
    pub fn remove_object(&mut self, id: ObjectId) {
        self.renderer.remove(&self.objects, id);
        self.ray_intersector.remove(id);
    }

    /// Include an object in occlusion ray casts
    pub fn add_ray_castable(&mut self, id: ObjectId) {
        self.ray_intersector.add(id);
    }

    /// Change a mesh material so the change survives the bloom pass
    pub fn set_material(&mut self, id: ObjectId, material: Material) -> Result<(), SceneError> {
        if !self.objects.contains(id) {
            return Err(SceneError::UnknownObject(id));
        }
        let slot = self.objects.material_mut(id).ok_or(SceneError::NoMaterial(id))?;
        *slot = material;
        self.renderer.update_snapshot(id, slot);
        Ok(())
    }

    /// Two-pass render pipeline
    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Stop or resume drawing; the frame loop keeps running
    pub fn set_paused(&mut self, paused: bool) {
        self.renderer.set_paused(paused);
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    /// Current drawing surface size
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the drawing surface; render targets follow on the next tick
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
        }
    }

    /// Frames counted over the last full second
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Frames ticked since the scene was created
    pub fn total_frames(&self) -> u64 {
        self.fps.total_frames()
    }

    /// Advance the scene by one frame
    ///
    /// Frame callbacks run even when the backend fails; the backend error is
    /// returned afterwards.
    pub fn tick(&mut self) -> Result<(), SceneError> {
        self.fps.frame();

        let Some(name) = self.active_camera.as_ref().map(|active| active.name.clone()) else {
            return Ok(());
        };
        let Some(participant) = self.registry.participant(&name) else {
            return Ok(());
        };

        let viewport = self.viewport;
        let updated = {
            let Ok(mut guard) = participant.try_borrow_mut() else {
                log::warn!("Camera participant '{}' is busy; frame skipped", name);
                return Ok(());
            };
            let camera = guard.as_camera_mut().map(|manager| {
                let camera = manager.camera_mut();
                camera.set_aspect_ratio(viewport.aspect_ratio());
                camera.update_matrices();
                camera.clone()
            });
            camera
        };
        let Some(camera) = updated else {
            log::warn!("Participant '{}' no longer provides a camera; deactivating", name);
            self.active_camera = None;
            return Ok(());
        };
        if let Some(active) = self.active_camera.as_mut() {
            active.camera = camera.clone();
        }

        self.promote_ready();

        let rendered = self.renderer.render(&mut self.objects, &camera, &viewport);
        if let Err(e) = &rendered {
            log::trace!("Render failed before frame callbacks: {}", e);
        }

        for (name, participant) in self.registry.snapshot(Some(Lifecycle::Started)) {
            if !self.invoke(&participant, |p, scene| p.on_scene_render(scene)) {
                log::warn!("Participant '{}' busy; frame callback skipped", name);
            }
        }

        rendered.map_err(SceneError::from)
    }

    /// Drive frames until the scheduler stops
    ///
    /// Frame errors are logged and the loop continues.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) {
        log::info!("Scene loop started");
        while let Some(viewport) = scheduler.next_frame() {
            self.set_viewport(viewport);
            if let Err(e) = self.tick() {
                log::error!("Frame {} failed: {}", self.fps.total_frames(), e);
            }
        }
        log::info!("Scene loop stopped after {} frames", self.fps.total_frames());
    }
}
