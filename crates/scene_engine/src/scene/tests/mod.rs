//! Scene kernel scenarios
//!
//! End-to-end checks of registration, routing, camera handling, occlusion
//! queries and the bloom pipeline against the headless backend.

mod bloom_pipeline;
mod messaging;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::SceneConfig;
use crate::foundation::math::Vec3;
use crate::render::{Camera, RenderLog, Viewport};

use super::{CameraManager, Drawable, Message, ParticipantRole, SceneManager, SceneParticipant};

/// Shared, ordered record of callbacks across participants
type Events = Rc<RefCell<Vec<String>>>;

fn events() -> Events {
    Rc::new(RefCell::new(Vec::new()))
}

fn occurrences(events: &Events, entry: &str) -> usize {
    events.borrow().iter().filter(|e| e.as_str() == entry).count()
}

fn scene_with(config: SceneConfig) -> (SceneManager, RenderLog) {
    crate::foundation::logging::init_for_tests();
    let (mut scene, log) = SceneManager::headless(config);
    scene.set_viewport(Viewport::new(100, 100));
    (scene, log)
}

fn scene() -> (SceneManager, RenderLog) {
    scene_with(SceneConfig::default())
}

/// 90 degree square camera on the +z axis looking at the origin
fn front_camera() -> Camera {
    Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0)
}

fn add_camera(scene: &mut SceneManager, events: &Events, name: &str, camera: Camera) {
    scene.register(Probe::new(name, events).with_camera(camera));
}

/// Participant that writes every callback it receives to an event log
struct Probe {
    name: String,
    events: Events,
    ready: Option<Rc<Cell<bool>>>,
    drawables: Vec<Drawable>,
    camera: Option<Camera>,
    forward_to: Option<String>,
    reply: bool,
}

impl Probe {
    fn new(name: &str, events: &Events) -> Self {
        Self {
            name: name.to_owned(),
            events: Rc::clone(events),
            ready: None,
            drawables: Vec::new(),
            camera: None,
            forward_to: None,
            reply: false,
        }
    }

    fn with_drawables(mut self, drawables: Vec<Drawable>) -> Self {
        self.drawables = drawables;
        self
    }

    /// Drawable whose readiness follows `ready`
    fn gated(mut self, ready: &Rc<Cell<bool>>) -> Self {
        self.ready = Some(Rc::clone(ready));
        self
    }

    fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Pass messages from anyone but `target` on to `target`
    fn forwarding_to(mut self, target: &str) -> Self {
        self.forward_to = Some(target.to_owned());
        self
    }

    /// Send every message straight back to its sender
    fn replying(mut self) -> Self {
        self.reply = true;
        self
    }

    fn record(&self, entry: String) {
        self.events.borrow_mut().push(entry);
    }
}

impl SceneParticipant for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        if self.camera.is_some() {
            ParticipantRole::Camera
        } else {
            ParticipantRole::Actor
        }
    }

    fn is_ready(&self) -> bool {
        self.ready.as_ref().map_or(true, |ready| ready.get())
    }

    fn is_drawable(&self) -> bool {
        self.ready.is_some() || !self.drawables.is_empty()
    }

    fn drawables(&self) -> Vec<Drawable> {
        self.drawables.clone()
    }

    fn on_message(&mut self, scene: &mut SceneManager, sender: &str, data: &Message) {
        let value = data.as_scalar().map_or_else(|| format!("{:?}", data), |v| v.to_string());
        self.record(format!("{}: {} from {}", self.name, value, sender));

        if self.reply {
            scene.broadcast_to(&self.name, sender, data.clone());
        }
        if let Some(target) = self.forward_to.clone() {
            if sender != target {
                scene.broadcast_to(&self.name, &target, data.clone());
            }
        }
    }

    fn on_scene_start(&mut self, _scene: &mut SceneManager) {
        self.record(format!("{}: start", self.name));
    }

    fn on_scene_render(&mut self, _scene: &mut SceneManager) {
        self.record(format!("{}: render", self.name));
    }

    fn as_camera(&self) -> Option<&dyn CameraManager> {
        if self.camera.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_camera_mut(&mut self) -> Option<&mut dyn CameraManager> {
        if self.camera.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl CameraManager for Probe {
    fn camera(&self) -> &Camera {
        self.camera.as_ref().expect("probe has a camera")
    }

    fn camera_mut(&mut self) -> &mut Camera {
        self.camera.as_mut().expect("probe has a camera")
    }

    fn on_active(&mut self, _scene: &mut SceneManager) {
        self.record(format!("{}: active", self.name));
    }
}
