//! Scene participant contract
//!
//! A participant is any named entity registered with the [`SceneManager`]:
//! actors, lights, camera managers, or plain controllers that only exchange
//! messages. Participants are shared as `Rc<RefCell<dyn SceneParticipant>>`;
//! every callback receives the scene manager so it can send messages, touch
//! its objects, or query the active camera.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::actors::Hotspot;
use crate::render::{Camera, Color};

use super::object::ObjectId;
use super::scene_manager::SceneManager;

/// Shared handle the kernel keeps for every registered participant
pub type SharedParticipant = Rc<RefCell<dyn SceneParticipant>>;

/// Payload of an addressed or broadcast message
#[derive(Clone)]
pub enum Message {
    /// Plain number, e.g. an animation time step or a light factor
    Scalar(f32),
    /// Slider movement since the last event and its absolute position in `[0, 1]`
    Slider { delta: f32, percent: f32 },
    Color(Color),
    /// Marker to attach to the receiving actor
    Hotspot(Rc<RefCell<Hotspot>>),
    /// Anything else; receivers downcast
    Custom(Rc<dyn Any>),
}

impl Message {
    /// Wrap an arbitrary value
    pub fn custom<T: Any>(value: T) -> Self {
        Message::Custom(Rc::new(value))
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Message::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Message::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// Borrow a custom payload as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Message::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Message::Slider { delta, percent } => f
                .debug_struct("Slider")
                .field("delta", delta)
                .field("percent", percent)
                .finish(),
            Message::Color(color) => f.debug_tuple("Color").field(color).finish(),
            Message::Hotspot(hotspot) => match hotspot.try_borrow() {
                Ok(hotspot) => f.debug_tuple("Hotspot").field(&hotspot.name()).finish(),
                Err(_) => f.write_str("Hotspot(<borrowed>)"),
            },
            Message::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<f32> for Message {
    fn from(value: f32) -> Self {
        Message::Scalar(value)
    }
}

impl From<Color> for Message {
    fn from(color: Color) -> Self {
        Message::Color(color)
    }
}

bitflags! {
    /// How a drawable takes part in picking and post-processing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawableFlags: u8 {
        /// Included in occlusion ray casts
        const RAY_CASTABLE = 1 << 0;
        /// Contributes to the bloom target
        const LUMINANT = 1 << 1;
    }
}

/// An object a participant contributes to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    pub object: ObjectId,
    pub flags: DrawableFlags,
}

impl Drawable {
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            flags: DrawableFlags::empty(),
        }
    }

    pub fn ray_castable(object: ObjectId) -> Self {
        Self {
            object,
            flags: DrawableFlags::RAY_CASTABLE,
        }
    }

    pub fn luminant(object: ObjectId) -> Self {
        Self {
            object,
            flags: DrawableFlags::LUMINANT,
        }
    }

    pub fn is_ray_castable(&self) -> bool {
        self.flags.contains(DrawableFlags::RAY_CASTABLE)
    }

    pub fn is_luminant(&self) -> bool {
        self.flags.contains(DrawableFlags::LUMINANT)
    }
}

/// Broad category of a participant, used for logging and inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipantRole {
    Actor,
    Light,
    Camera,
    /// Message-only participant with nothing to draw
    Controller,
}

/// Capability interface implemented by everything registered with the scene
///
/// All methods except [`name`](SceneParticipant::name) have defaults, so a
/// participant only overrides the callbacks it cares about.
pub trait SceneParticipant {
    /// Unique registry key and message address
    fn name(&self) -> &str;

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Controller
    }

    /// Whether the participant's resources are loaded
    ///
    /// Re-queried every frame while the participant is parked.
    fn is_ready(&self) -> bool {
        true
    }

    fn is_drawable(&self) -> bool {
        false
    }

    /// Objects to insert into the render pipeline; queried on insertion
    fn drawables(&self) -> Vec<Drawable> {
        Vec::new()
    }

    /// Light objects to insert; never blackened
    fn lights(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    fn on_message(&mut self, _scene: &mut SceneManager, _sender: &str, _data: &Message) {}

    /// Called exactly once, after the participant's objects entered the scene
    fn on_scene_start(&mut self, _scene: &mut SceneManager) {}

    /// Called every frame after rendering
    fn on_scene_render(&mut self, _scene: &mut SceneManager) {}

    fn as_camera(&self) -> Option<&dyn CameraManager> {
        None
    }

    fn as_camera_mut(&mut self) -> Option<&mut dyn CameraManager> {
        None
    }
}

/// Extra capability of participants that own a camera
pub trait CameraManager {
    fn camera(&self) -> &Camera;

    fn camera_mut(&mut self) -> &mut Camera;

    /// Called each time this camera becomes the active one
    fn on_active(&mut self, _scene: &mut SceneManager) {}

    fn is_zoomed(&self) -> bool {
        false
    }
}
