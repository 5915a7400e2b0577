//! Orbiting camera participant

use crate::foundation::math::{utils, Vec3};
use crate::render::Camera;
use crate::scene::{CameraManager, Message, ParticipantRole, SceneManager, SceneParticipant};

/// Slider deltas from this sender turn the camera about the up axis (degrees)
pub const ORBIT_SENDER: &str = "Orbit";
/// Slider deltas from this sender raise or lower the camera (degrees)
pub const TILT_SENDER: &str = "Tilt";
/// Slider deltas from this sender move the camera toward the look-at point
pub const ZOOM_SENDER: &str = "Zoom";

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 150.0;
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Perspective camera circling a look-at point
pub struct OrbitalCameraManager {
    name: String,
    camera: Camera,
    look_at: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    rest_distance: f32,
}

impl OrbitalCameraManager {
    /// Camera `distance` units from `look_at`, slightly above it
    pub fn new(name: impl Into<String>, fov_degrees: f32, look_at: Vec3, distance: f32) -> Self {
        let distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        let mut manager = Self {
            name: name.into(),
            camera: Camera::perspective(look_at, fov_degrees, 16.0 / 9.0, 0.1, 1000.0),
            look_at,
            yaw: 0.0,
            pitch: 15.0,
            distance,
            rest_distance: distance,
        };
        manager.place_camera();
        manager
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Turn by `yaw` degrees and tilt by `pitch` degrees
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw).rem_euclid(360.0);
        self.pitch = (self.pitch + pitch).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
        self.place_camera();
    }

    /// Move `amount` units closer to the look-at point (negative moves away)
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.place_camera();
    }

    fn place_camera(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        let offset = Vec3::new(
            self.distance * pitch.cos() * yaw.sin(),
            self.distance * pitch.sin(),
            self.distance * pitch.cos() * yaw.cos(),
        );
        self.camera.set_position(self.look_at + offset);
        self.camera.set_target(self.look_at);
    }
}

impl SceneParticipant for OrbitalCameraManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Camera
    }

    fn on_message(&mut self, _scene: &mut SceneManager, sender: &str, data: &Message) {
        let delta = match data {
            Message::Slider { delta, .. } => *delta,
            Message::Scalar(delta) => *delta,
            _ => return,
        };
        match sender {
            ORBIT_SENDER => self.orbit(delta, 0.0),
            TILT_SENDER => self.orbit(0.0, delta),
            ZOOM_SENDER => self.zoom(delta),
            _ => log::trace!("'{}' ignored {:?} from '{}'", self.name, data, sender),
        }
    }

    fn as_camera(&self) -> Option<&dyn CameraManager> {
        Some(self)
    }

    fn as_camera_mut(&mut self) -> Option<&mut dyn CameraManager> {
        Some(self)
    }
}

impl CameraManager for OrbitalCameraManager {
    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    fn on_active(&mut self, scene: &mut SceneManager) {
        self.camera.set_aspect_ratio(scene.viewport().aspect_ratio());
        self.camera.update_matrices();
        log::debug!("'{}' active, {:.1} units from {:?}", self.name, self.distance, self.look_at);
    }

    fn is_zoomed(&self) -> bool {
        self.distance < self.rest_distance
    }
}
