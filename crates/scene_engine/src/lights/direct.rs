//! Sun light participant
//!
//! A shadow-casting directional light paired with a glowing sphere that
//! marks the sun's position. Three sliders move the sun around its look-at
//! point:
//!
//! - **direction** turns it about the world up axis
//! - **day/night** raises or lowers it along its current arc
//! - **season** tilts that arc
//!
//! After every move the light intensity follows the cosine of the sun's
//! elevation, the ambient light is dimmed by the same factor, and the
//! background is tinted with the combined day/night and season colors.

use crate::foundation::math::{utils, Vec3};
use crate::render::{Color, Light, Material, ShadowSettings};
use crate::scene::{
    Drawable, Message, NodeKind, ObjectArena, ObjectId, ParticipantRole, SceneManager, SceneNode, SceneParticipant, AABB,
};

pub const DIRECTION_SENDER: &str = "SliderDirection";
pub const DAYNIGHT_SENDER: &str = "SliderDaynight";
pub const SEASON_SENDER: &str = "SliderSeason";

/// Receives the elevation cosine
pub const AMBIENT_RECIPIENT: &str = "AmbientLight";
/// Receives the tinted light color
pub const BACKGROUND_RECIPIENT: &str = "Background";

const SUN_COLOR: u32 = 0xFCE570;

/// Which tint a slider change recomputes
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tint {
    Daynight(f32),
    Season(f32),
}

/// Directional light with a luminant sun sphere
pub struct DirectLight {
    name: String,
    light: ObjectId,
    sun: ObjectId,
    gizmo: ObjectId,
    look_at: Vec3,
    intensity: f32,
    daynight_axis: Vec3,
    season_axis: Vec3,
    daynight_tint: Color,
    season_tint: Color,
    show_gizmo: bool,
    gizmo_shown: bool,
}

impl DirectLight {
    /// Light at `position` aiming at `look_at`, with a sun sphere of radius `size`
    pub fn new(name: impl Into<String>, objects: &mut ObjectArena, position: Vec3, size: f32, look_at: Vec3) -> Self {
        let name = name.into();
        let intensity = 1.0;
        let shadow = ShadowSettings::default();

        let light = objects.insert(SceneNode::light(
            name.clone(),
            Light::directional(position, look_at, Color::WHITE, intensity).with_shadow(shadow),
        ));
        let sun_color = Color::from_hex(SUN_COLOR);
        let sun = objects.insert(
            SceneNode::mesh(format!("{}_sun", name), Material::new().with_color(sun_color).with_emissive(sun_color))
                .with_bounds(AABB::from_size(size * 2.0, size * 2.0, size * 2.0))
                .with_position(position),
        );
        let gizmo = objects.insert(
            SceneNode::mesh(format!("{}_gizmo", name), Material::unlit(sun_color))
                .with_bounds(AABB::from_size(
                    shadow.half_extent * 2.0,
                    shadow.half_extent * 2.0,
                    shadow.far - shadow.near,
                ))
                .with_position(position),
        );

        let to_light = position - look_at;
        let right = Vec3::new(to_light.x, 0.0, to_light.z)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::x);
        let season_axis = Vec3::new(0.0, -1.0, 0.0).cross(&right);

        Self {
            name,
            light,
            sun,
            gizmo,
            look_at,
            intensity,
            daynight_axis: Vec3::x(),
            season_axis,
            daynight_tint: Color::WHITE,
            season_tint: Color::WHITE,
            show_gizmo: false,
            gizmo_shown: false,
        }
    }

    pub fn light(&self) -> ObjectId {
        self.light
    }

    pub fn sun(&self) -> ObjectId {
        self.sun
    }

    /// Show the shadow frustum helper from the next frame on
    pub fn show_gizmo(&mut self, show: bool) {
        self.show_gizmo = show;
    }

    /// Current light position, or the look-at point if the light is gone
    pub fn position(&self, objects: &ObjectArena) -> Vec3 {
        objects
            .get(self.light)
            .and_then(|node| match &node.kind {
                NodeKind::Light(light) => Some(light.position),
                _ => None,
            })
            .unwrap_or(self.look_at)
    }

    /// Swing the light and sun `degrees` about `axis` through the look-at point
    pub fn orbit(&self, objects: &mut ObjectArena, degrees: f32, axis: &Vec3) {
        let angle = utils::deg_to_rad(degrees);
        let look_at = self.look_at;
        let swing = |point: Vec3| look_at + utils::rotate_about_axis(&(point - look_at), axis, angle);

        if let Some(light) = objects.get_mut(self.light).and_then(|node| node.light_mut()) {
            light.position = swing(light.position);
        }
        for id in [self.sun, self.gizmo] {
            if let Some(node) = objects.get_mut(id) {
                node.transform.position = swing(node.transform.position);
            }
        }
    }

    fn update_light_intensity(&mut self, scene: &mut SceneManager, tint: Option<Tint>) {
        let elevation = utils::cosine_between(&Vec3::y(), &(self.position(scene.objects()) - self.look_at));

        match tint {
            Some(Tint::Season(percent)) => {
                self.season_tint = Color::rgb(188.0 / 255.0, 206.0 / 255.0, 222.0 / 255.0).interpolate(Color::WHITE, percent);
            }
            Some(Tint::Daynight(percent)) => {
                self.daynight_tint = Color::rgb(250.0 / 255.0, 214.0 / 255.0, 165.0 / 255.0).interpolate(Color::WHITE, percent);
            }
            None => {}
        }
        let color = self.daynight_tint.multiply(self.season_tint);

        if let Some(light) = scene.objects_mut().get_mut(self.light).and_then(|node| node.light_mut()) {
            light.intensity = self.intensity * elevation;
            light.color = color;
        }
        log::trace!("'{}' elevation cosine {:.3}, color {:?}", self.name, elevation, color);

        scene.broadcast_to(&self.name, AMBIENT_RECIPIENT, elevation);
        scene.broadcast_to(&self.name, BACKGROUND_RECIPIENT, color);
    }
}

impl SceneParticipant for DirectLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Light
    }

    fn is_drawable(&self) -> bool {
        true
    }

    fn drawables(&self) -> Vec<Drawable> {
        vec![Drawable::luminant(self.sun)]
    }

    fn lights(&self) -> Vec<ObjectId> {
        vec![self.light]
    }

    fn on_message(&mut self, scene: &mut SceneManager, sender: &str, data: &Message) {
        let Message::Slider { delta, percent } = *data else {
            log::trace!("'{}' ignored {:?} from '{}'", self.name, data, sender);
            return;
        };

        match sender {
            DIRECTION_SENDER => {
                let up = Vec3::y();
                self.orbit(scene.objects_mut(), delta, &up);
                let angle = utils::deg_to_rad(delta);
                self.daynight_axis = utils::rotate_about_axis(&self.daynight_axis, &up, angle);
                self.season_axis = utils::rotate_about_axis(&self.season_axis, &up, angle);
                self.update_light_intensity(scene, None);
            }
            DAYNIGHT_SENDER => {
                self.orbit(scene.objects_mut(), delta, &self.daynight_axis);
                self.season_axis =
                    utils::rotate_about_axis(&self.season_axis, &self.daynight_axis, utils::deg_to_rad(delta));
                self.update_light_intensity(scene, Some(Tint::Daynight(percent)));
            }
            SEASON_SENDER => {
                self.orbit(scene.objects_mut(), delta, &self.season_axis);
                self.update_light_intensity(scene, Some(Tint::Season(percent)));
            }
            _ => log::trace!("'{}' ignored slider '{}'", self.name, sender),
        }
    }

    fn on_scene_start(&mut self, scene: &mut SceneManager) {
        self.update_light_intensity(scene, Some(Tint::Season(0.0)));
    }

    fn on_scene_render(&mut self, scene: &mut SceneManager) {
        if self.show_gizmo && !self.gizmo_shown {
            scene.add_object(self.gizmo, false);
            self.gizmo_shown = true;
        } else if !self.show_gizmo && self.gizmo_shown {
            scene.remove_object(self.gizmo);
            self.gizmo_shown = false;
        }
    }
}
