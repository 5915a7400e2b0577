//! House viewer demo
//!
//! Builds the house scene (terrain, an animated roof, sun and sky), drives
//! the light and roof sliders for a few seconds of frames and reports what
//! the headless renderer drew.

mod sliders;

use std::cell::RefCell;
use std::rc::Rc;

use scene_engine::actors::mesh_actor::HOTSPOT_SENDER;
use scene_engine::actors::{AnimationClip, Hotspot, MeshActor, ShapeActor};
use scene_engine::cameras::OrbitalCameraManager;
use scene_engine::config::{Config, ConfigError};
use scene_engine::core::SceneConfig;
use scene_engine::foundation::math::{Transform, Vec3};
use scene_engine::lights::direct::{DAYNIGHT_SENDER, DIRECTION_SENDER, SEASON_SENDER};
use scene_engine::lights::{AmbientLight, DirectLight};
use scene_engine::render::{Color, Material, PassKind, Side, TextureId, Viewport};
use scene_engine::scene::{FixedFrameScheduler, Message, ObjectArena, ObjectId, SceneError, SceneManager, SceneNode, AABB};

use sliders::{Slider, SliderPanel, SliderPayload};

const FRAMES: u64 = 240;
const FRAME_RATE: u32 = 60;

/// Errors that stop the viewer before its loop starts
#[derive(thiserror::Error, Debug)]
enum ViewerError {
    #[error("Failed to load viewer settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build the scene: {0}")]
    Scene(#[from] SceneError),
}

/// Terrain and house shell
fn build_terrain(objects: &mut ObjectArena) -> Result<Vec<ObjectId>, SceneError> {
    let ground = objects.insert(
        SceneNode::mesh("ground", Material::new().with_color(Color::from_hex(0x7A9A5B)).with_roughness(0.95))
            .with_bounds(AABB::from_size(120.0, 0.5, 120.0)),
    );
    let house = objects.insert(SceneNode::group("house").with_position(Vec3::new(39.0, 8.5, -63.4)));
    let walls = objects.insert(
        SceneNode::mesh("walls", Material::new().with_color(Color::from_hex(0xE8DCC8)))
            .with_bounds(AABB::from_size(8.0, 4.0, 6.0))
            .with_position(Vec3::new(0.0, 2.0, 0.0)),
    );
    let chimney = objects.insert(
        SceneNode::mesh("chimney", Material::new().with_color(Color::from_hex(0x8B3A2E)))
            .with_bounds(AABB::from_size(0.8, 2.0, 0.8))
            .with_position(Vec3::new(2.5, 5.0, 1.0)),
    );
    objects.attach_child(house, walls)?;
    objects.attach_child(house, chimney)?;
    Ok(vec![ground, house])
}

/// Roof panel hinged at its ridge; returns the model root and the panel
fn build_roof(objects: &mut ObjectArena) -> Result<(ObjectId, ObjectId), SceneError> {
    let root = objects.insert(SceneNode::group("roof"));
    let panel = objects.insert(
        SceneNode::mesh("panel", Material::new().with_color(Color::from_hex(0x5A4A42)).with_roughness(0.7))
            .with_bounds(AABB::from_size(8.5, 0.2, 3.5)),
    );
    objects.attach_child(root, panel)?;
    Ok((root, panel))
}

fn slider_panel() -> SliderPanel {
    SliderPanel::new(
        "Sliders",
        vec![
            Slider::new(DIRECTION_SENDER, "DirectLight", SliderPayload::Range, 180.0, 1.5),
            Slider::new(DAYNIGHT_SENDER, "DirectLight", SliderPayload::Range, 60.0, 0.5),
            Slider::new(SEASON_SENDER, "DirectLight", SliderPayload::InvertedRange, 30.0, 0.25),
            Slider::new("Slider", "Roof", SliderPayload::Scaled(180.0), 90.0, 1.0),
        ],
    )
}

/// Register every participant; returns the roof hotspot and the slider panel
fn build_scene(scene: &mut SceneManager) -> Result<(Rc<RefCell<Hotspot>>, Rc<RefCell<SliderPanel>>), SceneError> {
    // Sent before the roof exists; waits on the notice board
    let hotspot = Rc::new(RefCell::new(Hotspot::new("Roof ridge", Vec3::new(2.0, 0.2, -3.0))));
    scene.broadcast_to(HOTSPOT_SENDER, "Roof", Message::Hotspot(Rc::clone(&hotspot)));

    let terrain = build_terrain(scene.objects_mut())?;
    let mut terrain = MeshActor::new("Scene", scene.objects_mut(), terrain);
    terrain.set_position(scene.objects_mut(), Vec3::new(-39.0, -10.5, 60.4));
    scene.register(terrain);

    let (roof_root, panel) = build_roof(scene.objects_mut())?;
    let clip = AnimationClip::hinge(panel, &Transform::identity(), &Vec3::z(), std::f32::consts::FRAC_PI_2, 2.0);
    let mut roof = MeshActor::new("Roof", scene.objects_mut(), vec![roof_root])
        .with_pick_bounds(scene.objects_mut(), Vec3::new(9.0, 4.0, 7.0), Vec3::new(2.0, -2.0, -3.0))
        .with_animation(scene.objects_mut(), clip, 0.0);
    roof.set_position(scene.objects_mut(), Vec3::new(2.0, -2.0, -3.0));
    scene.register(roof);

    let ambient = AmbientLight::new("AmbientLight", scene.objects_mut(), Color::WHITE, 1.0);
    scene.register(ambient);

    let sun = DirectLight::new(
        "DirectLight",
        scene.objects_mut(),
        Vec3::new(30.0, 108.0, -2.8),
        5.0,
        Vec3::new(0.0, 0.0, -4.0),
    );
    scene.register(sun);

    let sky = SceneNode::mesh(
        "sky",
        Material::new().with_texture(TextureId(1)).with_side(Side::Back),
    )
    .with_bounds(AABB::from_size(400.0, 400.0, 400.0));
    let background = ShapeActor::new("Background", scene.objects_mut(), sky).without_ray_casting();
    background.set_position(scene.objects_mut(), Vec3::new(2.0, 0.0, -5.0));
    scene.register(background);

    let camera = OrbitalCameraManager::new("Camera", 90.0, Vec3::new(0.0, 0.0, -5.0), 12.0);
    scene.register(camera);
    scene.set_active_camera("Camera");

    let sliders = scene.register(slider_panel());
    Ok((hotspot, sliders))
}

fn run() -> Result<(), ViewerError> {
    let config = SceneConfig::load_or_default(concat!(env!("CARGO_MANIFEST_DIR"), "/viewer.toml"))?;
    let viewport = Viewport::from(config.viewport);
    let (mut scene, render_log) = SceneManager::headless(config);
    let (hotspot, sliders) = build_scene(&mut scene)?;
    log::info!(
        "Scene ready: {} participants, {} objects, {} notices pending",
        scene.participant_count(),
        scene.objects().len(),
        scene.notice_board().len()
    );

    let mut frames = FixedFrameScheduler::new(FRAMES, viewport).with_rate(FRAME_RATE);
    scene.run(&mut frames);

    let hotspot = hotspot.borrow();
    if hotspot.is_visible() {
        let coord = hotspot.raster_coordinates();
        log::info!("Hotspot '{}' visible at ({:.1}, {:.1})", hotspot.name(), coord.x, coord.y);
    } else {
        log::info!("Hotspot '{}' hidden", hotspot.name());
    }
    log::info!(
        "{} frames, {} slider moves, {} objects attached, {} glowing",
        scene.total_frames(),
        sliders.borrow().moves(),
        scene.renderer().attached().len(),
        scene.renderer().bloom_objects().len()
    );
    if let Some(last_final) = render_log.last(PassKind::Final) {
        log::info!(
            "Last frame drew {} meshes and {} lights at {}x{}",
            last_final.meshes.len(),
            last_final.lights.len(),
            last_final.viewport.width,
            last_final.viewport.height
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting house viewer");
    if let Err(e) = run() {
        log::error!("Viewer failed: {}", e);
        std::process::exit(1);
    }
    log::info!("House viewer finished");
}
