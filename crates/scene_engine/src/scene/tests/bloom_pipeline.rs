use super::*;
use crate::render::{Color, Light, Material, PassKind};
use crate::scene::{ObjectId, SceneNode};

struct Fixture {
    scene: SceneManager,
    log: RenderLog,
    events: Events,
    model: ObjectId,
    leaves: [ObjectId; 2],
    glow: ObjectId,
    lamp: ObjectId,
}

fn body_material() -> Material {
    Material::new().with_color(Color::rgb(0.2, 0.4, 0.6)).with_metallic(0.0)
}

fn glow_material() -> Material {
    Material::unlit(Color::from_hex(0xFCE570))
}

/// A two-leaf model, a glowing sphere and a lamp owned by one participant
fn fixture() -> Fixture {
    let (mut scene, log) = scene();
    let events = events();

    let objects = scene.objects_mut();
    let model = objects.insert(SceneNode::group("model"));
    let body = objects.insert(SceneNode::mesh("body", body_material()));
    let roof = objects.insert(SceneNode::mesh("roof", body_material().with_roughness(0.9)));
    objects.attach_child(model, body).unwrap();
    objects.attach_child(model, roof).unwrap();
    let glow = objects.insert(SceneNode::mesh("glow", glow_material()));
    let lamp = objects.insert(SceneNode::light("lamp", Light::ambient(Color::WHITE, 0.5)));

    let owner = Probe::new("Model", &events).with_drawables(vec![Drawable::new(model), Drawable::luminant(glow)]);
    scene.register(owner);
    scene.add_object(lamp, false);
    add_camera(&mut scene, &events, "Cam", front_camera());

    Fixture {
        scene,
        log,
        events,
        model,
        leaves: [body, roof],
        glow,
        lamp,
    }
}

#[test]
fn test_nothing_drawn_before_camera() {
    let mut f = fixture();

    f.scene.tick().unwrap();

    assert!(f.log.is_empty());
    assert!(!f.scene.renderer().is_rendering());
}

#[test]
fn test_buckets_after_registration() {
    let f = fixture();
    let renderer = f.scene.renderer();

    assert_eq!(renderer.main_objects(), &[f.model]);
    assert_eq!(renderer.bloom_objects(), &[f.glow]);
    assert_eq!(renderer.lights(), &[f.lamp]);
    assert!(renderer.is_attached(f.model));
    assert!(renderer.is_attached(f.lamp));
    assert!(!renderer.is_attached(f.glow));
    for leaf in f.leaves {
        assert!(renderer.snapshot(leaf).is_some());
    }
}

#[test]
fn test_bloom_pass_blackens_main_scene() {
    let mut f = fixture();
    f.scene.set_active_camera("Cam");
    f.scene.tick().unwrap();

    let bloom = f.log.last(PassKind::Bloom).unwrap();
    assert!(bloom.is_attached(f.glow));
    assert_eq!(bloom.material_of(f.glow), Some(&glow_material()));
    for leaf in f.leaves {
        assert!(bloom.material_of(leaf).unwrap().is_flat_black());
    }
    assert_eq!(bloom.lights, vec![f.lamp]);
}

#[test]
fn test_final_pass_restores_main_scene() {
    let mut f = fixture();
    f.scene.set_active_camera("Cam");
    f.scene.tick().unwrap();

    let last_final = f.log.last(PassKind::Final).unwrap();
    assert!(!last_final.is_attached(f.glow));
    assert_eq!(last_final.material_of(f.glow), None);
    assert_eq!(last_final.material_of(f.leaves[0]), Some(&body_material()));
    assert_eq!(last_final.material_of(f.leaves[1]), Some(&body_material().with_roughness(0.9)));

    assert_eq!(f.scene.objects().material(f.leaves[0]), Some(&body_material()));
    assert!(!f.scene.renderer().is_attached(f.glow));
}

#[test]
fn test_passes_alternate_every_frame() {
    let mut f = fixture();
    f.scene.set_active_camera("Cam");
    for _ in 0..3 {
        f.scene.tick().unwrap();
    }

    let kinds: Vec<_> = f.log.passes().iter().map(|p| p.pass).collect();
    assert_eq!(
        kinds,
        vec![PassKind::Bloom, PassKind::Final, PassKind::Bloom, PassKind::Final, PassKind::Bloom, PassKind::Final]
    );
    assert_eq!(occurrences(&f.events, "Model: render"), 3);
}

#[test]
fn test_paused_pipeline_skips_drawing() {
    let mut f = fixture();
    f.scene.set_active_camera("Cam");
    f.scene.set_paused(true);

    f.scene.tick().unwrap();
    assert!(f.log.is_empty());
    assert_eq!(occurrences(&f.events, "Cam: render"), 1);

    f.scene.set_paused(false);
    f.scene.tick().unwrap();
    assert_eq!(f.log.len(), 2);
}

#[test]
fn test_removed_luminant_stops_glowing() {
    let mut f = fixture();
    f.scene.set_active_camera("Cam");
    f.scene.remove_object(f.glow);
    f.scene.remove_object(f.glow);

    f.scene.tick().unwrap();

    let bloom = f.log.last(PassKind::Bloom).unwrap();
    assert!(!bloom.is_attached(f.glow));
    assert!(f.scene.renderer().bloom_objects().is_empty());
}

#[test]
fn test_removed_main_object_drops_snapshots() {
    let mut f = fixture();
    f.scene.remove_object(f.model);

    assert!(!f.scene.renderer().is_attached(f.model));
    for leaf in f.leaves {
        assert!(f.scene.renderer().snapshot(leaf).is_none());
    }
}
