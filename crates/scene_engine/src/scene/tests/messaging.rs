use super::*;
use crate::core::NoticeBoardConfig;
use crate::render::{Color, Material};
use crate::actors::ShapeActor;
use crate::scene::SceneNode;

#[test]
fn test_fresh_registration_leaves_board_empty() {
    let (mut scene, _log) = scene();
    let events = events();

    scene.register(Probe::new("A", &events));

    assert!(scene.notice_board().is_empty());
    assert_eq!(*events.borrow(), vec!["A: start"]);
}

#[test]
fn test_messages_wait_for_registration_in_order() {
    let (mut scene, _log) = scene();
    let events = events();

    for value in [1.0, 2.0, 3.0] {
        scene.broadcast_to("Menu", "Late", value);
    }
    assert_eq!(scene.notice_board().pending_for("Late"), 3);

    scene.register(Probe::new("Late", &events));
    assert!(scene.notice_board().is_empty());
    assert_eq!(
        *events.borrow(),
        vec!["Late: start", "Late: 1 from Menu", "Late: 2 from Menu", "Late: 3 from Menu"]
    );

    add_camera(&mut scene, &events, "Cam", front_camera());
    scene.set_active_camera("Cam");
    scene.tick().unwrap();
    assert_eq!(occurrences(&events, "Late: 2 from Menu"), 1);
}

#[test]
fn test_board_keeps_notices_for_other_names() {
    let (mut scene, _log) = scene();
    let events = events();

    scene.broadcast_to("Menu", "B", 1.0);
    scene.broadcast_to("Menu", "A", 2.0);
    scene.broadcast_to("Menu", "B", 3.0);
    scene.register(Probe::new("A", &events));

    let left: Vec<_> = scene.notice_board().iter().map(|n| n.data.as_scalar()).collect();
    assert_eq!(left, vec![Some(1.0), Some(3.0)]);
    assert_eq!(occurrences(&events, "A: 2 from Menu"), 1);
}

#[test]
fn test_started_recipient_gets_message_immediately() {
    let (mut scene, _log) = scene();
    let events = events();
    scene.register(Probe::new("A", &events));

    scene.broadcast_to("Menu", "A", 0.5);

    assert!(scene.notice_board().is_empty());
    assert_eq!(events.borrow().last().map(String::as_str), Some("A: 0.5 from Menu"));
}

#[test]
fn test_broadcast_to_all_skips_sender() {
    let (mut scene, _log) = scene();
    let events = events();
    for name in ["A", "B", "C"] {
        scene.register(Probe::new(name, &events));
    }
    events.borrow_mut().clear();

    scene.broadcast_to_all("B", 7.0);

    assert_eq!(*events.borrow(), vec!["A: 7 from B", "C: 7 from B"]);
    assert!(scene.notice_board().is_empty());
}

#[test]
fn test_broadcast_to_all_waits_for_parked_recipient() {
    let (mut scene, _log) = scene();
    let events = events();
    let ready = Rc::new(Cell::new(false));
    let mesh = scene.objects_mut().insert(SceneNode::mesh("a", Material::new()));
    scene.register(Probe::new("A", &events).with_drawables(vec![Drawable::new(mesh)]).gated(&ready));
    scene.register(Probe::new("B", &events));
    events.borrow_mut().clear();

    scene.broadcast_to_all("X", 7.0);

    assert_eq!(*events.borrow(), vec!["B: 7 from X"]);
    assert_eq!(scene.notice_board().pending_for("A"), 1);
    assert_eq!(scene.notice_board().pending_for("B"), 0);

    add_camera(&mut scene, &events, "Cam", front_camera());
    scene.set_active_camera("Cam");
    ready.set(true);
    scene.tick().unwrap();

    let a_events: Vec<_> = events.borrow().iter().filter(|e| e.starts_with("A: ")).cloned().collect();
    assert_eq!(a_events, vec!["A: start", "A: 7 from X", "A: render"]);
    assert!(scene.notice_board().is_empty());
}

#[test]
fn test_broadcast_to_all_does_not_park_for_sender() {
    let (mut scene, _log) = scene();
    let events = events();
    let ready = Rc::new(Cell::new(false));
    scene.register(Probe::new("A", &events).gated(&ready));

    scene.broadcast_to_all("A", 1.0);

    assert!(scene.notice_board().is_empty());
}

#[test]
fn test_board_grows_past_soft_limit() {
    let config = SceneConfig {
        notice_board: NoticeBoardConfig { soft_limit: Some(2) },
        ..SceneConfig::default()
    };
    let (mut scene, _log) = scene_with(config);

    for value in 0..5 {
        scene.broadcast_to("Menu", "Nobody", value as f32);
    }

    assert_eq!(scene.notice_board().len(), 5);
    assert!(scene.notice_board().is_over_soft_limit());
}

#[test]
fn test_reply_to_busy_sender_is_deferred() {
    let (mut scene, _log) = scene();
    let events = events();
    scene.register(Probe::new("Relay", &events).forwarding_to("Echo"));
    scene.register(Probe::new("Echo", &events).replying());
    events.borrow_mut().clear();

    scene.broadcast_to("Menu", "Relay", 4.0);

    assert_eq!(
        *events.borrow(),
        vec!["Relay: 4 from Menu", "Echo: 4 from Relay", "Relay: 4 from Echo"]
    );
    assert!(scene.notice_board().is_empty());
}

#[test]
fn test_color_message_survives_bloom_pass() {
    let (mut scene, log) = scene();
    let events = events();
    let shape = ShapeActor::new(
        "Background",
        scene.objects_mut(),
        SceneNode::mesh("sky", Material::new().with_color(Color::WHITE)),
    );
    let sky = shape.object();
    scene.register(shape);
    add_camera(&mut scene, &events, "Cam", front_camera());
    scene.set_active_camera("Cam");
    scene.tick().unwrap();

    let red = Color::rgb(1.0, 0.0, 0.0);
    scene.broadcast_to("ColorMenu", "Background", red);
    scene.tick().unwrap();

    let expected = Material::new().with_color(red);
    assert_eq!(scene.objects().material(sky), Some(&expected));
    assert_eq!(scene.renderer().snapshot(sky), Some(&expected));
    let last_final = log.last(crate::render::PassKind::Final).unwrap();
    assert_eq!(last_final.material_of(sky), Some(&expected));
}
