//! # Scene Engine
//!
//! Kernel of an interactive 3D viewer: named participants register with a
//! scene, talk to each other through addressed messages, share a single
//! active camera and are drawn through a two-pass bloom compositor.
//!
//! ## Features
//!
//! - **Participant registry**: actors, lights, cameras and controllers keyed by name
//! - **Notice board**: messages for participants that are not started yet wait until they are
//! - **Occlusion queries**: project a world point and test it against ray-castable geometry
//! - **Selective bloom**: only luminant objects glow; everything else is blackened for the bloom pass
//! - **Pluggable backends**: a recording headless backend ships for tests and tooling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! let (mut scene, _log) = SceneManager::headless(SceneConfig::default());
//!
//! let camera = OrbitalCameraManager::new("Camera", 45.0, Vec3::zeros(), 10.0);
//! scene.register(camera);
//! scene.set_active_camera("Camera");
//!
//! let mut frames = FixedFrameScheduler::new(60, Viewport::new(1280, 720));
//! scene.run(&mut frames);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Settings
pub mod core;
pub mod config;

pub mod foundation;
pub mod render;
pub mod scene;

// Stock participants
pub mod actors;
pub mod cameras;
pub mod lights;

/// Common imports for scene users
pub mod prelude {
    pub use crate::{
        actors::{AnimationClip, AnimationMixer, Hotspot, MeshActor, ShapeActor},
        cameras::OrbitalCameraManager,
        config::Config,
        core::config::{BloomSettings, NoticeBoardConfig, SceneConfig, ViewportConfig},
        foundation::math::{Mat4, Transform, Vec2, Vec3},
        lights::{AmbientLight, DirectLight},
        render::{Camera, Color, HeadlessBackend, Light, Material, RenderBackend, RenderLog, Viewport},
        scene::{
            CameraManager, Drawable, FixedFrameScheduler, FrameScheduler, Message, ObjectArena, ObjectId,
            ParticipantRole, SceneError, SceneManager, SceneNode, SceneParticipant, AABB,
        },
    };
}
