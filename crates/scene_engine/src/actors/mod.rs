//! Stock actors: single meshes, animated models and their hotspots

pub mod animation;
pub mod hotspot;
pub mod mesh_actor;
pub mod shape_actor;

pub use animation::{AnimationClip, AnimationMixer, AnimationTrack, Keyframe};
pub use hotspot::Hotspot;
pub use mesh_actor::MeshActor;
pub use shape_actor::ShapeActor;
