//! # Scene Composition
//!
//! Named participants, the objects they contribute, and the kernel that
//! routes messages between them and drives the render pipeline.

pub mod bounds;
pub mod notice_board;
pub mod object;
pub mod participant;
pub mod raycast;
mod registry;
pub mod scene_manager;
pub mod scene_renderer;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use bounds::AABB;
pub use notice_board::{Notice, NoticeBoard};
pub use object::{Mesh, NodeKind, ObjectArena, ObjectId, SceneNode};
pub use participant::{
    CameraManager, Drawable, DrawableFlags, Message, ParticipantRole, SceneParticipant, SharedParticipant,
};
pub use raycast::{BoundsRayCaster, Ray, RayHit, RayIntersector};
pub use registry::Lifecycle;
pub use scene_manager::{RasterQuery, SceneManager};
pub use scene_renderer::{PipelineState, SceneRenderer};
pub use scheduler::{FixedFrameScheduler, FrameScheduler};

use thiserror::Error;

use crate::config::ConfigError;
use crate::render::RenderError;

/// Scene kernel errors
///
/// Lookup misses (unknown participant names, absent cameras) are not errors;
/// they are logged and ignored.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Handle does not refer to a live object
    #[error("Unknown object {0:?}")]
    UnknownObject(ObjectId),

    /// Operation needs a mesh but the object is a group or a light
    #[error("Object {0:?} has no material")]
    NoMaterial(ObjectId),

    /// Parenting would make an object its own ancestor
    #[error("Cannot attach {child:?} under {parent:?}: it is one of its ancestors")]
    HierarchyCycle { parent: ObjectId, child: ObjectId },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
