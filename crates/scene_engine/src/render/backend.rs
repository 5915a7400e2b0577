//! Renderer backend contract

use crate::scene::object::{ObjectArena, ObjectId};

use super::camera::Camera;
use super::passes::CompositePasses;
use super::viewport::Viewport;
use super::BackendResult;

/// Which of the two frame passes is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Off-screen pass that feeds the bloom target
    Bloom,
    /// On-screen pass: base image, additive bloom, anti-aliasing
    Final,
}

/// Everything a backend needs to draw one pass
///
/// `attached` lists the scene graph roots in attachment order; backends walk
/// each root's subtree in `objects` to find meshes and lights.
pub struct FrameView<'a> {
    pub pass: PassKind,
    pub objects: &'a ObjectArena,
    pub attached: &'a [ObjectId],
    pub camera: &'a Camera,
    pub viewport: &'a Viewport,
    pub passes: &'a CompositePasses,
}

/// Abstract renderer driven by the scene pipeline
///
/// Called once per pass per frame, bloom first. Implementations must not
/// keep references into the arena between calls.
pub trait RenderBackend {
    /// Resize render targets to match the viewport
    fn set_size(&mut self, viewport: &Viewport) -> BackendResult<()>;

    /// Draw the bloom pass into the off-screen target
    fn render_bloom(&mut self, frame: &FrameView<'_>) -> BackendResult<()>;

    /// Draw the base image and composite it with the bloom target
    fn render_final(&mut self, frame: &FrameView<'_>) -> BackendResult<()>;

    /// An object became part of the scene graph
    fn object_attached(&mut self, _id: ObjectId) {}

    /// An object left the scene graph
    fn object_detached(&mut self, _id: ObjectId) {}
}
