//! # Rendering System
//!
//! Rendering abstraction layer for the scene viewer. The scene kernel never
//! talks to a graphics API directly; it hands each frame to a
//! [`RenderBackend`] together with the composite passes configured at setup.
//!
//! ## Architecture
//!
//! - **Camera**: perspective camera with world/view/raster conversions
//! - **Passes**: bloom, pixel-adder and anti-aliasing pass parameters
//! - **Backend**: trait implemented by concrete renderers
//! - **Headless**: recording backend for tests and offline runs
//! - **Resource Types**: colors, materials and lights

pub mod backend;
pub mod camera;
pub mod color;
pub mod headless;
pub mod lighting;
pub mod material;
pub mod passes;
pub mod viewport;

pub use backend::{FrameView, PassKind, RenderBackend};
pub use camera::Camera;
pub use color::Color;
pub use headless::{DrawRecord, HeadlessBackend, PassRecord, RenderLog};
pub use lighting::{Light, LightType, ShadowSettings};
pub use material::{Material, Shading, Side, TextureId};
pub use passes::{BloomPass, CompositePasses, FxaaPass, PixelAdderPass};
pub use viewport::Viewport;

use thiserror::Error;

/// Rendering system errors
///
/// Backends map their native failures onto these variants so the scene
/// kernel can report them without knowing which graphics API is in use.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    ///
    /// Usually recoverable: the next frame is attempted as normal.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;
