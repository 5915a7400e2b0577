//! Stock camera participants

pub mod orbital;

pub use orbital::OrbitalCameraManager;
