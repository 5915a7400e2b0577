//! Core engine settings
//!
//! Configuration structures shared by the scene kernel and the compositor.

pub mod config;

pub use config::{BloomSettings, NoticeBoardConfig, SceneConfig, ViewportConfig};
