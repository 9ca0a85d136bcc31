//! Glint Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Textures**: image loading and UV sampling (`Texture`, `TextureCache`)
//! - **Patterns**: named procedural color samplers supplied by the host
//! - **Scene descriptions**: a serde model of cameras, lights and objects
//!   that the renderer turns into a runtime scene
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{SceneContext, SceneDescription};
//!
//! let description = SceneDescription::load("scene.json")?;
//! let mut context = SceneContext::new();
//! context.patterns.register("marble", |p| marble(p));
//! println!("{} objects, {} lights",
//!     description.objects.len(),
//!     description.lights.len());
//! ```

pub mod pattern;
pub mod scene;
pub mod texture;

/// Color type alias (RGB values typically 0-1)
pub type Color = glint_math::Vec3;

// Re-export commonly used types
pub use pattern::{Pattern, PatternRegistry};
pub use scene::{
    CameraDescription, ColorDescription, LightDescription, MaterialDescription,
    ObjectDescription, Projection, ResponseDescription, SceneContext, SceneDescription,
    SceneError, SceneResult, ShapeDescription,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
