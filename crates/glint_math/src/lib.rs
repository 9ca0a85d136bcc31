// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod interval;
mod ray;
mod transform;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::LocalFrame;
pub use vector::{lerp, smerp, Vec3Ext};
