//! Glint Renderer - recursive CPU ray tracing
//!
//! A Whitted-style ray tracer: every view ray is intersected against a small
//! list of shapes by linear scan, shaded with ambient/diffuse/specular
//! lighting and hard shadows, and continued through mirrors and refractive
//! surfaces up to a fixed depth.
//!
//! Output is produced through [`PixelSource`]: all at once with [`render`],
//! progressively with [`ProgressiveRenderer`], or as chunk files with
//! [`render_quilt`].

mod camera;
mod cube;
mod ellipsoid;
mod light;
mod material;
mod object;
mod plane;
mod progressive;
mod quilt;
mod renderer;
mod scene;
mod shape;
mod sphere;

pub use camera::Camera;
pub use cube::{Cube, CubeFace};
pub use ellipsoid::Ellipsoid;
pub use light::Light;
pub use material::{
    Color, ColorSource, Material, Response, SurfaceColors, AMBIENT_MULTIPLE, SPECULAR_MULTIPLE,
};
pub use object::Object3D;
pub use plane::Plane;
pub use progressive::{
    ProgressiveConfig, ProgressiveRenderer, ScanOrder, ShowMode, Step, DEFAULT_START_BLOCK_SIZE,
};
pub use quilt::{
    chunks, finished_path, parse_chunk_name, read_info, render_chunk, render_quilt, stitch,
    stitch_to_file, write_info, Chunk, QuiltConfig, QuiltError, QuiltResult, DEFAULT_CHUNK_SIZE,
    FINISHED_SUFFIX, INFO_FILE,
};
pub use renderer::{
    color_to_rgba, local_color, ray_color, refract, render, sanitize, schlick, ImageBuffer,
    PixelSource, RenderConfig, Tracer, FOG_COLOR, RECURSION_LIMIT,
};
pub use scene::{background_from_description, Scene, SceneHit};
pub use shape::{Hit, Shape, MIN_HIT_DISTANCE};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
