//! Surface materials.
//!
//! A material has two independent parts: where its colors come from (solid
//! values, a procedural pattern, or an image texture) and how it continues
//! light transport (not at all, as a mirror, or as a refractive medium).

use std::sync::Arc;

use glint_core::{Pattern, Texture};
use glint_math::{Interval, Vec2, Vec3};

use crate::cube::CubeFace;

/// Color type alias (RGB values typically 0-1)
pub use glint_core::Color;

/// Ambient share of a sampled pattern/texture color. Must be less than 1.
pub const AMBIENT_MULTIPLE: f32 = 0.45;

/// Specular boost of a sampled pattern/texture color. Greater than 1.
pub const SPECULAR_MULTIPLE: f32 = 1.6;

/// Where a material's colors come from.
#[derive(Debug, Clone)]
pub enum ColorSource {
    Solid {
        ambient: Color,
        diffuse: Color,
        specular: Color,
    },
    /// Sampled at the world-space hit point
    Pattern(Pattern),
    /// Sampled at the shape's UV coordinate for the hit
    Texture(Arc<Texture>),
    /// One texture per cube face, in [`CubeFace::ALL`] order. Shapes without
    /// faces use the first one.
    CubeFaces([Arc<Texture>; 6]),
}

/// Colors resolved for one hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceColors {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl SurfaceColors {
    /// Derive all three colors from a single sampled base color.
    pub fn from_base(base: Color) -> Self {
        let specular = base * SPECULAR_MULTIPLE;
        Self {
            ambient: base * AMBIENT_MULTIPLE,
            diffuse: base,
            specular: Color::new(
                Interval::UNIT.clamp(specular.x),
                Interval::UNIT.clamp(specular.y),
                Interval::UNIT.clamp(specular.z),
            ),
        }
    }
}

/// How a surface continues light transport past local shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Local shading only.
    Local,
    /// Blends in the color seen along the mirror direction.
    Mirror { reflective_factor: f32 },
    /// Transmits through the surface, falling back to reflection on total
    /// internal reflection, weighted by Fresnel reflectance.
    Refractive {
        refractive_index: f32,
        transparency_factor: f32,
    },
}

/// A surface material.
#[derive(Debug, Clone)]
pub struct Material {
    pub colors: ColorSource,
    /// Specular exponent
    pub shininess: f32,
    pub specular_coefficient: f32,
    pub response: Response,
}

impl Material {
    /// Create a local (non-recursive) material with solid colors.
    pub fn new(
        ambient: Color,
        diffuse: Color,
        specular: Color,
        shininess: f32,
        specular_coefficient: f32,
    ) -> Self {
        Self::from_source(
            ColorSource::Solid {
                ambient,
                diffuse,
                specular,
            },
            shininess,
            specular_coefficient,
        )
    }

    /// Create a local material sampling a procedural pattern.
    pub fn with_pattern(pattern: Pattern, shininess: f32, specular_coefficient: f32) -> Self {
        Self::from_source(ColorSource::Pattern(pattern), shininess, specular_coefficient)
    }

    /// Create a local material sampling an image texture.
    pub fn with_texture(texture: Arc<Texture>, shininess: f32, specular_coefficient: f32) -> Self {
        Self::from_source(ColorSource::Texture(texture), shininess, specular_coefficient)
    }

    /// Create a local material with a separate image on each cube face.
    pub fn with_cube_faces(
        faces: [Arc<Texture>; 6],
        shininess: f32,
        specular_coefficient: f32,
    ) -> Self {
        Self::from_source(ColorSource::CubeFaces(faces), shininess, specular_coefficient)
    }

    pub fn from_source(colors: ColorSource, shininess: f32, specular_coefficient: f32) -> Self {
        Self {
            colors,
            shininess,
            specular_coefficient,
            response: Response::Local,
        }
    }

    /// Turn this material into a mirror.
    ///
    /// - `reflective_factor`: 0.0 = plain surface, 1.0 = perfect mirror
    pub fn mirror(mut self, reflective_factor: f32) -> Self {
        self.response = Response::Mirror { reflective_factor };
        self
    }

    /// Turn this material into a refractive medium.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    /// - `transparency_factor`: how much of the transmitted color replaces the ambient color
    pub fn refractive(mut self, refractive_index: f32, transparency_factor: f32) -> Self {
        self.response = Response::Refractive {
            refractive_index,
            transparency_factor,
        };
        self
    }

    /// True if shading this material spawns secondary rays.
    pub fn casts_recursive_ray(&self) -> bool {
        !matches!(self.response, Response::Local)
    }

    pub fn is_refractive(&self) -> bool {
        matches!(self.response, Response::Refractive { .. })
    }

    /// Resolve the colors at a hit point.
    ///
    /// `face` is the cube face that was hit, if any. `uv` is only evaluated
    /// for textured materials.
    pub fn colors_at(
        &self,
        point: Vec3,
        face: Option<CubeFace>,
        uv: impl FnOnce() -> Vec2,
    ) -> SurfaceColors {
        match &self.colors {
            ColorSource::Solid {
                ambient,
                diffuse,
                specular,
            } => SurfaceColors {
                ambient: *ambient,
                diffuse: *diffuse,
                specular: *specular,
            },
            ColorSource::Pattern(pattern) => SurfaceColors::from_base(pattern.sample(point)),
            ColorSource::Texture(texture) => {
                let uv = uv();
                SurfaceColors::from_base(texture.sample(uv.x, uv.y))
            }
            ColorSource::CubeFaces(faces) => {
                let texture = &faces[face.map_or(0, CubeFace::index)];
                let uv = uv();
                SurfaceColors::from_base(texture.sample(uv.x, uv.y))
            }
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(
            Color::splat(0.1),
            Color::splat(0.5),
            Color::ONE,
            100.0,
            1.0,
        )
    }
}
