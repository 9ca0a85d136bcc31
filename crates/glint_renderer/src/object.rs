//! Scene objects: a shape paired with a material.

use glint_math::{Ray, Vec3};

use crate::material::{Material, SurfaceColors};
use crate::shape::{Hit, Shape};

/// A renderable object.
#[derive(Debug, Clone)]
pub struct Object3D {
    pub shape: Shape,
    pub material: Material,
}

impl Object3D {
    pub fn new(shape: impl Into<Shape>, material: Material) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.shape.intersect(ray)
    }

    #[inline]
    pub fn normal(&self, point: Vec3, hit: &Hit) -> Vec3 {
        self.shape.normal(point, hit)
    }

    /// Material colors at `point`, computing UVs only if the material needs them.
    pub fn colors_at(&self, point: Vec3, hit: &Hit) -> SurfaceColors {
        self.material
            .colors_at(point, hit.face, || self.shape.uv(point, hit))
    }

    pub fn position(&self) -> Vec3 {
        self.shape.position()
    }
}
