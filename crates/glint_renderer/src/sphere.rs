//! Sphere primitive for ray tracing.

use glint_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::shape::{nearest_root, spherical_uv, Hit};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    /// Texture map axes: meridian, pole, and their cross product
    basis: [Vec3; 3],
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            basis: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }

    /// Orient the texture map: `pole` is where v = 1, and the half-plane
    /// towards `meridian` is the u = 0.5 line.
    ///
    /// `meridian` is re-orthogonalized against `pole`.
    pub fn with_orientation(mut self, pole: Vec3, meridian: Vec3) -> Self {
        let pole = pole.safe_normalize();
        let mut meridian = meridian - pole * meridian.dot(pole);
        if meridian.length_squared() < 1e-12 {
            meridian = pole.any_orthonormal_vector();
        }
        let meridian = meridian.safe_normalize();
        self.basis = [meridian, pole, meridian.cross(pole)];
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        nearest_root(a, b, c).map(Hit::new)
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).safe_normalize()
    }

    pub fn uv(&self, point: Vec3) -> Vec2 {
        let n = self.normal(point);
        let [meridian, pole, side] = self.basis;
        spherical_uv(Vec3::new(n.dot(meridian), n.dot(pole), n.dot(side)))
    }
}
