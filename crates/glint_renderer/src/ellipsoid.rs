//! Ellipsoid primitive.
//!
//! Stored as a unit sphere placed by a [`LocalFrame`]. Rays are carried into
//! the frame, where the intersection is the plain sphere quadratic; since the
//! local direction is not renormalized, `t` means the same thing in both
//! spaces.

use glint_math::{LocalFrame, Ray, Vec2, Vec3};

use crate::shape::{nearest_root, spherical_uv, Hit};

/// A sphere of `radius` stretched per axis, then rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    frame: LocalFrame,
}

impl Ellipsoid {
    /// Create an ellipsoid.
    ///
    /// - `stretch`: per-axis scale applied to the sphere (all components non-zero)
    /// - `rotation_degrees`: XYZ Euler rotation applied after stretching
    pub fn new(center: Vec3, radius: f32, stretch: Vec3, rotation_degrees: Vec3) -> Self {
        Self {
            frame: LocalFrame::from_euler_degrees(center, rotation_degrees, stretch * radius),
        }
    }

    pub fn from_frame(frame: LocalFrame) -> Self {
        Self { frame }
    }

    pub fn center(&self) -> Vec3 {
        self.frame.translation
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let o = self.frame.point_to_local(ray.origin());
        let d = self.frame.direction_to_local(ray.direction());

        let a = d.length_squared();
        let b = 2.0 * o.dot(d);
        let c = o.length_squared() - 1.0;

        nearest_root(a, b, c).map(Hit::new)
    }

    /// Outward unit normal; the unit sphere normal carried back to world space.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        self.frame.normal_to_world(self.frame.point_to_local(point))
    }

    pub fn uv(&self, point: Vec3) -> Vec2 {
        spherical_uv(self.frame.point_to_local(point).normalize_or_zero())
    }
}
