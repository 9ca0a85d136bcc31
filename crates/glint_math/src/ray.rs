use crate::{Vec3, Vec3Ext};

/// A ray in 3D space with an origin and a unit direction.
///
/// The direction is normalized on construction, so `at(t)` measures true
/// distance along the ray. A zero direction normalizes to +X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.safe_normalize(),
        }
    }

    /// Create a ray whose origin is pushed `epsilon` along its own direction.
    ///
    /// Used for secondary rays leaving a surface so they don't immediately
    /// re-hit the surface they start on.
    pub fn offset(origin: Vec3, direction: Vec3, epsilon: f32) -> Self {
        let direction = direction.safe_normalize();
        Self {
            origin: origin + direction * epsilon,
            direction,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
