//! Vector helpers used throughout the tracer.
//!
//! glam already covers the arithmetic; these add the few operations the
//! shading code leans on, with well-defined behavior for degenerate input.

use glam::{Quat, Vec3};

/// Extension trait for Vec3 with ray-tracing conveniences.
pub trait Vec3Ext {
    /// Normalize, falling back to +X for a zero (or non-finite) length.
    fn safe_normalize(self) -> Vec3;

    /// Smoothstep interpolation towards `rhs`; `t` is clamped to [0, 1].
    fn smerp(self, rhs: Vec3, t: f32) -> Vec3;

    /// Rotate counterclockwise about `axis` by `radians`.
    fn rotated(self, axis: Vec3, radians: f32) -> Vec3;

    /// Mirror reflection about a unit normal: `v - 2(v·n)n`.
    fn reflect(self, normal: Vec3) -> Vec3;

    /// Dot product clamped at zero.
    fn pos_dot(self, rhs: Vec3) -> f32;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn safe_normalize(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            self / len
        } else {
            Vec3::X
        }
    }

    #[inline]
    fn smerp(self, rhs: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let smooth = 3.0 * t * t - 2.0 * t * t * t;
        self + smooth * (rhs - self)
    }

    fn rotated(self, axis: Vec3, radians: f32) -> Vec3 {
        Quat::from_axis_angle(axis.safe_normalize(), radians) * self
    }

    #[inline]
    fn reflect(self, normal: Vec3) -> Vec3 {
        self - 2.0 * self.dot(normal) * normal
    }

    #[inline]
    fn pos_dot(self, rhs: Vec3) -> f32 {
        self.dot(rhs).max(0.0)
    }
}

/// Linear interpolation: `(1 - t) * a + t * b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    (1.0 - t) * a + t * b
}

/// Free-function form of [`Vec3Ext::smerp`].
#[inline]
pub fn smerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.smerp(b, t)
}
