// Local frames for shapes defined in a canonical space.
//
// A frame is translation + rotation + per-axis scale. Points and directions
// go world -> local by undoing each in reverse order; normals come back with
// the inverse-transpose (divide by scale, then rotate).

use glam::{EulerRot, Quat, Vec3};

use crate::Vec3Ext;

/// Placement of a canonical shape in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalFrame {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Build a frame from XYZ Euler angles given in degrees.
    pub fn from_euler_degrees(translation: Vec3, degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        Self::new(translation, rotation, scale)
    }

    /// Map a world-space point into the frame.
    pub fn point_to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation) / self.scale
    }

    /// Map a world-space direction into the frame (no translation, not renormalized).
    ///
    /// Leaving the result unnormalized keeps ray parameters identical in both spaces.
    pub fn direction_to_local(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction / self.scale
    }

    /// Map a local-space point back to world space.
    pub fn point_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation * (local * self.scale) + self.translation
    }

    /// Map a local-space surface normal to a unit world-space normal.
    pub fn normal_to_world(&self, local: Vec3) -> Vec3 {
        (self.rotation * (local / self.scale)).safe_normalize()
    }
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}
