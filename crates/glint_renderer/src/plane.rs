//! Infinite plane primitive.

use glint_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::shape::{Hit, MIN_HIT_DISTANCE};

/// `|D·N|` below this counts as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// An infinite plane through `point` with unit `normal`.
///
/// Both sides are hittable; the normal is returned as stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.safe_normalize(),
        }
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Parametric distance to the plane, of either sign.
    ///
    /// `None` if the ray runs parallel to the plane.
    pub fn signed_distance(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction().dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        Some((self.point - ray.origin()).dot(self.normal) / denom)
    }

    /// True if `point` is on the side the normal points away from.
    pub fn is_behind(&self, point: Vec3) -> bool {
        (point - self.point).dot(self.normal) <= 0.0
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.signed_distance(ray)
            .filter(|t| *t > MIN_HIT_DISTANCE)
            .map(Hit::new)
    }

    /// Planar texture coordinate, one texture repeat per world unit.
    pub fn uv(&self, point: Vec3) -> Vec2 {
        let (tangent, bitangent) = tangent_basis(self.normal);
        let local = point - self.point;
        Vec2::new(local.dot(tangent).rem_euclid(1.0), local.dot(bitangent).rem_euclid(1.0))
    }
}

/// Two unit vectors spanning the plane perpendicular to `normal`.
fn tangent_basis(normal: Vec3) -> (Vec3, Vec3) {
    let helper = if normal.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let tangent = helper.cross(normal).safe_normalize();
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit() {
        let floor = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));

        let hit = floor.intersect(&ray).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_hit_from_behind() {
        let floor = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y);

        let hit = floor.intersect(&ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(floor.intersect(&ray).is_none());
        assert!(floor.signed_distance(&ray).is_none());
    }

    #[test]
    fn test_self_intersection_is_suppressed() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);

        // Leaving the surface
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(floor.intersect(&ray).is_none());

        // Plane behind the origin
        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(floor.intersect(&away).is_none());
        assert!(floor.signed_distance(&away).unwrap() < 0.0);
    }

    #[test]
    fn test_normal_is_unit() {
        let p = Plane::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 7.0));
        assert_eq!(p.normal(), Vec3::Z);
        assert!(p.is_behind(Vec3::new(3.0, 2.0, -1.0)));
        assert!(!p.is_behind(Vec3::new(3.0, 2.0, 1.0)));
    }

    #[test]
    fn test_uv_repeats() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);
        let a = floor.uv(Vec3::new(0.25, 0.0, 0.75));
        let b = floor.uv(Vec3::new(1.25, 0.0, -0.25));
        assert!((a - b).length() < 1e-5);
        assert!((0.0..1.0).contains(&a.x) && (0.0..1.0).contains(&a.y));
    }
}
