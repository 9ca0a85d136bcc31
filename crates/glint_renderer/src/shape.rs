//! Geometric primitives and the intersection record they share.
//!
//! Every shape answers the same two questions: how far along a ray is the
//! first surface crossing, and what is the unit normal there. The cube needs
//! to remember which face it hit, so that travels in [`Hit`] instead of in
//! the shape itself; the shapes stay immutable and freely shareable.

use glint_math::{Ray, Vec2, Vec3};

use crate::cube::{Cube, CubeFace};
use crate::ellipsoid::Ellipsoid;
use crate::plane::Plane;
use crate::sphere::Sphere;

/// Hits closer than this along a ray are ignored.
///
/// Secondary rays start on a surface; rejecting tiny distances keeps them
/// from finding that same surface again.
pub const MIN_HIT_DISTANCE: f32 = 1e-5;

/// Result of a successful ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parametric distance along the (unit direction) ray
    pub t: f32,
    /// Which cube face was crossed, for cubes
    pub face: Option<CubeFace>,
}

impl Hit {
    #[inline]
    pub fn new(t: f32) -> Self {
        Self { t, face: None }
    }

    #[inline]
    pub fn on_face(t: f32, face: CubeFace) -> Self {
        Self {
            t,
            face: Some(face),
        }
    }
}

/// The closed set of supported shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Ellipsoid(Ellipsoid),
    Cube(Cube),
}

impl Shape {
    /// Nearest valid intersection, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
            Shape::Ellipsoid(e) => e.intersect(ray),
            Shape::Cube(c) => c.intersect(ray),
        }
    }

    /// Distance to the nearest intersection, `f32::INFINITY` on a miss.
    pub fn distance(&self, ray: &Ray) -> f32 {
        self.intersect(ray).map_or(f32::INFINITY, |hit| hit.t)
    }

    /// Unit surface normal at `point`, for the hit that produced it.
    pub fn normal(&self, point: Vec3, hit: &Hit) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal(point),
            Shape::Plane(p) => p.normal(),
            Shape::Ellipsoid(e) => e.normal(point),
            Shape::Cube(c) => c.normal(point, hit),
        }
    }

    /// Texture coordinate of `point`.
    pub fn uv(&self, point: Vec3, hit: &Hit) -> Vec2 {
        match self {
            Shape::Sphere(s) => s.uv(point),
            Shape::Plane(p) => p.uv(point),
            Shape::Ellipsoid(e) => e.uv(point),
            Shape::Cube(c) => c.uv(point, hit),
        }
    }

    /// Reference position (center, or a point on the plane).
    pub fn position(&self) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.center(),
            Shape::Plane(p) => p.point(),
            Shape::Ellipsoid(e) => e.center(),
            Shape::Cube(c) => c.center(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Ellipsoid> for Shape {
    fn from(e: Ellipsoid) -> Self {
        Shape::Ellipsoid(e)
    }
}

impl From<Cube> for Shape {
    fn from(c: Cube) -> Self {
        Shape::Cube(c)
    }
}

/// Pick the nearer root of a quadratic that lies in front of the ray.
///
/// Shared by the sphere and ellipsoid. A zero or negative discriminant
/// (miss, or a grazing tangent) is not a hit.
pub(crate) fn nearest_root(a: f32, b: f32, c: f32) -> Option<f32> {
    if a == 0.0 {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / (2.0 * a);
    let far = (-b + sqrtd) / (2.0 * a);

    let t = if near > MIN_HIT_DISTANCE { near } else { far };
    (t > MIN_HIT_DISTANCE).then_some(t)
}

/// Spherical texture coordinate for a unit direction from a center.
pub(crate) fn spherical_uv(n: Vec3) -> Vec2 {
    use std::f32::consts::PI;

    // theta: angle down from +Y
    // phi: angle around Y axis from +X
    let theta = (-n.y).clamp(-1.0, 1.0).acos();
    let phi = (-n.z).atan2(n.x) + PI;

    Vec2::new(phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_root() {
        // (t - 1)(t - 3)
        assert_eq!(nearest_root(1.0, -4.0, 3.0), Some(1.0));
        // (t + 1)(t - 3): origin inside, take the far root
        assert_eq!(nearest_root(1.0, -2.0, -3.0), Some(3.0));
        // (t + 1)(t + 3): both behind
        assert_eq!(nearest_root(1.0, 4.0, 3.0), None);
        // (t - 2)^2: tangent
        assert_eq!(nearest_root(1.0, -4.0, 4.0), None);
        // no real roots
        assert_eq!(nearest_root(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_distance_is_infinite_on_miss() {
        let shape: Shape = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).into();
        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(shape.distance(&away), f32::INFINITY);

        let towards = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!((shape.distance(&towards) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_dispatch_normals_are_unit() {
        let shapes: Vec<Shape> = vec![
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).into(),
            Plane::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 3.0)).into(),
            Ellipsoid::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Vec3::new(2.0, 1.0, 1.0), Vec3::ZERO)
                .into(),
            Cube::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, Vec3::Y, 1.0).into(),
        ];
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Z);

        for shape in &shapes {
            let hit = shape.intersect(&ray).expect("every shape is straight ahead");
            let n = shape.normal(ray.at(hit.t), &hit);
            assert!((n.length() - 1.0).abs() < 1e-5, "{:?}", shape);
            // All of these face the camera at the hit
            assert!(n.dot(ray.direction) < 0.0, "{:?}", shape);
            assert_eq!(shape.position(), Vec3::new(0.0, 0.0, -5.0));
        }
    }

    #[test]
    fn test_spherical_uv_range() {
        for n in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let uv = spherical_uv(n);
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
        assert!(spherical_uv(Vec3::NEG_Y).y.abs() < 1e-6);
        assert!((spherical_uv(Vec3::Y).y - 1.0).abs() < 1e-6);
    }
}
