//! Oriented cube primitive, intersected with the slab method.

use glint_math::{Interval, Ray, Vec2, Vec3, Vec3Ext};

use crate::plane::Plane;
use crate::shape::{Hit, MIN_HIT_DISTANCE};

/// One of the six faces of a [`Cube`], named by its outward normal in the
/// cube's own right/up/forward basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Front,
        CubeFace::Back,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            CubeFace::Right => 0,
            CubeFace::Left => 1,
            CubeFace::Top => 2,
            CubeFace::Bottom => 3,
            CubeFace::Front => 4,
            CubeFace::Back => 5,
        }
    }

    /// Basis axis (0 right, 1 up, 2 forward) this face is perpendicular to.
    #[inline]
    fn axis(self) -> usize {
        self.index() / 2
    }
}

/// A cube of edge `length` with faces aligned to an arbitrary orthonormal
/// basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    center: Vec3,
    /// right, up, forward
    basis: [Vec3; 3],
    length: f32,
    planes: [Plane; 6],
}

impl Cube {
    /// Create a cube.
    ///
    /// `up` is only a hint; it is re-orthogonalized against `forward`.
    pub fn new(center: Vec3, forward: Vec3, up: Vec3, length: f32) -> Self {
        let forward = forward.safe_normalize();
        let mut right = forward.cross(up);
        if right.length_squared() < 1e-12 {
            let helper = if forward.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
            right = forward.cross(helper);
        }
        let right = right.safe_normalize();
        let up = right.cross(forward);
        let basis = [right, up, forward];

        let length = length.abs();
        let half = length / 2.0;
        let planes = CubeFace::ALL.map(|face| {
            let axis = basis[face.axis()];
            let normal = if face.index() % 2 == 0 { axis } else { -axis };
            Plane::new(center + normal * half, normal)
        });

        Self {
            center,
            basis,
            length,
            planes,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn face_plane(&self, face: CubeFace) -> &Plane {
        &self.planes[face.index()]
    }

    /// Slab intersection.
    ///
    /// Each face either narrows the start (entering) or the end (exiting) of
    /// the window in which the ray is inside the cube. A ray starting inside
    /// reports its exit face instead.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut window = Interval::UNIVERSE;
        let mut entry_face = None;
        let mut exit_face = None;

        for face in CubeFace::ALL {
            let plane = self.face_plane(face);
            match plane.signed_distance(ray) {
                // Parallel to this slab and outside it: never inside the cube
                None if !plane.is_behind(ray.origin()) => return None,
                None => {}
                Some(t) if ray.direction().dot(plane.normal()) < 0.0 => {
                    if t > window.min {
                        window.raise_min(t);
                        entry_face = Some(face);
                    }
                }
                Some(t) => {
                    if t < window.max {
                        window.lower_max(t);
                        exit_face = Some(face);
                    }
                }
            }
        }

        if window.is_empty() {
            return None;
        }
        match (entry_face, exit_face) {
            (Some(face), _) if window.min > MIN_HIT_DISTANCE => Some(Hit::on_face(window.min, face)),
            (_, Some(face)) if window.max > MIN_HIT_DISTANCE => Some(Hit::on_face(window.max, face)),
            _ => None,
        }
    }

    /// Outward normal of the face recorded in `hit`.
    ///
    /// Falls back to the face whose axis dominates `point` when the hit did
    /// not come from this cube.
    pub fn normal(&self, point: Vec3, hit: &Hit) -> Vec3 {
        let face = hit.face.unwrap_or_else(|| self.nearest_face(point));
        self.face_plane(face).normal()
    }

    fn nearest_face(&self, point: Vec3) -> CubeFace {
        let local = self.to_basis(point - self.center);
        let axis = if local.x.abs() >= local.y.abs() && local.x.abs() >= local.z.abs() {
            0
        } else if local.y.abs() >= local.z.abs() {
            1
        } else {
            2
        };
        let face = CubeFace::ALL[axis * 2];
        if local[axis] >= 0.0 {
            face
        } else {
            CubeFace::ALL[axis * 2 + 1]
        }
    }

    fn to_basis(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.basis[0]), v.dot(self.basis[1]), v.dot(self.basis[2]))
    }

    /// Face-local texture coordinate, each face covering the full unit square.
    pub fn uv(&self, point: Vec3, hit: &Hit) -> Vec2 {
        let face = hit.face.unwrap_or_else(|| self.nearest_face(point));
        let local = self.to_basis(point - self.center);
        let (u_axis, v_axis) = match face.axis() {
            0 => (2, 1),
            1 => (0, 2),
            _ => (0, 1),
        };
        let scale = if self.length > 0.0 { self.length } else { 1.0 };
        Vec2::new(
            Interval::UNIT.clamp(local[u_axis] / scale + 0.5),
            Interval::UNIT.clamp(local[v_axis] / scale + 0.5),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Cube {
        Cube::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 1.0)
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let cube = Cube::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.3), 2.0);
        for (i, a) in cube.basis.iter().enumerate() {
            assert!((a.length() - 1.0).abs() < 1e-5);
            for b in &cube.basis[i + 1..] {
                assert!(a.dot(*b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_hit_along_every_face_normal() {
        let cube = unit_cube();
        for face in CubeFace::ALL {
            let n = cube.face_plane(face).normal();
            let ray = Ray::new(n * 1.5, -n);

            let hit = cube.intersect(&ray).unwrap();
            assert!((hit.t - 1.0).abs() < 1e-5, "{:?}", face);
            assert_eq!(hit.face, Some(face));
            assert!((cube.normal(ray.at(hit.t), &hit) - n).length() < 1e-6);
        }
    }

    #[test]
    fn test_half_length_distance() {
        // Faces one unit from the center, origin half a unit outside
        let cube = Cube::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 2.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.5), Vec3::NEG_Z);
        assert!((cube.intersect(&ray).unwrap().t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_miss_outside_slabs() {
        let cube = unit_cube();

        // Parallel to the X slab but outside it
        let beside = Ray::new(Vec3::new(0.6, 0.0, 5.0), Vec3::NEG_Z);
        assert!(cube.intersect(&beside).is_none());

        // Diagonal that clips no face
        let skew = Ray::new(Vec3::new(-3.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 0.2));
        assert!(cube.intersect(&skew).is_none());

        // Cube behind the ray
        let away = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        assert!(cube.intersect(&away).is_none());
    }

    #[test]
    fn test_oblique_hit_picks_last_entry() {
        let cube = unit_cube();
        let ray = Ray::new(Vec3::new(-2.0, 0.1, 0.2), Vec3::new(1.0, 0.0, 0.0));
        let hit = cube.intersect(&ray).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-5);
        assert_eq!(hit.face, Some(CubeFace::Left));
    }

    #[test]
    fn test_hit_from_inside_reports_exit() {
        let cube = unit_cube();
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = cube.intersect(&ray).unwrap();
        assert!((hit.t - 0.5).abs() < 1e-5);
        assert_eq!(hit.face, Some(CubeFace::Top));
    }

    #[test]
    fn test_independent_queries_keep_their_faces() {
        let cube = unit_cube();
        let a = cube.intersect(&Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z)).unwrap();
        let b = cube.intersect(&Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_X)).unwrap();

        assert_eq!(cube.normal(Vec3::ZERO, &a), Vec3::Z);
        assert_eq!(cube.normal(Vec3::ZERO, &b), Vec3::X);
    }

    #[test]
    fn test_normal_fallback_and_uv() {
        let cube = unit_cube();
        let no_face = Hit::new(1.0);
        assert_eq!(cube.normal(Vec3::new(0.5, 0.1, -0.2), &no_face), Vec3::X);

        let uv = cube.uv(Vec3::new(0.0, 0.0, 0.5), &no_face);
        assert!((uv - Vec2::splat(0.5)).length() < 1e-5);
    }
}
