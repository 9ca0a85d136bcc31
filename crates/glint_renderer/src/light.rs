//! Light sources.

use glint_math::{Ray, Vec3, Vec3Ext};

use crate::Color;

/// A light that can illuminate a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Emits from a single position.
    Point { position: Vec3, color: Color },
    /// Infinitely far away; every point sees it from the same direction.
    Directional { direction: Vec3, color: Color },
}

impl Light {
    pub fn point(position: Vec3, color: Color) -> Self {
        Light::Point { position, color }
    }

    /// `direction` is the direction the light travels.
    pub fn directional(direction: Vec3, color: Color) -> Self {
        Light::Directional {
            direction: direction.safe_normalize(),
            color,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Point { color, .. } | Light::Directional { color, .. } => *color,
        }
    }

    /// Unnormalized vector from `point` towards the light.
    pub fn vector_to_light(&self, point: Vec3) -> Vec3 {
        match self {
            Light::Point { position, .. } => *position - point,
            Light::Directional { direction, .. } => -*direction,
        }
    }

    /// Unit vector from `point` towards the light.
    pub fn direction_to_light(&self, point: Vec3) -> Vec3 {
        self.vector_to_light(point).safe_normalize()
    }

    /// Distance a blocker must be nearer than to cast a shadow.
    ///
    /// Directional lights report 0, so they are never occluded.
    pub fn distance_to_light(&self, point: Vec3) -> f32 {
        match self {
            Light::Point { position, .. } => position.distance(point),
            Light::Directional { .. } => 0.0,
        }
    }

    /// Ray used for the occlusion query of `point`.
    ///
    /// Point lights cast from the light towards the point, so the distance to
    /// the nearest blocker is directly comparable to `distance_to_light`.
    pub fn shadow_ray(&self, point: Vec3) -> Ray {
        match self {
            Light::Point { position, .. } => Ray::new(*position, point - *position),
            Light::Directional { direction, .. } => Ray::new(point, -*direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light() {
        let light = Light::point(Vec3::new(0.0, 4.0, 0.0), Color::ONE);
        let p = Vec3::new(0.0, 1.0, 0.0);

        assert_eq!(light.vector_to_light(p), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(light.direction_to_light(p), Vec3::Y);
        assert!((light.distance_to_light(p) - 3.0).abs() < 1e-6);

        let shadow = light.shadow_ray(p);
        assert_eq!(shadow.origin, Vec3::new(0.0, 4.0, 0.0));
        assert!((shadow.at(3.0) - p).length() < 1e-6);
    }

    #[test]
    fn test_directional_light() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Color::new(1.0, 0.0, 1.0));
        let p = Vec3::new(5.0, 1.0, -3.0);

        assert_eq!(light.direction_to_light(p), Vec3::Y);
        assert_eq!(light.distance_to_light(p), 0.0);
        assert_eq!(light.color(), Color::new(1.0, 0.0, 1.0));
        assert_eq!(light.shadow_ray(p).direction, Vec3::Y);
    }
}
