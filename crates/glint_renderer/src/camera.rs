//! Camera for ray generation.

use glint_core::{CameraDescription, Projection};
use glint_math::{lerp, Ray, Vec3, Vec3Ext};

/// Camera for generating rays into the scene.
///
/// The view rectangle is centered on `focus`; the eye sits `distance` behind
/// it along `forward`.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    focus: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,

    // Lens settings
    fov: f32, // Horizontal field of view in degrees
    distance: f32,
    aspect: f32,
    pub projection: Projection,

    // Derived by rebuild()
    eye: Vec3,
    upper_left: Vec3,
    upper_right: Vec3,
    lower_left: Vec3,
    lower_right: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            focus: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            fov: 45.0,
            distance: 2.5,
            aspect: 4.0 / 3.0,
            projection: Projection::Perspective,
            eye: Vec3::ZERO,
            upper_left: Vec3::ZERO,
            upper_right: Vec3::ZERO,
            lower_left: Vec3::ZERO,
            lower_right: Vec3::ZERO,
        };
        camera.rebuild();
        camera
    }

    /// Build a camera from a scene description.
    pub fn from_description(desc: &CameraDescription) -> Self {
        Self::new()
            .with_focus(Vec3::from(desc.focus))
            .with_orientation(Vec3::from(desc.forward), Vec3::from(desc.up))
            .with_lens(desc.fov, desc.distance)
            .with_aspect(desc.aspect)
            .with_projection(desc.projection)
    }

    /// Set the center of the view rectangle.
    pub fn with_focus(mut self, focus: Vec3) -> Self {
        self.focus = focus;
        self.rebuild();
        self
    }

    /// Set viewing direction and up hint.
    pub fn with_orientation(mut self, forward: Vec3, up: Vec3) -> Self {
        self.forward = forward;
        self.up = up;
        self.rebuild();
        self
    }

    /// Set field of view (degrees) and eye-to-view-plane distance.
    pub fn with_lens(mut self, fov: f32, distance: f32) -> Self {
        self.fov = fov;
        self.distance = distance;
        self.rebuild();
        self
    }

    /// Set width / height of the view rectangle.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self.rebuild();
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    fn rebuild(&mut self) {
        // Orthonormal basis
        self.forward = self.forward.safe_normalize();
        let mut right = self.forward.cross(self.up);
        if right.length_squared() < 1e-12 {
            log::warn!(
                "Camera up {:?} is parallel to forward {:?}, picking another",
                self.up,
                self.forward
            );
            let helper = if self.forward.y.abs() > 0.9 { Vec3::Z } else { Vec3::Y };
            right = self.forward.cross(helper);
        }
        self.right = right.safe_normalize();
        self.up = self.right.cross(self.forward).safe_normalize();

        // View rectangle
        let width = 2.0 * self.distance * (self.fov.to_radians() / 2.0).tan();
        let height = width / self.aspect;
        let half_up = self.up * (height / 2.0);
        let half_right = self.right * (width / 2.0);

        self.eye = self.focus - self.forward * self.distance;
        self.upper_left = self.focus + half_up - half_right;
        self.upper_right = self.focus + half_up + half_right;
        self.lower_left = self.focus - half_up - half_right;
        self.lower_right = self.focus - half_up + half_right;
    }

    /// Get a ray through the view rectangle.
    ///
    /// `(0, 0)` is the upper-left corner, `(1, 1)` the lower-right.
    pub fn get_ray(&self, x_percent: f32, y_percent: f32) -> Ray {
        let top = lerp(self.upper_left, self.upper_right, x_percent);
        let bottom = lerp(self.lower_left, self.lower_right, x_percent);
        let view_point = lerp(top, bottom, y_percent);

        match self.projection {
            Projection::Perspective => Ray::new(self.eye, view_point - self.eye),
            Projection::Orthographic => Ray::new(view_point, self.forward),
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Corners of the view rectangle: upper-left, upper-right, lower-left, lower-right.
    pub fn corners(&self) -> [Vec3; 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_left,
            self.lower_right,
        ]
    }

    /// Distance from `point` to the center of the view rectangle.
    pub fn distance_to_focus(&self, point: Vec3) -> f32 {
        point.distance(self.focus)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
