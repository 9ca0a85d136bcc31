//! Declarative scene descriptions.
//!
//! This module defines a serializable model of a scene (camera, lights,
//! objects and their materials) that maps one-to-one onto the renderer's
//! runtime types while staying independent of them. Vectors are plain
//! `[f32; 3]` arrays so the JSON stays readable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pattern::PatternRegistry;
use crate::texture::{TextureCache, TextureError};

/// Errors that can occur while loading or resolving a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

fn invalid(what: &'static str, reason: impl Into<String>) -> SceneError {
    SceneError::Invalid {
        what,
        reason: reason.into(),
    }
}

/// External resources a description may refer to by name or path.
///
/// Passed explicitly into scene construction; nothing is looked up globally.
#[derive(Default)]
pub struct SceneContext {
    pub patterns: PatternRegistry,
    pub textures: TextureCache,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(mut self, patterns: PatternRegistry) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_textures(mut self, textures: TextureCache) -> Self {
        self.textures = textures;
        self
    }
}

/// How camera rays leave the view plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Rays fan out from the eye through the view plane.
    #[default]
    Perspective,
    /// Rays start on the view plane and all travel along `forward`.
    Orthographic,
}

/// Camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    /// Center of the view plane
    pub focus: [f32; 3],
    pub forward: [f32; 3],
    /// Up hint; orthogonalized against `forward`
    pub up: [f32; 3],
    /// Field of view in degrees
    pub fov: f32,
    /// Distance from the eye to the view plane
    pub distance: f32,
    /// Width / height
    pub aspect: f32,
    pub projection: Projection,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            focus: [0.0, 0.0, 0.0],
            forward: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
            fov: 45.0,
            distance: 2.5,
            aspect: 4.0 / 3.0,
            projection: Projection::Perspective,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDescription {
    Point { position: [f32; 3], color: [f32; 3] },
    Directional { direction: [f32; 3], color: [f32; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: [f32; 3],
        radius: f32,
        /// Texture map pole, +Y if unset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pole: Option<[f32; 3]>,
        /// Texture map meridian, +X if unset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meridian: Option<[f32; 3]>,
    },
    Plane {
        point: [f32; 3],
        normal: [f32; 3],
    },
    Ellipsoid {
        center: [f32; 3],
        radius: f32,
        stretch: [f32; 3],
        /// XYZ Euler angles in degrees
        #[serde(default)]
        rotation: [f32; 3],
    },
    Cube {
        center: [f32; 3],
        forward: [f32; 3],
        up: [f32; 3],
        /// Full edge length
        length: f32,
    },
}

/// Where a material's ambient/diffuse/specular colors come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorDescription {
    Solid {
        ambient: [f32; 3],
        diffuse: [f32; 3],
        specular: [f32; 3],
    },
    /// A pattern registered in the `SceneContext`
    Pattern { name: String },
    /// An image file, resolved through the context's texture cache
    Texture { path: String },
    /// One image per cube face: right, left, top, bottom, front, back
    CubeFaces { paths: [String; 6] },
}

/// Recursive behavior of a material.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseDescription {
    #[default]
    Local,
    Mirror {
        reflective_factor: f32,
    },
    Refractive {
        refractive_index: f32,
        transparency_factor: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub color: ColorDescription,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_specular_coefficient")]
    pub specular_coefficient: f32,
    #[serde(default)]
    pub response: ResponseDescription,
}

fn default_shininess() -> f32 {
    100.0
}

fn default_specular_coefficient() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub shape: ShapeDescription,
    pub material: MaterialDescription,
}

/// A whole scene: one camera, any number of lights and objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub lights: Vec<LightDescription>,
    pub objects: Vec<ObjectDescription>,
    /// Color returned for rays that hit nothing
    pub background: Option<[f32; 3]>,
}

impl SceneDescription {
    /// Parse and validate a JSON scene.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    /// Load and validate a JSON scene file.
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let description = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded scene {}: {} objects, {} lights",
            path.as_ref().display(),
            description.objects.len(),
            description.lights.len()
        );
        Ok(description)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter that would make geometry or shading degenerate.
    pub fn validate(&self) -> SceneResult<()> {
        self.camera.validate()?;
        for light in &self.lights {
            if let LightDescription::Directional { direction, .. } = light {
                if is_zero(direction) {
                    return Err(invalid("light", "directional light has zero direction"));
                }
            }
        }
        for object in &self.objects {
            object.shape.validate()?;
            object.material.validate()?;
        }
        Ok(())
    }
}

impl CameraDescription {
    pub fn validate(&self) -> SceneResult<()> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(invalid("camera", format!("fov {} outside (0, 180)", self.fov)));
        }
        if !(self.aspect > 0.0) {
            return Err(invalid("camera", format!("aspect {} must be positive", self.aspect)));
        }
        if !(self.distance > 0.0) {
            return Err(invalid(
                "camera",
                format!("distance {} must be positive", self.distance),
            ));
        }
        if is_zero(&self.forward) {
            return Err(invalid("camera", "forward is zero"));
        }
        Ok(())
    }
}

impl ShapeDescription {
    pub fn validate(&self) -> SceneResult<()> {
        match self {
            ShapeDescription::Sphere { radius, pole, .. } => {
                positive("sphere", "radius", *radius)?;
                if pole.as_ref().is_some_and(is_zero) {
                    return Err(invalid("sphere", "pole is zero"));
                }
                Ok(())
            }
            ShapeDescription::Plane { normal, .. } => {
                if is_zero(normal) {
                    Err(invalid("plane", "normal is zero"))
                } else {
                    Ok(())
                }
            }
            ShapeDescription::Ellipsoid {
                radius, stretch, ..
            } => {
                positive("ellipsoid", "radius", *radius)?;
                if stretch.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                    return Err(invalid(
                        "ellipsoid",
                        format!("stretch {:?} has a zero component", stretch),
                    ));
                }
                Ok(())
            }
            ShapeDescription::Cube {
                forward, up, length, ..
            } => {
                positive("cube", "length", *length)?;
                let f = glint_math::Vec3::from_array(*forward);
                let u = glint_math::Vec3::from_array(*up);
                if f.cross(u).length_squared() < 1e-12 {
                    return Err(invalid("cube", "forward and up are parallel or zero"));
                }
                Ok(())
            }
        }
    }
}

impl MaterialDescription {
    pub fn validate(&self) -> SceneResult<()> {
        if let ResponseDescription::Refractive {
            refractive_index, ..
        } = self.response
        {
            positive("material", "refractive_index", refractive_index)?;
        }
        Ok(())
    }
}

fn positive(what: &'static str, field: &str, value: f32) -> SceneResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(what, format!("{} {} must be positive", field, value)))
    }
}

fn is_zero(v: &[f32; 3]) -> bool {
    v.iter().all(|c| *c == 0.0)
}
