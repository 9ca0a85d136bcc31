//! Runtime scene: camera, objects and lights, plus the queries the shader
//! makes against them.

use glint_core::{
    ColorDescription, LightDescription, MaterialDescription, ObjectDescription,
    ResponseDescription, SceneContext, SceneDescription, SceneError, SceneResult,
    ShapeDescription,
};
use glint_math::{Ray, Vec3};

use crate::camera::Camera;
use crate::cube::Cube;
use crate::ellipsoid::Ellipsoid;
use crate::light::Light;
use crate::material::{ColorSource, Material};
use crate::object::Object3D;
use crate::plane::Plane;
use crate::shape::{Hit, Shape};
use crate::sphere::Sphere;
use crate::Color;

/// The nearest intersection found by [`Scene::nearest_object`].
#[derive(Debug, Clone, Copy)]
pub struct SceneHit<'a> {
    /// Position of `object` in the scene's object list
    pub index: usize,
    pub object: &'a Object3D,
    pub hit: Hit,
}

impl SceneHit<'_> {
    #[inline]
    pub fn distance(&self) -> f32 {
        self.hit.t
    }
}

/// A scene ready to render. Read-only once rendering starts.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    objects: Vec<Object3D>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Build a scene from a description, resolving patterns and textures
    /// through `context`.
    ///
    /// Unknown pattern names and unreadable textures fail here, before any
    /// rendering starts.
    pub fn from_description(desc: &SceneDescription, context: &mut SceneContext) -> SceneResult<Self> {
        desc.validate()?;

        let mut scene = Scene::new(Camera::from_description(&desc.camera));
        for light in &desc.lights {
            scene.add_light(light_from_description(light));
        }
        for object in &desc.objects {
            scene.add_object(object_from_description(object, context)?);
        }

        log::debug!(
            "Built scene: {} objects, {} lights",
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Append an object, returning its index.
    pub fn add_object(&mut self, object: Object3D) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Object3D] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Closest object along `ray`. On exactly equal distances the object
    /// added first wins.
    pub fn nearest_object(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut nearest: Option<SceneHit<'_>> = None;

        for (index, object) in self.objects.iter().enumerate() {
            let Some(hit) = object.intersect(ray) else {
                continue;
            };
            if nearest.map_or(true, |n| hit.t < n.hit.t) {
                nearest = Some(SceneHit { index, object, hit });
            }
        }

        nearest
    }

    /// Distance to the nearest object along `ray`, skipping `exclude`.
    ///
    /// Returns `f32::INFINITY` if nothing is hit.
    pub fn shadowed(&self, exclude: Option<usize>, ray: &Ray) -> f32 {
        self.objects
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .map(|(_, object)| object.shape.distance(ray))
            .fold(f32::INFINITY, f32::min)
    }

    /// True if `light` reaches `point` on object `index`.
    ///
    /// Lit means the nearest blocker is at least as far away as the light.
    pub fn is_lit(&self, index: usize, point: Vec3, light: &Light) -> bool {
        let blocker = self.shadowed(Some(index), &light.shadow_ray(point));
        blocker >= light.distance_to_light(point)
    }
}

fn v3(a: &[f32; 3]) -> Vec3 {
    Vec3::from_array(*a)
}

fn light_from_description(desc: &LightDescription) -> Light {
    match desc {
        LightDescription::Point { position, color } => Light::point(v3(position), v3(color)),
        LightDescription::Directional { direction, color } => {
            Light::directional(v3(direction), v3(color))
        }
    }
}

fn shape_from_description(desc: &ShapeDescription) -> Shape {
    match desc {
        ShapeDescription::Sphere {
            center,
            radius,
            pole,
            meridian,
        } => Sphere::new(v3(center), *radius)
            .with_orientation(
                pole.as_ref().map_or(Vec3::Y, v3),
                meridian.as_ref().map_or(Vec3::X, v3),
            )
            .into(),
        ShapeDescription::Plane { point, normal } => Plane::new(v3(point), v3(normal)).into(),
        ShapeDescription::Ellipsoid {
            center,
            radius,
            stretch,
            rotation,
        } => Ellipsoid::new(v3(center), *radius, v3(stretch), v3(rotation)).into(),
        ShapeDescription::Cube {
            center,
            forward,
            up,
            length,
        } => Cube::new(v3(center), v3(forward), v3(up), *length).into(),
    }
}

fn material_from_description(
    desc: &MaterialDescription,
    context: &mut SceneContext,
) -> SceneResult<Material> {
    let colors = match &desc.color {
        ColorDescription::Solid {
            ambient,
            diffuse,
            specular,
        } => ColorSource::Solid {
            ambient: v3(ambient),
            diffuse: v3(diffuse),
            specular: v3(specular),
        },
        ColorDescription::Pattern { name } => ColorSource::Pattern(
            context
                .patterns
                .get(name)
                .ok_or_else(|| SceneError::UnknownPattern(name.clone()))?,
        ),
        ColorDescription::Texture { path } => ColorSource::Texture(context.textures.load(path)?),
        ColorDescription::CubeFaces { paths } => {
            let mut faces = Vec::with_capacity(paths.len());
            for path in paths {
                faces.push(context.textures.load(path)?);
            }
            ColorSource::CubeFaces(faces.try_into().map_err(|_| SceneError::Invalid {
                what: "material",
                reason: "cube faces need exactly six textures".into(),
            })?)
        }
    };

    let material = Material::from_source(colors, desc.shininess, desc.specular_coefficient);
    Ok(match desc.response {
        ResponseDescription::Local => material,
        ResponseDescription::Mirror { reflective_factor } => material.mirror(reflective_factor),
        ResponseDescription::Refractive {
            refractive_index,
            transparency_factor,
        } => material.refractive(refractive_index, transparency_factor),
    })
}

fn object_from_description(
    desc: &ObjectDescription,
    context: &mut SceneContext,
) -> SceneResult<Object3D> {
    Ok(Object3D::new(
        shape_from_description(&desc.shape),
        material_from_description(&desc.material, context)?,
    ))
}

/// Background color of a description, if it sets one.
pub fn background_from_description(desc: &SceneDescription) -> Option<Color> {
    desc.background.as_ref().map(v3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{CameraDescription, Texture};

    use crate::CubeFace;

    fn sphere_at(z: f32) -> Object3D {
        Object3D::new(Sphere::new(Vec3::new(0.0, 0.0, z), 1.0), Material::default())
    }

    #[test]
    fn test_nearest_object() {
        let mut scene = Scene::new(Camera::new());
        scene.add_object(sphere_at(-10.0));
        let near = scene.add_object(sphere_at(-5.0));

        let hit = scene.nearest_object(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(hit.index, near);
        assert!((hit.distance() - 4.0).abs() < 1e-5);

        assert!(scene.nearest_object(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn test_ties_go_to_first_object() {
        let mut scene = Scene::new(Camera::new());
        let first = scene.add_object(sphere_at(-5.0));
        scene.add_object(sphere_at(-5.0));

        let hit = scene.nearest_object(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(hit.index, first);
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(scene.nearest_object(&ray).is_none());
        assert_eq!(scene.shadowed(None, &ray), f32::INFINITY);
    }

    #[test]
    fn test_shadowed_excludes_object() {
        let mut scene = Scene::new(Camera::new());
        let near = scene.add_object(sphere_at(-5.0));
        scene.add_object(sphere_at(-10.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!((scene.shadowed(None, &ray) - 4.0).abs() < 1e-5);
        assert!((scene.shadowed(Some(near), &ray) - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_is_lit() {
        let mut scene = Scene::new(Camera::new());
        let ground = scene.add_object(Object3D::new(
            Plane::new(Vec3::ZERO, Vec3::Y),
            Material::default(),
        ));
        let light = Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE);

        assert!(scene.is_lit(ground, Vec3::ZERO, &light));

        // Blocker between the light and the point
        scene.add_object(Object3D::new(
            Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0),
            Material::default(),
        ));
        assert!(!scene.is_lit(ground, Vec3::ZERO, &light));

        // Off to the side the sphere is not in the way
        assert!(scene.is_lit(ground, Vec3::new(50.0, 0.0, 0.0), &light));

        // Directional lights are never occluded
        let sun = Light::directional(Vec3::NEG_Y, Color::ONE);
        assert!(scene.is_lit(ground, Vec3::ZERO, &sun));
    }

    #[test]
    fn test_from_description() {
        let mut desc = SceneDescription {
            camera: CameraDescription::default(),
            background: Some([0.0, 0.0, 1.0]),
            ..Default::default()
        };
        desc.lights.push(LightDescription::Point {
            position: [1.0, 2.0, 0.0],
            color: [1.0; 3],
        });
        desc.objects.push(ObjectDescription {
            shape: ShapeDescription::Cube {
                center: [0.0, 0.0, -5.0],
                forward: [0.0, 0.0, -1.0],
                up: [0.0, 1.0, 0.0],
                length: 1.0,
            },
            material: MaterialDescription {
                color: ColorDescription::Pattern {
                    name: "stripes".into(),
                },
                shininess: 10.0,
                specular_coefficient: 1.0,
                response: ResponseDescription::Refractive {
                    refractive_index: 1.5,
                    transparency_factor: 0.8,
                },
            },
        });
        desc.objects.push(ObjectDescription {
            shape: ShapeDescription::Sphere {
                center: [0.0; 3],
                radius: 1.0,
                pole: None,
                meridian: None,
            },
            material: MaterialDescription {
                color: ColorDescription::Texture {
                    path: "checker".into(),
                },
                shininess: 10.0,
                specular_coefficient: 1.0,
                response: ResponseDescription::Local,
            },
        });

        let mut context = SceneContext::new();
        context.patterns.register("stripes", |_| Color::X);
        context
            .textures
            .insert("checker", Texture::solid_color(Color::Y));

        let scene = Scene::from_description(&desc, &mut context).unwrap();
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.lights().len(), 1);
        assert!(scene.objects()[0].material.is_refractive());
        assert!(matches!(scene.objects()[0].shape, Shape::Cube(_)));
        assert!(matches!(
            scene.objects()[1].material.colors,
            ColorSource::Texture(_)
        ));
        assert_eq!(background_from_description(&desc), Some(Color::Z));
    }

    #[test]
    fn test_demo_scene_builds() {
        let desc = SceneDescription::from_json_str(include_str!("../../../scenes/demo.json")).unwrap();
        let mut context = SceneContext::new();
        context.patterns.register("stripes", |p: Vec3| Color::splat(p.x.fract().abs()));

        let scene = Scene::from_description(&desc, &mut context).unwrap();
        assert_eq!(scene.objects().len(), 5);
        assert_eq!(scene.lights().len(), 1);
        assert!(scene.objects()[3].material.is_refractive());
    }

    #[test]
    fn test_cube_faces_from_description() {
        let mut context = SceneContext::new();
        let names = ["one", "two", "three", "four", "five", "six"];
        for (i, name) in names.iter().enumerate() {
            context
                .textures
                .insert(*name, Texture::solid_color(Color::splat(i as f32 / 10.0)));
        }

        let mut desc = SceneDescription::default();
        desc.objects.push(ObjectDescription {
            shape: ShapeDescription::Cube {
                center: [0.0, 0.0, -5.0],
                forward: [0.0, 0.0, -1.0],
                up: [0.0, 1.0, 0.0],
                length: 2.0,
            },
            material: MaterialDescription {
                color: ColorDescription::CubeFaces {
                    paths: names.map(String::from),
                },
                shininess: 10.0,
                specular_coefficient: 1.0,
                response: ResponseDescription::Local,
            },
        });

        let scene = Scene::from_description(&desc, &mut context).unwrap();
        let die = &scene.objects()[0];

        // Facing the camera is the back face (outward normal -forward)
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = die.intersect(&ray).unwrap();
        assert_eq!(hit.face, Some(CubeFace::Back));
        let front_on = die.colors_at(ray.at(hit.t), &hit);
        assert!((front_on.diffuse.x - 0.5).abs() < 1e-6);

        // From above, the top face
        let ray = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::NEG_Y);
        let hit = die.intersect(&ray).unwrap();
        assert_eq!(hit.face, Some(CubeFace::Top));
        let from_above = die.colors_at(ray.at(hit.t), &hit);
        assert!((from_above.diffuse.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_pattern_fails_early() {
        let mut desc = SceneDescription::default();
        desc.objects.push(ObjectDescription {
            shape: ShapeDescription::Sphere {
                center: [0.0; 3],
                radius: 1.0,
                pole: None,
                meridian: None,
            },
            material: MaterialDescription {
                color: ColorDescription::Pattern {
                    name: "marble".into(),
                },
                shininess: 10.0,
                specular_coefficient: 1.0,
                response: ResponseDescription::Local,
            },
        });

        let result = Scene::from_description(&desc, &mut SceneContext::new());
        assert!(matches!(result, Err(SceneError::UnknownPattern(name)) if name == "marble"));
    }

    #[test]
    fn test_missing_texture_fails_early() {
        let mut desc = SceneDescription::default();
        desc.objects.push(ObjectDescription {
            shape: ShapeDescription::Sphere {
                center: [0.0; 3],
                radius: 1.0,
                pole: None,
                meridian: None,
            },
            material: MaterialDescription {
                color: ColorDescription::Texture {
                    path: "/nonexistent/glint/texture.png".into(),
                },
                shininess: 10.0,
                specular_coefficient: 1.0,
                response: ResponseDescription::Local,
            },
        });

        let result = Scene::from_description(&desc, &mut SceneContext::new());
        assert!(matches!(result, Err(SceneError::Texture(_))));
    }
}
