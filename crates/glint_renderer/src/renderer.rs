//! Core recursive ray tracer.
//!
//! Implements Whitted-style shading with:
//! - Ambient/diffuse/specular local lighting with hard shadows
//! - Mirror reflection blended by a fixed factor
//! - Refraction with total internal reflection and Schlick Fresnel weighting
//! - A bounded recursion depth

use glint_core::SceneDescription;
use glint_math::{lerp, Interval, Ray, Vec3, Vec3Ext};
use rayon::prelude::*;

use crate::material::Response;
use crate::scene::{background_from_description, Scene, SceneHit};
use crate::Color;

/// Default recursion depth for reflected/refracted rays.
pub const RECURSION_LIMIT: u32 = 9;

/// Default color for rays that leave the scene.
pub const FOG_COLOR: Color = Color::new(0.7, 0.9, 1.0);

/// Lower bound on the diffuse cosine, so faces turned away from a light
/// still pick up a sliver of diffuse color.
const DIFFUSE_FLOOR: f32 = 1e-6;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// How far secondary rays are pushed off the surface they leave
    pub shift_epsilon: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: RECURSION_LIMIT,
            background: FOG_COLOR,
            shift_epsilon: 1e-4,
        }
    }
}

impl RenderConfig {
    /// Defaults, with the description's background if it has one.
    pub fn for_description(desc: &SceneDescription) -> Self {
        let config = Self::default();
        match background_from_description(desc) {
            Some(background) => config.with_background(background),
            None => config,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

/// Compute the color seen by a ray.
///
/// `depth` counts bounces so far; camera rays start at 0. Reaching
/// `config.max_depth` stops recursion and returns the local color.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, config: &RenderConfig) -> Color {
    let Some(nearest) = scene.nearest_object(ray) else {
        return config.background;
    };

    let point = ray.at(nearest.distance());
    let normal = nearest.object.normal(point, &nearest.hit);
    let local = local_color(scene, &nearest, ray, point, normal);

    let material = &nearest.object.material;
    if !material.casts_recursive_ray() || depth >= config.max_depth {
        return local;
    }

    let reflected_ray = Ray::offset(point, ray.direction().reflect(normal), config.shift_epsilon);
    let reflected = ray_color(&reflected_ray, scene, depth + 1, config);

    match material.response {
        Response::Local => local,
        Response::Mirror { reflective_factor } => lerp(local, reflected, reflective_factor),
        Response::Refractive {
            refractive_index,
            transparency_factor,
        } => {
            // Entering when travelling against the outward normal
            let (facing, n1, n2) = if ray.direction().dot(normal) < 0.0 {
                (normal, 1.0, refractive_index)
            } else {
                (-normal, refractive_index, 1.0)
            };
            let cos_i = -ray.direction().dot(facing);

            let refracted = match refract(ray.direction(), facing, n1 / n2) {
                Some(direction) => {
                    let refracted_ray = Ray::offset(point, direction, config.shift_epsilon);
                    ray_color(&refracted_ray, scene, depth + 1, config)
                }
                // Total internal reflection
                None => reflected,
            };

            let ambient = nearest.object.colors_at(point, &nearest.hit).ambient;
            let transmitted = lerp(ambient, refracted, transparency_factor);
            lerp(transmitted, reflected, schlick(cos_i, n1, n2))
        }
    }
}

/// Ambient + diffuse + specular from every light that reaches the point.
///
/// Each term pulls the running color towards its target color, so the
/// result stays within the hull of the material colors.
pub fn local_color(scene: &Scene, nearest: &SceneHit<'_>, ray: &Ray, point: Vec3, normal: Vec3) -> Color {
    let object = nearest.object;
    let material = &object.material;
    let colors = object.colors_at(point, &nearest.hit);

    let mut color = colors.ambient;
    for light in scene.lights() {
        if !scene.is_lit(nearest.index, point, light) {
            continue;
        }
        let to_light = light.direction_to_light(point);

        color += (colors.diffuse - color) * normal.dot(to_light).max(DIFFUSE_FLOOR);

        let half = (to_light - ray.direction()).safe_normalize();
        color += (colors.specular - color)
            * half.pos_dot(normal).powf(material.shininess)
            * material.specular_coefficient;
    }

    color
}

/// Refract unit `direction` through a surface with unit `normal` facing the
/// incoming ray, where `eta` is n1 / n2.
///
/// Returns `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-direction.dot(normal)).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((direction * eta + normal * (eta * cos_i - k.sqrt())).safe_normalize())
}

/// Schlick's approximation of Fresnel reflectance.
pub fn schlick(cosine: f32, n1: f32, n2: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let r0 = if r0.is_finite() { r0 } else { 0.0 };
    let c = 1.0 - cosine.abs().min(1.0);
    r0 + (1.0 - r0) * c.powi(5)
}

/// Replace non-finite components with 0 and clamp to [0, 1].
pub fn sanitize(color: Color) -> Color {
    let fix = |c: f32| {
        if c.is_finite() {
            Interval::UNIT.clamp(c)
        } else {
            0.0
        }
    };
    Color::new(fix(color.x), fix(color.y), fix(color.z))
}

/// Anything that can produce a color for a pixel.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Color of pixel `(x, y)`, each component in [0, 1].
    fn get_color(&self, x: u32, y: u32) -> Color;
}

/// A scene bound to an output resolution.
#[derive(Debug, Clone)]
pub struct Tracer {
    scene: Scene,
    config: RenderConfig,
    width: u32,
    height: u32,
}

impl Tracer {
    pub fn new(scene: Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            config: RenderConfig::default(),
            width,
            height,
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Camera ray for pixel `(x, y)`; `(0, 0)` is the top-left pixel.
    pub fn pixel_ray(&self, x: u32, y: u32) -> Ray {
        let x_percent = x as f32 / self.width.max(1) as f32;
        let y_percent = y as f32 / self.height.max(1) as f32;
        self.scene.camera.get_ray(x_percent, y_percent)
    }

    /// Unsanitized color of pixel `(x, y)`.
    pub fn render_pixel(&self, x: u32, y: u32) -> Color {
        ray_color(&self.pixel_ray(x, y), &self.scene, 0, &self.config)
    }
}

impl PixelSource for Tracer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_color(&self, x: u32, y: u32) -> Color {
        sanitize(self.render_pixel(x, y))
    }
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Fill the `size` x `size` block at (x, y), clipped to the image.
    pub fn fill_block(&mut self, x: u32, y: u32, size: u32, color: Color) {
        let x_end = x.saturating_add(size).min(self.width);
        let y_end = y.saturating_add(size).min(self.height);
        for py in y..y_end {
            let row = (py * self.width) as usize;
            self.pixels[row + x as usize..row + x_end as usize].fill(color);
        }
    }

    /// Fill the whole image with one color.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let rgba = color_to_rgba(*color);
            bytes.extend_from_slice(&rgba);
        }
        bytes
    }

    /// Convert to an `image` crate buffer.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }
}

/// Convert a color to 8-bit RGBA.
///
/// Colors are already display-referred, so no gamma is applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = sanitize(color);
    let r = (255.0 * c.x).round() as u8;
    let g = (255.0 * c.y).round() as u8;
    let b = (255.0 * c.z).round() as u8;
    [r, g, b, 255]
}

/// Render every pixel of `source`, rows in parallel.
pub fn render<S: PixelSource + Sync>(source: &S) -> ImageBuffer {
    let mut image = ImageBuffer::new(source.width(), source.height());
    let width = image.width as usize;
    if width == 0 {
        return image;
    }

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = source.get_color(x as u32, y as u32);
            }
        });

    image
}
