//! Progressive render example.
//!
//! Renders a small built-in scene (or a JSON scene given as the first
//! argument) pass by pass, reporting progress after each pass, and saves the
//! final image as a PNG.
//!
//! ```text
//! cargo run --example progressive_render -- [scene.json] [output.png]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use glint_core::{SceneContext, SceneDescription};
use glint_renderer::{
    Camera, Color, Cube, Ellipsoid, Light, Material, Object3D, Plane, ProgressiveConfig,
    ProgressiveRenderer, RenderConfig, Scene, ShowMode, Sphere, Step, Tracer, Vec3,
};

const WIDTH: u32 = 700;
const HEIGHT: u32 = 700;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let scene_path = args.next();
    let output = PathBuf::from(args.next().unwrap_or_else(|| "progressive.png".to_string()));

    let tracer = match scene_path {
        Some(path) => {
            let description = SceneDescription::load(&path)
                .with_context(|| format!("loading scene {}", path))?;
            let mut context = SceneContext::new();
            context.patterns.register("stripes", stripes);
            let scene = Scene::from_description(&description, &mut context)?;
            Tracer::new(scene, WIDTH, HEIGHT).with_config(RenderConfig::for_description(&description))
        }
        None => Tracer::new(build_scene(), WIDTH, HEIGHT),
    };

    let config = ProgressiveConfig::default().with_show(ShowMode::PerPass);
    let mut renderer = ProgressiveRenderer::new(tracer, config);

    loop {
        match renderer.step() {
            Step::Pass { block_size } => {
                log::info!("Pass at {}px done ({} blocks so far)", block_size, renderer.blocks_rendered());
            }
            Step::Done => break,
            _ => {}
        }
    }

    let image = renderer.image().to_rgba_image();
    image
        .save(&output)
        .with_context(|| format!("saving {}", output.display()))?;
    log::info!("Saved to {}", output.display());

    Ok(())
}

/// Alternating bands along X.
fn stripes(p: Vec3) -> Color {
    if (p.x * 4.0).floor() as i32 % 2 == 0 {
        Color::new(0.9, 0.9, 0.85)
    } else {
        Color::new(0.2, 0.3, 0.6)
    }
}

fn build_scene() -> Scene {
    let camera = Camera::new()
        .with_focus(Vec3::new(0.0, 0.2, 0.0))
        .with_lens(45.0, 2.5)
        .with_aspect(WIDTH as f32 / HEIGHT as f32);
    let mut scene = Scene::new(camera);

    scene.add_light(Light::point(Vec3::new(1.0, 3.0, 0.0), Color::ONE));

    // Floor
    scene.add_object(Object3D::new(
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y),
        Material::new(
            Color::splat(0.3),
            Color::splat(0.7),
            Color::ONE,
            5.0,
            0.1,
        )
        .mirror(0.2),
    ));

    scene.add_object(Object3D::new(
        Cube::new(Vec3::new(-1.5, 1.0, -4.0), Vec3::new(-0.3, 1.0, 0.0), Vec3::new(0.3, 0.0, 1.0), 0.5),
        Material::new(
            Color::new(0.4, 0.2, 0.2),
            Color::new(1.0, 0.2, 0.2),
            Color::new(1.0, 0.8, 0.8),
            100.0,
            1.0,
        ),
    ));

    scene.add_object(Object3D::new(
        Ellipsoid::new(
            Vec3::new(-1.0, -0.2, -4.0),
            0.6,
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(-45.0, 90.0, 20.0),
        ),
        Material::with_pattern(glint_core::Pattern::new(stripes), 100.0, 1.0),
    ));

    // Glass
    scene.add_object(Object3D::new(
        Sphere::new(Vec3::new(0.0, 0.0, -2.3), 0.5),
        Material::new(
            Color::splat(0.05),
            Color::splat(0.1),
            Color::ONE,
            200.0,
            1.0,
        )
        .refractive(1.5, 0.9),
    ));

    // Mirror
    scene.add_object(Object3D::new(
        Sphere::new(Vec3::new(1.2, 0.0, -3.5), 0.7),
        Material::new(
            Color::new(0.1, 0.1, 0.1),
            Color::new(0.3, 0.3, 0.3),
            Color::ONE,
            100.0,
            1.0,
        )
        .mirror(0.8),
    ));

    scene
}
