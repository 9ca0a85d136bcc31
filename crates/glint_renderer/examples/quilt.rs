//! Chunked ("quilt") render example.
//!
//! `render` writes a directory of chunk images plus `info.txt`; re-running it
//! skips chunks already on disk. `stitch` assembles them into
//! `<dir>_FINISHED.png`.
//!
//! ```text
//! cargo run --release --example quilt -- render quilt/demo [scene.json]
//! cargo run --release --example quilt -- stitch quilt/demo
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use glint_core::{SceneContext, SceneDescription};
use glint_renderer::{
    render_quilt, stitch_to_file, Camera, Color, Light, Material, Object3D, Plane, QuiltConfig,
    RenderConfig, Scene, Sphere, Tracer, Vec3,
};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 1050;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    match argv[..] {
        ["render", dir] => render(Path::new(dir), None),
        ["render", dir, scene] => render(Path::new(dir), Some(Path::new(scene))),
        ["stitch", dir] => {
            let finished = stitch_to_file(Path::new(dir))?;
            log::info!("Stitched image saved to {}", finished.display());
            Ok(())
        }
        _ => bail!("usage: quilt render <dir> [scene.json] | quilt stitch <dir>"),
    }
}

fn render(dir: &Path, scene_path: Option<&Path>) -> Result<()> {
    let tracer = match scene_path {
        Some(path) => {
            let description = SceneDescription::load(path)
                .with_context(|| format!("loading scene {}", path.display()))?;
            let mut context = SceneContext::new();
            context.patterns.register("stripes", stripes);
            let scene = Scene::from_description(&description, &mut context)?;
            Tracer::new(scene, WIDTH, HEIGHT)
                .with_config(RenderConfig::for_description(&description))
        }
        None => Tracer::new(demo_scene(), WIDTH, HEIGHT),
    };

    let start = std::time::Instant::now();
    let config = QuiltConfig::default().with_skip_existing(true);
    let written = render_quilt(&tracer, dir, &config)?;
    log::info!("Rendered {} chunks in {:.2?}", written, start.elapsed());

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

fn demo_scene() -> Scene {
    let camera = Camera::new()
        .with_focus(Vec3::new(0.0, 0.2, 0.0))
        .with_aspect(WIDTH as f32 / HEIGHT as f32);
    let mut scene = Scene::new(camera);
    scene.add_light(Light::point(Vec3::new(1.0, 3.0, 0.0), Color::new(1.0, 0.9, 0.9)));
    scene.add_light(Light::directional(Vec3::new(-1.0, -1.0, -0.5), Color::ONE));

    scene.add_object(Object3D::new(
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y),
        Material::new(Color::splat(0.3), Color::splat(0.7), Color::ONE, 5.0, 0.1),
    ));
    scene.add_object(Object3D::new(
        Sphere::new(Vec3::new(-0.8, 0.0, -4.0), 1.0),
        Material::new(
            Color::new(0.1, 0.0, 0.0),
            Color::new(0.8, 0.1, 0.1),
            Color::ONE,
            100.0,
            1.0,
        )
        .mirror(0.4),
    ));
    scene.add_object(Object3D::new(
        Sphere::new(Vec3::new(0.9, -0.4, -2.8), 0.6),
        Material::new(Color::splat(0.05), Color::splat(0.1), Color::ONE, 200.0, 1.0)
            .refractive(1.5, 0.9),
    ));

    scene
}
