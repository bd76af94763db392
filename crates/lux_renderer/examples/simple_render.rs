//! Simple path tracer example.
//!
//! Builds the classic three-sphere scene in code and saves it as PNG.

use lux_core::CameraConfig;
use lux_renderer::{
    Background, Camera, Color, Dielectric, Lambertian, Metal, RenderSettings, Renderer, Scene,
    Sphere, Texture, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = build_scene();

    let config = CameraConfig::default()
        .with_resolution(400, 225)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);
    let camera = Camera::new(&config)?;

    let settings = RenderSettings {
        samples_per_pixel: 32,
        max_depth: 10,
        ..Default::default()
    };

    let output = Renderer::new(&camera, &scene, settings)?.render();
    output.image.into_rgb_image().save("simple_render.png")?;
    println!("Saved to simple_render.png");
    Ok(())
}

fn build_scene() -> Scene {
    Scene::builder()
        .background(Background::Blend {
            from: Color::ONE,
            to: Color::new(0.5, 0.7, 1.0),
        })
        // Ground
        .add(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Lambertian::textured(Texture::PolarChecker {
                even: Color::new(0.2, 0.3, 0.1),
                odd: Color::splat(0.9),
                ntheta: 400,
                nphi: 800,
            }),
        ))
        .add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)))
        .add(Sphere::new(
            Vec3::new(-4.0, 1.0, 0.0),
            1.0,
            Lambertian::new(Color::new(0.4, 0.2, 0.1)),
        ))
        .add(Sphere::new(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
        ))
        .build()
}
