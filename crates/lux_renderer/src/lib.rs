//! Lux Renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for physically-based rendering:
//!
//! - **Scene**: spheres, planes, triangles, quads and boxes over a BVH
//! - **Materials**: Lambertian (solid or polar checker), Metal, Dielectric, DiffuseLight
//! - **Camera**: thin-lens model with depth of field
//! - **Integrator**: iterative path tracing with optional next-event estimation
//!   and Russian roulette
//! - **Driver**: bucket rendering on rayon, deterministic per-sample seeding,
//!   cooperative cancellation
//!
//! # Example
//!
//! ```ignore
//! use lux_renderer::{Camera, Renderer, RenderSettings, Scene};
//!
//! let scene = Scene::from_description(&lux_core::load_scene("scene.toml")?)?;
//! let camera = Camera::new(&camera_config)?;
//! let output = Renderer::new(&camera, &scene, RenderSettings::default())?.render();
//! output.image.into_rgb_image().save("out.png")?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod error;
mod framebuffer;
mod hittable;
mod integrator;
mod material;
mod plane;
mod quad;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhNode, IndexedPrimitive};
pub use camera::Camera;
pub use error::{ConfigError, RenderError, RenderWarning};
pub use framebuffer::{color_to_rgb8, linear_to_gamma, FrameBuffer, Image, PixelAccumulator};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{trace_path, PathSample, PathState};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, MaterialProperties,
    Metal, ScatterResult,
};
pub use plane::Plane;
pub use quad::{make_box, Quad};
pub use renderer::{
    render_pixel, sanitize_radiance, CancelToken, RenderOutput, RenderSettings, RenderStats,
    RenderStatus, Renderer,
};
pub use sampling::{gen_f32, random_unit_vector, sample_rng, sample_seed, square_to_disk};
pub use scene::{build_material, Background, Scene, SceneBuilder};
pub use sphere::Sphere;
pub use texture::Texture;
pub use triangle::Triangle;

/// Re-export common math types from lux_math
pub use lux_math::{Aabb, Interval, Ray, Vec2, Vec3};
