//! Lux Core - declarative descriptions consumed by the renderer.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: materials, entities and background (`SceneDescription`)
//! - **Camera configuration**: `CameraConfig`
//! - **Render jobs**: `RenderJob`, tying a camera, a scene and sampling settings together
//! - **Loading**: TOML and JSON documents via `load_scene`, `load_camera`, `load_job`
//!
//! The renderer never reads files itself; it only sees the populated
//! description types defined here.
//!
//! # Example
//!
//! ```ignore
//! use lux_core::load_scene;
//!
//! let scene = load_scene("scenes/spheres/scene.toml")?;
//! println!("Loaded {} materials, {} entities",
//!     scene.materials.len(),
//!     scene.entities.len());
//! ```

pub mod camera;
pub mod job;
pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use camera::CameraConfig;
pub use job::RenderJob;
pub use loader::{load_camera, load_job, load_scene, DocumentFormat, LoadResult, SceneLoadError};
pub use scene::{BackgroundDesc, EntityDesc, MaterialDesc, NamedMaterial, SceneDescription};
