//! `lux` - render a job document to an image file.

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageFormat;
use log::LevelFilter;
use lux_core::{load_job, load_scene};
use lux_renderer::{Camera, CancelToken, RenderSettings, Renderer, Scene};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::from(args.log_level))
        .init();

    let mut job = load_job(&args.job)
        .with_context(|| format!("Failed to load job {}", args.job.display()))?;
    args.apply_overrides(&mut job);

    // Fail before rendering rather than after
    ImageFormat::from_path(&job.out_path)
        .with_context(|| format!("Unsupported output format: {}", job.out_path.display()))?;

    let description = load_scene(&job.scene)
        .with_context(|| format!("Failed to load scene {}", job.scene.display()))?;
    let scene = Scene::from_description(&description).context("Failed to build scene")?;

    let camera_config = job.camera.context("Job has no camera")?;
    let camera = Camera::new(&camera_config).context("Invalid camera")?;

    let renderer = Renderer::new(&camera, &scene, RenderSettings::from(&job))
        .context("Invalid render settings")?;

    let mut cancel = CancelToken::new();
    if let Some(limit) = job.time_limit_secs {
        let limit = Duration::try_from_secs_f64(limit)
            .with_context(|| format!("Invalid time limit {}", limit))?;
        cancel = cancel.with_timeout(limit);
    }

    let output = renderer.render_with_cancel(&cancel);
    if !output.status.is_complete() {
        log::warn!("Saving partial image");
    }

    output
        .image
        .into_rgb_image()
        .save(&job.out_path)
        .with_context(|| format!("Failed to write {}", job.out_path.display()))?;
    log::info!("Saved {}", job.out_path.display());

    Ok(())
}
