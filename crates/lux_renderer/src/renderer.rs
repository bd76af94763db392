//! Render driver.
//!
//! Splits the image into buckets, renders them in parallel with rayon and
//! merges the per-bucket accumulators into a frame buffer once every
//! worker has returned. Every sample draws from its own generator seeded
//! by pixel and sample index, so the image does not depend on how buckets
//! are scheduled.

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{ConfigError, RenderWarning};
use crate::framebuffer::{FrameBuffer, Image, PixelAccumulator};
use crate::integrator::{trace_path, PathState};
use crate::sampling::sample_rng;
use crate::{Camera, Color, Scene};
use lux_core::RenderJob;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sampling and scheduling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-sample generators
    pub seed: u64,
    /// Worker threads; 0 uses the global rayon pool
    pub threads: usize,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    pub next_event_estimation: bool,
    /// Bounce count after which Russian roulette starts
    pub russian_roulette_depth: Option<u32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 8,
            max_depth: 50,
            seed: 0,
            threads: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            next_event_estimation: false,
            russian_roulette_depth: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::InvalidBucketSize);
        }
        Ok(())
    }
}

impl From<&RenderJob> for RenderSettings {
    fn from(job: &RenderJob) -> Self {
        Self {
            samples_per_pixel: job.spp,
            max_depth: job.max_depth,
            seed: job.seed,
            threads: job.threads,
            bucket_size: job.bucket_size,
            next_event_estimation: job.next_event_estimation,
            russian_roulette_depth: job.russian_roulette_depth,
        }
    }
}

/// Counters collected while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Camera paths traced
    pub samples: u64,
    /// Samples with NaN, infinite or negative radiance
    pub anomalous_samples: u64,
    pub escaped: u64,
    pub absorbed: u64,
    pub depth_exhausted: u64,
}

impl RenderStats {
    /// Count one finished path.
    pub fn record(&mut self, state: PathState) {
        self.samples += 1;
        match state {
            PathState::Escaped => self.escaped += 1,
            PathState::Absorbed => self.absorbed += 1,
            PathState::DepthExhausted => self.depth_exhausted += 1,
            PathState::Tracing | PathState::Scattered => {}
        }
    }

    pub fn merge(&mut self, other: &RenderStats) {
        self.samples += other.samples;
        self.anomalous_samples += other.anomalous_samples;
        self.escaped += other.escaped;
        self.absorbed += other.absorbed;
        self.depth_exhausted += other.depth_exhausted;
    }
}

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag. Workers poll it before each pixel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also count as cancelled once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Also count as cancelled `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// How a render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Completed,
    /// Stopped early; pixels that were not rendered are black.
    Cancelled { pixels_rendered: u64, pixels_total: u64 },
}

impl RenderStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RenderStatus::Completed)
    }
}

/// Everything a render produces.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: Image,
    pub status: RenderStatus,
    pub stats: RenderStats,
    pub warnings: Vec<RenderWarning>,
}

/// Replace unusable radiance: non-finite samples become black and negative
/// channels are clamped to zero. Returns the usable value and whether it
/// had to be changed.
pub fn sanitize_radiance(radiance: Color) -> (Color, bool) {
    if !radiance.is_finite() {
        (Color::ZERO, true)
    } else if radiance.min_element() < 0.0 {
        (radiance.max(Color::ZERO), true)
    } else {
        (radiance, false)
    }
}

/// Render a single pixel with multi-sampling.
///
/// Sample `s` uses the generator seeded from `(seed, x, y, s)` for both
/// camera and path sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    stats: &mut RenderStats,
) -> PixelAccumulator {
    let mut pixel = PixelAccumulator::default();

    for s in 0..settings.samples_per_pixel {
        let mut rng = sample_rng(settings.seed, x, y, s);
        let ray = camera.get_ray(x, y, &mut rng);
        let sample = trace_path(&ray, scene, settings, &mut rng);
        stats.record(sample.state);

        let (radiance, anomalous) = sanitize_radiance(sample.radiance);
        if anomalous {
            stats.anomalous_samples += 1;
            log::debug!(
                "Discarded anomalous radiance {:?} at pixel ({}, {}) sample {}",
                sample.radiance,
                x,
                y,
                s
            );
        }
        pixel.add(radiance);
    }

    pixel
}

/// Runs `f` inside a dedicated pool of `threads` workers, or on the global
/// pool when `threads` is 0.
fn with_thread_pool<T: Send>(threads: usize, f: impl FnOnce() -> T + Send) -> T {
    if threads == 0 {
        return f();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(f),
        Err(err) => {
            log::warn!(
                "Failed to build a {}-thread pool ({}); using the global pool",
                threads,
                err
            );
            f()
        }
    }
}

/// A validated camera, scene and settings, ready to render.
pub struct Renderer<'a> {
    camera: &'a Camera,
    scene: &'a Scene,
    settings: RenderSettings,
    warnings: Vec<RenderWarning>,
}

impl<'a> Renderer<'a> {
    pub fn new(camera: &'a Camera, scene: &'a Scene, settings: RenderSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut warnings = Vec::new();
        if scene.is_degenerate() {
            log::warn!("{}", RenderWarning::DegenerateScene);
            warnings.push(RenderWarning::DegenerateScene);
        }

        Ok(Self {
            camera,
            scene,
            settings,
            warnings,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Render the whole image.
    pub fn render(&self) -> RenderOutput {
        self.render_with_cancel(&CancelToken::new())
    }

    /// Render until done or until `cancel` fires.
    pub fn render_with_cancel(&self, cancel: &CancelToken) -> RenderOutput {
        let (width, height) = (self.camera.width(), self.camera.height());
        let buckets = generate_buckets(width, height, self.settings.bucket_size);
        let total_buckets = buckets.len();
        let finished = AtomicUsize::new(0);
        let start = Instant::now();

        log::info!(
            "Rendering {}x{} at {} spp, max depth {} ({} buckets)",
            width,
            height,
            self.settings.samples_per_pixel,
            self.settings.max_depth,
            total_buckets
        );

        let results: Vec<BucketResult> = with_thread_pool(self.settings.threads, || {
            buckets
                .par_iter()
                .map(|bucket| {
                    let bucket_start = Instant::now();
                    let result = render_bucket(bucket, self.camera, self.scene, &self.settings, cancel);

                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    log::debug!(
                        "Bucket {} ({}x{} at {},{}) finished in {:.2?}",
                        bucket.index,
                        bucket.width,
                        bucket.height,
                        bucket.x,
                        bucket.y,
                        bucket_start.elapsed()
                    );
                    // Report each 10% step once
                    if done * 10 / total_buckets > (done - 1) * 10 / total_buckets {
                        log::info!("Progress: {}% ({}/{} buckets)", done * 100 / total_buckets, done, total_buckets);
                    }
                    result
                })
                .collect()
        });

        let mut framebuffer = FrameBuffer::new(width, height);
        let mut stats = RenderStats::default();
        let mut pixels_rendered = 0u64;
        for result in &results {
            framebuffer.merge_bucket(result);
            stats.merge(&result.stats);
            pixels_rendered += result.completed_pixels as u64;
        }

        let pixels_total = width as u64 * height as u64;
        let status = if pixels_rendered == pixels_total {
            RenderStatus::Completed
        } else {
            RenderStatus::Cancelled {
                pixels_rendered,
                pixels_total,
            }
        };

        if stats.anomalous_samples > 0 {
            log::warn!(
                "{} of {} samples had invalid radiance and were clamped or discarded",
                stats.anomalous_samples,
                stats.samples
            );
        }
        match status {
            RenderStatus::Completed => log::info!(
                "Render finished in {:.2?}: {} samples ({} escaped, {} absorbed, {} hit max depth)",
                start.elapsed(),
                stats.samples,
                stats.escaped,
                stats.absorbed,
                stats.depth_exhausted
            ),
            RenderStatus::Cancelled { .. } => log::info!(
                "Render cancelled after {:.2?}: {}/{} pixels rendered",
                start.elapsed(),
                pixels_rendered,
                pixels_total
            ),
        }

        RenderOutput {
            image: framebuffer.finalize(),
            status,
            stats,
            warnings: self.warnings.clone(),
        }
    }
}
