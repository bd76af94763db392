//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use crate::framebuffer::PixelAccumulator;
use crate::renderer::{render_pixel, CancelToken, RenderSettings, RenderStats};
use crate::{Camera, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the image center come first so the most important
/// part of the frame finishes early.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
///
/// The sort is stable, so equally distant buckets keep row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket.
///
/// Checks `cancel` before each pixel; a cancelled bucket returns the
/// pixels finished so far and leaves the rest without samples.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    settings: &RenderSettings,
    cancel: &CancelToken,
) -> BucketResult {
    let mut result = BucketResult::new(
        *bucket,
        vec![PixelAccumulator::default(); bucket.pixel_count() as usize],
    );

    'rows: for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            if cancel.is_cancelled() {
                break 'rows;
            }
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let i = (local_y * bucket.width + local_x) as usize;
            result.pixels[i] = render_pixel(camera, scene, global_x, global_y, settings, &mut result.stats);
            result.completed_pixels += 1;
        }
    }

    result
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel accumulators in row-major order
    pub pixels: Vec<PixelAccumulator>,
    pub stats: RenderStats,
    /// Pixels that received all their samples
    pub completed_pixels: u32,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<PixelAccumulator>) -> Self {
        Self {
            bucket,
            pixels,
            stats: RenderStats::default(),
            completed_pixels: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_pixels == self.bucket.pixel_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Background, Color};
    use lux_core::CameraConfig;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    fn background_only() -> (Camera, Scene) {
        let camera = Camera::new(&CameraConfig::default().with_resolution(8, 8)).unwrap();
        let scene = Scene::builder()
            .background(Background::Pure(Color::splat(0.25)))
            .build();
        (camera, scene)
    }

    #[test]
    fn test_render_bucket_fills_every_pixel() {
        let (camera, scene) = background_only();
        let settings = RenderSettings {
            samples_per_pixel: 3,
            ..Default::default()
        };
        let bucket = Bucket::new(4, 4, 4, 4, 0);

        let result = render_bucket(&bucket, &camera, &scene, &settings, &CancelToken::new());
        assert!(result.is_complete());
        assert!(result.pixels.iter().all(|p| p.count == 3));
        assert_eq!(result.stats.samples, 16 * 3);
        assert_eq!(result.stats.escaped, 16 * 3);
    }

    #[test]
    fn test_render_bucket_cancelled() {
        let (camera, scene) = background_only();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = render_bucket(
            &Bucket::new(0, 0, 4, 4, 0),
            &camera,
            &scene,
            &RenderSettings::default(),
            &cancel,
        );
        assert_eq!(result.completed_pixels, 0);
        assert!(result.pixels.iter().all(|p| p.count == 0));
    }
}
