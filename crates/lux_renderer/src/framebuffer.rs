//! Per-pixel sample accumulation and conversion to 8-bit output.

use crate::bucket::BucketResult;
use crate::Color;
use lux_math::Interval;

/// Running radiance sum and sample count of one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelAccumulator {
    pub sum: Color,
    pub count: u32,
}

impl PixelAccumulator {
    #[inline]
    pub fn add(&mut self, radiance: Color) {
        self.sum += radiance;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &PixelAccumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean radiance; black when no samples were taken.
    pub fn mean(&self) -> Color {
        if self.count == 0 {
            Color::ZERO
        } else {
            self.sum / self.count as f32
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct, clamp to [0, 1] and quantize one linear color.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let q = |c: f32| (Interval::UNIT.clamp(linear_to_gamma(c)) * 255.0).round() as u8;
    [q(color.x), q(color.y), q(color.z)]
}

/// Accumulators for every pixel of the image, row-major.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PixelAccumulator>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelAccumulator::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Add one radiance sample to pixel `(x, y)`.
    pub fn accumulate(&mut self, x: u32, y: u32, radiance: Color) {
        let i = self.index(x, y);
        self.pixels[i].add(radiance);
    }

    pub fn pixel(&self, x: u32, y: u32) -> &PixelAccumulator {
        &self.pixels[self.index(x, y)]
    }

    /// Fold a rendered bucket into the buffer.
    pub fn merge_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, acc) in result.pixels.iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            let index = self.index(x, y);
            self.pixels[index].merge(acc);
        }
    }

    /// Convert to displayable 8-bit RGB. Consumes the buffer.
    pub fn finalize(self) -> Image {
        let data = self
            .pixels
            .iter()
            .flat_map(|acc| color_to_rgb8(acc.mean()))
            .collect();
        Image {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Finalized 8-bit RGB image, tightly packed row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = 3 * (y as usize * self.width as usize + x as usize);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Hand the pixels to the `image` crate for encoding.
    pub fn into_rgb_image(self) -> image::RgbImage {
        // Length is always width * height * 3
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| image::RgbImage::new(0, 0))
    }
}
