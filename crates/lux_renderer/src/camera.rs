//! Thin-lens camera for ray generation.

use crate::error::ConfigError;
use crate::sampling::{sample_square, square_to_disk};
use lux_core::CameraConfig;
use lux_math::{Interval, Ray, Vec2, Vec3};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// Built once from a [`CameraConfig`] and immutable afterwards. Pixel
/// `(0, 0)` is the top-left corner of the image; `x` grows to the right and
/// `y` grows downwards.
#[derive(Debug, Clone)]
pub struct Camera {
    image_width: u32,
    image_height: u32,

    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,

    // Camera frame: right, true up, view direction
    right: Vec3,
    up: Vec3,
    forward: Vec3,

    lens_radius: f32,
}

impl Camera {
    /// Validate `config` and precompute the viewport.
    pub fn new(config: &CameraConfig) -> Result<Self, ConfigError> {
        let (width, height) = (config.width(), config.height());
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution { width, height });
        }
        if !Interval::new(0.0, 180.0).surrounds(config.yfov) {
            return Err(ConfigError::InvalidFieldOfView(config.yfov));
        }
        if !(config.defocus_angle >= 0.0 && config.defocus_angle < 180.0) {
            return Err(ConfigError::InvalidDefocusAngle(config.defocus_angle));
        }
        if !(config.viewport_distance.is_finite() && config.viewport_distance > 0.0) {
            return Err(ConfigError::InvalidViewportDistance(config.viewport_distance));
        }
        if !(config.position.is_finite() && config.look_at.is_finite() && config.up.is_finite()) {
            return Err(ConfigError::DegenerateOrientation("non-finite position, target or up"));
        }

        let view = config.look_at - config.position;
        if view.length_squared() == 0.0 {
            return Err(ConfigError::DegenerateOrientation("position equals look-at target"));
        }
        let forward = view.normalize();

        let right = forward.cross(config.up.normalize_or_zero());
        if right.length_squared() < 1e-12 {
            return Err(ConfigError::DegenerateOrientation("up is parallel to the view direction"));
        }
        let right = right.normalize();
        let up = right.cross(forward);

        // Viewport dimensions at the focus plane
        let half_height = (config.yfov.to_radians() / 2.0).tan() * config.viewport_distance;
        let half_width = half_height * (width as f32 / height as f32);

        let pixel_delta_u = right * (2.0 * half_width / width as f32);
        let pixel_delta_v = -up * (2.0 * half_height / height as f32);

        let viewport_upper_left = config.position + forward * config.viewport_distance
            - right * half_width
            + up * half_height;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let lens_radius = (config.defocus_angle.to_radians() / 2.0).tan() * config.viewport_distance;

        Ok(Self {
            image_width: width,
            image_height: height,
            center: config.position,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            right,
            up,
            forward,
            lens_radius,
        })
    }

    pub fn width(&self) -> u32 {
        self.image_width
    }

    pub fn height(&self) -> u32 {
        self.image_height
    }

    /// Camera position (center of the lens).
    pub fn position(&self) -> Vec3 {
        self.center
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Orthonormal camera frame `(right, up, forward)`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.right, self.up, self.forward)
    }

    /// Ray through pixel `(px, py)` for the given sample values.
    ///
    /// `pixel_jitter` in `[0, 1)²` selects the point inside the pixel,
    /// `lens_sample` in `[0, 1)²` the point on the lens. The direction is
    /// not normalized.
    pub fn ray_for_sample(&self, px: u32, py: u32, pixel_jitter: Vec2, lens_sample: Vec2) -> Ray {
        let offset = pixel_jitter - Vec2::splat(0.5);
        let pixel_sample = self.pixel00_loc
            + (px as f32 + offset.x) * self.pixel_delta_u
            + (py as f32 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.lens_radius > 0.0 {
            let p = square_to_disk(lens_sample) * self.lens_radius;
            self.center + p.x * self.right + p.y * self.up
        } else {
            self.center
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Generate a ray for pixel (px, py) with random sampling.
    pub fn get_ray(&self, px: u32, py: u32, rng: &mut dyn RngCore) -> Ray {
        let pixel_jitter = sample_square(rng);
        let lens_sample = sample_square(rng);
        self.ray_for_sample(px, py, pixel_jitter, lens_sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> CameraConfig {
        CameraConfig::default()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new(&config()).unwrap();
        let (right, up, forward) = camera.basis();

        assert_eq!(camera.position(), Vec3::ZERO);
        assert!((right - Vec3::X).length() < 1e-5);
        assert!((up - Vec3::Y).length() < 1e-5);
        assert!((forward - -Vec3::Z).length() < 1e-5);
        assert_eq!(camera.lens_radius(), 0.0);
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::new(&config()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
    }

    #[test]
    fn test_corner_orientation() {
        let camera = Camera::new(&config()).unwrap();
        let center = Vec2::splat(0.5);

        // Top-left pixel looks up and to the left
        let d = camera.ray_for_sample(0, 0, center, center).direction();
        assert!(d.x < 0.0 && d.y > 0.0);

        // Bottom-right pixel looks down and to the right
        let d = camera.ray_for_sample(99, 99, center, center).direction();
        assert!(d.x > 0.0 && d.y < 0.0);

        // 90 degree fov: the image edge is at 45 degrees
        let d = camera.ray_for_sample(0, 50, Vec2::new(0.0, 0.5), center).direction();
        assert!((d.x / d.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_up_is_orthogonalized() {
        let cfg = config().with_position(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0), Vec3::Y);
        let camera = Camera::new(&cfg).unwrap();
        let (right, up, forward) = camera.basis();

        assert!(up.dot(forward).abs() < 1e-5);
        assert!(right.dot(forward).abs() < 1e-5);
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            Camera::new(&config().with_resolution(0, 10)),
            Err(ConfigError::InvalidResolution { .. })
        ));
        assert!(matches!(
            Camera::new(&config().with_lens(180.0, 0.0, 1.0)),
            Err(ConfigError::InvalidFieldOfView(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_lens(0.0, 0.0, 1.0)),
            Err(ConfigError::InvalidFieldOfView(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_lens(f32::NAN, 0.0, 1.0)),
            Err(ConfigError::InvalidFieldOfView(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_lens(90.0, -1.0, 1.0)),
            Err(ConfigError::InvalidDefocusAngle(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_lens(90.0, 0.0, 0.0)),
            Err(ConfigError::InvalidViewportDistance(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y)),
            Err(ConfigError::DegenerateOrientation(_))
        ));
        assert!(matches!(
            Camera::new(&config().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y)),
            Err(ConfigError::DegenerateOrientation(_))
        ));
    }

    #[test]
    fn test_defocus_origins_on_lens() {
        let cfg = config().with_lens(90.0, 10.0, 2.0);
        let camera = Camera::new(&cfg).unwrap();
        let expected_radius = (5.0f32).to_radians().tan() * 2.0;
        assert!((camera.lens_radius() - expected_radius).abs() < 1e-6);

        let mut rng = StdRng::seed_from_u64(42);
        let mut moved = 0;
        for _ in 0..100 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let offset = ray.origin() - camera.position();
            assert!(offset.length() <= camera.lens_radius() + 1e-5);
            assert!(offset.z.abs() < 1e-6);
            if offset.length() > 1e-4 {
                moved += 1;
            }
        }
        assert!(moved > 0);
    }
}
