//! Camera configuration as written in camera and job documents.

use lux_math::Vec3;
use serde::{Deserialize, Serialize};

/// Values that define a thin-lens camera.
///
/// Angles are in degrees. `defocus_angle` is the full aperture cone angle;
/// 0 gives a pinhole camera. `viewport_distance` is the distance from the
/// camera to the plane of perfect focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(alias = "pos")]
    pub position: Vec3,
    /// Point the camera looks at.
    #[serde(alias = "lookat")]
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    pub yfov: f32,
    /// Output size in pixels, `[width, height]`.
    pub resolution: [u32; 2],
    #[serde(default)]
    pub defocus_angle: f32,
    #[serde(default = "default_viewport_distance")]
    pub viewport_distance: f32,
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_viewport_distance() -> f32 {
    1.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yfov: 90.0,
            resolution: [800, 450],
            defocus_angle: 0.0,
            viewport_distance: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn width(&self) -> u32 {
        self.resolution[0]
    }

    pub fn height(&self) -> u32 {
        self.resolution[1]
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = [width, height];
        self
    }

    /// Set camera placement.
    pub fn with_position(mut self, position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.look_at = look_at;
        self.up = up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, yfov: f32, defocus_angle: f32, viewport_distance: f32) -> Self {
        self.yfov = yfov;
        self.defocus_angle = defocus_angle;
        self.viewport_distance = viewport_distance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let cfg = CameraConfig::default()
            .with_resolution(360, 270)
            .with_position(Vec3::new(-2.5, 3.0, -1.0), Vec3::new(1.0, 0.0, -0.2), Vec3::Y)
            .with_lens(75.0, 0.8, 4.0);

        assert_eq!(cfg.width(), 360);
        assert_eq!(cfg.height(), 270);
        assert_eq!(cfg.defocus_angle, 0.8);
        assert_eq!(cfg.viewport_distance, 4.0);
    }

    #[test]
    fn test_deserialize_short_names() {
        let cfg: CameraConfig = toml::from_str(
            r#"
            pos = [-2.5, 3, -1]
            lookat = [1, 0, -0.2]
            up = [0, 1, 0]
            yfov = 75
            resolution = [360, 270]
            defocus_angle = 0.8
            viewport_distance = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.position, Vec3::new(-2.5, 3.0, -1.0));
        assert_eq!(cfg.look_at, Vec3::new(1.0, 0.0, -0.2));
        assert_eq!(cfg.yfov, 75.0);
        assert_eq!(cfg.resolution, [360, 270]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let cfg: CameraConfig = serde_json::from_str(
            r#"{ "position": [0, 0, 5], "look_at": [0, 0, 0], "yfov": 40, "resolution": [64, 48] }"#,
        )
        .unwrap();

        assert_eq!(cfg.up, Vec3::Y);
        assert_eq!(cfg.defocus_angle, 0.0);
        assert_eq!(cfg.viewport_distance, 1.0);
    }
}
