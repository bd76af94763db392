//! Render-job documents.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;

/// Everything needed to produce one image.
///
/// Either `camera` (inline) or `camera_path` must be present in the
/// document; [`crate::load_job`] turns the latter into the former.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    #[serde(default)]
    pub camera: Option<CameraConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_path: Option<PathBuf>,

    /// Scene document path.
    pub scene: PathBuf,

    /// Samples per pixel.
    #[serde(default = "default_spp")]
    pub spp: u32,

    /// Maximum number of bounces per path.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    #[serde(default = "default_out_path")]
    pub out_path: PathBuf,

    /// Base seed mixed into every per-sample generator.
    #[serde(default)]
    pub seed: u64,

    /// Worker threads; 0 uses the rayon default.
    #[serde(default)]
    pub threads: usize,

    #[serde(default = "default_bucket_size")]
    pub bucket_size: u32,

    /// Sample emissive primitives directly at diffuse vertices.
    #[serde(default)]
    pub next_event_estimation: bool,

    /// Bounce count after which Russian roulette starts; absent disables it.
    #[serde(default)]
    pub russian_roulette_depth: Option<u32>,

    /// Stop rendering after this many seconds and keep the partial image.
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
}

fn default_spp() -> u32 {
    8
}

fn default_max_depth() -> u32 {
    50
}

fn default_out_path() -> PathBuf {
    PathBuf::from("out.png")
}

fn default_bucket_size() -> u32 {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job: RenderJob = toml::from_str(
            r#"
            scene = "scene.toml"
            camera_path = "camera.toml"
            "#,
        )
        .unwrap();

        assert_eq!(job.spp, 8);
        assert_eq!(job.max_depth, 50);
        assert_eq!(job.out_path, PathBuf::from("out.png"));
        assert_eq!(job.bucket_size, 64);
        assert_eq!(job.threads, 0);
        assert!(!job.next_event_estimation);
        assert!(job.camera.is_none());
        assert!(job.russian_roulette_depth.is_none());
    }

    #[test]
    fn test_job_inline_camera_json() {
        let job: RenderJob = serde_json::from_str(
            r#"{
                "scene": "scene.json",
                "spp": 32,
                "seed": 7,
                "camera": { "pos": [0, 1, 3], "lookat": [0, 0, 0], "yfov": 60, "resolution": [32, 16] }
            }"#,
        )
        .unwrap();

        assert_eq!(job.spp, 32);
        assert_eq!(job.seed, 7);
        assert_eq!(job.camera.unwrap().resolution, [32, 16]);
    }
}
