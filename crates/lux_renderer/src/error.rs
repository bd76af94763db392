//! Error and warning types reported by the renderer.

use lux_core::SceneLoadError;
use thiserror::Error;

/// Invalid camera or render settings, detected before any work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid resolution {width}x{height}: both dimensions must be at least 1")]
    InvalidResolution { width: u32, height: u32 },

    #[error("invalid vertical field of view {0}: must lie strictly between 0 and 180 degrees")]
    InvalidFieldOfView(f32),

    #[error("invalid defocus angle {0}: must lie in [0, 180) degrees")]
    InvalidDefocusAngle(f32),

    #[error("invalid viewport distance {0}: must be a positive number")]
    InvalidViewportDistance(f32),

    #[error("degenerate camera orientation: {0}")]
    DegenerateOrientation(&'static str),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("max depth must be at least 1")]
    ZeroMaxDepth,

    #[error("bucket size must be at least 1")]
    InvalidBucketSize,
}

/// Any error that prevents a render from starting.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneLoadError),
}

/// Non-fatal conditions found while preparing a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWarning {
    /// The scene has no primitives and no lights; the image shows only the background.
    DegenerateScene,
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::DegenerateScene => {
                write!(f, "scene has no primitives and no lights; rendering background only")
            }
        }
    }
}
