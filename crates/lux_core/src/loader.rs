//! Loading scene, camera and job documents from disk.
//!
//! Documents are TOML or JSON, chosen by file extension. Relative paths
//! inside a document (`materials_path`, `scene`, `camera_path`) are
//! resolved against the directory of the document that mentions them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::CameraConfig;
use crate::job::RenderJob;
use crate::scene::{NamedMaterial, SceneDescription};

/// Errors that can occur while loading a document.
#[derive(Error, Debug)]
pub enum SceneLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid description: {0}")]
    Invalid(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, SceneLoadError>;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("toml") => Ok(DocumentFormat::Toml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(SceneLoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Deserialize a document held in memory.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> LoadResult<T> {
        match self {
            DocumentFormat::Toml => Ok(toml::from_str(text)?),
            DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }
}

/// A document holding only `[[materials]]`.
#[derive(Debug, Deserialize)]
struct MaterialLibrary {
    #[serde(default)]
    materials: Vec<NamedMaterial>,
}

fn read_document<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| SceneLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&text)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.parent().unwrap_or_else(|| Path::new(".")).join(path)
    }
}

/// Load and validate a scene document.
///
/// Materials from `materials_path` come first, followed by the scene's
/// inline materials; names must be unique across both.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let mut scene: SceneDescription = read_document(path)?;

    if let Some(library_path) = scene.materials_path.take() {
        let library_path = resolve(path, &library_path);
        let library: MaterialLibrary = read_document(&library_path)?;
        log::debug!(
            "Loaded {} materials from {}",
            library.materials.len(),
            library_path.display()
        );
        let inline = std::mem::take(&mut scene.materials);
        scene.materials = library.materials;
        scene.materials.extend(inline);
        scene.materials_path = Some(library_path);
    }

    scene.validate()?;

    log::info!(
        "Loaded scene {}: {} materials, {} entities",
        path.display(),
        scene.materials.len(),
        scene.entities.len()
    );

    Ok(scene)
}

/// Load a camera document.
pub fn load_camera<P: AsRef<Path>>(path: P) -> LoadResult<CameraConfig> {
    read_document(path.as_ref())
}

/// Load a render-job document.
///
/// A `camera_path` is loaded into `camera`, and `scene` and `camera_path`
/// become paths relative to the current directory. `out_path` is left as
/// written.
pub fn load_job<P: AsRef<Path>>(path: P) -> LoadResult<RenderJob> {
    let path = path.as_ref();
    let mut job: RenderJob = read_document(path)?;

    job.scene = resolve(path, &job.scene);

    match (job.camera, job.camera_path.take()) {
        (Some(_), Some(_)) => {
            return Err(SceneLoadError::Invalid(
                "job defines both camera and camera_path".into(),
            ));
        }
        (None, Some(camera_path)) => {
            let camera_path = resolve(path, &camera_path);
            job.camera = Some(load_camera(&camera_path)?);
            job.camera_path = Some(camera_path);
        }
        (Some(_), None) => {}
        (None, None) => {
            return Err(SceneLoadError::Invalid(
                "job must define camera or camera_path".into(),
            ));
        }
    }

    Ok(job)
}
