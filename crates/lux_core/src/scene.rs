//! Scene description types.
//!
//! These mirror the scene document one to one: a background, a list of
//! named materials and a list of entities referring to materials by name.
//! They carry no geometry acceleration or shading logic.

use std::collections::HashSet;
use std::path::PathBuf;

use lux_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::loader::SceneLoadError;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackgroundDesc {
    /// Vertical gradient: `from` looking straight down, `to` looking straight up.
    Blend { from: Vec3, to: Vec3 },
    /// A single color in every direction.
    Pure { color: Vec3 },
}

impl Default for BackgroundDesc {
    fn default() -> Self {
        BackgroundDesc::Pure { color: Vec3::ZERO }
    }
}

fn default_white() -> Vec3 {
    Vec3::ONE
}

/// Surface behavior of a named material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialDesc {
    /// Ideal diffuse reflector.
    Lambertian { albedo: Vec3 },
    /// Mirror-like reflector; `fuzz` in [0, 1] roughens the reflection.
    Metal {
        albedo: Vec3,
        #[serde(default)]
        fuzz: f32,
    },
    /// Same as `Metal`, with `fuzz` required.
    FuzzedMetal { albedo: Vec3, fuzz: f32 },
    /// Clear refractive material with index of refraction `eta`.
    Dielectric { eta: f32 },
    /// Emits `color` and absorbs every incoming ray.
    DiffuseLight { color: Vec3 },
    /// Diffuse material with a latitude/longitude checker pattern.
    PolarChecker {
        color1: Vec3,
        #[serde(default = "default_white")]
        color2: Vec3,
        ntheta: u32,
        nphi: u32,
    },
}

impl MaterialDesc {
    /// Type tag as written in scene documents.
    pub fn kind(&self) -> &'static str {
        match self {
            MaterialDesc::Lambertian { .. } => "Lambertian",
            MaterialDesc::Metal { .. } => "Metal",
            MaterialDesc::FuzzedMetal { .. } => "FuzzedMetal",
            MaterialDesc::Dielectric { .. } => "Dielectric",
            MaterialDesc::DiffuseLight { .. } => "DiffuseLight",
            MaterialDesc::PolarChecker { .. } => "PolarChecker",
        }
    }

    /// True if surfaces with this material emit light.
    pub fn is_emissive(&self) -> bool {
        matches!(self, MaterialDesc::DiffuseLight { color } if color.max_element() > 0.0)
    }

    fn validate(&self, name: &str) -> Result<(), SceneLoadError> {
        let color_ok = |c: &Vec3| c.is_finite() && c.min_element() >= 0.0;
        let bad = |what: &str| -> Result<(), SceneLoadError> {
            Err(SceneLoadError::Invalid(format!(
                "material '{}' ({}): {}",
                name,
                self.kind(),
                what
            )))
        };

        match self {
            MaterialDesc::Lambertian { albedo } if !color_ok(albedo) => {
                bad("albedo must be finite and non-negative")
            }
            MaterialDesc::Metal { albedo, fuzz } | MaterialDesc::FuzzedMetal { albedo, fuzz } => {
                if !color_ok(albedo) {
                    bad("albedo must be finite and non-negative")
                } else if !(0.0..=1.0).contains(fuzz) {
                    bad("fuzz must be within [0, 1]")
                } else {
                    Ok(())
                }
            }
            MaterialDesc::Dielectric { eta } if !(eta.is_finite() && *eta > 0.0) => {
                bad("eta must be a positive number")
            }
            MaterialDesc::DiffuseLight { color } if !color_ok(color) => {
                bad("color must be finite and non-negative")
            }
            MaterialDesc::PolarChecker {
                color1,
                color2,
                ntheta,
                nphi,
            } => {
                if !color_ok(color1) || !color_ok(color2) {
                    bad("colors must be finite and non-negative")
                } else if *ntheta == 0 || *nphi == 0 {
                    bad("ntheta and nphi must be at least 1")
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

/// A material together with the name entities use to refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMaterial {
    pub name: String,
    #[serde(flatten)]
    pub material: MaterialDesc,
}

impl NamedMaterial {
    pub fn new(name: impl Into<String>, material: MaterialDesc) -> Self {
        Self {
            name: name.into(),
            material,
        }
    }
}

/// A piece of geometry and the name of its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        material: String,
    },
    /// Infinite plane through `point`.
    Plane {
        point: Vec3,
        normal: Vec3,
        material: String,
    },
    Triangle {
        a: Vec3,
        b: Vec3,
        c: Vec3,
        material: String,
    },
    /// Parallelogram spanned by the edges `u` and `v` from `corner`.
    Quad {
        corner: Vec3,
        u: Vec3,
        v: Vec3,
        material: String,
    },
    /// Parallelepiped with corner `a` and the three adjacent corners `b`, `c`, `d`.
    Box {
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        material: String,
    },
}

impl EntityDesc {
    /// Name of the material this entity refers to.
    pub fn material(&self) -> &str {
        match self {
            EntityDesc::Sphere { material, .. }
            | EntityDesc::Plane { material, .. }
            | EntityDesc::Triangle { material, .. }
            | EntityDesc::Quad { material, .. }
            | EntityDesc::Box { material, .. } => material,
        }
    }

    fn validate(&self, index: usize) -> Result<(), SceneLoadError> {
        let bad = |what: &str| -> Result<(), SceneLoadError> {
            Err(SceneLoadError::Invalid(format!("entity #{}: {}", index, what)))
        };

        match self {
            EntityDesc::Sphere { center, radius, .. } => {
                if !center.is_finite() {
                    bad("sphere center must be finite")
                } else if !(radius.is_finite() && *radius > 0.0) {
                    bad("sphere radius must be positive")
                } else {
                    Ok(())
                }
            }
            EntityDesc::Plane { point, normal, .. } => {
                if !point.is_finite() || !normal.is_finite() {
                    bad("plane point and normal must be finite")
                } else if normal.length_squared() == 0.0 {
                    bad("plane normal must be non-zero")
                } else {
                    Ok(())
                }
            }
            EntityDesc::Triangle { a, b, c, .. } => {
                if ![a, b, c].iter().all(|p| p.is_finite()) {
                    bad("triangle vertices must be finite")
                } else if (*b - *a).cross(*c - *a).length_squared() == 0.0 {
                    bad("triangle is degenerate")
                } else {
                    Ok(())
                }
            }
            EntityDesc::Quad { corner, u, v, .. } => {
                if ![corner, u, v].iter().all(|p| p.is_finite()) {
                    bad("quad corner and edges must be finite")
                } else if u.cross(*v).length_squared() == 0.0 {
                    bad("quad edges are parallel or zero")
                } else {
                    Ok(())
                }
            }
            EntityDesc::Box { a, b, c, d, .. } => {
                if ![a, b, c, d].iter().all(|p| p.is_finite()) {
                    bad("box corners must be finite")
                } else if (*b - *a).cross(*c - *a).dot(*d - *a) == 0.0 {
                    bad("box has zero volume")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A complete scene as read from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub background: BackgroundDesc,

    /// Optional material library merged in front of `materials`.
    /// Relative paths are resolved against the scene document's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials_path: Option<PathBuf>,

    #[serde(default)]
    pub materials: Vec<NamedMaterial>,

    #[serde(default)]
    pub entities: Vec<EntityDesc>,
}

impl SceneDescription {
    /// Find a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDesc> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.material)
    }

    /// Number of entities whose material emits light.
    pub fn emissive_entity_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| self.material(e.material()).is_some_and(|m| m.is_emissive()))
            .count()
    }

    /// Check names, references and numeric ranges.
    pub fn validate(&self) -> Result<(), SceneLoadError> {
        match self.background {
            BackgroundDesc::Pure { color } if !(color.is_finite() && color.min_element() >= 0.0) => {
                return Err(SceneLoadError::Invalid(
                    "background color must be finite and non-negative".into(),
                ));
            }
            BackgroundDesc::Blend { from, to }
                if !(from.is_finite() && to.is_finite())
                    || from.min_element() < 0.0
                    || to.min_element() < 0.0 =>
            {
                return Err(SceneLoadError::Invalid(
                    "background colors must be finite and non-negative".into(),
                ));
            }
            _ => {}
        }

        let mut names = HashSet::new();
        for named in &self.materials {
            if !names.insert(named.name.as_str()) {
                return Err(SceneLoadError::Invalid(format!(
                    "duplicate material name '{}'",
                    named.name
                )));
            }
            named.material.validate(&named.name)?;
        }

        for (index, entity) in self.entities.iter().enumerate() {
            if !names.contains(entity.material()) {
                return Err(SceneLoadError::Invalid(format!(
                    "entity #{} refers to unknown material '{}'",
                    index,
                    entity.material()
                )));
            }
            entity.validate(index)?;
        }

        Ok(())
    }
}
