//! Renderable scene: primitives, lights, background and the BVH over them.

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::quad::make_box;
use crate::{BvhNode, Plane, Quad, Sphere, Texture, Triangle};
use lux_core::{BackgroundDesc, EntityDesc, MaterialDesc, SceneDescription, SceneLoadError};
use lux_math::{Interval, Ray, Vec3};
use std::collections::HashMap;
use std::sync::Arc;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// A single color in every direction.
    Pure(Color),
    /// Vertical gradient from `from` (looking down) to `to` (looking up).
    Blend { from: Color, to: Color },
}

impl Background {
    /// Background radiance along `direction`.
    pub fn color(&self, direction: Vec3) -> Color {
        match *self {
            Background::Pure(color) => color,
            Background::Blend { from, to } => {
                let unit_direction = direction.normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                from * (1.0 - a) + to * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Pure(Color::ZERO)
    }
}

impl From<BackgroundDesc> for Background {
    fn from(desc: BackgroundDesc) -> Self {
        match desc {
            BackgroundDesc::Pure { color } => Background::Pure(color),
            BackgroundDesc::Blend { from, to } => Background::Blend { from, to },
        }
    }
}

/// Immutable scene shared by all render workers.
///
/// Primitives keep their insertion order; that index is reported in hit
/// records and breaks ties between hits at the same distance.
pub struct Scene {
    primitives: Vec<Arc<dyn Hittable>>,
    bvh: BvhNode,
    /// Primitives without a finite bounding box, tested linearly
    unbounded: Vec<usize>,
    /// Bounded primitives whose material emits light, in index order
    lights: Vec<usize>,
    background: Background,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Instantiate materials and primitives from a validated description.
    pub fn from_description(desc: &SceneDescription) -> Result<Scene, SceneLoadError> {
        desc.validate()?;

        let materials: HashMap<&str, Arc<dyn Material>> = desc
            .materials
            .iter()
            .map(|m| (m.name.as_str(), build_material(&m.material)))
            .collect();

        let mut builder = Scene::builder().background(desc.background.into());

        for (index, entity) in desc.entities.iter().enumerate() {
            let material = materials.get(entity.material()).cloned().ok_or_else(|| {
                SceneLoadError::Invalid(format!(
                    "entity #{} refers to unknown material '{}'",
                    index,
                    entity.material()
                ))
            })?;

            builder = match *entity {
                EntityDesc::Sphere { center, radius, .. } => {
                    builder.add(Sphere::new(center, radius, material))
                }
                EntityDesc::Plane { point, normal, .. } => {
                    builder.add(Plane::new(point, normal, material))
                }
                EntityDesc::Triangle { a, b, c, .. } => {
                    builder.add(Triangle::new(a, b, c, material))
                }
                EntityDesc::Quad { corner, u, v, .. } => {
                    builder.add(Quad::new(corner, u, v, material))
                }
                EntityDesc::Box { a, b, c, d, .. } => make_box(a, b, c, d, material)
                    .into_iter()
                    .fold(builder, |builder, face| builder.add(face)),
            };
        }

        Ok(builder.build())
    }

    /// Closest hit along `ray` within its interval.
    ///
    /// The ray is normalized first, so `t` in the returned record is a
    /// world-space distance.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let ray = ray.normalized()?;
        let ray_t = ray.interval();

        let mut closest = self.bvh.hit(&ray, ray_t);
        for &index in &self.unbounded {
            let max = closest.as_ref().map_or(ray_t.max, |c| c.t);
            if let Some(mut rec) = self.primitives[index].hit(&ray, ray_t.with_max(max)) {
                rec.primitive = index;
                if rec.is_closer_than(closest.as_ref()) {
                    closest = Some(rec);
                }
            }
        }
        closest
    }

    /// True if anything blocks `ray` within its interval.
    pub fn occluded(&self, ray: &Ray) -> bool {
        let Some(ray) = ray.normalized() else {
            return false;
        };
        let ray_t = ray.interval();
        self.bvh.hit_any(&ray, ray_t)
            || self
                .unbounded
                .iter()
                .any(|&i| self.primitives[i].hit_any(&ray, ray_t))
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Background radiance for a ray leaving the scene along `direction`.
    pub fn background_color(&self, direction: Vec3) -> Color {
        self.background.color(direction)
    }

    pub fn primitive(&self, index: usize) -> Option<&dyn Hittable> {
        self.primitives.get(index).map(|p| p.as_ref())
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Indices of the emissive primitives that can be sampled directly.
    ///
    /// Unbounded emitters such as planes are left out; they only
    /// contribute when a path hits them.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    /// True if primitive `index` is in [`Scene::lights`].
    pub fn is_light(&self, index: usize) -> bool {
        self.lights.binary_search(&index).is_ok()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// True if nothing but the background can be seen.
    pub fn is_degenerate(&self) -> bool {
        self.primitives.is_empty() && self.lights.is_empty()
    }

    /// Hit `light` along `direction` from `origin`, ignoring other primitives.
    pub(crate) fn hit_light(&self, light: usize, origin: Vec3, direction: Vec3) -> Option<HitRecord<'_>> {
        let ray = Ray::new(origin, direction).normalized()?;
        let mut rec = self.primitives.get(light)?.hit(&ray, ray.interval())?;
        rec.primitive = light;
        Some(rec)
    }
}

/// Programmatic scene construction.
#[derive(Default)]
pub struct SceneBuilder {
    primitives: Vec<Arc<dyn Hittable>>,
    background: Background,
}

impl SceneBuilder {
    /// Add a primitive; its index is the number of primitives added before it.
    pub fn add<H: Hittable + 'static>(self, primitive: H) -> Self {
        self.add_shared(Arc::new(primitive))
    }

    pub fn add_shared(mut self, primitive: Arc<dyn Hittable>) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Collect lights and build the BVH.
    pub fn build(self) -> Scene {
        let mut bounded = Vec::new();
        let mut unbounded = Vec::new();
        let mut lights = Vec::new();

        for (index, primitive) in self.primitives.iter().enumerate() {
            let is_bounded = primitive.bounding_box().is_finite();
            if is_bounded {
                bounded.push((index, Arc::clone(primitive)));
            } else {
                unbounded.push(index);
            }
            if is_bounded
                && primitive
                    .material()
                    .is_some_and(|m| m.properties().is_emissive)
            {
                lights.push(index);
            }
        }

        let bvh = BvhNode::new(bounded);
        log::debug!(
            "Built BVH: {} nodes, depth {}, {} unbounded primitives",
            bvh.node_count(),
            bvh.depth(),
            unbounded.len()
        );
        log::info!(
            "Scene ready: {} primitives, {} lights",
            self.primitives.len(),
            lights.len()
        );

        Scene {
            primitives: self.primitives,
            bvh,
            unbounded,
            lights,
            background: self.background,
        }
    }
}

/// Turn a material description into a shareable material.
pub fn build_material(desc: &MaterialDesc) -> Arc<dyn Material> {
    match *desc {
        MaterialDesc::Lambertian { albedo } => Arc::new(Lambertian::new(albedo)),
        MaterialDesc::Metal { albedo, fuzz } | MaterialDesc::FuzzedMetal { albedo, fuzz } => {
            Arc::new(Metal::new(albedo, fuzz))
        }
        MaterialDesc::Dielectric { eta } => Arc::new(Dielectric::new(eta)),
        MaterialDesc::DiffuseLight { color } => Arc::new(DiffuseLight::new(color)),
        MaterialDesc::PolarChecker {
            color1,
            color2,
            ntheta,
            nphi,
        } => Arc::new(Lambertian::textured(Texture::PolarChecker {
            even: color1,
            odd: color2,
            ntheta,
            nphi,
        })),
    }
}
