//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_f32;
use crate::Material;
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, from winding order)
    normal: Vec3,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let cross = (v1 - v0).cross(v2 - v0);
        let area = 0.5 * cross.length();
        let normal = cross.normalize_or_zero();

        // Aabb::from_points pads thin dimensions
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            v1,
            v2,
            normal,
            area,
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !Interval::UNIT.contains(u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.admits(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material, (u, v)))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn material(&self) -> Option<&dyn Material> {
        Some(&self.material)
    }

    /// Uniform area sampling converted to a solid-angle density.
    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Option<(Vec3, f32)> {
        if self.area <= 0.0 {
            return None;
        }

        let mut r1 = gen_f32(rng);
        let mut r2 = gen_f32(rng);
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        let point = self.v0 + r1 * (self.v1 - self.v0) + r2 * (self.v2 - self.v0);

        area_sample_pdf(origin, point, self.normal, self.area)
    }
}

/// Direction from `origin` to a uniformly chosen `point` on a flat emitter,
/// with the area density converted to solid angle.
pub(crate) fn area_sample_pdf(
    origin: Vec3,
    point: Vec3,
    normal: Vec3,
    area: f32,
) -> Option<(Vec3, f32)> {
    let to_point = point - origin;
    let dist_sq = to_point.length_squared();
    if dist_sq <= 0.0 {
        return None;
    }
    let direction = to_point / dist_sq.sqrt();
    let cosine = direction.dot(normal).abs();
    if cosine < 1e-6 {
        return None;
    }
    Some((direction, dist_sq / (cosine * area)))
}
