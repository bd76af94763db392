//! Infinite plane primitive.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use lux_math::{Aabb, Interval, Onb, Ray, Vec3};

/// The plane through `point` perpendicular to `normal`.
///
/// Unbounded: its bounding box is [`Aabb::UNIVERSE`] and scenes keep it out
/// of the BVH. Surface coordinates repeat every unit along the plane.
pub struct Plane<M: Material> {
    point: Vec3,
    normal: Vec3,
    basis: Onb,
    material: M,
}

impl<M: Material> Plane<M> {
    pub fn new(point: Vec3, normal: Vec3, material: M) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            point,
            normal,
            basis: Onb::from_w(normal),
            material,
        }
    }
}

impl<M: Material + 'static> Hittable for Plane<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = self.normal.dot(self.point - ray.origin()) / denom;
        if !ray_t.admits(t) {
            return None;
        }

        let offset = ray.at(t) - self.point;
        let uv = (
            offset.dot(self.basis.u).rem_euclid(1.0),
            offset.dot(self.basis.v).rem_euclid(1.0),
        );
        Some(HitRecord::new(ray, t, self.normal, &self.material, uv))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }

    fn material(&self) -> Option<&dyn Material> {
        Some(&self.material)
    }
}
