//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::{gen_f32, random_unit_vector};
use crate::Material;
use lux_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle up from -Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.admits(root) {
            root = (h + sqrtd) / a;
            if !ray_t.admits(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            &self.material,
            Self::get_sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn material(&self) -> Option<&dyn Material> {
        Some(&self.material)
    }

    /// Uniform sampling of the cone of directions subtended by the sphere.
    ///
    /// From inside the sphere every direction reaches it, so directions are
    /// drawn uniformly over the whole sphere of directions.
    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Option<(Vec3, f32)> {
        let to_center = self.center - origin;
        let dist_sq = to_center.length_squared();
        let r_sq = self.radius * self.radius;
        if dist_sq <= r_sq {
            return Some((random_unit_vector(rng), 1.0 / (4.0 * PI)));
        }

        let cos_theta_max = (1.0 - r_sq / dist_sq).max(0.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle <= 0.0 {
            return None;
        }

        let r1 = gen_f32(rng);
        let r2 = gen_f32(rng);
        let z = 1.0 + r2 * (cos_theta_max - 1.0);
        let phi = 2.0 * PI * r1;
        let sin_theta = (1.0 - z * z).max(0.0).sqrt();
        let local = Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z);

        let direction = Onb::from_w(to_center).local(local).normalize();
        Some((direction, 1.0 / solid_angle))
    }
}
