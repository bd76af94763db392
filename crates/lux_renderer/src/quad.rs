//! Parallelogram primitive and boxes built from it.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_f32;
use crate::triangle::area_sample_pdf;
use crate::Material;
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Parallelogram with corner `q` and edges `u` and `v`.
///
/// The outward normal is `u × v`; surface coordinates are the fractions
/// along `u` and `v`.
pub struct Quad<M: Material> {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n · n)` with `n = u × v`, for planar coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal · q`
    d: f32,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let n_sq = n.length_squared();
        let w = if n_sq > 0.0 { n / n_sq } else { Vec3::ZERO };

        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
            area: n_sq.sqrt(),
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

impl<M: Material + 'static> Hittable for Quad<M> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.admits(t) {
            return None;
        }

        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));
        if !Interval::UNIT.contains(alpha) || !Interval::UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material, (alpha, beta)))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn material(&self) -> Option<&dyn Material> {
        Some(&self.material)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Option<(Vec3, f32)> {
        if self.area <= 0.0 {
            return None;
        }
        let point = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        area_sample_pdf(origin, point, self.normal, self.area)
    }
}

/// The six faces of the parallelepiped with corner `a` and adjacent
/// corners `b`, `c` and `d`.
///
/// Face normals point out of the solid, so refractive boxes see
/// consistent inside/outside transitions.
pub fn make_box<M: Material + Clone>(a: Vec3, b: Vec3, c: Vec3, d: Vec3, material: M) -> Vec<Quad<M>> {
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let center = a + 0.5 * (ab + ac + ad);

    // (corner, edge, edge) for the three faces at `a` and their opposites
    let faces = [
        (a, ab, ac),
        (a, ab, ad),
        (a, ac, ad),
        (d, ab, ac),
        (c, ab, ad),
        (b, ac, ad),
    ];

    faces
        .into_iter()
        .map(|(corner, e1, e2)| {
            let face_center = corner + 0.5 * (e1 + e2);
            if e1.cross(e2).dot(face_center - center) < 0.0 {
                Quad::new(corner, e2, e1, material.clone())
            } else {
                Quad::new(corner, e1, e2, material.clone())
            }
        })
        .collect()
}
