//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Insertion index of the primitive in its scene
    pub primitive: usize,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        material: &'a dyn Material,
        (u, v): (f32, f32),
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
            primitive: 0,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// True if `self` should replace `other` as the nearest hit.
    ///
    /// Equal distances resolve to the lower primitive index.
    #[inline]
    pub fn is_closer_than(&self, other: Option<&HitRecord<'_>>) -> bool {
        match other {
            None => true,
            Some(o) => self.t < o.t || (self.t == o.t && self.primitive < o.primitive),
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` admitted by `ray_t` (`min < t <= max`).
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Any intersection within `ray_t`; used for shadow rays.
    fn hit_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit(ray, ray_t).is_some()
    }

    /// Get the axis-aligned bounding box of this object.
    ///
    /// Unbounded objects return [`Aabb::UNIVERSE`].
    fn bounding_box(&self) -> Aabb;

    /// Material of a single primitive; aggregates return `None`.
    fn material(&self) -> Option<&dyn Material> {
        None
    }

    /// Sample a direction from `origin` towards this object.
    ///
    /// Returns a unit direction and its probability density with respect
    /// to solid angle, or `None` when the object cannot be sampled from
    /// `origin`.
    fn sample_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Option<(Vec3, f32)> {
        None
    }
}

/// A list of hittable objects, intersected by linear scan.
///
/// Reference intersector for the BVH; hits report the index of the object
/// in the list.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for (index, object) in self.objects.iter().enumerate() {
            let max = closest.as_ref().map_or(ray_t.max, |c| c.t);
            if let Some(mut rec) = object.hit(ray, ray_t.with_max(max)) {
                rec.primitive = index;
                if rec.is_closer_than(closest.as_ref()) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    fn hit_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.objects.iter().any(|o| o.hit_any(ray, ray_t))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
