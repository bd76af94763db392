//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built by median split on the longest centroid axis. Every
//! primitive carries its scene index so that hits at equal distance
//! resolve to the lower index, whatever the tree shape.

use crate::{HitRecord, Hittable};
use lux_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// A primitive and its insertion index.
pub type IndexedPrimitive = (usize, Arc<dyn Hittable>);

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<IndexedPrimitive>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from indexed primitives.
    pub fn new(objects: Vec<IndexedPrimitive>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Create a BVH over `objects`, indexed by position.
    pub fn from_objects(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self::new(objects.into_iter().enumerate().collect())
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on longest axis,
    /// split in half, recurse.
    fn build(mut objects: Vec<IndexedPrimitive>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, o)| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, (_, obj)| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        // Stable sort with the index as tie-breaker keeps construction deterministic
        objects.sort_by(|(ia, a), (ib, b)| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        });

        let mid = n / 2;
        let right_objects = objects.split_off(mid);
        let left_objects = objects;

        let left = Self::build(left_objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<HitRecord<'a>> = None;
                for (index, obj) in objects {
                    let max = closest.as_ref().map_or(ray_t.max, |c| c.t);
                    if let Some(mut rec) = obj.hit(ray, ray_t.with_max(max)) {
                        rec.primitive = *index;
                        if rec.is_closer_than(closest.as_ref()) {
                            closest = Some(rec);
                        }
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit; an equal distance is
                // still admitted so the index tie-break can apply
                let right_max = hit_left.as_ref().map_or(ray_t.max, |r| r.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                match hit_right {
                    Some(r) if r.is_closer_than(hit_left.as_ref()) => Some(r),
                    _ => hit_left,
                }
            }
        }
    }

    fn hit_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf { objects, bbox } => {
                bbox.hit(ray, ray_t) && objects.iter().any(|(_, o)| o.hit_any(ray, ray_t))
            }
            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t) && (left.hit_any(ray, ray_t) || right.hit_any(ray, ray_t))
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Sphere};
    use lux_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sphere(center: Vec3, radius: f32) -> Sphere<Lambertian> {
        Sphere::new(center, radius, Lambertian::new(Vec3::splat(0.5)))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(bvh.hit(&ray, ray.interval()).is_none());
        assert_eq!(bvh.node_count(), 0);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let object: Arc<dyn Hittable> = Arc::new(sphere(Vec3::new(0.0, 0.0, -1.0), 0.5));
        let bvh = BvhNode::from_objects(vec![object]);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.hit(&ray, ray.interval()).is_some());
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| Arc::new(sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5)) as Arc<dyn Hittable>)
            .collect();

        let bvh = BvhNode::from_objects(spheres);
        assert!(bvh.depth() > 1);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, ray.interval()).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
        assert_eq!(rec.primitive, 5);
    }

    #[test]
    fn test_bvh_tie_prefers_lower_index() {
        // Identical spheres spread over several leaves
        let mut objects: Vec<Arc<dyn Hittable>> = (0..9)
            .map(|i| Arc::new(sphere(Vec3::new(i as f32 * 3.0, 0.0, -5.0), 1.0)) as Arc<dyn Hittable>)
            .collect();
        objects.push(Arc::new(sphere(Vec3::new(12.0, 0.0, -5.0), 1.0)));

        let bvh = BvhNode::from_objects(objects);
        let ray = Ray::new(Vec3::new(12.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, ray.interval()).unwrap();
        assert_eq!(rec.primitive, 4);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut list = HittableList::new();
        let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

        for _ in 0..64 {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-30.0..-5.0),
            );
            let radius = rng.gen_range(0.2..1.5);
            list.add(Box::new(sphere(center, radius)));
            objects.push(Arc::new(sphere(center, radius)));
        }
        let bvh = BvhNode::from_objects(objects);

        for _ in 0..500 {
            let dir = Vec3::new(
                rng.gen_range(-0.6..0.6),
                rng.gen_range(-0.6..0.6),
                -1.0,
            )
            .normalize();
            let ray = Ray::new(Vec3::ZERO, dir);

            let a = bvh.hit(&ray, ray.interval());
            let b = list.hit(&ray, ray.interval());
            match (a, b) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert_eq!(a.primitive, b.primitive);
                    assert_eq!(a.t, b.t);
                }
                _ => panic!("BVH and linear scan disagree"),
            }
            assert_eq!(
                bvh.hit_any(&ray, ray.interval()),
                list.hit_any(&ray, ray.interval())
            );
        }
    }
}
