use crate::{Interval, Vec3};

/// Lower bound on the ray parameter for every scene query.
///
/// Secondary rays start on the surface they left; hits closer than this are
/// treated as the surface itself.
pub const SELF_INTERSECTION_EPSILON: f32 = 1e-4;

/// A ray in 3D space with origin, direction, and valid parameter range.
///
/// Rays represent the set of points `origin + t * direction` for `t` in
/// `interval`. The direction is not required to be unit length; scene
/// queries call [`Ray::normalized`] first so reported distances are
/// world-space lengths.
///
/// A ray is immutable once built. The `with_*` methods return a new ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    interval: Interval,
}

impl Ray {
    /// Create a new ray valid on `[SELF_INTERSECTION_EPSILON, +inf]`.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            interval: Interval::new(SELF_INTERSECTION_EPSILON, f32::INFINITY),
        }
    }

    /// Create a ray with an explicit parameter range.
    #[inline]
    pub fn with_interval(origin: Vec3, direction: Vec3, interval: Interval) -> Self {
        Self {
            origin,
            direction,
            interval,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the valid parameter range.
    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Same ray, limited to parameters up to `t_max`.
    #[inline]
    pub fn with_max(&self, t_max: f32) -> Self {
        Self {
            interval: self.interval.with_max(t_max),
            ..*self
        }
    }

    /// Returns the same ray with a unit-length direction.
    ///
    /// The parameter range is rescaled so that it still covers the same
    /// points along the line, except for the lower bound: the
    /// self-intersection epsilon is a distance, so it is kept as is.
    /// Returns `None` when the direction has zero (or non-finite) length.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.direction.length();
        if !(len.is_finite() && len > 0.0) {
            return None;
        }
        Some(Self {
            origin: self.origin,
            direction: self.direction / len,
            interval: Interval::new(self.interval.min, self.interval.max * len),
        })
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin(), origin);
        assert_eq!(ray.direction(), direction);
        assert_eq!(ray.interval().min, SELF_INTERSECTION_EPSILON);
        assert_eq!(ray.interval().max, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_normalized_keeps_endpoint() {
        let ray = Ray::with_interval(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), Interval::new(0.0, 3.0));
        let unit = ray.normalized().unwrap();

        assert!((unit.direction().length() - 1.0).abs() < 1e-6);
        // Far end (t = 3 with |d| = 2) lies 6 units away
        assert!((unit.at(unit.interval().max) - ray.at(3.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_normalized_rejects_zero_direction() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert!(ray.normalized().is_none());
    }

    #[test]
    fn test_ray_with_max() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y).with_max(5.0);
        assert_eq!(ray.interval().max, 5.0);
        assert_eq!(ray.interval().min, SELF_INTERSECTION_EPSILON);
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Vec3::ZERO, Vec3::Y);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1.origin(), ray2.origin());
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
