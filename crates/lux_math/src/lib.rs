// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod interval;
mod onb;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::{Ray, SELF_INTERSECTION_EPSILON};
