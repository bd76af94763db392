//! Surface color lookups for diffuse materials.

use crate::Color;
use lux_math::Vec3;

/// Color as a function of surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Color),
    /// Checker pattern over `(u, v)`: `nphi` cells along `u` (longitude on a
    /// sphere) and `ntheta` cells along `v` (latitude).
    PolarChecker {
        even: Color,
        odd: Color,
        ntheta: u32,
        nphi: u32,
    },
}

impl Texture {
    /// Evaluate the texture at surface coordinates `(u, v)` of point `p`.
    pub fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        match *self {
            Texture::Solid(color) => color,
            Texture::PolarChecker {
                even,
                odd,
                ntheta,
                nphi,
            } => {
                let i = (u * nphi as f32).floor() as i64;
                let j = (v * ntheta as f32).floor() as i64;
                if (i + j).rem_euclid(2) == 0 {
                    even
                } else {
                    odd
                }
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid() {
        let t = Texture::from(Color::new(0.1, 0.2, 0.3));
        assert_eq!(t.value(0.7, 0.2, Vec3::ZERO), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_polar_checker_alternates() {
        let t = Texture::PolarChecker {
            even: Color::ZERO,
            odd: Color::ONE,
            ntheta: 4,
            nphi: 8,
        };

        // Cell (0, 0)
        assert_eq!(t.value(0.01, 0.01, Vec3::ZERO), Color::ZERO);
        // One step in phi
        assert_eq!(t.value(0.13, 0.01, Vec3::ZERO), Color::ONE);
        // One step in theta
        assert_eq!(t.value(0.01, 0.26, Vec3::ZERO), Color::ONE);
        // Diagonal neighbour has the same parity
        assert_eq!(t.value(0.13, 0.26, Vec3::ZERO), Color::ZERO);
    }
}
