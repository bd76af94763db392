//! Random sampling helpers.
//!
//! Every random decision in the renderer draws from an explicit generator.
//! Each (pixel, sample) pair gets its own `ChaCha8Rng` seeded from
//! [`sample_seed`], so images do not depend on thread scheduling.

use lux_math::{Vec2, Vec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Map a point of the unit square onto the unit disk.
///
/// Polar mapping: radius `sqrt(u)`, angle `2πv`. Uniform input gives a
/// uniform distribution over the disk.
#[inline]
pub fn square_to_disk(sample: Vec2) -> Vec2 {
    let r = sample.x.sqrt();
    let theta = 2.0 * PI * sample.y;
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Two uniform floats in `[0, 1)`.
#[inline]
pub fn sample_square(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

/// Seed for the generator of sample `s` of pixel `(x, y)`.
///
/// The coordinates are folded into the base seed and the result is run
/// through the splitmix64 finalizer.
pub fn sample_seed(seed: u64, x: u32, y: u32, s: u32) -> u64 {
    let mut v = seed
        ^ (x as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (y as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f).rotate_left(21)
        ^ (s as u64).wrapping_mul(0x1656_67b1_9e37_79f9).rotate_left(42);
    v = v.wrapping_add(0x9e37_79b9_7f4a_7c15);
    v = (v ^ (v >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    v = (v ^ (v >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    v ^ (v >> 31)
}

/// Generator for sample `s` of pixel `(x, y)`.
pub fn sample_rng(seed: u64, x: u32, y: u32, s: u32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(sample_seed(seed, x, y, s))
}
