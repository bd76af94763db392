//! Path-tracing integrator.
//!
//! Traces one camera path as an explicit loop over bounces, carrying the
//! current ray and the path throughput. Optional next-event estimation
//! samples one emissive primitive at each diffuse vertex; optional Russian
//! roulette ends low-throughput paths early.

use crate::renderer::RenderSettings;
use crate::sampling::gen_f32;
use crate::{Color, HitRecord, Scene};
use lux_math::{Interval, Ray, SELF_INTERSECTION_EPSILON};
use rand::RngCore;

/// Lowest survival probability used by Russian roulette.
const MIN_SURVIVAL: f32 = 0.05;
/// Highest survival probability used by Russian roulette.
const MAX_SURVIVAL: f32 = 0.95;

/// Where a path is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Camera ray, nothing hit yet
    Tracing,
    /// Bounced at least once and still going
    Scattered,
    /// Hit a surface that did not scatter, or lost the roulette
    Absorbed,
    /// Left the scene and picked up the background
    Escaped,
    /// Reached the bounce limit
    DepthExhausted,
}

impl PathState {
    /// True once the path has stopped.
    pub fn is_terminal(self) -> bool {
        !matches!(self, PathState::Tracing | PathState::Scattered)
    }
}

/// Radiance carried back along one camera path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub radiance: Color,
    /// Terminal state of the path
    pub state: PathState,
    /// Number of scattering events
    pub bounces: u32,
}

/// Trace `ray` through `scene` and return the radiance it carries back.
pub fn trace_path(
    ray: &Ray,
    scene: &Scene,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> PathSample {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut radiance = Color::ZERO;
    let mut depth = 0;
    let mut state = PathState::Tracing;
    // Lights were sampled directly at the previous vertex
    let mut lights_sampled = false;

    while !state.is_terminal() {
        let Some(rec) = scene.intersect(&ray) else {
            radiance += throughput * scene.background_color(ray.direction());
            state = PathState::Escaped;
            break;
        };

        // Emitters in the light list were already counted by the previous
        // vertex; everything else still has to be picked up here
        if !(lights_sampled && scene.is_light(rec.primitive)) {
            radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);
        }

        let Some(scatter) = rec.material.scatter(&ray, &rec, rng) else {
            state = PathState::Absorbed;
            break;
        };

        let properties = rec.material.properties();
        lights_sampled = false;
        if settings.next_event_estimation
            && scene.light_count() > 0
            && properties.can_use_nee
            && !properties.is_pure_specular
        {
            radiance += throughput * sample_one_light(scene, &rec, rng);
            lights_sampled = true;
        }

        throughput *= scatter.attenuation;
        ray = scatter.scattered;
        depth += 1;
        state = PathState::Scattered;

        if depth >= settings.max_depth {
            state = PathState::DepthExhausted;
            break;
        }

        if let Some(rr_depth) = settings.russian_roulette_depth {
            if depth >= rr_depth {
                let survival = throughput.max_element().clamp(MIN_SURVIVAL, MAX_SURVIVAL);
                if gen_f32(rng) >= survival {
                    state = PathState::Absorbed;
                    break;
                }
                throughput /= survival;
            }
        }
    }

    PathSample {
        radiance,
        state,
        bounces: depth,
    }
}

/// Direct light from one uniformly chosen emissive primitive.
fn sample_one_light(scene: &Scene, rec: &HitRecord, rng: &mut dyn RngCore) -> Color {
    let lights = scene.lights();
    let pick = ((gen_f32(rng) * lights.len() as f32) as usize).min(lights.len() - 1);
    let light_index = lights[pick];

    let Some(light) = scene.primitive(light_index) else {
        return Color::ZERO;
    };
    let Some((direction, pdf)) = light.sample_direction(rec.p, rng) else {
        return Color::ZERO;
    };
    if !(pdf.is_finite() && pdf > 0.0) {
        return Color::ZERO;
    }

    let cosine = direction.dot(rec.normal);
    if cosine <= 0.0 {
        return Color::ZERO;
    }

    let Some(light_rec) = scene.hit_light(light_index, rec.p, direction) else {
        return Color::ZERO;
    };

    // Stop just short of the light so it does not shadow itself
    let shadow = Ray::with_interval(
        rec.p,
        direction,
        Interval::new(SELF_INTERSECTION_EPSILON, light_rec.t * (1.0 - 1e-4)),
    );
    if scene.occluded(&shadow) {
        return Color::ZERO;
    }

    let emitted = light_rec
        .material
        .emitted(light_rec.u, light_rec.v, light_rec.p);
    let brdf = rec.material.brdf(rec, direction);

    brdf * emitted * cosine * lights.len() as f32 / pdf
}
