//! Random scenario generation: many light bodies with the odd heavy attractor.

use crate::particle::Particle;
use anyhow::{Context, Result};
use gravity_common::{angle_to_vec, MassDistribution, SimParams};
use rand::distr::{Bernoulli, Uniform};
use rand::Rng;

/// Draws an integer mass, heavy with probability `heavy_probability`.
pub fn sample_mass<R: Rng + ?Sized>(rng: &mut R, distribution: &MassDistribution) -> Result<f64> {
    let heavy = Bernoulli::new(distribution.heavy_probability)
        .context("heavy_probability must lie within [0, 1]")?;

    let (lo, hi) = if rng.sample(heavy) {
        (distribution.heavy_mass_min, distribution.heavy_mass_max)
    } else {
        (distribution.light_mass_min, distribution.light_mass_max)
    };
    let mass_dist = Uniform::new_inclusive(lo, hi)
        .with_context(|| format!("invalid mass range [{}, {}]", lo, hi))?;

    Ok(rng.sample(mass_dist) as f64)
}

/// Creates one particle with `radius = sqrt(mass)`, placed fully inside a
/// `width` x `height` arena and moving at `initial_speed` in a random direction.
pub fn random_particle<R: Rng + ?Sized>(
    rng: &mut R,
    width: f64,
    height: f64,
    params: &SimParams,
) -> Result<Particle> {
    let mass = sample_mass(rng, &params.mass_distribution)?;
    let radius = mass.sqrt();

    let x_dist = Uniform::new_inclusive(radius, width - radius).with_context(|| {
        format!("arena width {} cannot hold a particle of radius {}", width, radius)
    })?;
    let y_dist = Uniform::new_inclusive(radius, height - radius).with_context(|| {
        format!("arena height {} cannot hold a particle of radius {}", height, radius)
    })?;
    let x = rng.sample(x_dist);
    let y = rng.sample(y_dist);

    let angle_dist = Uniform::new(0.0f64, 2.0 * std::f64::consts::PI)?;
    let heading = rng.sample(angle_dist);
    let velocity = angle_to_vec(heading, params.initial_speed);

    Ok(Particle::with_velocity(radius, (x, y), velocity, mass))
}
