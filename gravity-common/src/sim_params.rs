use serde::{Deserialize, Serialize};
use crate::constants::*;

/// Bimodal mass distribution for randomly generated particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassDistribution {
    pub heavy_probability: f64,
    pub light_mass_min: u32,
    pub light_mass_max: u32,
    pub heavy_mass_min: u32,
    pub heavy_mass_max: u32,
}

impl Default for MassDistribution {
    fn default() -> Self {
        MassDistribution {
            heavy_probability: HEAVY_PROBABILITY,
            light_mass_min: LIGHT_MASS_RANGE.0,
            light_mass_max: LIGHT_MASS_RANGE.1,
            heavy_mass_min: HEAVY_MASS_RANGE.0,
            heavy_mass_max: HEAVY_MASS_RANGE.1,
        }
    }
}

/// Simulation parameters derived from the configuration, read on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // Physics
    pub gravitational_constant: f64,
    pub elasticity_coefficient: f64,
    pub time_step_scale: f64, // Fraction of speed travelled per tick
    pub min_force_distance: f64, // Pairs closer than this exert no force

    // Scenario generation
    pub initial_speed: f64,
    pub mass_distribution: MassDistribution,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            elasticity_coefficient: ELASTICITY_COEFFICIENT,
            time_step_scale: TIME_STEP_SCALE,
            min_force_distance: MIN_FORCE_DISTANCE,
            initial_speed: 0.0,
            mass_distribution: MassDistribution::default(),
        }
    }
}
