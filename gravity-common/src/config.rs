use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::constants::*;
use crate::sim_params::{MassDistribution, SimParams};
use std::path::Path;

// Size of the simulated arena
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    pub width: f64,
    pub height: f64,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_ticks: u64,
    pub record_interval_ticks: u64,
}

/// Spawn presets offered to the driver, mirroring the two click actions of an interactive front end.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParticlePreset {
    Medium,
    Small,
}

impl ParticlePreset {
    pub fn radius(self) -> f64 {
        match self {
            ParticlePreset::Medium => MEDIUM_PARTICLE_RADIUS,
            ParticlePreset::Small => SMALL_PARTICLE_RADIUS,
        }
    }

    pub fn mass(self) -> f64 {
        match self {
            ParticlePreset::Medium => MEDIUM_PARTICLE_MASS,
            ParticlePreset::Small => SMALL_PARTICLE_MASS,
        }
    }
}

/// A particle added by the driver once the simulation reaches `at_tick`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InjectionConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub at_tick: u64,
    #[serde(default)]
    pub preset: Option<ParticlePreset>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub mass: Option<f64>,
}

impl InjectionConfig {
    /// Explicit radius and mass win over the preset; without either the medium preset is used.
    pub fn radius_and_mass(&self) -> (f64, f64) {
        match (self.radius, self.mass) {
            (Some(radius), Some(mass)) => (radius, mass),
            _ => {
                let preset = self.preset.unwrap_or(ParticlePreset::Medium);
                (preset.radius(), preset.mass())
            }
        }
    }
}

// Initial conditions for the simulation, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    #[serde(default = "default_particle_count")]
    pub num_particles_initial: u32,
    pub initial_placement_seed: u64,
    #[serde(default)]
    pub initial_speed: f64,
    #[serde(default)]
    pub injections: Vec<InjectionConfig>,
}

fn default_particle_count() -> u32 {
    DEFAULT_PARTICLE_COUNT
}

// Tunable physics constants, every field falls back to the reference value
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    #[serde(default = "default_elasticity_coefficient")]
    pub elasticity_coefficient: f64,
    #[serde(default = "default_time_step_scale")]
    pub time_step_scale: f64,
    #[serde(default = "default_min_force_distance")]
    pub min_force_distance: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            elasticity_coefficient: ELASTICITY_COEFFICIENT,
            time_step_scale: TIME_STEP_SCALE,
            min_force_distance: MIN_FORCE_DISTANCE,
        }
    }
}

fn default_gravitational_constant() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_elasticity_coefficient() -> f64 {
    ELASTICITY_COEFFICIENT
}

fn default_time_step_scale() -> f64 {
    TIME_STEP_SCALE
}

fn default_min_force_distance() -> f64 {
    MIN_FORCE_DISTANCE
}

// Mass distribution of randomly generated particles
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_heavy_probability")]
    pub heavy_probability: f64,
    #[serde(default = "default_light_mass_min")]
    pub light_mass_min: u32,
    #[serde(default = "default_light_mass_max")]
    pub light_mass_max: u32,
    #[serde(default = "default_heavy_mass_min")]
    pub heavy_mass_min: u32,
    #[serde(default = "default_heavy_mass_max")]
    pub heavy_mass_max: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            heavy_probability: HEAVY_PROBABILITY,
            light_mass_min: LIGHT_MASS_RANGE.0,
            light_mass_max: LIGHT_MASS_RANGE.1,
            heavy_mass_min: HEAVY_MASS_RANGE.0,
            heavy_mass_max: HEAVY_MASS_RANGE.1,
        }
    }
}

fn default_heavy_probability() -> f64 {
    HEAVY_PROBABILITY
}

fn default_light_mass_min() -> u32 {
    LIGHT_MASS_RANGE.0
}

fn default_light_mass_max() -> u32 {
    LIGHT_MASS_RANGE.1
}

fn default_heavy_mass_min() -> u32 {
    HEAVY_MASS_RANGE.0
}

fn default_heavy_mass_max() -> u32 {
    HEAVY_MASS_RANGE.1
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    #[serde(default)]
    pub save_particles_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub universe: UniverseConfig,
    pub timing: TimingConfig,
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.universe.width > 0.0 && self.universe.height > 0.0) {
            anyhow::bail!("universe width and height must be positive.");
        }

        let physics = &self.physics;
        if !(physics.gravitational_constant > 0.0) {
            anyhow::bail!("gravitational_constant must be positive.");
        }
        if !(0.0..=1.0).contains(&physics.elasticity_coefficient) {
            anyhow::bail!("elasticity_coefficient must lie within [0, 1].");
        }
        if !(physics.time_step_scale > 0.0) {
            anyhow::bail!("time_step_scale must be positive.");
        }
        if !(physics.min_force_distance > 0.0) {
            anyhow::bail!("min_force_distance must be positive.");
        }

        let generation = &self.generation;
        if !(0.0..=1.0).contains(&generation.heavy_probability) {
            anyhow::bail!("heavy_probability must lie within [0, 1].");
        }
        if generation.light_mass_min == 0 || generation.heavy_mass_min == 0 {
            anyhow::bail!("generated particle masses must be at least 1.");
        }
        if generation.light_mass_min > generation.light_mass_max {
            anyhow::bail!(
                "light mass range [{}, {}] is empty.",
                generation.light_mass_min, generation.light_mass_max
            );
        }
        if generation.heavy_mass_min > generation.heavy_mass_max {
            anyhow::bail!(
                "heavy mass range [{}, {}] is empty.",
                generation.heavy_mass_min, generation.heavy_mass_max
            );
        }

        if !(self.initial_conditions.initial_speed >= 0.0) {
            anyhow::bail!("initial_speed must not be negative.");
        }
        for (i, injection) in self.initial_conditions.injections.iter().enumerate() {
            if injection.radius.is_some() != injection.mass.is_some() {
                anyhow::bail!("injection #{} must set both radius and mass, or neither.", i);
            }
            let (radius, mass) = injection.radius_and_mass();
            if !(radius > 0.0 && mass > 0.0) {
                anyhow::bail!("injection #{} needs a positive radius and mass.", i);
            }
        }

        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            gravitational_constant: self.physics.gravitational_constant,
            elasticity_coefficient: self.physics.elasticity_coefficient,
            time_step_scale: self.physics.time_step_scale,
            min_force_distance: self.physics.min_force_distance,
            initial_speed: self.initial_conditions.initial_speed,
            mass_distribution: MassDistribution {
                heavy_probability: self.generation.heavy_probability,
                light_mass_min: self.generation.light_mass_min,
                light_mass_max: self.generation.light_mass_max,
                heavy_mass_min: self.generation.heavy_mass_min,
                heavy_mass_max: self.generation.heavy_mass_max,
            },
        }
    }
}
