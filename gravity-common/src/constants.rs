//! Reference values for the heuristic simulation constants.
//!
//! None of these are physical constants. They describe a toy universe tuned
//! for watchable clustering and can be overridden through [`crate::SimParams`]
//! or the `[physics]` / `[generation]` config sections.

/// Gravitational constant used by the pairwise attraction.
pub const GRAVITATIONAL_CONSTANT: f64 = 0.01;

/// Fraction of velocity kept by an absorber after a merge.
pub const ELASTICITY_COEFFICIENT: f64 = 0.5;

/// Fraction of a particle's speed travelled per tick.
pub const TIME_STEP_SCALE: f64 = 0.1;

/// Below this separation the gravitational pull between two particles is skipped.
pub const MIN_FORCE_DISTANCE: f64 = 1e-9;

/// Chance that a generated particle is a heavy attractor.
pub const HEAVY_PROBABILITY: f64 = 0.02;

/// Inclusive mass range of ordinary generated particles.
pub const LIGHT_MASS_RANGE: (u32, u32) = (1, 3);

/// Inclusive mass range of heavy generated particles.
pub const HEAVY_MASS_RANGE: (u32, u32) = (50, 100);

/// Particle count used when a configuration does not specify one.
pub const DEFAULT_PARTICLE_COUNT: u32 = 10;

// Injection presets
pub const MEDIUM_PARTICLE_RADIUS: f64 = 5.0;
pub const MEDIUM_PARTICLE_MASS: f64 = 25.0;
pub const SMALL_PARTICLE_RADIUS: f64 = 1.0;
pub const SMALL_PARTICLE_MASS: f64 = 5.0;
