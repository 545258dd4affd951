use serde::{Serialize, Deserialize};

/// Read-only view of one particle, as handed to renderers and writers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub mass: f64,
}

/// A snapshot of the simulation state and metrics at a specific tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of completed ticks when the snapshot was taken.
    pub tick: u64,
    /// Live (not yet absorbed) particles.
    pub particle_count: u32,
    /// Sum of the live particles' masses.
    pub total_mass: f64,
    /// Mass of the heaviest live particle, 0 when the environment is empty.
    pub largest_mass: f64,
    /// Sum of `mass * velocity` over live particles.
    pub total_momentum: (f64, f64),
    /// Sum of `0.5 * mass * speed^2` over live particles.
    pub kinetic_energy: f64,
    /// Merges performed since the environment was created.
    pub total_merges: u64,
    /// Per-particle states, when the run records them.
    pub particles: Option<Vec<ParticleState>>,
}
