pub mod config;
pub mod constants;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    SimulationConfig, UniverseConfig, TimingConfig, InitialConditions, InjectionConfig,
    ParticlePreset, PhysicsConfig, GenerationConfig, OutputConfig,
};
pub use sim_params::{SimParams, MassDistribution};
pub use snapshot::{Snapshot, ParticleState};
pub use vecmath::{Vector2, angle_to_vec};
