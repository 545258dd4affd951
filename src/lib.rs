//! Brute-force 2D gravitational N-body simulation with coalescing collisions.
//!
//! [`Environment`] owns the particles and advances them one tick per
//! [`Environment::update`] call; front ends read [`Environment::particles`]
//! after each tick to draw them.

pub mod environment;
pub mod generation;
pub mod output;
pub mod particle;

pub use environment::{Environment, TickReport};
pub use particle::{Coalescence, Particle};
