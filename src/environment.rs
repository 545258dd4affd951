use crate::generation::random_particle;
use crate::particle::{Coalescence, Particle};
use anyhow::Result;
use gravity_common::constants::{MEDIUM_PARTICLE_MASS, MEDIUM_PARTICLE_RADIUS};
use gravity_common::{ParticleState, SimParams, SimulationConfig, Snapshot};
use log::{debug, info};
use rand::prelude::*;

/// What happened during one call to [`Environment::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number after the update.
    pub tick: u64,
    /// Absorbed particles removed by the sweep at the start of the tick.
    pub swept: usize,
    /// Merges performed during the tick.
    pub merges: usize,
}

/// Owns every particle of the simulation and advances them tick by tick.
pub struct Environment {
    width: f64,
    height: f64,
    /// Live particles in insertion order, plus tombstones until the next sweep.
    particles: Vec<Particle>,
    params: SimParams,
    /// RNG for scenario generation.
    rng: StdRng,
    tick: u64,
    total_merges: u64,
}

impl Environment {
    /// Creates an empty environment. `seed` drives any later random generation.
    pub fn new(width: f64, height: f64, params: SimParams, seed: u64) -> Self {
        Environment {
            width,
            height,
            particles: Vec::new(),
            params,
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
            total_merges: 0,
        }
    }

    /// Creates an environment populated with `num_particles` random particles.
    pub fn with_particles(
        width: f64,
        height: f64,
        num_particles: usize,
        params: SimParams,
        seed: u64,
    ) -> Result<Self> {
        let mut env = Self::new(width, height, params, seed);
        env.generate_particles(num_particles)?;
        Ok(env)
    }

    /// Builds the initial environment described by a configuration.
    /// Scheduled injections are left to the driver.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let env = Self::with_particles(
            config.universe.width,
            config.universe.height,
            config.initial_conditions.num_particles_initial as usize,
            config.get_sim_params(),
            config.initial_conditions.initial_placement_seed,
        )?;
        info!(
            "Generated {} particles in a {}x{} arena (seed {}).",
            env.particle_count(),
            env.width,
            env.height,
            config.initial_conditions.initial_placement_seed
        );
        Ok(env)
    }

    /// Appends `n` randomly generated resting particles.
    pub fn generate_particles(&mut self, n: usize) -> Result<()> {
        self.particles.reserve(n);
        for _ in 0..n {
            let particle = random_particle(&mut self.rng, self.width, self.height, &self.params)?;
            self.particles.push(particle);
        }
        Ok(())
    }

    /// Injects a resting particle at `position`. `radius` and `mass` must be positive.
    pub fn add_particle(&mut self, position: (f64, f64), radius: f64, mass: f64) {
        debug!(
            "Adding particle (radius {}, mass {}) at ({:.2}, {:.2})",
            radius, mass, position.0, position.1
        );
        self.particles.push(Particle::new(radius, position, mass));
    }

    /// Injects a medium particle (radius 5, mass 25) at `position`.
    pub fn add_default_particle(&mut self, position: (f64, f64)) {
        self.add_particle(position, MEDIUM_PARTICLE_RADIUS, MEDIUM_PARTICLE_MASS);
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn total_merges(&self) -> u64 {
        self.total_merges
    }

    /// Advances the simulation by one tick.
    ///
    /// Particles absorbed during the previous tick are swept first. Then each
    /// particle in insertion order moves, and is attracted by and tries to merge
    /// with every other particle. Nothing is snapshotted, so later pairs see the
    /// state left by earlier ones.
    pub fn update(&mut self) -> TickReport {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_absorbed());
        let swept = before - self.particles.len();
        if swept > 0 {
            debug!("Tick {}: swept {} absorbed particles", self.tick, swept);
        }

        let n = self.particles.len();
        let mut merges = 0;
        for i in 0..n {
            self.particles[i].advance(&self.params);

            for j in 0..n {
                if i == j {
                    continue;
                }
                let (p, q) = pair_mut(&mut self.particles, i, j);
                p.accelerate_towards(q.position(), q.mass(), &self.params);
                if p.coalesce(q, &self.params) != Coalescence::None {
                    merges += 1;
                }
            }
        }

        self.tick += 1;
        self.total_merges += merges as u64;

        TickReport { tick: self.tick, swept, merges }
    }

    /// Live particles in insertion order. Particles absorbed this tick are skipped.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| !p.is_absorbed())
    }

    pub fn particle_count(&self) -> usize {
        self.particles().count()
    }

    pub fn particle_states(&self) -> Vec<ParticleState> {
        self.particles().map(Particle::state).collect()
    }

    /// Summarises the live particles.
    pub fn snapshot(&self, include_particles: bool) -> Snapshot {
        let mut particle_count = 0;
        let mut total_mass = 0.0;
        let mut largest_mass: f64 = 0.0;
        let mut momentum = (0.0, 0.0);
        let mut kinetic_energy = 0.0;

        for p in self.particles() {
            let velocity = p.velocity();
            particle_count += 1;
            total_mass += p.mass();
            largest_mass = largest_mass.max(p.mass());
            momentum.0 += p.mass() * velocity.x;
            momentum.1 += p.mass() * velocity.y;
            kinetic_energy += 0.5 * p.mass() * velocity.dot_product(velocity);
        }

        Snapshot {
            tick: self.tick,
            particle_count,
            total_mass,
            largest_mass,
            total_momentum: momentum,
            kinetic_energy,
            total_merges: self.total_merges,
            particles: include_particles.then(|| self.particle_states()),
        }
    }
}

/// Mutable references to two distinct elements of a slice.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravity_common::Vector2;

    fn empty(width: f64, height: f64) -> Environment {
        Environment::new(width, height, SimParams::default(), 0)
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut items = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut items, 3, 1);
        assert_eq!((*a, *b), (4, 2));
        let (a, b) = pair_mut(&mut items, 0, 2);
        *a += 10;
        *b += 10;
        assert_eq!(items, [11, 2, 13, 4]);
    }

    #[test]
    fn update_on_empty_environment_is_a_no_op() {
        let mut env = empty(100.0, 100.0);
        let report = env.update();
        assert_eq!(report, TickReport { tick: 1, swept: 0, merges: 0 });
        assert_eq!(env.particle_count(), 0);
        env.update();
        assert_eq!(env.tick(), 2);
    }

    #[test]
    fn single_particle_keeps_its_state() {
        let mut env = empty(100.0, 100.0);
        env.add_particle((10.0, 10.0), 2.0, 4.0);
        env.update();
        let p = env.particles().next().unwrap();
        assert_eq!(p.position(), (10.0, 10.0));
        assert_eq!(p.velocity().magnitude(), 0.0);
    }

    #[test]
    fn default_particle_uses_medium_preset() {
        let mut env = empty(100.0, 100.0);
        env.add_default_particle((50.0, 50.0));
        let state = env.particle_states()[0];
        assert_eq!(state, ParticleState { x: 50.0, y: 50.0, radius: 5.0, mass: 25.0 });
        assert_eq!(env.dimensions(), (100.0, 100.0));
    }

    #[test]
    fn generation_is_reproducible_per_seed() {
        let a = Environment::with_particles(800.0, 800.0, 50, SimParams::default(), 9).unwrap();
        let b = Environment::with_particles(800.0, 800.0, 50, SimParams::default(), 9).unwrap();
        let c = Environment::with_particles(800.0, 800.0, 50, SimParams::default(), 10).unwrap();
        assert_eq!(a.particle_count(), 50);
        assert_eq!(a.particle_states(), b.particle_states());
        assert_ne!(a.particle_states(), c.particle_states());
    }

    #[test]
    fn generation_appends_to_existing_particles() {
        let mut env = empty(500.0, 500.0);
        env.add_particle((1.0, 1.0), 1.0, 1.0);
        env.generate_particles(3).unwrap();
        assert_eq!(env.particle_count(), 4);
        assert_eq!(env.particle_states()[0].x, 1.0);
    }

    #[test]
    fn absorbed_particles_are_hidden_then_swept() {
        let mut env = empty(100.0, 100.0);
        env.add_particle((10.0, 10.0), 3f64.sqrt(), 3.0);
        env.add_particle((11.0, 10.0), 1.0, 1.0);

        let report = env.update();
        assert_eq!(report.merges, 1);
        assert_eq!(report.swept, 0);
        // The tombstone stays in storage until the next sweep
        assert_eq!(env.particles.len(), 2);
        assert_eq!(env.particle_count(), 1);

        let report = env.update();
        assert_eq!(report.swept, 1);
        assert_eq!(env.particles.len(), 1);
        assert_eq!(env.total_merges(), 1);
    }

    #[test]
    fn later_particles_see_positions_moved_earlier_in_the_tick() {
        let mut env = empty(1000.0, 1000.0);
        env.particles.push(Particle::with_velocity(1.0, (100.0, 500.0), Vector2::new(10.0, 0.0), 1.0));
        env.add_particle((200.0, 500.0), 1.0, 1.0);
        env.update();

        // The first particle moved to x = 101 before the second one was processed
        assert_eq!(env.particle_states()[0].x, 101.0);
        let pulled = env.particles().nth(1).unwrap().velocity();
        let expected = 0.01 / (99.0 * 99.0);
        assert!((pulled.x + expected).abs() < 1e-15, "got {}", pulled.x);
        assert!((pulled.x + 0.01 / 10_000.0).abs() > 1e-9);
    }

    #[test]
    fn snapshot_summarises_live_particles() {
        let mut env = empty(100.0, 100.0);
        env.add_particle((10.0, 10.0), 1.0, 2.0);
        env.add_particle((90.0, 90.0), 3.0, 9.0);

        let snapshot = env.snapshot(false);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.particle_count, 2);
        assert_eq!(snapshot.total_mass, 11.0);
        assert_eq!(snapshot.largest_mass, 9.0);
        assert_eq!(snapshot.kinetic_energy, 0.0);
        assert!(snapshot.particles.is_none());

        env.update();
        let snapshot = env.snapshot(true);
        assert_eq!(snapshot.tick, 1);
        assert!(snapshot.kinetic_energy > 0.0);
        // Both pulls share one magnitude, so the heavier body dominates the momentum
        let velocities: Vec<_> = env.particles().map(|p| p.velocity()).collect();
        assert!((velocities[0].x + velocities[1].x).abs() < 1e-15);
        assert!((velocities[0].y + velocities[1].y).abs() < 1e-15);
        assert!(snapshot.total_momentum.0 < 0.0);
        assert!(snapshot.total_momentum.1 < 0.0);
        assert_eq!(snapshot.particles.unwrap().len(), 2);
    }
}
