use gravity_common::{angle_to_vec, ParticleState, SimParams, Vector2};
use log::trace;

/// Result of [`Particle::coalesce`], telling which side (if any) was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalescence {
    /// The particles do not overlap, or one of them is already absorbed.
    None,
    /// `self` was at least as heavy and absorbed the other particle.
    AbsorbedOther,
    /// The other particle was heavier and absorbed `self`.
    AbsorbedBySelf,
}

/// A movable, massive, circular body.
///
/// The velocity is only ever changed by the particle's own operations:
/// motion, gravitational acceleration and merging.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    radius: f64,
    x: f64,
    y: f64,
    mass: f64,
    velocity: Vector2,
    absorbed: bool,
}

impl Particle {
    /// Creates a resting particle. The radius is taken as given and is not derived from the mass.
    ///
    /// Both `radius` and `mass` must be positive; merges divide by the combined mass.
    pub fn new(radius: f64, position: (f64, f64), mass: f64) -> Self {
        Self::with_velocity(radius, position, Vector2::zero(), mass)
    }

    /// Creates a particle with an initial velocity. Same preconditions as [`Particle::new`].
    pub fn with_velocity(radius: f64, position: (f64, f64), velocity: Vector2, mass: f64) -> Self {
        debug_assert!(radius > 0.0, "particle radius must be positive, got {}", radius);
        debug_assert!(mass > 0.0, "particle mass must be positive, got {}", mass);
        Particle {
            radius,
            x: position.0,
            y: position.1,
            mass,
            velocity,
            absorbed: false,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Copy of the current velocity.
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn is_absorbed(&self) -> bool {
        self.absorbed
    }

    pub fn state(&self) -> ParticleState {
        ParticleState { x: self.x, y: self.y, radius: self.radius, mass: self.mass }
    }

    /// Moves the particle one tick along its velocity, covering `speed * time_step_scale`.
    pub fn advance(&mut self, params: &SimParams) {
        let angle = self.velocity.angle();
        let distance = self.velocity.magnitude() * params.time_step_scale;

        self.x += distance * angle.cos();
        self.y += distance * angle.sin();
    }

    /// Pulls the particle towards a point holding `target_mass`.
    ///
    /// `F = G * m * target_mass / r^2` is added to the velocity along the line
    /// to the target. Targets closer than `min_force_distance`, or at the very
    /// same point, are ignored.
    pub fn accelerate_towards(&mut self, target: (f64, f64), target_mass: f64, params: &SimParams) {
        let dx = target.0 - self.x;
        let dy = target.1 - self.y;
        let dist = dx.hypot(dy);

        if dist == 0.0 || dist < params.min_force_distance {
            trace!("Skipping force between coincident points at ({:.3}, {:.3})", self.x, self.y);
            return;
        }

        let angle = dy.atan2(dx);
        let force = (params.gravitational_constant * self.mass * target_mass) / (dist * dist);

        self.velocity = self.velocity + Vector2::new(angle.cos() * force, angle.sin() * force);
    }

    /// Distance from the particle's center to a point.
    pub fn distance_from(&self, point: (f64, f64)) -> f64 {
        (point.0 - self.x).hypot(point.1 - self.y)
    }

    pub fn is_colliding_with(&self, other: &Particle) -> bool {
        self.distance_from(other.position()) < self.radius + other.radius
    }

    /// Merges two overlapping particles into the heavier one (`self` on ties).
    ///
    /// The absorber moves to the mass-weighted center, picks up the absorbed
    /// particle's mass-weighted velocity, loses energy through the elasticity
    /// coefficient and takes on the combined mass with `radius = sqrt(mass)`.
    /// The absorbed particle is only flagged; the sweep at the start of the next
    /// tick removes it.
    pub fn coalesce(&mut self, other: &mut Particle, params: &SimParams) -> Coalescence {
        if self.absorbed || other.absorbed || !self.is_colliding_with(other) {
            return Coalescence::None;
        }

        if self.mass >= other.mass {
            absorb(self, other, params.elasticity_coefficient);
            Coalescence::AbsorbedOther
        } else {
            absorb(other, self, params.elasticity_coefficient);
            Coalescence::AbsorbedBySelf
        }
    }
}

fn absorb(absorber: &mut Particle, absorbed: &mut Particle, elasticity_coefficient: f64) {
    let total_mass = absorber.mass + absorbed.mass;

    absorber.x = (absorber.x * absorber.mass + absorbed.x * absorbed.mass) / total_mass;
    absorber.y = (absorber.y * absorber.mass + absorbed.y * absorbed.mass) / total_mass;

    // The lighter body only nudges the absorber's heading
    let weighted_speed = (absorbed.velocity.magnitude() * absorbed.mass) / total_mass;
    let nudge = angle_to_vec(absorbed.velocity.angle(), weighted_speed);
    absorber.velocity = (absorber.velocity + nudge) * elasticity_coefficient;

    absorber.mass = total_mass;
    absorber.radius = total_mass.sqrt();
    absorbed.absorbed = true;

    trace!(
        "Merged particle of mass {} into ({:.3}, {:.3}), new mass {}",
        absorbed.mass, absorber.x, absorber.y, total_mass
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn params() -> SimParams {
        SimParams::default()
    }

    #[test]
    fn advance_moves_a_tenth_of_the_velocity() {
        let mut p = Particle::with_velocity(1.0, (10.0, 20.0), Vector2::new(3.0, 4.0), 1.0);
        p.advance(&params());
        let (x, y) = p.position();
        assert!((x - 10.3).abs() < EPS);
        assert!((y - 20.4).abs() < EPS);
        assert_eq!(p.velocity(), Vector2::new(3.0, 4.0));
    }

    #[test]
    fn resting_particle_does_not_move() {
        let mut p = Particle::new(1.0, (5.0, 5.0), 1.0);
        p.advance(&params());
        assert_eq!(p.position(), (5.0, 5.0));
    }

    #[test]
    fn gravity_follows_inverse_square_law() {
        let mut p = Particle::new(1.0, (0.0, 0.0), 2.0);
        p.accelerate_towards((3.0, 4.0), 5.0, &params());
        // F = 0.01 * 2 * 5 / 25 along (0.6, 0.8)
        let v = p.velocity();
        assert!((v.x - 0.0024).abs() < EPS);
        assert!((v.y - 0.0032).abs() < EPS);

        let mut near = Particle::new(1.0, (0.0, 0.0), 1.0);
        let mut far = Particle::new(1.0, (0.0, 0.0), 1.0);
        near.accelerate_towards((10.0, 0.0), 1.0, &params());
        far.accelerate_towards((20.0, 0.0), 1.0, &params());
        let ratio = near.velocity().magnitude() / far.velocity().magnitude();
        assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
    }

    #[test]
    fn gravitational_constant_is_tunable() {
        let strong = SimParams { gravitational_constant: 1.0, ..SimParams::default() };
        let mut p = Particle::new(1.0, (0.0, 0.0), 1.0);
        p.accelerate_towards((0.0, -2.0), 4.0, &strong);
        assert!(p.velocity().x.abs() < EPS);
        assert!((p.velocity().y + 1.0).abs() < EPS);
    }

    #[test]
    fn coincident_points_exert_no_force() {
        let mut p = Particle::with_velocity(1.0, (1.0, 1.0), Vector2::new(0.5, 0.0), 1.0);
        p.accelerate_towards((1.0, 1.0), 100.0, &params());
        assert_eq!(p.velocity(), Vector2::new(0.5, 0.0));
        assert!(p.velocity().x.is_finite());
    }

    #[test]
    fn coincident_points_exert_no_force_without_epsilon() {
        let unguarded = SimParams { min_force_distance: 0.0, ..SimParams::default() };
        let mut p = Particle::new(1.0, (50.0, 50.0), 1.0);
        p.accelerate_towards((50.0, 50.0), 1.0, &unguarded);
        assert_eq!(p.velocity(), Vector2::zero());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mass must be positive")]
    fn zero_mass_is_rejected() {
        Particle::new(1.0, (0.0, 0.0), 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "radius must be positive")]
    fn negative_radius_is_rejected() {
        Particle::new(-1.0, (0.0, 0.0), 1.0);
    }

    #[test]
    fn collision_requires_overlap() {
        let a = Particle::new(1.0, (0.0, 0.0), 1.0);
        let touching = Particle::new(1.0, (2.0, 0.0), 1.0);
        let overlapping = Particle::new(1.0, (1.5, 0.0), 1.0);
        assert_eq!(a.distance_from((3.0, 4.0)), 5.0);
        assert!(!a.is_colliding_with(&touching));
        assert!(a.is_colliding_with(&overlapping));
    }

    #[test]
    fn heavier_particle_absorbs_lighter() {
        let mut heavy =
            Particle::with_velocity(3f64.sqrt(), (0.0, 0.0), Vector2::new(1.0, 0.0), 3.0);
        let mut light = Particle::with_velocity(1.0, (1.0, 2.0), Vector2::new(0.0, 2.0), 1.0);
        let light_before = light.clone();

        assert_eq!(heavy.coalesce(&mut light, &params()), Coalescence::AbsorbedOther);

        assert_eq!(heavy.mass(), 4.0);
        assert_eq!(heavy.radius(), 2.0);
        let (x, y) = heavy.position();
        assert!((x - 0.25).abs() < EPS);
        assert!((y - 0.5).abs() < EPS);
        // (1, 0) + (0, 2 * 1/4), then halved
        let v = heavy.velocity();
        assert!((v.x - 0.5).abs() < EPS);
        assert!((v.y - 0.25).abs() < EPS);

        assert!(light.is_absorbed());
        assert_eq!(light.position(), light_before.position());
        assert_eq!(light.velocity(), light_before.velocity());
        assert_eq!(light.mass(), light_before.mass());
    }

    #[test]
    fn lighter_self_is_absorbed_by_other() {
        let mut light = Particle::new(1.0, (0.0, 0.0), 2.0);
        let mut heavy = Particle::new(3.0, (1.0, 0.0), 7.0);

        assert_eq!(light.coalesce(&mut heavy, &params()), Coalescence::AbsorbedBySelf);

        assert!(light.is_absorbed());
        assert!(!heavy.is_absorbed());
        assert_eq!(heavy.mass(), 9.0);
        assert_eq!(heavy.radius(), 3.0);
        assert!((heavy.position().0 - 7.0 / 9.0).abs() < EPS);
    }

    #[test]
    fn equal_masses_favor_self() {
        let mut a = Particle::new(1.0, (0.0, 0.0), 1.0);
        let mut b = Particle::new(1.0, (0.5, 0.0), 1.0);
        assert_eq!(a.coalesce(&mut b, &params()), Coalescence::AbsorbedOther);
        assert!(b.is_absorbed());
        assert_eq!(a.mass(), 2.0);
        assert_eq!(a.radius(), 2f64.sqrt());
    }

    #[test]
    fn separated_particles_are_left_untouched() {
        let mut a = Particle::with_velocity(1.0, (0.0, 0.0), Vector2::new(1.0, 1.0), 3.0);
        let mut b = Particle::with_velocity(1.0, (5.0, 0.0), Vector2::new(-1.0, 0.0), 1.0);
        let (a_before, b_before) = (a.clone(), b.clone());

        assert_eq!(a.coalesce(&mut b, &params()), Coalescence::None);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn absorbed_particles_do_not_merge_again() {
        let mut a = Particle::new(2.0, (0.0, 0.0), 4.0);
        let mut b = Particle::new(1.0, (0.5, 0.0), 1.0);
        let mut c = Particle::new(1.0, (1.0, 0.0), 1.0);

        a.coalesce(&mut b, &params());
        assert_eq!(b.coalesce(&mut c, &params()), Coalescence::None);
        assert_eq!(c.coalesce(&mut b, &params()), Coalescence::None);
        assert!(!c.is_absorbed());

        let total: f64 = [&a, &c].iter().map(|p| p.mass()).sum();
        assert_eq!(total, 6.0);
    }

    #[test]
    fn elasticity_scales_merged_velocity() {
        let lossless = SimParams { elasticity_coefficient: 1.0, ..SimParams::default() };
        let mut a = Particle::with_velocity(1.0, (0.0, 0.0), Vector2::new(2.0, 0.0), 1.0);
        let mut b = Particle::new(1.0, (0.1, 0.0), 1.0);
        a.coalesce(&mut b, &lossless);
        assert_eq!(a.velocity(), Vector2::new(2.0, 0.0));
    }
}
