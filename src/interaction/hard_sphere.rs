//! Elastic (or inelastic) hard-sphere interaction.

use super::{Interaction, PairEventData};
use crate::dynamics::physics::sphere_sphere_in_root;
use crate::dynamics::Liouvillean;
use crate::event::{Event, EventKind, InteractionKind};
use crate::particle::Particle;
use crate::species::SpeciesId;

/// A pairwise hard-core collision rule between two species ranges.
#[derive(Debug, Clone, Copy)]
pub struct HardSphere {
    pub species_a: SpeciesId,
    pub species_b: SpeciesId,
    /// Contact distance between centres.
    pub sigma: f64,
    /// Normal restitution coefficient; `1.0` is elastic.
    pub restitution: f64,
}

impl HardSphere {
    pub fn new(species_a: SpeciesId, species_b: SpeciesId, sigma: f64) -> Self {
        HardSphere {
            species_a,
            species_b,
            sigma,
            restitution: 1.0,
        }
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }
}

impl Interaction for HardSphere {
    fn covers(&self, a: SpeciesId, b: SpeciesId) -> bool {
        (a == self.species_a && b == self.species_b) || (a == self.species_b && b == self.species_a)
    }

    fn max_int_dist(&self) -> f64 {
        self.sigma
    }

    fn get_event(
        &self,
        p1: &Particle,
        p2: &Particle,
        separation: crate::vector::Vec3,
        liouvillean: &Liouvillean,
        sim_time: f64,
    ) -> Option<Event> {
        let r = separation;
        let v = p1.velocity - p2.velocity;
        let sigma_now = liouvillean.current_diameter(self.sigma, sim_time);
        let t = sphere_sphere_in_root(&liouvillean.translation, r, v, sigma_now)?;
        Some(Event::pair(
            EventKind::Interaction(InteractionKind::Core),
            sim_time + t,
            p1.id,
            p1.collision_counter,
            p2.id,
            p2.collision_counter,
        ))
    }

    fn run_event(&mut self, p1: &mut Particle, p2: &mut Particle, masses: (f64, f64), _event: &Event) -> PairEventData {
        elastic_core_bounce(p1, p2, masses, self.restitution, self.sigma)
    }

    fn captured_consistent(&self, _p1: &Particle, _p2: &Particle, separation: crate::vector::Vec3) -> bool {
        separation.norm() >= self.sigma - 1e-9
    }
}

/// Applies the impulsive hard-sphere collision rule at contact, using
/// `masses = (m1, m2)` to compute the true reduced mass so unequal-mass
/// species pairs get physically correct impulses, not an equal-unit-mass
/// approximation.
pub(crate) fn elastic_core_bounce(
    p1: &mut Particle,
    p2: &mut Particle,
    masses: (f64, f64),
    restitution: f64,
    sigma: f64,
) -> PairEventData {
    let (m1, m2) = masses;
    let separation = p1.position - p2.position;
    let normal = if separation.norm() > f64::EPSILON {
        separation.normalize()
    } else {
        // Degenerate (coincident centres, numerical residue at
        // contact): fall back to the stored contact axis so the
        // impulse still has a well-defined direction.
        crate::vector::Vec3::new(1.0, 0.0, 0.0)
    };
    let _ = sigma;

    let relative_velocity = p1.velocity - p2.velocity;
    let vn = relative_velocity.dot(&normal);
    if vn >= 0.0 {
        // Already separating; nothing to do (grazing event survived
        // the root-finder's rejection but ended up non-approaching).
        return PairEventData { delta_ke: 0.0 };
    }

    let reduced_mass = m1 * m2 / (m1 + m2);
    let impulse_mag = -(1.0 + restitution) * reduced_mass * vn;
    let impulse = normal * impulse_mag;

    let ke_before = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();
    p1.velocity = p1.velocity + impulse * (1.0 / m1);
    p2.velocity = p2.velocity - impulse * (1.0 / m2);
    let ke_after = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();

    PairEventData {
        delta_ke: ke_after - ke_before,
    }
}
