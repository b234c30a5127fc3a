//! Square-well interaction: a hard core inside an attractive step well.

use super::hard_sphere::elastic_core_bounce;
use super::{Interaction, PairEventData};
use crate::dynamics::physics::{sphere_sphere_in_root, sphere_sphere_out_root};
use crate::dynamics::Liouvillean;
use crate::event::{Event, EventKind, InteractionKind};
use crate::particle::{Particle, ParticleId};
use crate::species::SpeciesId;
use std::cell::RefCell;
use std::collections::HashSet;

/// The set of pairs currently inside the attractive well, keyed by
/// `(min(id), max(id))` so lookups don't care about argument order.
///
/// Interior mutability: `Interaction::get_event` takes `&self`
/// (it is a query, not an update), but capture membership changes only
/// at `WELL_IN`/`WELL_OUT` execution, never during a query. The cache
/// invariant is: membership reflects the capture state as of the last
/// executed event, not a prediction about the query being answered.
#[derive(Debug, Default)]
pub struct CaptureMap {
    pairs: RefCell<HashSet<(ParticleId, ParticleId)>>,
}

fn key(a: ParticleId, b: ParticleId) -> (ParticleId, ParticleId) {
    if a < b { (a, b) } else { (b, a) }
}

impl CaptureMap {
    pub fn new() -> Self {
        CaptureMap {
            pairs: RefCell::new(HashSet::new()),
        }
    }

    pub fn is_captured(&self, a: ParticleId, b: ParticleId) -> bool {
        self.pairs.borrow().contains(&key(a, b))
    }

    pub(crate) fn set_captured(&self, a: ParticleId, b: ParticleId, captured: bool) {
        let mut pairs = self.pairs.borrow_mut();
        if captured {
            pairs.insert(key(a, b));
        } else {
            pairs.remove(&key(a, b));
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.borrow().is_empty()
    }
}

/// A stepped attractive potential: a hard core at `sigma`, an
/// attractive shell out to `lambda * sigma`, of depth `epsilon`.
#[derive(Debug)]
pub struct SquareWell {
    pub species_a: SpeciesId,
    pub species_b: SpeciesId,
    pub sigma: f64,
    pub lambda: f64,
    pub epsilon: f64,
    pub capture: CaptureMap,
}

impl SquareWell {
    pub fn new(species_a: SpeciesId, species_b: SpeciesId, sigma: f64, lambda: f64, epsilon: f64) -> Self {
        SquareWell {
            species_a,
            species_b,
            sigma,
            lambda,
            epsilon,
            capture: CaptureMap::new(),
        }
    }

    fn well_radius(&self) -> f64 {
        self.lambda * self.sigma
    }
}

impl Interaction for SquareWell {
    fn covers(&self, a: SpeciesId, b: SpeciesId) -> bool {
        (a == self.species_a && b == self.species_b) || (a == self.species_b && b == self.species_a)
    }

    fn max_int_dist(&self) -> f64 {
        self.well_radius()
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
        let core_now = liouvillean.current_diameter(self.sigma, sim_time);
        let well_now = liouvillean.current_diameter(self.well_radius(), sim_time);

        let captured = self.capture.is_captured(p1.id, p2.id);
        let candidate = if captured {
            let core_t = sphere_sphere_in_root(&liouvillean.translation, r, v, core_now)
                .map(|t| (t, InteractionKind::Core));
            let out_t = sphere_sphere_out_root(&liouvillean.translation, r, v, well_now)
                .map(|t| (t, InteractionKind::WellOut));
            [core_t, out_t].into_iter().flatten().min_by(|a, b| a.0.total_cmp(&b.0))
        } else {
            sphere_sphere_in_root(&liouvillean.translation, r, v, well_now)
                .map(|t| (t, InteractionKind::WellIn))
        };

        candidate.map(|(t, kind)| {
            Event::pair(
                EventKind::Interaction(kind),
                sim_time + t,
                p1.id,
                p1.collision_counter,
                p2.id,
                p2.collision_counter,
            )
        })
    }

    fn run_event(&mut self, p1: &mut Particle, p2: &mut Particle, masses: (f64, f64), event: &Event) -> PairEventData {
        let kind = match event.kind {
            EventKind::Interaction(k) => k,
            _ => unreachable!("square well only produces Interaction events"),
        };
        match kind {
            InteractionKind::Core => elastic_core_bounce(p1, p2, masses, 1.0, self.sigma),
            InteractionKind::WellIn => {
                self.capture.set_captured(p1.id, p2.id, true);
                normal_energy_step(p1, p2, masses, self.epsilon)
            }
            InteractionKind::WellOut => {
                let escaped = try_normal_energy_step(p1, p2, masses, -self.epsilon);
                match escaped {
                    Some(data) => {
                        self.capture.set_captured(p1.id, p2.id, false);
                        data
                    }
                    None => reflect_normal_velocity(p1, p2, masses),
                }
            }
            InteractionKind::Bounce => PairEventData { delta_ke: 0.0 },
        }
    }

    fn captured_consistent(&self, p1: &Particle, p2: &Particle, separation: crate::vector::Vec3) -> bool {
        let dist = separation.norm();
        if self.capture.is_captured(p1.id, p2.id) {
            dist <= self.well_radius() + 1e-9 && dist >= self.sigma - 1e-9
        } else {
            dist >= self.well_radius() - 1e-9
        }
    }
}

fn contact_normal(p1: &Particle, p2: &Particle) -> crate::vector::Vec3 {
    let separation = p1.position - p2.position;
    if separation.norm() > f64::EPSILON {
        separation.normalize()
    } else {
        crate::vector::Vec3::new(1.0, 0.0, 0.0)
    }
}

/// Unconditionally rescales the normal component of relative velocity
/// so that the pair's normal kinetic energy changes by `delta_u`
/// (positive when entering the attractive well releases energy).
/// `masses = (m1, m2)` sets the true reduced mass for the energy and
/// impulse split between the two particles.
fn normal_energy_step(p1: &mut Particle, p2: &mut Particle, masses: (f64, f64), delta_u: f64) -> PairEventData {
    let (m1, m2) = masses;
    let reduced_mass = m1 * m2 / (m1 + m2);
    let normal = contact_normal(p1, p2);
    let vn = (p1.velocity - p2.velocity).dot(&normal);
    let ke_n_before = 0.5 * reduced_mass * vn * vn;
    let ke_n_after = ke_n_before + delta_u;
    let vn_new = (2.0 * ke_n_after / reduced_mass).max(0.0).sqrt() * vn.signum();

    let ke_before = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();
    let delta = normal * (vn_new - vn);
    p1.velocity = p1.velocity + delta * (reduced_mass / m1);
    p2.velocity = p2.velocity - delta * (reduced_mass / m2);
    let ke_after = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();

    PairEventData {
        delta_ke: ke_after - ke_before,
    }
}

/// Like [`normal_energy_step`] but returns `None` instead of applying
/// the change when the normal kinetic energy would go negative — the
/// "insufficient energy to escape the well" case.
fn try_normal_energy_step(p1: &mut Particle, p2: &mut Particle, masses: (f64, f64), delta_u: f64) -> Option<PairEventData> {
    let (m1, m2) = masses;
    let reduced_mass = m1 * m2 / (m1 + m2);
    let normal = contact_normal(p1, p2);
    let vn = (p1.velocity - p2.velocity).dot(&normal);
    let ke_n_before = 0.5 * reduced_mass * vn * vn;
    let ke_n_after = ke_n_before + delta_u;
    if ke_n_after < 0.0 {
        return None;
    }
    Some(normal_energy_step(p1, p2, masses, delta_u))
}

/// Reflects the normal component of relative velocity, as if bouncing
/// off the inside of the well wall without crossing it. Equivalent to
/// an elastic core bounce (`restitution = 1`) applied to the reduced
/// mass from `masses`.
fn reflect_normal_velocity(p1: &mut Particle, p2: &mut Particle, masses: (f64, f64)) -> PairEventData {
    let (m1, m2) = masses;
    let reduced_mass = m1 * m2 / (m1 + m2);
    let normal = contact_normal(p1, p2);
    let vn = (p1.velocity - p2.velocity).dot(&normal);
    let impulse_mag = -2.0 * reduced_mass * vn;
    let impulse = normal * impulse_mag;
    let ke_before = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();
    p1.velocity = p1.velocity + impulse * (1.0 / m1);
    p2.velocity = p2.velocity - impulse * (1.0 / m2);
    let ke_after = 0.5 * m1 * p1.velocity.norm_squared() + 0.5 * m2 * p2.velocity.norm_squared();
    PairEventData {
        delta_ke: ke_after - ke_before,
    }
}
