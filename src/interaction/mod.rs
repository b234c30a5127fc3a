//! The interaction registry: pairwise rules dispatched by species pair.
//!
//! `Interaction` variants are an open set — a third potential can be
//! added without touching the scheduler — so this is a trait object
//! registry rather than an enum, unlike [`crate::dynamics::Liouvillean`].

pub mod hard_sphere;
pub mod square_well;

use crate::dynamics::Liouvillean;
use crate::error::{SimError, SimResult};
use crate::event::Event;
use crate::particle::Particle;
use crate::species::SpeciesId;

pub use hard_sphere::HardSphere;
pub use square_well::{CaptureMap, SquareWell};

/// Summarises the impulse and energy change applied by a pair event,
/// for diagnostics and for tests that check conservation laws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEventData {
    pub delta_ke: f64,
}

/// A pairwise interaction rule covering an unordered species-pair
/// selector.
pub trait Interaction: std::fmt::Debug {
    /// Whether this interaction is responsible for a pair drawn from
    /// `(a, b)` species (unordered).
    fn covers(&self, a: SpeciesId, b: SpeciesId) -> bool;

    /// Upper bound on this interaction's range; the maximum across all
    /// registered interactions sets the cell list's edge length.
    fn max_int_dist(&self) -> f64;

    /// The soonest valid event between `p1` and `p2`, or `None` if
    /// they never interact given their current trajectories.
    /// `separation` is `p1.position - p2.position` already reduced to
    /// the minimum image by the boundary condition — interactions
    /// never wrap positions themselves.
    fn get_event(
        &self,
        p1: &Particle,
        p2: &Particle,
        separation: crate::vector::Vec3,
        liouvillean: &Liouvillean,
        sim_time: f64,
    ) -> Option<Event>;

    /// Executes the event, mutating both particles' velocities (and
    /// orientations, for interactions that need them) in place.
    /// `masses` is `(species_mass_of(p1), species_mass_of(p2))`, resolved
    /// by the caller from the species registry — collision kernels use
    /// it to compute the true reduced mass rather than assuming equal
    /// unit masses.
    fn run_event(
        &mut self,
        p1: &mut Particle,
        p2: &mut Particle,
        masses: (f64, f64),
        event: &Event,
    ) -> PairEventData;

    /// Consistency check used by `validate_state`: for every pair this
    /// interaction is responsible for, is their separation physically
    /// admissible (outside the core, inside the well if captured)?
    fn captured_consistent(&self, p1: &Particle, p2: &Particle, separation: crate::vector::Vec3) -> bool;
}

/// An ordered list of interactions. For a given pair, the **first**
/// interaction whose selector matches handles it.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    interactions: Vec<Box<dyn Interaction>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        InteractionRegistry {
            interactions: Vec::new(),
        }
    }

    pub fn push(&mut self, interaction: Box<dyn Interaction>) {
        self.interactions.push(interaction);
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Finds the first interaction that covers `(a, b)`.
    pub fn find(&self, a: SpeciesId, b: SpeciesId) -> Option<&dyn Interaction> {
        self.interactions
            .iter()
            .find(|i| i.covers(a, b))
            .map(|b| b.as_ref())
    }

    pub fn find_mut(&mut self, a: SpeciesId, b: SpeciesId) -> Option<&mut Box<dyn Interaction>> {
        self.interactions.iter_mut().find(|i| i.covers(a, b))
    }

    /// The largest `max_int_dist` across every registered interaction;
    /// the value the cell list must use as its minimum edge length.
    pub fn max_range(&self) -> f64 {
        self.interactions
            .iter()
            .map(|i| i.max_int_dist())
            .fold(0.0, f64::max)
    }

    /// Verifies every unordered species pair is covered by **exactly
    /// one** interaction. Overlapping coverage is a configuration
    /// error, not resolved by iteration order, to keep dispatch
    /// unambiguous.
    pub fn validate_coverage(&self, species_count: usize) -> SimResult<()> {
        for a in 0..species_count {
            for b in a..species_count {
                let matches = self.interactions.iter().filter(|i| i.covers(a, b)).count();
                if matches == 0 {
                    return Err(SimError::Config(format!(
                        "no interaction covers species pair ({}, {})",
                        a, b
                    )));
                }
                if matches > 1 {
                    return Err(SimError::Config(format!(
                        "species pair ({}, {}) is covered by {} interactions; overlapping \
                         coverage is ambiguous without a precedence attribute",
                        a, b, matches
                    )));
                }
            }
        }
        Ok(())
    }
}
