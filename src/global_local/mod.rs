//! Globals and Locals: per-particle events tied to space rather than
//! to another particle.
//!
//! Both share the same `get_event`/`run_event` contract as
//! [`crate::interaction::Interaction`] but take a single particle.
//! Globals apply to every particle (sentinels); Locals apply to
//! specific particles (walls). Per the init-ordering invariant, Locals
//! initialise before Globals, since neighbour-list-aware globals may
//! need local IDs already assigned.

pub mod sentinels;
pub mod wall;

use crate::dynamics::Liouvillean;
use crate::event::Event;
use crate::particle::Particle;

pub use sentinels::{PbcSentinel, ParabolaSentinel};
pub use wall::HardWall;

/// A per-particle event source that applies to every particle in the
/// simulation (not tied to a specific one at registration time).
pub trait Global: std::fmt::Debug {
    fn get_event(&self, p: &Particle, liouvillean: &Liouvillean, sim_time: f64) -> Option<Event>;
    fn run_event(&self, p: &mut Particle, event: &Event);

    /// Rescales any cached lengths this global holds (e.g. a periodic
    /// boundary's box size) by `factor`. Default no-op for globals with
    /// no geometric state. Called by `RestoreSystem` after a compression
    /// run rescales the box and every particle position.
    fn rescale_lengths(&mut self, _factor: f64) {}
}

/// A per-particle event source tied to specific particles (e.g. a
/// wall that only a subset of particles can collide with).
pub trait Local: std::fmt::Debug {
    /// Whether this local applies to the given particle at all.
    fn applies_to(&self, p: &Particle) -> bool;
    fn get_event(&self, p: &Particle, liouvillean: &Liouvillean, sim_time: f64) -> Option<Event>;
    fn run_event(&self, p: &mut Particle, event: &Event);

    /// See [`Global::rescale_lengths`].
    fn rescale_lengths(&mut self, _factor: f64) {}
}
