//! Streaming and re-enumeration helpers used by the event loop.

use crate::boundary::BoundaryCondition;
use crate::cell_list::CellList;
use crate::dynamics::{physics, Liouvillean};
use crate::event::{Event, EventKind};
use crate::global_local::{Global, Local};
use crate::interaction::InteractionRegistry;
use crate::particle::{Particle, ParticleId};
use crate::sorter::Sorter;
use crate::species::SpeciesRegistry;
use rayon::prelude::*;

/// Streams a single particle's kinematic state from its `pec_time` to
/// `sim_time`. Idempotent: a particle already at or past `sim_time` is
/// left untouched.
pub(crate) fn stream_to(p: &mut Particle, liouvillean: &Liouvillean, sim_time: f64) {
    if p.pec_time >= sim_time {
        return;
    }
    let dt = sim_time - p.pec_time;
    let (new_position, new_velocity) = physics::stream_position(&liouvillean.translation, p.position, p.velocity, dt);
    p.position = new_position;
    p.velocity = new_velocity;
    if liouvillean.orientation {
        if let (Some(orientation), Some(omega)) = (p.orientation, p.angular_velocity) {
            p.orientation = Some(orientation.integrate(&omega, dt));
        }
    }
    p.pec_time = sim_time;
}

/// Streams every particle to `sim_time` in parallel. Each particle's
/// update is independent of every other's, so this is safe even
/// though the event stream itself is strictly sequential; used for
/// full-system resyncs (output, `validate_state`, replica exchange)
/// rather than the per-event path, which only ever touches the one or
/// two participants of the event just executed.
pub(crate) fn stream_all(particles: &mut [Particle], liouvillean: &Liouvillean, sim_time: f64) {
    particles
        .par_iter_mut()
        .for_each(|p| stream_to(p, liouvillean, sim_time));
}

/// Re-enumerates every candidate event for particle `id` — neighbour
/// interactions via the cell list, global and local events, and the
/// particle's own next cell crossing — and pushes them into `sorter`.
/// This is the `fullUpdate` primitive event handlers rely on after
/// mutating a particle's state.
#[allow(clippy::too_many_arguments)]
pub(crate) fn full_update(
    id: ParticleId,
    sorter: &mut Sorter,
    particles: &[Particle],
    cell_list: &CellList,
    boundary: &BoundaryCondition,
    liouvillean: &Liouvillean,
    interactions: &InteractionRegistry,
    species: &SpeciesRegistry,
    globals: &[Box<dyn Global>],
    locals: &[Box<dyn Local>],
    sim_time: f64,
) {
    let Some(species_id) = species.species_of(id) else {
        return;
    };

    let mut candidates = Vec::new();
    cell_list.neighbourhood(particles[id].position, |other_id| {
        if other_id == id {
            return;
        }
        let Some(other_species) = species.species_of(other_id) else {
            return;
        };
        if let Some(interaction) = interactions.find(species_id, other_species) {
            let separation = boundary.separation(particles[id].position, particles[other_id].position, sim_time);
            if let Some(event) = interaction.get_event(&particles[id], &particles[other_id], separation, liouvillean, sim_time) {
                candidates.push(event);
            }
        }
    });
    for event in candidates {
        sorter.push(event);
    }

    for global in globals {
        if let Some(event) = global.get_event(&particles[id], liouvillean, sim_time) {
            sorter.push(event);
        }
    }

    for local in locals {
        if local.applies_to(&particles[id]) {
            if let Some(event) = local.get_event(&particles[id], liouvillean, sim_time) {
                sorter.push(event);
            }
        }
    }

    let face_time = cell_list.next_face_time(particles[id].position, particles[id].velocity);
    if face_time.is_finite() {
        sorter.push(Event::single(
            EventKind::Cell,
            sim_time + face_time,
            id,
            particles[id].collision_counter,
        ));
    }
}
