//! The event loop: extracts the earliest valid event, streams the
//! system to it, dispatches the handler, and re-enumerates.

pub mod logic;
pub mod tests;

use crate::boundary::BoundaryCondition;
use crate::dynamics::Liouvillean;
use crate::cell_list::CellList;
use crate::error::{SimError, SimResult};
use crate::event::EventKind;
use crate::global_local::{Global, Local};
use crate::interaction::InteractionRegistry;
use crate::particle::Particle;
use crate::sorter::Sorter;
use crate::species::SpeciesRegistry;
use log::{trace, warn};

/// Bundles the mutable and immutable world state a scheduler step
/// needs, so [`Scheduler::run_next_event`] doesn't carry a dozen
/// separate parameters.
pub struct SchedulerContext<'a> {
    pub particles: &'a mut [Particle],
    pub cell_list: &'a mut CellList,
    pub boundary: &'a BoundaryCondition,
    pub liouvillean: &'a Liouvillean,
    pub interactions: &'a mut InteractionRegistry,
    pub species: &'a SpeciesRegistry,
    pub globals: &'a [Box<dyn Global>],
    pub locals: &'a [Box<dyn Local>],
}

/// Owns the sorter and drives the event loop. See module docs for the
/// step sequence.
#[derive(Debug, Default)]
pub struct Scheduler {
    pub sorter: Sorter,
    pub sim_time: f64,
    pub event_count: u64,
    end_event_count: Option<u64>,
}

impl Scheduler {
    pub fn new(particle_count: usize) -> Self {
        Scheduler {
            sorter: Sorter::new(particle_count),
            sim_time: 0.0,
            event_count: 0,
            end_event_count: None,
        }
    }

    /// Requests a soft shutdown: the loop returns `false` the next
    /// time `run_next_event` would otherwise extract an event, without
    /// interrupting the event currently in flight.
    pub fn request_shutdown(&mut self) {
        self.end_event_count = Some(self.event_count);
    }

    /// Runs a single event-loop step. Returns `Ok(false)` when the
    /// queue is exhausted or shutdown has been requested; otherwise
    /// `Ok(true)` after fully dispatching one event.
    pub fn run_next_event(&mut self, ctx: &mut SchedulerContext) -> SimResult<bool> {
        if let Some(end) = self.end_event_count {
            if self.event_count >= end {
                return Ok(false);
            }
        }

        let particles = &mut *ctx.particles;
        let event = match self.sorter.pop_next(|id| particles[id].collision_counter) {
            Some(event) => event,
            None => return Ok(false),
        };

        trace!(
            "event {} at t={:.6}: {:?}",
            self.event_count, event.time, event.kind
        );

        self.sim_time = event.time;
        logic::stream_to(&mut particles[event.particle1], ctx.liouvillean, self.sim_time);
        if let Some(p2) = event.particle2 {
            logic::stream_to(&mut particles[p2], ctx.liouvillean, self.sim_time);
        }

        match event.kind {
            EventKind::Interaction(_) => {
                let p2_id = event
                    .particle2
                    .ok_or_else(|| SimError::State("interaction event missing second participant".into()))?;
                let species1 = ctx
                    .species
                    .species_of(event.particle1)
                    .ok_or_else(|| SimError::State(format!("particle {} has no species", event.particle1)))?;
                let species2 = ctx
                    .species
                    .species_of(p2_id)
                    .ok_or_else(|| SimError::State(format!("particle {} has no species", p2_id)))?;
                let interaction = ctx
                    .interactions
                    .find_mut(species1, species2)
                    .ok_or_else(|| SimError::Config("no interaction covers this pair anymore".into()))?;
                let mass1 = ctx
                    .species
                    .get(species1)
                    .map(|s| s.mass)
                    .ok_or_else(|| SimError::State(format!("species {} vanished from the registry", species1)))?;
                let mass2 = ctx
                    .species
                    .get(species2)
                    .map(|s| s.mass)
                    .ok_or_else(|| SimError::State(format!("species {} vanished from the registry", species2)))?;

                let (lo, hi) = if event.particle1 < p2_id {
                    (event.particle1, p2_id)
                } else {
                    (p2_id, event.particle1)
                };
                let (left, right) = particles.split_at_mut(hi);
                let (lo_ref, hi_ref) = (&mut left[lo], &mut right[0]);
                if event.particle1 < p2_id {
                    interaction.run_event(lo_ref, hi_ref, (mass1, mass2), &event);
                } else {
                    interaction.run_event(hi_ref, lo_ref, (mass2, mass1), &event);
                }
            }
            EventKind::Global(_) => {
                for global in ctx.globals {
                    if let Some(candidate) = global.get_event(&particles[event.particle1], ctx.liouvillean, self.sim_time)
                    {
                        if candidate.kind == event.kind {
                            global.run_event(&mut particles[event.particle1], &event);
                            break;
                        }
                    }
                }
            }
            EventKind::Local => {
                for local in ctx.locals {
                    if local.applies_to(&particles[event.particle1]) {
                        local.run_event(&mut particles[event.particle1], &event);
                        break;
                    }
                }
            }
            EventKind::Cell => {
                ctx.cell_list.update(event.particle1, particles[event.particle1].position);
            }
            EventKind::System => {
                warn!("system event fired with no registered handler: {:?}", event.kind);
            }
        }

        particles[event.particle1].invalidate();
        if let Some(p2) = event.particle2 {
            particles[p2].invalidate();
        }

        logic::full_update(
            event.particle1,
            &mut self.sorter,
            particles,
            ctx.cell_list,
            ctx.boundary,
            ctx.liouvillean,
            ctx.interactions,
            ctx.species,
            ctx.globals,
            ctx.locals,
            self.sim_time,
        );
        if let Some(p2) = event.particle2 {
            logic::full_update(
                p2,
                &mut self.sorter,
                particles,
                ctx.cell_list,
                ctx.boundary,
                ctx.liouvillean,
                ctx.interactions,
                ctx.species,
                ctx.globals,
                ctx.locals,
                self.sim_time,
            );
        }

        self.event_count += 1;
        Ok(true)
    }
}
