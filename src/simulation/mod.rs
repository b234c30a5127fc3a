//! The simulation container: enforces init-phase ordering, owns every
//! other component, and exposes the step API.

pub mod compression;
pub mod io;
pub mod replica;

use crate::boundary::BoundaryCondition;
use crate::cell_list::CellList;
use crate::dynamics::{Liouvillean, Translation};
use crate::ensemble::Ensemble;
use crate::error::{SimError, SimResult};
use crate::global_local::{Global, Local};
use crate::interaction::InteractionRegistry;
use crate::particle::Particle;
use crate::scheduler::logic;
use crate::scheduler::{Scheduler, SchedulerContext};
use crate::species::SpeciesRegistry;
use crate::vector::Vec3;

pub use replica::replica_exchange;

/// Simulation-time interval between cell-list rebuilds while
/// `Translation::Compression` is active. Sets how much the cell-list
/// overlap in `finalize` needs to absorb before the next rebuild.
pub(crate) const COMPRESSION_REBUILD_INTERVAL: f64 = 1.0;

/// The linear init-phase sequence. Transitions are monotonic: once
/// `Initialised`, registries are closed for mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Start,
    SpeciesInit,
    DynamicsInit,
    InteractionInit,
    LocalInit,
    GlobalInit,
    EnsembleInit,
    SchedulerInit,
    Initialised,
}

/// Owns every component of a single simulation instance and drives its
/// event loop. Construction proceeds through [`Phase`] in order via the
/// `set_*`/`add_*` methods; [`Simulation::finalize`] closes registration
/// and seeds the initial event set.
pub struct Simulation {
    phase: Phase,
    particles: Vec<Particle>,
    species: SpeciesRegistry,
    interactions: InteractionRegistry,
    locals: Vec<Box<dyn Local>>,
    globals: Vec<Box<dyn Global>>,
    boundary: BoundaryCondition,
    liouvillean: Liouvillean,
    cell_list: Option<CellList>,
    pub(crate) ensemble: Ensemble,
    pub(crate) scheduler: Scheduler,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("phase", &self.phase)
            .field("particle_count", &self.particles.len())
            .field("sim_time", &self.scheduler.sim_time)
            .field("event_count", &self.scheduler.event_count)
            .finish()
    }
}

impl Simulation {
    pub fn new(particles: Vec<Particle>, boundary: BoundaryCondition) -> Self {
        let n = particles.len();
        Simulation {
            phase: Phase::Start,
            particles,
            species: SpeciesRegistry::new(),
            interactions: InteractionRegistry::new(),
            locals: Vec::new(),
            globals: Vec::new(),
            boundary,
            liouvillean: Liouvillean::newtonian(),
            cell_list: None,
            ensemble: Ensemble::nve(n, 1.0, 0.0),
            scheduler: Scheduler::new(n),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn sim_time(&self) -> f64 {
        self.scheduler.sim_time
    }

    pub fn event_count(&self) -> u64 {
        self.scheduler.event_count
    }

    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    pub fn liouvillean(&self) -> Liouvillean {
        self.liouvillean
    }

    fn require_exact(&self, expected: Phase) -> SimResult<()> {
        if self.phase != expected {
            return Err(SimError::State(format!(
                "operation requires phase {:?}, simulation is at {:?}",
                expected, self.phase
            )));
        }
        Ok(())
    }

    fn require_range(&self, min: Phase, max: Phase) -> SimResult<()> {
        if self.phase < min || self.phase > max {
            return Err(SimError::State(format!(
                "operation requires phase in [{:?}, {:?}], simulation is at {:?}",
                min, max, self.phase
            )));
        }
        Ok(())
    }

    pub fn set_species(&mut self, species: SpeciesRegistry) -> SimResult<()> {
        self.require_exact(Phase::Start)?;
        species.validate(self.particles.len())?;
        self.species = species;
        self.phase = Phase::SpeciesInit;
        Ok(())
    }

    pub fn set_dynamics(&mut self, liouvillean: Liouvillean) -> SimResult<()> {
        self.require_exact(Phase::SpeciesInit)?;
        self.liouvillean = liouvillean;
        self.phase = Phase::DynamicsInit;
        Ok(())
    }

    pub fn add_interaction(&mut self, interaction: Box<dyn crate::interaction::Interaction>) -> SimResult<()> {
        self.require_range(Phase::DynamicsInit, Phase::InteractionInit)?;
        self.interactions.push(interaction);
        self.phase = Phase::InteractionInit;
        Ok(())
    }

    pub fn add_local(&mut self, local: Box<dyn Local>) -> SimResult<()> {
        self.require_range(Phase::InteractionInit, Phase::LocalInit)?;
        self.locals.push(local);
        self.phase = Phase::LocalInit;
        Ok(())
    }

    /// Locals initialise before globals: neighbour-list-aware globals may
    /// need local IDs already assigned.
    pub fn add_global(&mut self, global: Box<dyn Global>) -> SimResult<()> {
        self.require_range(Phase::LocalInit, Phase::GlobalInit)?;
        self.globals.push(global);
        self.phase = Phase::GlobalInit;
        Ok(())
    }

    pub fn set_ensemble(&mut self, ensemble: Ensemble) -> SimResult<()> {
        self.require_exact(Phase::GlobalInit)?;
        self.ensemble = ensemble;
        self.phase = Phase::EnsembleInit;
        Ok(())
    }

    /// Validates interaction coverage, sizes the cell list, builds the
    /// scheduler, and seeds every particle's initial event set.
    pub fn finalize(&mut self) -> SimResult<()> {
        self.require_exact(Phase::EnsembleInit)?;
        self.interactions.validate_coverage(self.species.len())?;

        let max_range = self.interactions.max_range();
        if let Some(size) = self.boundary.size() {
            let min_axis = size.x.min(size.y).min(size.z);
            if min_axis < 2.0 * max_range {
                return Err(SimError::Config(format!(
                    "primary cell is too small for the interaction range: smallest axis {} \
                     is less than 2 * max_int_dist ({})",
                    min_axis,
                    2.0 * max_range
                )));
            }
        }

        let min_edge = max_range.max(1.0);
        let size = self.boundary.size().unwrap_or(Vec3::new(1.0e4, 1.0e4, 1.0e4));
        let mut cell_list = CellList::new(size, min_edge, self.particles.len());
        if let Translation::Compression { gamma } = self.liouvillean.translation {
            // widen cells by one rebuild interval's worth of growth so
            // compression doesn't outgrow the neighbourhood invariant
            // before the next periodic cell-list rebuild.
            cell_list.set_cell_overlap(gamma.abs() * COMPRESSION_REBUILD_INTERVAL);
        }
        for (id, p) in self.particles.iter().enumerate() {
            cell_list.insert(id, p.position);
        }

        self.phase = Phase::SchedulerInit;
        self.scheduler = Scheduler::new(self.particles.len());
        for id in 0..self.particles.len() {
            logic::full_update(
                id,
                &mut self.scheduler.sorter,
                &self.particles,
                &cell_list,
                &self.boundary,
                &self.liouvillean,
                &self.interactions,
                &self.species,
                &self.globals,
                &self.locals,
                0.0,
            );
        }
        self.cell_list = Some(cell_list);
        self.phase = Phase::Initialised;
        log::debug!(
            "simulation initialised: {} particles, {} interactions",
            self.particles.len(),
            self.interactions.len()
        );
        Ok(())
    }

    /// Runs a single event-loop step. See [`crate::scheduler::Scheduler::run_next_event`].
    pub fn run_next_event(&mut self) -> SimResult<bool> {
        self.require_exact(Phase::Initialised)?;
        let cell_list = self
            .cell_list
            .as_mut()
            .ok_or_else(|| SimError::State("cell list missing despite Initialised phase".into()))?;
        let mut ctx = SchedulerContext {
            particles: &mut self.particles,
            cell_list,
            boundary: &self.boundary,
            liouvillean: &self.liouvillean,
            interactions: &mut self.interactions,
            species: &self.species,
            globals: &self.globals,
            locals: &self.locals,
        };
        self.scheduler.run_next_event(&mut ctx)
    }

    /// Runs up to `max_events` steps, stopping early if the queue empties
    /// or a shutdown has been requested. Returns the number of events
    /// actually executed.
    pub fn run(&mut self, max_events: u64) -> SimResult<u64> {
        let mut executed = 0;
        for _ in 0..max_events {
            if !self.run_next_event()? {
                break;
            }
            executed += 1;
        }
        Ok(executed)
    }

    pub fn request_shutdown(&mut self) {
        self.scheduler.request_shutdown();
    }

    /// Advisory consistency check: for every species pair's interaction,
    /// verifies every covered pair in the cell list's neighbourhood is in
    /// a physically admissible separation. Returns the violation count
    /// rather than aborting, per spec.md's `validateState` contract.
    pub fn validate_state(&self) -> SimResult<usize> {
        self.require_exact(Phase::Initialised)?;
        let mut violations = 0;
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let Some(species_i) = self.species.species_of(i) else { continue };
                let Some(species_j) = self.species.species_of(j) else { continue };
                let Some(interaction) = self.interactions.find(species_i, species_j) else {
                    continue;
                };
                let separation = self
                    .boundary
                    .separation(self.particles[i].position, self.particles[j].position, self.scheduler.sim_time);
                if separation.norm() > interaction.max_int_dist() * 4.0 {
                    continue;
                }
                if !interaction.captured_consistent(&self.particles[i], &self.particles[j], separation) {
                    violations += 1;
                }
            }
        }
        if violations > 0 {
            log::error!("validate_state found {} invariant violations", violations);
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use crate::interaction::HardSphere;
    use crate::species::Species;

    fn two_particle_sim() -> Simulation {
        let particles = vec![
            Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            Particle::new(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];
        Simulation::new(particles, BoundaryCondition::None)
    }

    fn build_initialised() -> Simulation {
        let mut sim = two_particle_sim();
        let mut species = SpeciesRegistry::new();
        species.add(Species::new("A", 1.0, vec![0, 1])).unwrap();
        sim.set_species(species).unwrap();
        sim.set_dynamics(Liouvillean::newtonian()).unwrap();
        sim.add_interaction(Box::new(HardSphere::new(0, 0, 1.0))).unwrap();
        sim.set_ensemble(Ensemble::nve(2, 1000.0, 1.0)).unwrap();
        sim.finalize().unwrap();
        sim
    }

    #[test]
    fn phases_advance_in_order() {
        let sim = build_initialised();
        assert_eq!(sim.phase(), Phase::Initialised);
    }

    #[test]
    fn out_of_order_transition_is_rejected() {
        let mut sim = two_particle_sim();
        let err = sim.set_dynamics(Liouvillean::newtonian()).unwrap_err();
        assert!(matches!(err, SimError::State(_)));
    }

    #[test]
    fn mutation_after_initialised_is_rejected() {
        let mut sim = build_initialised();
        let err = sim
            .add_interaction(Box::new(HardSphere::new(0, 0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, SimError::State(_)));
    }

    #[test]
    fn run_advances_sim_time_and_event_count() {
        let mut sim = build_initialised();
        let executed = sim.run(1).unwrap();
        assert_eq!(executed, 1);
        assert!((sim.sim_time() - 1.5).abs() < 1e-9);
        assert_eq!(sim.event_count(), 1);
    }
}
