//! State snapshotting: `bincode`-round-trippable state, standing in
//! for the out-of-scope XML configuration format. Covers kinematic and
//! thermodynamic state (particles, species, ensemble, boundary,
//! dynamics, clock); interaction/local/global *configuration* is a
//! trait-object registry and is not part of the snapshot, mirroring
//! how a real config loader and a state dump are separate concerns.

use super::{Phase, Simulation};
use crate::boundary::BoundaryCondition;
use crate::dynamics::Liouvillean;
use crate::ensemble::Ensemble;
use crate::error::SimResult;
use crate::io::DataPersistence;
use crate::particle::Particle;
use crate::species::SpeciesRegistry;

/// A serialisable snapshot of a [`Simulation`]'s state. `Simulation`
/// itself can't derive `Serialize` — its interaction/local/global
/// fields are trait objects — so callers that need those must re-add
/// them (`add_interaction`, etc.) after [`SimulationState::restore`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationState {
    pub particles: Vec<Particle>,
    pub species: SpeciesRegistry,
    pub boundary: BoundaryCondition,
    pub liouvillean: Liouvillean,
    pub ensemble: Ensemble,
    pub sim_time: f64,
    pub event_count: u64,
}

impl DataPersistence for SimulationState {
    fn folder() -> &'static str {
        "simulation"
    }

    fn name(&self) -> String {
        format!("state_t{:.6}_e{}", self.sim_time, self.event_count)
    }
}

impl Simulation {
    /// Captures the current state, requiring `Initialised` so the
    /// snapshot reflects a fully seeded run rather than a
    /// partially-built one.
    pub fn snapshot(&self) -> SimResult<SimulationState> {
        self.require_exact(Phase::Initialised)?;
        Ok(SimulationState {
            particles: self.particles.clone(),
            species: self.species.clone(),
            boundary: self.boundary,
            liouvillean: self.liouvillean,
            ensemble: self.ensemble,
            sim_time: self.scheduler.sim_time,
            event_count: self.scheduler.event_count,
        })
    }

    /// Saves a snapshot to `./data/simulation/` via `bincode`.
    pub fn save(&self) -> SimResult<()> {
        let state = self.snapshot()?;
        crate::io::bin::save_file(&state)
    }

    /// Loads a snapshot from disk. The caller must still re-register
    /// dynamics-independent configuration (interactions, locals,
    /// globals) and call `finalize` before running events again —
    /// state round-trips, behaviour configuration does not.
    pub fn load(path: &std::path::Path) -> SimResult<SimulationState> {
        crate::io::bin::load_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::HardSphere;
    use crate::species::Species;
    use crate::vector::Vec3;

    fn sample() -> Simulation {
        let particles = vec![
            Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            Particle::new(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];
        let mut sim = Simulation::new(particles, BoundaryCondition::None);
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
    fn snapshot_round_trips_through_bincode_bytes() {
        let sim = sample();
        let state = sim.snapshot().unwrap();
        let bytes = bincode::serialize(&state).unwrap();
        let restored: SimulationState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_before_initialised_is_rejected() {
        let particles = vec![Particle::new(0, Vec3::zero(), Vec3::zero())];
        let sim = Simulation::new(particles, BoundaryCondition::None);
        assert!(sim.snapshot().is_err());
    }
}
