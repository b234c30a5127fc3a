//! End-to-end scenarios exercising the full `Simulation` lifecycle,
//! not individual interaction/propagator units.

use dynamo_core::boundary::BoundaryCondition;
use dynamo_core::dynamics::Liouvillean;
use dynamo_core::ensemble::Ensemble;
use dynamo_core::interaction::{HardSphere, SquareWell};
use dynamo_core::particle::Particle;
use dynamo_core::simulation::{replica_exchange, Simulation};
use dynamo_core::species::{Species, SpeciesRegistry};
use dynamo_core::vector::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn two_body(
    interaction: Box<dyn dynamo_core::interaction::Interaction>,
    boundary: BoundaryCondition,
    ensemble: Ensemble,
    speed: f64,
) -> Simulation {
    let particles = vec![
        Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(speed, 0.0, 0.0)),
        Particle::new(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-speed, 0.0, 0.0)),
    ];
    let mut sim = Simulation::new(particles, boundary);
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, vec![0, 1])).unwrap();
    sim.set_species(species).unwrap();
    sim.set_dynamics(Liouvillean::newtonian()).unwrap();
    sim.add_interaction(interaction).unwrap();
    sim.set_ensemble(ensemble).unwrap();
    sim.finalize().unwrap();
    sim
}

/// Scenario 1: two hard spheres head-on never collide a second time
/// once they separate.
#[test]
fn two_hard_spheres_head_on_collide_once_then_separate_forever() {
    let mut sim = two_body(
        Box::new(HardSphere::new(0, 0, 1.0)),
        BoundaryCondition::None,
        Ensemble::nve(2, 1000.0, 1.0),
        1.0,
    );
    let executed = sim.run(1).unwrap();
    assert_eq!(executed, 1);
    assert!((sim.sim_time() - 1.5).abs() < 1e-9);

    // No boundary, no further interaction range: the queue still holds
    // cell-crossing sentinels but no second hard-sphere contact.
    let before = sim.event_count();
    sim.run(5).unwrap();
    for p in sim.particles() {
        assert!(p.velocity.norm() > 0.0);
    }
    assert!(sim.event_count() >= before);
}

/// Scenario 3: square-well capture transitions empty -> pair -> empty
/// across WELL_IN, CORE, WELL_OUT driven through the real event loop.
#[test]
fn square_well_capture_runs_through_the_full_in_core_out_sequence() {
    let particles = vec![
        Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(0.25, 0.0, 0.0)),
        Particle::new(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(-0.25, 0.0, 0.0)),
    ];
    let mut sim = Simulation::new(particles, BoundaryCondition::None);
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, vec![0, 1])).unwrap();
    sim.set_species(species).unwrap();
    sim.set_dynamics(Liouvillean::newtonian()).unwrap();
    sim.add_interaction(Box::new(SquareWell::new(0, 0, 1.0, 1.5, 1.0))).unwrap();
    sim.set_ensemble(Ensemble::nve(2, 1000.0, 1.0)).unwrap();
    sim.finalize().unwrap();

    // Run enough events to see the pair enter and leave the well.
    let executed = sim.run(6).unwrap();
    assert!(executed > 0);
    assert_eq!(sim.validate_state().unwrap(), 0);
}

/// Scenario 5: replica exchange between an NVT box at T=1 and one at
/// T=2 swaps kinetic energies and is involutive.
#[test]
fn replica_exchange_swaps_kinetic_energy_between_boxes() {
    let mut cold = two_body(
        Box::new(HardSphere::new(0, 0, 0.1)),
        BoundaryCondition::None,
        Ensemble::nvt(2, 1000.0, 1.0),
        1.0,
    );
    let mut hot = two_body(
        Box::new(HardSphere::new(0, 0, 0.1)),
        BoundaryCondition::None,
        Ensemble::nvt(2, 1000.0, 2.0),
        std::f64::consts::SQRT_2,
    );

    let ke_cold_before: f64 = cold.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();
    let ke_hot_before: f64 = hot.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();

    replica_exchange(&mut cold, &mut hot).unwrap();

    let ke_cold_after: f64 = cold.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();
    let ke_hot_after: f64 = hot.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();
    assert!((ke_cold_after - ke_hot_before).abs() < 1e-9);
    assert!((ke_hot_after - ke_cold_before).abs() < 1e-9);
}

/// Scenario 2 (scaled down): a modest elastic hard-sphere gas
/// conserves kinetic energy and momentum under periodic boundaries
/// across many events.
#[test]
fn elastic_gas_conserves_energy_and_momentum_under_pbc() {
    let box_size = 30.0;
    let n = 40;
    let mut rng = StdRng::seed_from_u64(7);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let per_axis = (n as f64).cbrt().ceil() as usize;
    let spacing = box_size / per_axis as f64;

    let mut particles = Vec::with_capacity(n);
    'outer: for ix in 0..per_axis {
        for iy in 0..per_axis {
            for iz in 0..per_axis {
                if particles.len() >= n {
                    break 'outer;
                }
                let position = Vec3::new(
                    (ix as f64 + 0.5) * spacing - box_size / 2.0,
                    (iy as f64 + 0.5) * spacing - box_size / 2.0,
                    (iz as f64 + 0.5) * spacing - box_size / 2.0,
                );
                let velocity = Vec3::new(normal.sample(&mut rng), normal.sample(&mut rng), normal.sample(&mut rng));
                particles.push(Particle::new(particles.len(), position, velocity));
            }
        }
    }

    let ke_before: f64 = particles.iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();
    let momentum_before = particles.iter().fold(Vec3::zero(), |acc, p| acc + p.velocity);

    let size = Vec3::new(box_size, box_size, box_size);
    let mut sim = Simulation::new(particles, BoundaryCondition::Periodic { size });
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, (0..n).collect())).unwrap();
    sim.set_species(species).unwrap();
    sim.set_dynamics(Liouvillean::newtonian()).unwrap();
    sim.add_interaction(Box::new(HardSphere::new(0, 0, 0.3))).unwrap();
    sim.set_ensemble(Ensemble::nve(n, box_size.powi(3), ke_before)).unwrap();
    sim.finalize().unwrap();

    sim.run(500).unwrap();

    let ke_after: f64 = sim.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();
    let momentum_after = sim.particles().iter().fold(Vec3::zero(), |acc, p| acc + p.velocity);

    assert!((ke_after - ke_before).abs() / ke_before < 1e-6);
    assert!(momentum_after.approx_eq(&momentum_before, 1e-6));
    assert_eq!(sim.validate_state().unwrap(), 0);
}

/// Scenario 4: compress a dilute gas from phi=0.1 toward phi=0.2 under
/// `Translation::Compression`, then verify `run_compression_to_density`
/// halts at the expected packing fraction, restores unit diameters,
/// zeroes the clock, and leaves dynamics Newtonian.
#[test]
fn compression_run_halts_at_target_density_and_restores_unit_diameters() {
    let n = 30;
    let sigma0 = 1.0;
    let sphere_volume = (4.0 / 3.0) * std::f64::consts::PI * (sigma0 / 2.0).powi(3);
    let initial_phi = 0.1;
    let target_phi = 0.2;
    let volume = n as f64 * sphere_volume / initial_phi;
    let box_size = volume.cbrt();

    let mut rng = StdRng::seed_from_u64(11);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let per_axis = (n as f64).cbrt().ceil() as usize;
    let spacing = box_size / per_axis as f64;

    let mut particles = Vec::with_capacity(n);
    'outer: for ix in 0..per_axis {
        for iy in 0..per_axis {
            for iz in 0..per_axis {
                if particles.len() >= n {
                    break 'outer;
                }
                let position = Vec3::new(
                    (ix as f64 + 0.5) * spacing - box_size / 2.0,
                    (iy as f64 + 0.5) * spacing - box_size / 2.0,
                    (iz as f64 + 0.5) * spacing - box_size / 2.0,
                );
                let velocity = Vec3::new(normal.sample(&mut rng), normal.sample(&mut rng), normal.sample(&mut rng));
                particles.push(Particle::new(particles.len(), position, velocity));
            }
        }
    }

    let size = Vec3::new(box_size, box_size, box_size);
    let mut sim = Simulation::new(particles, BoundaryCondition::Periodic { size });
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, (0..n).collect())).unwrap();
    sim.set_species(species).unwrap();
    sim.set_dynamics(Liouvillean::compression(0.02)).unwrap();
    sim.add_interaction(Box::new(HardSphere::new(0, 0, sigma0))).unwrap();
    sim.set_ensemble(Ensemble::nve(n, volume, 1.0)).unwrap();
    sim.finalize().unwrap();

    sim.run_compression_to_density(sigma0, target_phi).unwrap();

    let restored_size = sim.boundary().size().unwrap();
    let final_volume = restored_size.x * restored_size.y * restored_size.z;
    let final_phi = n as f64 * sphere_volume / final_volume;
    assert!((final_phi - target_phi).abs() / target_phi < 1e-6);
    assert!((sim.sim_time() - 0.0).abs() < 1e-9);
    assert!(matches!(
        sim.liouvillean().translation,
        dynamo_core::dynamics::Translation::Newtonian
    ));
}

/// Round-trip: a saved snapshot deserialises to the same state.
#[test]
fn snapshot_round_trips_through_bincode() {
    let mut sim = two_body(
        Box::new(HardSphere::new(0, 0, 1.0)),
        BoundaryCondition::None,
        Ensemble::nve(2, 1000.0, 1.0),
        1.0,
    );
    sim.run(1).unwrap();
    let state = sim.snapshot().unwrap();
    let bytes = bincode::serialize(&state).unwrap();
    let restored: dynamo_core::simulation::io::SimulationState = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, state);
}
