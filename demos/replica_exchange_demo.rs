//! Example showing a replica-exchange swap between two hard-sphere
//! boxes at different temperatures. Not part of the library build;
//! copy into a binary target or run as a standalone script against
//! `dynamo-core` to see the kinetic-energy exchange in practice.

use dynamo_core::boundary::BoundaryCondition;
use dynamo_core::dynamics::Liouvillean;
use dynamo_core::ensemble::Ensemble;
use dynamo_core::interaction::HardSphere;
use dynamo_core::particle::Particle;
use dynamo_core::simulation::{replica_exchange, Simulation};
use dynamo_core::species::{Species, SpeciesRegistry};
use dynamo_core::vector::Vec3;

fn two_particle_box(temperature: f64, speed: f64) -> Simulation {
    let particles = vec![
        Particle::new(0, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(speed, 0.0, 0.0)),
        Particle::new(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-speed, 0.0, 0.0)),
    ];
    let mut sim = Simulation::new(particles, BoundaryCondition::None);
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, vec![0, 1])).unwrap();
    sim.set_species(species).unwrap();
    sim.set_dynamics(Liouvillean::newtonian()).unwrap();
    sim.add_interaction(Box::new(HardSphere::new(0, 0, 0.1))).unwrap();
    sim.set_ensemble(Ensemble::nvt(2, 1000.0, temperature)).unwrap();
    sim.finalize().unwrap();
    sim
}

fn total_ke(sim: &Simulation) -> f64 {
    sim.particles().iter().map(|p| 0.5 * p.velocity.norm_squared()).sum()
}

fn main() {
    let mut cold = two_particle_box(1.0, 1.0);
    let mut hot = two_particle_box(2.0, std::f64::consts::SQRT_2);

    println!("before exchange: cold KE={:.4}, hot KE={:.4}", total_ke(&cold), total_ke(&hot));
    replica_exchange(&mut cold, &mut hot).expect("both boxes are NVT");
    println!("after exchange:  cold KE={:.4}, hot KE={:.4}", total_ke(&cold), total_ke(&hot));
}
