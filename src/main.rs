//! Thin CLI runner: builds a synthetic hard-sphere gas, drives its
//! event loop for a fixed number of events, and reports a summary.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use dynamo_core::boundary::BoundaryCondition;
use dynamo_core::dynamics::Liouvillean;
use dynamo_core::ensemble::Ensemble;
use dynamo_core::interaction::HardSphere;
use dynamo_core::particle::Particle;
use dynamo_core::simulation::Simulation;
use dynamo_core::species::{Species, SpeciesRegistry};
use dynamo_core::vector::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Places `n` particles on a cubic lattice spanning `box_size`, with
/// Gaussian-distributed velocities (Maxwell-Boltzmann at unit mass and
/// `speed` as the per-axis standard deviation).
fn synthetic_gas(n: usize, box_size: f64, speed: f64, seed: u64) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, speed).expect("finite speed");
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
                let velocity = Vec3::new(
                    normal.sample(&mut rng),
                    normal.sample(&mut rng),
                    normal.sample(&mut rng),
                );
                particles.push(Particle::new(particles.len(), position, velocity));
            }
        }
    }
    particles
}

fn run(
    particles: usize,
    box_size: f64,
    sigma: f64,
    events: u64,
    seed: u64,
    save_to: Option<std::path::PathBuf>,
) -> dynamo_core::SimResult<()> {
    let size = Vec3::new(box_size, box_size, box_size);
    let initial = synthetic_gas(particles, box_size, 1.0, seed);
    let n = initial.len();
    let ke: f64 = initial.iter().map(|p| 0.5 * p.velocity.norm_squared()).sum();

    let mut sim = Simulation::new(initial, BoundaryCondition::Periodic { size });
    let mut species = SpeciesRegistry::new();
    species.add(Species::new("A", 1.0, (0..n).collect()))?;
    sim.set_species(species)?;
    sim.set_dynamics(Liouvillean::newtonian())?;
    sim.add_interaction(Box::new(HardSphere::new(0, 0, sigma)))?;
    sim.set_ensemble(Ensemble::nve(n, box_size.powi(3), ke))?;
    sim.finalize()?;

    log::info!("running {} particles for up to {} events", n, events);
    let executed = sim.run(events)?;
    let violations = sim.validate_state()?;
    println!(
        "ran {} events, sim_time={:.4}, {} invariant violations",
        executed,
        sim.sim_time(),
        violations
    );

    if let Some(path) = save_to {
        let state = sim.snapshot()?;
        let bytes = bincode::serialize(&state)?;
        std::fs::write(&path, bytes)?;
        println!("saved snapshot to {}", path.display());
    }
    Ok(())
}

fn inspect(path: std::path::PathBuf) -> dynamo_core::SimResult<()> {
    let state = Simulation::load(&path)?;
    println!(
        "{} particles, sim_time={:.4}, {} events",
        state.particles.len(),
        state.sim_time,
        state.event_count
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            particles,
            box_size,
            sigma,
            events,
            seed,
            save_to,
        } => run(particles, box_size, sigma, events, seed, save_to),
        Commands::Inspect { path } => inspect(path),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
