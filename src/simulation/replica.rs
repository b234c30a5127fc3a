//! Replica exchange: swap the thermodynamic-register clocks and
//! rescale velocities/scheduler times to match the partner's
//! temperature.
//!
//! The temperature *label* swaps along with the clock, rather than the
//! particle data itself — see `exchanging_twice_restores_the_prior_state`
//! below for why that's the resolution that makes a second exchange
//! undo the first.

use super::Simulation;
use crate::error::{SimError, SimResult};
use log::debug;

/// Exchanges two simulations' thermodynamic registers: velocities are
/// rescaled by `sqrt(T_other/T_self)`, scheduler times by the same
/// factor, clocks and ensemble temperature labels swap. Requires both
/// simulations to carry an NVT ensemble (a temperature, not only an
/// energy).
pub fn replica_exchange(a: &mut Simulation, b: &mut Simulation) -> SimResult<()> {
    let t_a = a
        .ensemble
        .temperature
        .ok_or_else(|| SimError::Config("replica exchange requires an NVT ensemble on the first simulation".into()))?;
    let t_b = b
        .ensemble
        .temperature
        .ok_or_else(|| SimError::Config("replica exchange requires an NVT ensemble on the second simulation".into()))?;

    let factor_a = (t_b / t_a).sqrt();
    let factor_b = (t_a / t_b).sqrt();

    rescale(a, factor_a);
    rescale(b, factor_b);

    std::mem::swap(&mut a.scheduler.sim_time, &mut b.scheduler.sim_time);
    std::mem::swap(&mut a.ensemble.temperature, &mut b.ensemble.temperature);

    debug!(
        "replica exchange: factors ({:.6}, {:.6}), new temperatures ({:?}, {:?})",
        factor_a, factor_b, a.ensemble.temperature, b.ensemble.temperature
    );
    Ok(())
}

fn rescale(sim: &mut Simulation, factor: f64) {
    for p in sim.particles.iter_mut() {
        p.velocity = p.velocity * factor;
        if let Some(omega) = p.angular_velocity.as_mut() {
            *omega = *omega * factor;
        }
    }
    sim.scheduler.sorter.rescale_times(factor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryCondition;
    use crate::dynamics::Liouvillean;
    use crate::ensemble::Ensemble;
    use crate::interaction::HardSphere;
    use crate::particle::Particle;
    use crate::species::{Species, SpeciesRegistry};
    use crate::vector::Vec3;

    fn box_at(temperature: f64, speed: f64) -> Simulation {
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

    #[test]
    fn kinetic_energies_exchange_between_matched_boxes() {
        let mut box1 = box_at(1.0, 1.0);
        let mut box2 = box_at(2.0, std::f64::consts::SQRT_2);
        let ke1_before = total_ke(&box1);
        let ke2_before = total_ke(&box2);

        replica_exchange(&mut box1, &mut box2).unwrap();

        assert!((total_ke(&box1) - ke2_before).abs() < 1e-9);
        assert!((total_ke(&box2) - ke1_before).abs() < 1e-9);
    }

    #[test]
    fn clocks_swap_between_boxes() {
        let mut box1 = box_at(1.0, 1.0);
        let mut box2 = box_at(2.0, std::f64::consts::SQRT_2);
        box1.scheduler.sim_time = 3.0;
        box2.scheduler.sim_time = 7.0;

        replica_exchange(&mut box1, &mut box2).unwrap();

        assert!((box1.scheduler.sim_time - 7.0).abs() < 1e-9);
        assert!((box2.scheduler.sim_time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn exchanging_twice_restores_the_prior_state() {
        let mut box1 = box_at(1.0, 1.0);
        let mut box2 = box_at(2.0, std::f64::consts::SQRT_2);
        let velocities1_before: Vec<_> = box1.particles().iter().map(|p| p.velocity).collect();
        let velocities2_before: Vec<_> = box2.particles().iter().map(|p| p.velocity).collect();
        let time1_before = box1.scheduler.sim_time;
        let time2_before = box2.scheduler.sim_time;

        replica_exchange(&mut box1, &mut box2).unwrap();
        replica_exchange(&mut box1, &mut box2).unwrap();

        for (p, expected) in box1.particles().iter().zip(velocities1_before) {
            assert!(p.velocity.approx_eq(&expected, 1e-9));
        }
        for (p, expected) in box2.particles().iter().zip(velocities2_before) {
            assert!(p.velocity.approx_eq(&expected, 1e-9));
        }
        assert!((box1.scheduler.sim_time - time1_before).abs() < 1e-9);
        assert!((box2.scheduler.sim_time - time2_before).abs() < 1e-9);
    }

    #[test]
    fn requires_nvt_ensemble() {
        let mut box1 = box_at(1.0, 1.0);
        let mut box2 = box_at(2.0, std::f64::consts::SQRT_2);
        box2.ensemble.temperature = None;
        let err = replica_exchange(&mut box1, &mut box2).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
