//! Compression runs: grow core diameters linearly in time
//! (`Translation::Compression`) until the configuration reaches a
//! target packing fraction, then restore unit-length diameters by
//! rescaling the box and every particle position, keeping the denser
//! configuration compression produced.
//!
//! Grounded on the additive growth law in
//! `dynamics::Liouvillean::current_diameter` and on the
//! rescale-then-reseed pattern `simulation::replica::rescale` uses for
//! replica exchange.

use super::{Phase, Simulation, COMPRESSION_REBUILD_INTERVAL};
use crate::dynamics::Translation;
use crate::error::{SimError, SimResult};
use crate::scheduler::logic;
use crate::sorter::Sorter;
use crate::vector::Vec3;
use std::f64::consts::PI;

fn sphere_volume(sigma: f64) -> f64 {
    (4.0 / 3.0) * PI * (sigma / 2.0).powi(3)
}

impl Simulation {
    /// Runs `Translation::Compression` dynamics until the packing
    /// fraction implied by core diameter `sigma0` at `t=0` reaches
    /// `target_phi`, halting at
    /// `tau = sigma0 * (growth_factor - 1) / gamma` where
    /// `growth_factor = (target_phi / initial_phi).cbrt()`. Then calls
    /// [`Self::restore_system`] to rescale diameters back to `sigma0`
    /// while keeping the compressed configuration. Returns the number
    /// of events executed during compression.
    pub fn run_compression_to_density(&mut self, sigma0: f64, target_phi: f64) -> SimResult<u64> {
        self.require_exact(Phase::Initialised)?;
        let gamma = match self.liouvillean.translation {
            Translation::Compression { gamma } => gamma,
            _ => {
                return Err(SimError::Config(
                    "run_compression_to_density requires Translation::Compression dynamics".into(),
                ));
            }
        };
        if gamma <= 0.0 {
            return Err(SimError::Config("compression rate gamma must be positive".into()));
        }

        let initial_phi = self.ensemble.packing_fraction(sphere_volume(sigma0));
        if initial_phi <= 0.0 || target_phi <= initial_phi {
            return Err(SimError::Config(format!(
                "target packing fraction {} must exceed the initial fraction {}",
                target_phi, initial_phi
            )));
        }
        let growth_factor = (target_phi / initial_phi).cbrt();
        let tau = sigma0 * (growth_factor - 1.0) / gamma;

        let mut executed = 0;
        let mut last_rebuild = self.scheduler.sim_time;
        while self.scheduler.sim_time < tau {
            if !self.run_next_event()? {
                break;
            }
            executed += 1;
            if self.scheduler.sim_time - last_rebuild >= COMPRESSION_REBUILD_INTERVAL {
                self.rebuild_cell_list_for_growth()?;
                last_rebuild = self.scheduler.sim_time;
            }
        }

        self.restore_system(growth_factor)?;
        log::info!(
            "compression run: {} events, phi {:.4} -> {:.4} over tau={:.4}, growth factor {:.6}",
            executed, initial_phi, target_phi, tau, growth_factor
        );
        Ok(executed)
    }

    /// Widens the cell grid to the interaction range's current (grown)
    /// diameter, reinserting every particle. The `overlap` `finalize`
    /// set on the cell list absorbs growth between these rebuilds.
    fn rebuild_cell_list_for_growth(&mut self) -> SimResult<()> {
        let max_range = self.interactions.max_range();
        let current = self.liouvillean.current_diameter(max_range, self.scheduler.sim_time);
        let size = self.boundary.size().unwrap_or(Vec3::new(1.0e4, 1.0e4, 1.0e4));
        let cell_list = self
            .cell_list
            .as_mut()
            .ok_or_else(|| SimError::State("cell list missing despite Initialised phase".into()))?;
        cell_list.rebuild(size, current, &self.particles);
        Ok(())
    }

    /// Rescales every particle position, the box, and every global's
    /// cached lengths by `1 / growth_factor`, bringing core diameters
    /// back to their `t=0` value while preserving the denser packing
    /// fraction compression produced. Resets dynamics to `Newtonian`,
    /// zeroes the clock, and reseeds every particle's event set under
    /// the restored geometry.
    fn restore_system(&mut self, growth_factor: f64) -> SimResult<()> {
        let factor = 1.0 / growth_factor;
        for p in self.particles.iter_mut() {
            p.position = p.position * factor;
            p.pec_time = 0.0;
        }
        self.boundary = self.boundary.rescaled(factor);
        self.ensemble.volume *= factor.powi(3);
        for global in self.globals.iter_mut() {
            global.rescale_lengths(factor);
        }
        for local in self.locals.iter_mut() {
            local.rescale_lengths(factor);
        }
        self.liouvillean.translation = Translation::Newtonian;
        self.scheduler.sim_time = 0.0;

        let max_range = self.interactions.max_range().max(1.0);
        let size = self.boundary.size().unwrap_or(Vec3::new(1.0e4, 1.0e4, 1.0e4));
        let cell_list = self
            .cell_list
            .as_mut()
            .ok_or_else(|| SimError::State("cell list missing despite Initialised phase".into()))?;
        cell_list.set_cell_overlap(0.0);
        cell_list.rebuild(size, max_range, &self.particles);

        self.scheduler.sorter = Sorter::new(self.particles.len());
        for id in 0..self.particles.len() {
            logic::full_update(
                id,
                &mut self.scheduler.sorter,
                &self.particles,
                self.cell_list.as_ref().unwrap(),
                &self.boundary,
                &self.liouvillean,
                &self.interactions,
                &self.species,
                &self.globals,
                &self.locals,
                0.0,
            );
        }
        Ok(())
    }
}
