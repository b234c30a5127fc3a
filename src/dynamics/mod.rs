//! The propagator ("Liouvillean"): analytic streaming and
//! collision-time root finding.
//!
//! Polymorphic over dynamics variant, but over a closed set — adding a
//! new variant means teaching every root-finder about it, so this is
//! modelled as an enum rather than a trait object.

pub mod physics;

use crate::vector::Vec3;

/// The translational dynamics a particle obeys between events.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Translation {
    /// Constant velocity.
    Newtonian,
    /// Core diameters grow linearly with simulation time at rate
    /// `gamma`; used to compress a configuration to a target density.
    Compression { gamma: f64 },
    /// Constant acceleration `g` (uniform external field).
    Gravity { g: Vec3 },
}

/// The propagator for a simulation: a translational variant plus
/// whether orientation ("inertia" species) is tracked on top of it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Liouvillean {
    pub translation: Translation,
    pub orientation: bool,
}

impl Liouvillean {
    pub fn newtonian() -> Self {
        Liouvillean {
            translation: Translation::Newtonian,
            orientation: false,
        }
    }

    pub fn compression(gamma: f64) -> Self {
        Liouvillean {
            translation: Translation::Compression { gamma },
            orientation: false,
        }
    }

    pub fn gravity(g: Vec3) -> Self {
        Liouvillean {
            translation: Translation::Gravity { g },
            orientation: false,
        }
    }

    pub fn with_orientation(mut self) -> Self {
        self.orientation = true;
        self
    }

    /// The core diameter at `sim_time`, given the diameter `sigma0` at
    /// `t=0`. Identity for all variants except `Compression`.
    pub fn current_diameter(&self, sigma0: f64, sim_time: f64) -> f64 {
        match self.translation {
            Translation::Compression { gamma } => sigma0 + gamma * sim_time,
            _ => sigma0,
        }
    }
}
