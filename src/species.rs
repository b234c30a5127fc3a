//! Species: named subsets of particles sharing mass and (optionally)
//! moment of inertia.

use crate::error::{SimError, SimResult};
use crate::particle::ParticleId;
use std::collections::HashSet;

/// Index of a [`Species`] within a [`SpeciesRegistry`].
pub type SpeciesId = usize;

/// A named, massive subset of the particle population.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Species {
    pub name: String,
    pub mass: f64,
    /// `Some` for "inertia" species that track orientation and angular
    /// velocity; `None` for point particles.
    pub moment_of_inertia: Option<f64>,
    /// The particle IDs belonging to this species.
    pub members: Vec<ParticleId>,
}

impl Species {
    pub fn new(name: impl Into<String>, mass: f64, members: Vec<ParticleId>) -> Self {
        Species {
            name: name.into(),
            mass,
            moment_of_inertia: None,
            members,
        }
    }

    pub fn with_inertia(mut self, moment_of_inertia: f64) -> Self {
        self.moment_of_inertia = Some(moment_of_inertia);
        self
    }

    pub fn has_inertia(&self) -> bool {
        self.moment_of_inertia.is_some()
    }
}

/// The set of species covering a simulation's particles.
///
/// Invariant: species ranges partition the particle set — every
/// particle ID belongs to exactly one species. Enforced by
/// [`SpeciesRegistry::validate`], called at `SPECIES_INIT`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeciesRegistry {
    species: Vec<Species>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        SpeciesRegistry { species: Vec::new() }
    }

    /// Registers a species. Duplicate names are rejected; partition
    /// coverage is checked later by [`Self::validate`] once all
    /// species for the simulation have been added.
    pub fn add(&mut self, species: Species) -> SimResult<SpeciesId> {
        if self.species.iter().any(|s| s.name == species.name) {
            return Err(SimError::Config(format!(
                "duplicate species name '{}'",
                species.name
            )));
        }
        self.species.push(species);
        Ok(self.species.len() - 1)
    }

    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(id)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Finds the species a particle belongs to.
    pub fn species_of(&self, id: ParticleId) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|s| s.members.contains(&id))
    }

    /// Checks that the registered species partition exactly
    /// `0..particle_count` with no overlaps and no gaps.
    pub fn validate(&self, particle_count: usize) -> SimResult<()> {
        let mut seen = HashSet::with_capacity(particle_count);
        for species in &self.species {
            for &id in &species.members {
                if !seen.insert(id) {
                    return Err(SimError::Config(format!(
                        "particle {} claimed by more than one species",
                        id
                    )));
                }
            }
        }
        if seen.len() != particle_count {
            return Err(SimError::Config(format!(
                "species coverage is incomplete: {} of {} particles assigned",
                seen.len(),
                particle_count
            )));
        }
        for id in 0..particle_count {
            if !seen.contains(&id) {
                return Err(SimError::Config(format!(
                    "particle {} is not covered by any species",
                    id
                )));
            }
        }
        Ok(())
    }
}
