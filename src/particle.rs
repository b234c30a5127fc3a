//! Particle kinematic state.

use crate::quaternion::Quaternion;
use crate::vector::Vec3;

/// Dense index identifying a particle. Particles are stored in a flat
/// array; this is simply that array's index.
pub type ParticleId = usize;

/// Kinematic record for a single particle.
///
/// Invariant: `pec_time <= sim_time` at all times for every particle
/// in a simulation — a particle's state is only ever streamed forward,
/// never backward, and a particle left behind the clock is streamed
/// lazily the next time it is touched.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// `None` for point particles; `Some` for species with moment of
    /// inertia ("Orientation" dynamics).
    pub orientation: Option<Quaternion>,
    pub angular_velocity: Option<Vec3>,
    /// Infinite-mass particles (walls modelled as particles, fixed
    /// tracers) never move or accept impulses.
    pub dynamic: bool,
    /// The simulation time this particle's kinematic state was last
    /// synchronised to.
    pub pec_time: f64,
    /// Monotonically increasing; bumped every time this particle
    /// participates in an executed event. Snapshotted into events at
    /// creation time so the scheduler can lazily discard stale ones.
    pub collision_counter: u64,
}

impl Particle {
    pub fn new(id: ParticleId, position: Vec3, velocity: Vec3) -> Self {
        Particle {
            id,
            position,
            velocity,
            orientation: None,
            angular_velocity: None,
            dynamic: true,
            pec_time: 0.0,
            collision_counter: 0,
        }
    }

    /// Builds a fixed (infinite-mass, immobile) particle, e.g. a wall
    /// modelled as a particle for interaction-registry purposes.
    pub fn fixed(id: ParticleId, position: Vec3) -> Self {
        Particle {
            dynamic: false,
            ..Particle::new(id, position, Vec3::zero())
        }
    }

    /// Attaches "inertia" state: an orientation and angular velocity.
    pub fn with_orientation(mut self, orientation: Quaternion, angular_velocity: Vec3) -> Self {
        self.orientation = Some(orientation);
        self.angular_velocity = Some(angular_velocity);
        self
    }

    pub fn has_orientation(&self) -> bool {
        self.orientation.is_some()
    }

    /// Bumps the collision counter, invalidating any event that was
    /// created with the prior value. Called by the scheduler after
    /// dispatching any event this particle participated in.
    pub fn invalidate(&mut self) {
        self.collision_counter += 1;
    }
}
