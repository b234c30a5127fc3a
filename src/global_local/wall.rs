//! Hard wall: an infinite plane particles elastically bounce off.

use super::Local;
use crate::dynamics::Liouvillean;
use crate::event::{Event, EventKind};
use crate::particle::{Particle, ParticleId};
use crate::vector::Vec3;
use std::collections::HashSet;

/// An infinite plane, defined by a point on it and an outward unit
/// normal. `members` restricts which particles it applies to; `None`
/// means every dynamic particle.
#[derive(Debug)]
pub struct HardWall {
    pub anchor: Vec3,
    pub normal: Vec3,
    pub restitution: f64,
    pub members: Option<HashSet<ParticleId>>,
}

impl HardWall {
    pub fn new(anchor: Vec3, normal: Vec3) -> Self {
        HardWall {
            anchor,
            normal: normal.normalize(),
            restitution: 1.0,
            members: None,
        }
    }

    pub fn restricted_to(mut self, members: HashSet<ParticleId>) -> Self {
        self.members = Some(members);
        self
    }
}

impl Local for HardWall {
    fn applies_to(&self, p: &Particle) -> bool {
        p.dynamic
            && match &self.members {
                Some(set) => set.contains(&p.id),
                None => true,
            }
    }

    fn get_event(&self, p: &Particle, _liouvillean: &Liouvillean, sim_time: f64) -> Option<Event> {
        let distance = (p.position - self.anchor).dot(&self.normal);
        let approach_speed = p.velocity.dot(&self.normal);
        if approach_speed >= 0.0 {
            return None;
        }
        let t = -distance / approach_speed;
        if t < 0.0 {
            return None;
        }
        Some(Event::single(EventKind::Local, sim_time + t, p.id, p.collision_counter))
    }

    fn run_event(&self, p: &mut Particle, _event: &Event) {
        let vn = p.velocity.dot(&self.normal);
        p.velocity = p.velocity - self.normal * (vn * (1.0 + self.restitution));
    }

    fn rescale_lengths(&mut self, factor: f64) {
        self.anchor = self.anchor * factor;
    }
}
