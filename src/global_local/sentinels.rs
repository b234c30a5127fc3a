//! Sentinel globals: virtual resync events that bound numerical drift
//! without changing particle state.

use super::Global;
use crate::dynamics::physics::{parabola_sentinel_time, pbc_sentinel_time};
use crate::dynamics::{Liouvillean, Translation};
use crate::event::{Event, EventKind, GlobalKind};
use crate::particle::Particle;
use crate::vector::Vec3;

/// Schedules a resync at the apex of a particle's parabolic
/// trajectory under constant gravity, so free-streaming between real
/// events never silently accumulates drift past the turning point.
#[derive(Debug)]
pub struct ParabolaSentinel;

impl Global for ParabolaSentinel {
    fn get_event(&self, p: &Particle, liouvillean: &Liouvillean, sim_time: f64) -> Option<Event> {
        let Translation::Gravity { g } = liouvillean.translation else {
            return None;
        };
        let t = parabola_sentinel_time(g, p.velocity)?;
        Some(Event::single(
            EventKind::Global(GlobalKind::VirtualParabola),
            sim_time + t,
            p.id,
            p.collision_counter,
        ))
    }

    fn run_event(&self, _p: &mut Particle, _event: &Event) {
        // Virtual: no kinematic change. Re-enumeration (driven by the
        // scheduler after every event) schedules the next apex from
        // the particle's now-current velocity.
    }
}

/// Forces a resync before a particle travelling parallel to a periodic
/// axis could wrap around the box twice between real events, which
/// would otherwise corrupt the minimum-image separation calculation.
#[derive(Debug)]
pub struct PbcSentinel {
    pub size: Vec3,
}

impl Global for PbcSentinel {
    fn get_event(&self, p: &Particle, _liouvillean: &Liouvillean, sim_time: f64) -> Option<Event> {
        let candidates = [
            pbc_sentinel_time(p.velocity.x, self.size.x),
            pbc_sentinel_time(p.velocity.y, self.size.y),
            pbc_sentinel_time(p.velocity.z, self.size.z),
        ];
        let t = candidates.into_iter().flatten().fold(f64::INFINITY, f64::min);
        if t.is_finite() {
            Some(Event::single(
                EventKind::Global(GlobalKind::PbcSentinel),
                sim_time + t,
                p.id,
                p.collision_counter,
            ))
        } else {
            None
        }
    }

    fn run_event(&self, _p: &mut Particle, _event: &Event) {
        // Virtual: the re-enumeration pass after this event schedules
        // the next sentinel from the particle's current position.
    }

    fn rescale_lengths(&mut self, factor: f64) {
        self.size = self.size * factor;
    }
}
