//! The tagged event record and its lazy-invalidation snapshot.

use crate::particle::ParticleId;

/// Interaction-event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InteractionKind {
    /// Hard-core impact.
    Core,
    /// Entering an attractive well.
    WellIn,
    /// Leaving an attractive well.
    WellOut,
    /// Glancing/grazing contact resolved as a no-op bounce.
    Bounce,
}

/// Global-event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GlobalKind {
    /// Gravity apex / numerical resync.
    VirtualParabola,
    /// Guards against double-wrapping a periodic image.
    PbcSentinel,
}

/// The kind of event and the data specific to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    /// Virtual, no state change: marks a move between neighbour cells.
    Cell,
    /// A pairwise interaction event.
    Interaction(InteractionKind),
    /// A per-particle event tied to space at large (sentinels).
    Global(GlobalKind),
    /// A per-particle event tied to a specific local object (a wall).
    Local,
    /// Ticker / halt-condition events with no particle participants
    /// beyond bookkeeping.
    System,
}

impl EventKind {
    /// Total ordering used to break time ties deterministically:
    /// lower-valued kinds execute first among events at the same time
    /// for the same participants.
    fn rank(&self) -> u8 {
        match self {
            EventKind::System => 0,
            EventKind::Cell => 1,
            EventKind::Global(_) => 2,
            EventKind::Local => 3,
            EventKind::Interaction(_) => 4,
        }
    }
}

impl PartialOrd for EventKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A scheduled event: the time it fires, its kind, the participant(s),
/// and a snapshot of their collision counters at the moment this event
/// was created.
///
/// On extraction, the scheduler compares `counter1`/`counter2` against
/// the participants' live counters; any mismatch means some other
/// event already consumed that particle and this one is discarded
/// without ever touching a heap-removal operation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub time: f64,
    pub particle1: ParticleId,
    pub particle2: Option<ParticleId>,
    pub counter1: u64,
    pub counter2: Option<u64>,
}

impl Event {
    pub fn single(kind: EventKind, time: f64, particle: ParticleId, counter: u64) -> Self {
        Event {
            kind,
            time,
            particle1: particle,
            particle2: None,
            counter1: counter,
            counter2: None,
        }
    }

    pub fn pair(
        kind: EventKind,
        time: f64,
        particle1: ParticleId,
        counter1: u64,
        particle2: ParticleId,
        counter2: u64,
    ) -> Self {
        Event {
            kind,
            time,
            particle1,
            particle2: Some(particle2),
            counter1,
            counter2: Some(counter2),
        }
    }

    /// Whether this event's stored counters still match the live
    /// counters of its participants — the lazy-invalidation check.
    pub fn is_valid(&self, live1: u64, live2: Option<u64>) -> bool {
        if self.counter1 != live1 {
            return false;
        }
        match (self.counter2, live2) {
            (Some(stored), Some(live)) => stored == live,
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_when_counters_match() {
        let e = Event::pair(EventKind::Interaction(InteractionKind::Core), 1.0, 0, 3, 1, 5);
        assert!(e.is_valid(3, Some(5)));
        assert!(!e.is_valid(4, Some(5)));
        assert!(!e.is_valid(3, Some(6)));
    }

    #[test]
    fn single_particle_event_ignores_second_slot() {
        let e = Event::single(EventKind::Cell, 2.0, 7, 9);
        assert!(e.is_valid(9, None));
        assert!(!e.is_valid(9, Some(0)));
    }

    #[test]
    fn event_kind_rank_orders_system_first_interaction_last() {
        assert!(EventKind::System < EventKind::Cell);
        assert!(EventKind::Cell < EventKind::Global(GlobalKind::PbcSentinel));
        assert!(EventKind::Local < EventKind::Interaction(InteractionKind::Core));
    }
}
