//! Two-level priority queue: per-particle bounded heaps plus a global
//! "earliest of heads" index, with lazy invalidation.
//!
//! Grounded in the `BinaryHeap<Reverse<T>>` min-heap idiom with a
//! custom `Ord` for deterministic tie-breaking used by sibling
//! event-queue implementations in this corpus. Events are pushed under
//! one participant (`event.particle1`); the other participant
//! rediscovers the pairing when its own neighbourhood is re-enumerated.

pub mod tests;

use crate::event::{Event, EventKind};
use crate::particle::ParticleId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Wraps [`Event`] with a total order over `(time, particle1, particle2,
/// kind)` so it can live in a `BinaryHeap`. `f64::total_cmp` gives a
/// consistent order even across NaN, which should never occur here but
/// must not panic if it does.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedEvent(Event);

impl Eq for QueuedEvent {}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .time
            .total_cmp(&other.0.time)
            .then_with(|| self.0.particle1.cmp(&other.0.particle1))
            .then_with(|| {
                self.0
                    .particle2
                    .unwrap_or(usize::MAX)
                    .cmp(&other.0.particle2.unwrap_or(usize::MAX))
            })
            .then_with(|| self.0.kind.cmp(&other.0.kind))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A lightweight reference to a particle's current queue head, stored
/// in the global index. Compared the same way as `QueuedEvent`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeadKey {
    time: f64,
    id: ParticleId,
    kind: EventKind,
}

impl Eq for HeadKey {}

impl Ord for HeadKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for HeadKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event queue backing the scheduler.
#[derive(Debug, Default)]
pub struct Sorter {
    per_particle: Vec<BinaryHeap<std::cmp::Reverse<QueuedEvent>>>,
    heads: BinaryHeap<std::cmp::Reverse<HeadKey>>,
}

impl Sorter {
    pub fn new(particle_count: usize) -> Self {
        Sorter {
            per_particle: (0..particle_count).map(|_| BinaryHeap::new()).collect(),
            heads: BinaryHeap::new(),
        }
    }

    fn ensure_capacity(&mut self, id: ParticleId) {
        if id >= self.per_particle.len() {
            self.per_particle.resize_with(id + 1, BinaryHeap::new);
        }
    }

    /// Inserts `event` into the queue of `event.particle1`. If it
    /// becomes the new head of that queue, publishes a head reference
    /// into the global index.
    pub fn push(&mut self, event: Event) {
        let id = event.particle1;
        self.ensure_capacity(id);
        self.per_particle[id].push(std::cmp::Reverse(QueuedEvent(event)));
        self.publish_head(id);
    }

    fn publish_head(&mut self, id: ParticleId) {
        if let Some(std::cmp::Reverse(QueuedEvent(head))) = self.per_particle[id].peek() {
            self.heads.push(std::cmp::Reverse(HeadKey {
                time: head.time,
                id,
                kind: head.kind,
            }));
        }
    }

    /// Returns the globally earliest valid event, lazily discarding
    /// both stale global-index entries (whose referenced queue head has
    /// since changed) and stale events (whose stored collision
    /// counters no longer match the live ones, reported by
    /// `live_counter`).
    pub fn pop_next(&mut self, live_counter: impl Fn(ParticleId) -> u64) -> Option<Event> {
        loop {
            let std::cmp::Reverse(candidate) = self.heads.pop()?;
            let id = candidate.id;
            if id >= self.per_particle.len() {
                continue;
            }
            let current_head = match self.per_particle[id].peek() {
                Some(std::cmp::Reverse(QueuedEvent(e))) => *e,
                None => continue,
            };
            if current_head.time != candidate.time || current_head.kind != candidate.kind {
                // A newer head has since been published for this
                // particle; this global-index entry is superseded.
                continue;
            }
            self.per_particle[id].pop();
            self.publish_head(id);

            let c1 = live_counter(current_head.particle1);
            let c2 = current_head.particle2.map(|id| live_counter(id));
            if current_head.is_valid(c1, c2) {
                return Some(current_head);
            }
            // else: discarded by lazy invalidation, keep looking.
        }
    }

    /// Multiplies every stored event time by `factor`. Used by replica
    /// exchange to keep scheduler times consistent with a rescaled
    /// velocity distribution.
    pub fn rescale_times(&mut self, factor: f64) {
        for heap in &mut self.per_particle {
            let rescaled: Vec<_> = heap
                .drain()
                .map(|std::cmp::Reverse(QueuedEvent(mut e))| {
                    e.time *= factor;
                    std::cmp::Reverse(QueuedEvent(e))
                })
                .collect();
            *heap = rescaled.into_iter().collect();
        }
        self.heads = self
            .heads
            .drain()
            .map(|std::cmp::Reverse(mut k)| {
                k.time *= factor;
                std::cmp::Reverse(k)
            })
            .collect();
    }

    /// Re-pushes a fixed-schedule set of `System` events, e.g. after a
    /// rescale that invalidated their absolute times.
    pub fn rebuild_system_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.push(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.per_particle.iter().all(|h| h.is_empty())
    }
}
