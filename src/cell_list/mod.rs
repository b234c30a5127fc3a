//! Intrusive doubly-linked cell list: the neighbour oracle.
//!
//! Cells are stored densely in a `Vec`; residency is tracked by a
//! parallel array `link[id] = {prev, next, cell}` rather than per-cell
//! `Vec<ParticleId>` allocations, so inserting or removing a particle
//! from a cell is O(1) and touches no heap. `-1` (via `NO_LINK`) plays
//! the role of a null pointer for the index-based links.

pub mod tests;

use crate::particle::{Particle, ParticleId};
use crate::vector::Vec3;

const NO_LINK: i64 = -1;

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: i64,
    next: i64,
    cell: usize,
}

/// A rectilinear partition of the primary image into cells, each
/// holding a doubly-linked list of resident particle IDs.
#[derive(Debug, Clone)]
pub struct CellList {
    size: Vec3,
    dims: [usize; 3],
    cell_size: Vec3,
    /// head particle id of each cell's list, or `NO_LINK`.
    heads: Vec<i64>,
    /// per-particle link data, indexed by `ParticleId`.
    links: Vec<Link>,
    /// cells sized larger than the interaction range by this much, so
    /// growing particles under compression don't desync the
    /// neighbourhood invariant between rebuilds.
    overlap: f64,
}

impl CellList {
    /// Builds a cell grid over a box of the given `size`, with cell
    /// edge length at least `min_cell_edge` (the longest interaction
    /// range) along every axis.
    pub fn new(size: Vec3, min_cell_edge: f64, particle_count: usize) -> Self {
        let dims = [
            axis_cells(size.x, min_cell_edge),
            axis_cells(size.y, min_cell_edge),
            axis_cells(size.z, min_cell_edge),
        ];
        let cell_size = Vec3::new(
            size.x / dims[0] as f64,
            size.y / dims[1] as f64,
            size.z / dims[2] as f64,
        );
        CellList {
            size,
            dims,
            cell_size,
            heads: vec![NO_LINK; dims[0] * dims[1] * dims[2]],
            links: vec![
                Link {
                    prev: NO_LINK,
                    next: NO_LINK,
                    cell: 0
                };
                particle_count
            ],
            overlap: 0.0,
        }
    }

    /// Sets how much wider than `min_cell_edge` a future `rebuild`
    /// should make cells, so growing radii under compression dynamics
    /// cannot outgrow the neighbourhood invariant before the next
    /// rebuild (`SysNBListCompressionFix` in the originating design).
    pub fn set_cell_overlap(&mut self, overlap: f64) {
        self.overlap = overlap;
    }

    pub fn cell_overlap(&self) -> f64 {
        self.overlap
    }

    /// Recomputes the grid for box `size`, using `min_cell_edge +
    /// cell_overlap()` as the minimum edge, and reinserts every particle
    /// in `particles` from scratch. Called periodically under
    /// `Translation::Compression` so cells stay wider than the
    /// currently-growing interaction range between rebuilds.
    pub fn rebuild(&mut self, size: Vec3, min_cell_edge: f64, particles: &[Particle]) {
        let min_edge = min_cell_edge + self.overlap;
        let dims = [
            axis_cells(size.x, min_edge),
            axis_cells(size.y, min_edge),
            axis_cells(size.z, min_edge),
        ];
        let cell_size = Vec3::new(
            size.x / dims[0] as f64,
            size.y / dims[1] as f64,
            size.z / dims[2] as f64,
        );
        self.size = size;
        self.dims = dims;
        self.cell_size = cell_size;
        self.heads = vec![NO_LINK; dims[0] * dims[1] * dims[2]];
        self.links = vec![
            Link {
                prev: NO_LINK,
                next: NO_LINK,
                cell: 0
            };
            particles.len()
        ];
        for p in particles {
            self.insert(p.id, p.position);
        }
    }

    fn cell_index(&self, position: Vec3) -> usize {
        let coords = self.cell_coords(position);
        self.flatten(coords)
    }

    fn cell_coords(&self, position: Vec3) -> [usize; 3] {
        let half = Vec3::new(self.size.x / 2.0, self.size.y / 2.0, self.size.z / 2.0);
        let shifted = Vec3::new(position.x + half.x, position.y + half.y, position.z + half.z);
        [
            axis_coord(shifted.x, self.cell_size.x, self.dims[0]),
            axis_coord(shifted.y, self.cell_size.y, self.dims[1]),
            axis_coord(shifted.z, self.cell_size.z, self.dims[2]),
        ]
    }

    fn flatten(&self, coords: [usize; 3]) -> usize {
        coords[0] + self.dims[0] * (coords[1] + self.dims[1] * coords[2])
    }

    /// Inserts `id` at `position` into its cell's list.
    pub fn insert(&mut self, id: ParticleId, position: Vec3) {
        let cell = self.cell_index(position);
        self.push_front(id, cell);
    }

    fn push_front(&mut self, id: ParticleId, cell: usize) {
        let old_head = self.heads[cell];
        self.links[id] = Link {
            prev: NO_LINK,
            next: old_head,
            cell,
        };
        if old_head != NO_LINK {
            self.links[old_head as usize].prev = id as i64;
        }
        self.heads[cell] = id as i64;
    }

    /// Removes `id` from whichever cell it currently occupies.
    pub fn remove(&mut self, id: ParticleId) {
        let link = self.links[id];
        if link.prev != NO_LINK {
            self.links[link.prev as usize].next = link.next;
        } else {
            self.heads[link.cell] = link.next;
        }
        if link.next != NO_LINK {
            self.links[link.next as usize].prev = link.prev;
        }
    }

    /// Moves `id` to the cell containing `new_position`, a no-op if it
    /// is already the right cell. Returns `true` if the particle's
    /// cell changed.
    pub fn update(&mut self, id: ParticleId, new_position: Vec3) -> bool {
        let new_cell = self.cell_index(new_position);
        if self.links[id].cell == new_cell {
            return false;
        }
        self.remove(id);
        self.push_front(id, new_cell);
        true
    }

    /// Invokes `visit` for every particle sharing `p`'s cell or one of
    /// its 26 geometric neighbours (face/edge/corner), including `p`
    /// itself — callers filter self-pairs.
    pub fn neighbourhood(&self, position: Vec3, mut visit: impl FnMut(ParticleId)) {
        let centre = self.cell_coords(position);
        for dz in -1i64..=1 {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let Some(coords) = self.wrap_neighbour(centre, [dx, dy, dz]) else {
                        continue;
                    };
                    let cell = self.flatten(coords);
                    let mut cur = self.heads[cell];
                    while cur != NO_LINK {
                        visit(cur as usize);
                        cur = self.links[cur as usize].next;
                    }
                }
            }
        }
    }

    fn wrap_neighbour(&self, centre: [usize; 3], delta: [i64; 3]) -> Option<[usize; 3]> {
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let dim = self.dims[axis] as i64;
            if dim == 0 {
                return None;
            }
            let raw = centre[axis] as i64 + delta[axis];
            out[axis] = raw.rem_euclid(dim) as usize;
        }
        Some(out)
    }

    /// The smallest time, over all axes, at which `position` moving at
    /// `velocity` reaches a cell face from its current cell. Used by
    /// the scheduler to schedule the next `Cell` event for a particle.
    pub fn next_face_time(&self, position: Vec3, velocity: Vec3) -> f64 {
        let mut best = f64::INFINITY;
        for (axis_pos, axis_vel, axis_cell, half_size) in [
            (position.x, velocity.x, self.cell_size.x, self.size.x / 2.0),
            (position.y, velocity.y, self.cell_size.y, self.size.y / 2.0),
            (position.z, velocity.z, self.cell_size.z, self.size.z / 2.0),
        ] {
            if axis_vel.abs() < f64::EPSILON || axis_cell <= 0.0 {
                continue;
            }
            let shifted = axis_pos + half_size;
            let local = shifted.rem_euclid(axis_cell);
            let t = if axis_vel > 0.0 {
                (axis_cell - local) / axis_vel
            } else {
                local / (-axis_vel)
            };
            if t < best {
                best = t;
            }
        }
        best
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }
}

fn axis_cells(length: f64, min_edge: f64) -> usize {
    if min_edge <= 0.0 || length <= 0.0 {
        return 1;
    }
    (length / min_edge).floor().max(1.0) as usize
}

fn axis_coord(shifted: f64, cell_size: f64, dim: usize) -> usize {
    if cell_size <= 0.0 {
        return 0;
    }
    let idx = (shifted / cell_size).floor() as i64;
    idx.rem_euclid(dim as i64) as usize
}
