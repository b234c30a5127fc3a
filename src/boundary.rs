//! Boundary conditions: image wrapping applied to positions and
//! separation vectors.

use crate::vector::Vec3;

/// A closed set of boundary-condition variants. Closed because adding
/// a new kind of boundary changes how separations and positions are
/// computed everywhere, not an isolated extension point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryCondition {
    /// No wrapping; the primary image is the whole of space.
    None,
    /// Periodic images along each axis of a rectilinear box.
    Periodic { size: Vec3 },
    /// Periodic in x and z, shifted by `shear_rate * size.y * sim_time`
    /// in x for every y-period crossed (planar Couette shear flow).
    LeesEdwards { size: Vec3, shear_rate: f64 },
}

impl BoundaryCondition {
    /// Minimum-image separation `a - b`, wrapped into `(-size/2, size/2]`
    /// per axis.
    pub fn separation(&self, a: Vec3, b: Vec3, sim_time: f64) -> Vec3 {
        match self {
            BoundaryCondition::None => a - b,
            BoundaryCondition::Periodic { size } => {
                wrap_component(a - b, *size)
            }
            BoundaryCondition::LeesEdwards { size, shear_rate } => {
                let mut r = a - b;
                let ny = (r.y / size.y).round();
                r.x -= ny * shear_rate * size.y * sim_time;
                wrap_component(r, *size)
            }
        }
    }

    /// Wraps a position back into the primary image.
    pub fn wrap_position(&self, p: Vec3) -> Vec3 {
        match self {
            BoundaryCondition::None => p,
            BoundaryCondition::Periodic { size } => wrap_component(p, *size),
            BoundaryCondition::LeesEdwards { size, .. } => wrap_component(p, *size),
        }
    }

    /// The box extent along each axis, if this boundary has one.
    pub fn size(&self) -> Option<Vec3> {
        match self {
            BoundaryCondition::None => None,
            BoundaryCondition::Periodic { size } => Some(*size),
            BoundaryCondition::LeesEdwards { size, .. } => Some(*size),
        }
    }

    /// Scales the box extent (if any) by `factor`, leaving `None`
    /// boundaries and the shear rate unchanged. Used to restore the box
    /// to its pre-compression size once core diameters are rescaled
    /// back to their nominal value.
    pub fn rescaled(&self, factor: f64) -> Self {
        match self {
            BoundaryCondition::None => BoundaryCondition::None,
            BoundaryCondition::Periodic { size } => BoundaryCondition::Periodic { size: *size * factor },
            BoundaryCondition::LeesEdwards { size, shear_rate } => BoundaryCondition::LeesEdwards {
                size: *size * factor,
                shear_rate: *shear_rate,
            },
        }
    }
}

fn wrap_component(v: Vec3, size: Vec3) -> Vec3 {
    Vec3::new(
        wrap_axis(v.x, size.x),
        wrap_axis(v.y, size.y),
        wrap_axis(v.z, size.z),
    )
}

fn wrap_axis(x: f64, l: f64) -> f64 {
    if l <= 0.0 {
        return x;
    }
    x - l * (x / l).round()
}
