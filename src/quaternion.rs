//! Unit quaternion orientation state for "inertia" species.
//!
//! Particles whose [`crate::dynamics::Translation`] enables orientation
//! track a rotation on top of their translational state. Streaming an
//! orientation forward just integrates the rotation at constant angular
//! velocity, built on the same Rodrigues-rotation primitive as
//! [`crate::vector::Vec3::rotate_around`].

use crate::vector::Vec3;

/// A unit quaternion `w + xi + yj + zk`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// The identity rotation.
    pub fn identity() -> Self {
        Quaternion {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Builds the quaternion representing a rotation of `angle` radians
    /// around `axis`. `axis` need not be normalized.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let axis = axis.normalize();
        let half = angle * 0.5;
        let s = half.sin();
        Quaternion {
            w: half.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    #[inline]
    fn norm_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns this quaternion rescaled to unit norm.
    ///
    /// Integrating `dq/dt = 0.5 * omega * q` drifts away from unit norm
    /// over many steps; callers renormalize after each integration.
    pub fn normalize(&self) -> Self {
        let n = self.norm_squared().sqrt();
        if n > f64::EPSILON {
            Quaternion {
                w: self.w / n,
                x: self.x / n,
                y: self.y / n,
                z: self.z / n,
            }
        } else {
            Quaternion::identity()
        }
    }

    /// Hamilton product `self * other`.
    pub fn mul(&self, other: &Self) -> Self {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Integrates this orientation forward by `dt` under constant
    /// angular velocity `omega`, via a first-order exponential-map
    /// step, then renormalizes to counter the accumulation of
    /// floating-point drift.
    pub fn integrate(&self, omega: &Vec3, dt: f64) -> Self {
        let angle = omega.norm() * dt;
        if angle.abs() < f64::EPSILON {
            return *self;
        }
        let delta = Quaternion::from_axis_angle(omega, angle);
        delta.mul(self).normalize()
    }

    /// Rotates `v` by this quaternion, equivalent to the axis-angle
    /// form via Rodrigues' formula.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        let uv = u.cross(v);
        let uuv = u.cross(&uv);
        *v + (uv * s + uuv) * 2.0
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}
