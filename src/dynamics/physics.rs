//! Closed-form streaming and collision-time root finding.
//!
//! All root-finders work in the frame of one particle relative to
//! another: `r` is the separation at `t=0`, `v` the relative velocity,
//! and they return the least admissible non-negative root `t` of a
//! quadratic in the separation magnitude. Gravity does not need a
//! separate pairwise branch: both particles in a pair feel the same
//! uniform field, so their relative acceleration is zero and the
//! pairwise equation reduces to the Newtonian one. Gravity only
//! matters for single-particle absolute trajectories (streaming,
//! sentinels), handled by [`stream_position`] and
//! [`parabola_sentinel_time`].

use super::Translation;
use crate::vector::Vec3;

/// Roots within this distance of zero are treated as "now" for the
/// purposes of the already-separating rejection rule.
const GRAZE_EPSILON: f64 = 1e-12;

/// Advances a single particle's position from `t=0` to `dt` under the
/// given translational dynamics. Velocity is returned alongside since
/// gravity changes it; other variants return it unchanged.
pub fn stream_position(translation: &Translation, r0: Vec3, v0: Vec3, dt: f64) -> (Vec3, Vec3) {
    match translation {
        Translation::Newtonian | Translation::Compression { .. } => (r0 + v0 * dt, v0),
        Translation::Gravity { g } => {
            let r1 = r0 + v0 * dt + *g * (0.5 * dt * dt);
            let v1 = v0 + *g * dt;
            (r1, v1)
        }
    }
}

/// Solves `a*t^2 + b*t + c = 0` for real roots, ascending order.
/// Falls back to the linear case when `a` is degenerate.
fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < f64::EPSILON {
        if b.abs() < f64::EPSILON {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (r1, r2) = ((-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a));
    Some((r1.min(r2), r1.max(r2)))
}

/// The coefficients of `|r + v*t|^2 - sigma(t)^2 = 0` for the given
/// translation, where `sigma_now` is the core diameter evaluated at
/// the current simulation time (callers get this from
/// [`super::Liouvillean::current_diameter`]).
fn core_equation(translation: &Translation, r: Vec3, v: Vec3, sigma_now: f64) -> (f64, f64, f64) {
    match translation {
        Translation::Newtonian | Translation::Gravity { .. } => (
            v.dot(&v),
            2.0 * r.dot(&v),
            r.dot(&r) - sigma_now * sigma_now,
        ),
        Translation::Compression { gamma } => (
            v.dot(&v) - gamma * gamma,
            2.0 * r.dot(&v) - 2.0 * sigma_now * gamma,
            r.dot(&r) - sigma_now * sigma_now,
        ),
    }
}

/// Least non-negative root at which a pair's separation reaches
/// `sigma_now`, approaching from outside. `None` when no physically
/// meaningful collision exists in `[0, infinity)`.
///
/// Roots within [`GRAZE_EPSILON`] of zero are rejected when the pair
/// is already separating (`r.dot(&v) >= 0`) — this prevents an event
/// just executed from immediately re-triggering itself due to
/// floating-point residue at the contact point.
pub fn sphere_sphere_in_root(translation: &Translation, r: Vec3, v: Vec3, sigma_now: f64) -> Option<f64> {
    let (a, b, c) = core_equation(translation, r, v, sigma_now);
    let (t0, t1) = quadratic_roots(a, b, c)?;
    for t in [t0, t1] {
        if t < -GRAZE_EPSILON {
            continue;
        }
        if t.abs() <= GRAZE_EPSILON && r.dot(&v) >= 0.0 {
            continue;
        }
        return Some(t.max(0.0));
    }
    None
}

/// Least positive root at which a captured pair's separation leaves
/// `sigma_now` outward (`derivative > 0` at the root) — the well-escape
/// time for stepped potentials.
pub fn sphere_sphere_out_root(translation: &Translation, r: Vec3, v: Vec3, sigma_now: f64) -> Option<f64> {
    let (a, b, c) = core_equation(translation, r, v, sigma_now);
    let (t0, t1) = quadratic_roots(a, b, c)?;
    for t in [t0, t1] {
        if t <= GRAZE_EPSILON {
            continue;
        }
        // derivative of the quadratic equation itself at the root;
        // positive means the pair is separating through sigma_now.
        let deriv = 2.0 * a * t + b;
        if deriv > 0.0 {
            return Some(t);
        }
    }
    None
}

/// For gravity dynamics, the time at which the component of a
/// particle's velocity along the field direction crosses zero (its
/// trajectory apex), or the moment a numerical resync is due. `None`
/// when the particle is not moving against the field and will never
/// reach an apex (e.g. at rest, or `g` is zero).
pub fn parabola_sentinel_time(g: Vec3, v: Vec3) -> Option<f64> {
    let g_norm = g.norm();
    if g_norm < f64::EPSILON {
        return None;
    }
    let g_hat = g / g_norm;
    let t = -v.dot(&g_hat) / g_norm;
    if t > 0.0 { Some(t) } else { None }
}

/// Time at which a particle travelling at constant velocity `v`
/// parallel to one axis of a periodic box of side `size` would wrap
/// twice without an intervening resync — half the period of crossing,
/// measured from `r=0`. Used by the PBC sentinel global.
pub fn pbc_sentinel_time(v_component: f64, size: f64) -> Option<f64> {
    if v_component.abs() < f64::EPSILON {
        return None;
    }
    Some(size / (2.0 * v_component.abs()))
}
