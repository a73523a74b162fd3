//! Vector helpers on top of `glam::Vec2`.
//!
//! Addition, scaling and magnitude come straight from glam; the functions
//! here cover the cases where the simulation needs a total (never panicking,
//! never NaN-producing) answer.

use glam::Vec2;

/// Unit vector in the direction of `v`, or `Vec2::ZERO` when `v` has no
/// usable direction (zero length or non-finite components).
pub fn normalize(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Reflect `v` about the unit normal `n`: `v - 2 (v·n) n`.
pub fn reflect(v: Vec2, n: Vec2) -> Vec2 {
    v - 2.0 * v.dot(n) * n
}

/// Linear integration step.
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2, dt: f32) -> Vec2 {
    pos + vel * dt
}

/// Mirror `y` back into `[min, max]` as if it had bounced off both ends.
///
/// The coordinate is unfolded over a period of twice the span, so any number
/// of bounces is handled without iterating.
pub fn fold_into(y: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 || !y.is_finite() {
        return min;
    }
    let period = span * 2.0;
    let t = (y - min).rem_euclid(period);
    if t > span {
        max - (t - span)
    } else {
        min + t
    }
}

/// Heading vector for an angle measured from the +x axis, pointing left when
/// `sign_x` is negative.
pub fn heading(angle: f32, sign_x: f32) -> Vec2 {
    Vec2::new(angle.cos() * sign_x.signum(), angle.sin())
}
