//! Blend functions between two cube states.

use codec::CubeState;
use glam::{Quat, Vec3};

/// Cubic Hermite spline through `p0` and `p1` with tangents `t0` and `t1`.
#[must_use]
pub fn hermite_spline(t: f32, p0: Vec3, p1: Vec3, t0: Vec3, t1: Vec3) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h1 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h2 = -2.0 * t3 + 3.0 * t2;
    let h3 = t3 - 2.0 * t2 + t;
    let h4 = t3 - t2;
    h1 * p0 + h2 * p1 + h3 * t0 + h4 * t1
}

pub(crate) fn linear(t: f32, a: &CubeState, b: &CubeState) -> (Vec3, Quat) {
    (
        a.position.lerp(b.position, t),
        a.orientation.slerp(b.orientation, t),
    )
}

/// Hermite position over a window of `step_size` seconds, with each endpoint
/// first pushed forward by `extrapolation` seconds of its velocity.
pub(crate) fn hermite(
    t: f32,
    step_size: f32,
    extrapolation: f32,
    a: &CubeState,
    b: &CubeState,
) -> (Vec3, Quat) {
    let p0 = a.position + a.linear_velocity * extrapolation;
    let p1 = b.position + b.linear_velocity * extrapolation;
    let t0 = a.linear_velocity * step_size;
    let t1 = b.linear_velocity * step_size;
    (
        hermite_spline(t, p0, p1, t0, t1),
        a.orientation.slerp(b.orientation, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_hits_endpoints() {
        let p0 = Vec3::new(1.0, 2.0, 3.0);
        let p1 = Vec3::new(-4.0, 0.5, 9.0);
        let t0 = Vec3::X;
        let t1 = Vec3::Y;
        assert_eq!(hermite_spline(0.0, p0, p1, t0, t1), p0);
        assert_eq!(hermite_spline(1.0, p0, p1, t0, t1), p1);
    }

    #[test]
    fn hermite_follows_constant_velocity() {
        // A body moving at 6 m/s over a 1/60 s window travels 0.1 m.
        let velocity = Vec3::new(6.0, 0.0, 0.0);
        let step = 1.0 / 60.0;
        let p0 = Vec3::ZERO;
        let p1 = velocity * step;
        let mid = hermite_spline(0.5, p0, p1, velocity * step, velocity * step);
        assert!((mid.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn linear_blends_halfway() {
        let a = CubeState::at_rest(Vec3::ZERO);
        let mut b = CubeState::at_rest(Vec3::new(2.0, 0.0, 0.0));
        b.orientation = Quat::from_rotation_z(1.0);
        let (position, orientation) = linear(0.5, &a, &b);
        assert_eq!(position, Vec3::new(1.0, 0.0, 0.0));
        assert!(orientation.angle_between(Quat::from_rotation_z(0.5)) < 1e-4);
    }

    #[test]
    fn extrapolation_shifts_both_endpoints() {
        let mut a = CubeState::at_rest(Vec3::ZERO);
        a.linear_velocity = Vec3::new(0.0, 1.0, 0.0);
        let mut b = CubeState::at_rest(Vec3::new(0.0, 1.0, 0.0));
        b.linear_velocity = Vec3::new(0.0, 1.0, 0.0);

        let (start, _) = hermite(0.0, 1.0, 0.2, &a, &b);
        let (end, _) = hermite(1.0, 1.0, 0.2, &a, &b);
        assert!((start.y - 0.2).abs() < 1e-6);
        assert!((end.y - 1.2).abs() < 1e-6);
    }
}
