//! Analytic cube motion used as ground truth.

use codec::{CubeState, Snapshot};
use glam::{Quat, Vec3};

use crate::rng::Rng;

const GRID_COLUMNS: usize = 32;
const GRID_SPACING: f32 = 2.0;
const REST_HEIGHT: f32 = 0.5;

/// Circular motion around a fixed center with a constant spin about z.
#[derive(Debug, Clone, Copy)]
struct Orbit {
    center: Vec3,
    radius: f32,
    rate: f32,
    phase: f32,
    spin: f32,
}

impl Orbit {
    fn state_at(&self, time: f64) -> CubeState {
        let time = time as f32;
        let angle = self.phase + self.rate * time;
        let (sin, cos) = angle.sin_cos();
        let moving = self.rate != 0.0 || self.spin != 0.0;
        CubeState {
            interacting: moving,
            position: self.center + Vec3::new(cos, sin, 0.0) * self.radius,
            orientation: Quat::from_rotation_z(self.phase + self.spin * time),
            linear_velocity: Vec3::new(-sin, cos, 0.0) * self.radius * self.rate,
            angular_velocity: Vec3::new(0.0, 0.0, self.spin),
        }
    }
}

/// A grid of cubes, some orbiting, the rest at rest.
#[derive(Debug, Clone)]
pub struct Scene {
    orbits: Vec<Orbit>,
}

impl Scene {
    /// Lays out `count` cubes; cube 0 always moves and each other cube moves
    /// with probability `moving_fraction`.
    #[must_use]
    pub fn new(count: usize, moving_fraction: f64, rng: &mut Rng) -> Self {
        let half_width = GRID_COLUMNS as f32 * GRID_SPACING / 2.0;
        let orbits = (0..count)
            .map(|index| {
                let center = Vec3::new(
                    (index % GRID_COLUMNS) as f32 * GRID_SPACING - half_width,
                    (index / GRID_COLUMNS) as f32 * GRID_SPACING - half_width,
                    REST_HEIGHT,
                );
                let phase = rng.range_f32(0.0, std::f32::consts::TAU);
                if index == 0 || rng.chance(moving_fraction) {
                    Orbit {
                        center,
                        radius: rng.range_f32(0.5, 3.0),
                        rate: rng.range_f32(-2.0, 2.0),
                        phase,
                        spin: rng.range_f32(-3.0, 3.0),
                    }
                } else {
                    Orbit {
                        center,
                        radius: 0.0,
                        rate: 0.0,
                        phase,
                        spin: 0.0,
                    }
                }
            })
            .collect();
        Self { orbits }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    #[must_use]
    pub fn position_at(&self, index: usize, time: f64) -> Option<Vec3> {
        self.orbits
            .get(index)
            .map(|orbit| orbit.state_at(time).position)
    }

    #[must_use]
    pub fn snapshot_at(&self, time: f64) -> Snapshot {
        Snapshot::new(
            self.orbits
                .iter()
                .map(|orbit| orbit.state_at(time))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_cubes_do_not_move() {
        let mut rng = Rng::new(11);
        let scene = Scene::new(64, 0.0, &mut rng);
        let early = scene.snapshot_at(0.0);
        let late = scene.snapshot_at(5.0);
        assert_eq!(early.cubes[1..], late.cubes[1..]);
        assert_ne!(early.cubes[0], late.cubes[0]);
    }

    #[test]
    fn velocity_matches_motion() {
        let mut rng = Rng::new(5);
        let scene = Scene::new(1, 1.0, &mut rng);
        let dt = 1e-3;
        let a = scene.snapshot_at(1.0).cubes[0];
        let b = scene.snapshot_at(1.0 + dt).cubes[0];
        let numeric = (b.position - a.position) / dt as f32;
        assert!(numeric.distance(a.linear_velocity) < 0.05);
    }
}
