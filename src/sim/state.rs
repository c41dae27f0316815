//! Simulation state and core types
//!
//! Everything a tick mutates lives here, owned by a single `SimState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;

/// The bouncing ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant for the run
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Kinetic energy per unit mass
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }

    /// True if no position or velocity component is NaN or infinite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub ball: Ball,
    pub boundary: Boundary,
    /// Completed tick counter
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(ball: Ball, boundary: Boundary) -> Self {
        Self {
            ball,
            boundary,
            time_ticks: 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            ball_pos: self.ball.pos,
            ball_vel: self.ball.vel,
            ball_radius: self.ball.radius,
            boundary_angle: self.boundary.angle(),
            vertices: self.boundary.vertices(),
        }
    }
}

/// What a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub ball_radius: f32,
    pub boundary_angle: f32,
    pub vertices: Vec<Vec2>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinetic_energy() {
        let ball = Ball::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0);
        assert!((ball.kinetic_energy() - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_is_finite() {
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, 1.0);
        assert!(ball.is_finite());
        ball.vel.y = f32::NAN;
        assert!(!ball.is_finite());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SimState::new(
            Ball::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 5.0),
            Boundary::new(Vec2::ZERO, 50.0, 6, 0.0),
        );
        let snap = state.snapshot();
        assert_eq!(snap.vertices.len(), 6);

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick, 0);
        assert_eq!(back.ball_pos, Vec2::new(1.0, 2.0));
    }
}
