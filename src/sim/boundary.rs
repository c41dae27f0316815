//! The spinning polygon enclosure
//!
//! Only the rotation angle changes over a run. Vertices and edges are derived
//! from it on demand so they can never drift out of sync with the angle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Edge};
use crate::normalize_angle;

/// A regular polygon rotating rigidly about its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Rotation center (constant)
    pub center: Vec2,
    /// Center-to-vertex distance (constant)
    pub radius: f32,
    /// Number of sides (>= 3)
    pub sides: u32,
    /// Fixed phase added to the rotation angle when placing vertices
    pub phase: f32,
    /// Current rotation angle (radians, wrapped to [-π, π))
    angle: f32,
    /// Spin rate (radians/sec, positive = counter-clockwise)
    angular_velocity: f32,
}

impl Boundary {
    pub fn new(center: Vec2, radius: f32, sides: u32, angular_velocity: f32) -> Self {
        Self {
            center,
            radius,
            sides,
            phase: 0.0,
            angle: 0.0,
            angular_velocity,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.angular_velocity = angular_velocity;
    }

    /// Rotate by `angular_velocity * dt`
    pub fn advance(&mut self, dt: f32) {
        self.angle = normalize_angle(self.angle + self.angular_velocity * dt);
    }

    /// Vertices at the current angle, counter-clockwise
    pub fn vertices(&self) -> Vec<Vec2> {
        geometry::polygon_vertices(self.center, self.radius, self.angle + self.phase, self.sides)
    }

    /// Edges at the current angle
    pub fn edges(&self) -> Vec<Edge> {
        geometry::polygon_edges(&self.vertices())
    }

    #[inline]
    pub fn inradius(&self) -> f32 {
        geometry::inradius(self.radius, self.sides)
    }

    /// Velocity of the wall material currently at world position `p`
    ///
    /// Rigid rotation about `center`: `v = ω × (p − center)`.
    #[inline]
    pub fn point_velocity(&self, p: Vec2) -> Vec2 {
        let r = p - self.center;
        self.angular_velocity * r.perp()
    }
}
