//! Polygon geometry for the spinning boundary
//!
//! A regular N-gon is described by its center, circumradius and rotation angle.
//! Vertex `i` sits at `angle + i * TAU / N`, so vertices (and the edges built
//! from consecutive pairs) always wind counter-clockwise.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::polar_to_cartesian;

/// A wall segment from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: Vec2,
    pub b: Vec2,
}

impl Edge {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Closest point on this edge to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        closest_point_on_segment(point, self.a, self.b)
    }
}

/// Vertices of a regular polygon rotated by `angle`, in counter-clockwise order
pub fn polygon_vertices(center: Vec2, radius: f32, angle: f32, sides: u32) -> Vec<Vec2> {
    let step = TAU / sides as f32;
    (0..sides)
        .map(|i| center + polar_to_cartesian(radius, angle + i as f32 * step))
        .collect()
}

/// Edges `(v[i], v[i + 1])` of a closed vertex loop
pub fn polygon_edges(vertices: &[Vec2]) -> Vec<Edge> {
    let n = vertices.len();
    (0..n)
        .map(|i| Edge::new(vertices[i], vertices[(i + 1) % n]))
        .collect()
}

/// Clamped projection parameter of `point` onto segment AB
///
/// Returns 0.0 for a degenerate (zero-length) segment.
#[inline]
pub fn segment_param(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return 0.0;
    }
    ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
}

/// Point on segment AB nearest to `point`
#[inline]
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    a + (b - a) * segment_param(point, a, b)
}

/// Distance from the center of a regular polygon to the midpoint of an edge
#[inline]
pub fn inradius(radius: f32, sides: u32) -> f32 {
    radius * (PI / sides as f32).cos()
}
